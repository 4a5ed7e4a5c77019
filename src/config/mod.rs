use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cloudinary: CloudinaryConfig,
    #[serde(default)]
    pub supabase: SupabaseConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

impl ServerConfig {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CloudinaryConfig {
    #[serde(default)]
    pub cloud_name: String,
    #[serde(default)]
    pub upload_preset: String,
    #[serde(default = "default_cloudinary_api_base")]
    pub api_base: String,
}

impl Default for CloudinaryConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            upload_preset: String::new(),
            api_base: default_cloudinary_api_base(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SupabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_upload_mb() -> usize {
    100
}

fn default_cloudinary_api_base() -> String {
    "https://api.cloudinary.com".to_string()
}

/// Reads the first non-empty variable among `names`.
fn env_any(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.is_empty())
}

impl Config {
    /// Loads `path` when it exists, then applies environment overrides.
    /// A missing file is not an error: every remote setting may come from the
    /// environment alone.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| {
                anyhow::anyhow!("Could not read config file '{}': {}", path.display(), e)
            })?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        self.apply_env_with(env_any);
    }

    fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&[&str]) -> Option<String>,
    {
        if let Some(v) = lookup(&["CLOUDINARY_CLOUD_NAME", "NEXT_PUBLIC_CLOUDINARY_CLOUD_NAME"]) {
            self.cloudinary.cloud_name = v;
        }
        if let Some(v) = lookup(&[
            "CLOUDINARY_UPLOAD_PRESET",
            "NEXT_PUBLIC_CLOUDINARY_UPLOAD_PRESET",
        ]) {
            self.cloudinary.upload_preset = v;
        }
        if let Some(v) = lookup(&["CLOUDINARY_API_BASE"]) {
            self.cloudinary.api_base = v;
        }
        if let Some(v) = lookup(&["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"]) {
            self.supabase.url = v;
        }
        if let Some(v) = lookup(&["SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"]) {
            self.supabase.anon_key = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("server.port must be greater than 0");
        }
        if self.server.max_upload_mb == 0 {
            anyhow::bail!("server.max_upload_mb must be greater than 0");
        }
        Ok(())
    }

    /// Names of remote settings that are still empty. These do not stop the
    /// server; the first remote call that needs them will fail instead.
    pub fn missing_remote_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.cloudinary.cloud_name.is_empty() {
            missing.push("cloudinary.cloud_name");
        }
        if self.cloudinary.upload_preset.is_empty() {
            missing.push("cloudinary.upload_preset");
        }
        if self.supabase.url.is_empty() {
            missing.push("supabase.url");
        }
        if self.supabase.anon_key.is_empty() {
            missing.push("supabase.anon_key");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: HashMap<&'static str, &'static str>) -> impl Fn(&[&str]) -> Option<String> {
        move |names: &[&str]| {
            names
                .iter()
                .filter_map(|n| vars.get(*n))
                .find(|v| !v.is_empty())
                .map(|v| v.to_string())
        }
    }

    #[test]
    fn test_defaults_leave_remote_settings_empty() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.cloudinary.api_base, "https://api.cloudinary.com");
        assert_eq!(config.missing_remote_settings().len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_sections_parse() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 8080

            [cloudinary]
            cloud_name = "demo"
            upload_preset = "unsigned"

            [supabase]
            url = "https://xyz.supabase.co"
            anon_key = "anon"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.cloudinary.cloud_name, "demo");
        assert!(config.missing_remote_settings().is_empty());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config::default();
        config.cloudinary.cloud_name = "from-file".to_string();
        config.apply_env_with(lookup_from(HashMap::from([
            ("CLOUDINARY_CLOUD_NAME", "from-env"),
            ("SUPABASE_URL", "https://env.supabase.co"),
        ])));
        assert_eq!(config.cloudinary.cloud_name, "from-env");
        assert_eq!(config.supabase.url, "https://env.supabase.co");
    }

    #[test]
    fn test_env_accepts_public_prefixed_names() {
        let mut config = Config::default();
        config.apply_env_with(lookup_from(HashMap::from([
            ("NEXT_PUBLIC_CLOUDINARY_UPLOAD_PRESET", "preset"),
            ("NEXT_PUBLIC_SUPABASE_ANON_KEY", "key"),
        ])));
        assert_eq!(config.cloudinary.upload_preset, "preset");
        assert_eq!(config.supabase.anon_key, "key");
    }

    #[test]
    fn test_validate_rejects_zero_upload_limit() {
        let mut config = Config::default();
        config.server.max_upload_mb = 0;
        assert!(config.validate().is_err());
    }
}
