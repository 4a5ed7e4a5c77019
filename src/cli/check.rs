use crate::Config;
use anyhow::Result;
use std::path::Path;

fn mask(secret: &str) -> String {
    match secret.chars().count() {
        0 => "(empty)".to_string(),
        n if n <= 4 => "*".repeat(n),
        n => {
            let tail: String = secret.chars().skip(n - 4).collect();
            format!("{}{}", "*".repeat(n - 4), tail)
        }
    }
}

fn or_empty(value: &str) -> String {
    if value.is_empty() {
        "(empty)".to_string()
    } else {
        value.to_string()
    }
}

pub fn entries(config: &Config) -> Vec<(&'static str, String)> {
    vec![
        ("server.host", config.server.host.clone()),
        ("server.port", config.server.port.to_string()),
        ("server.max_upload_mb", config.server.max_upload_mb.to_string()),
        ("cloudinary.api_base", or_empty(&config.cloudinary.api_base)),
        ("cloudinary.cloud_name", or_empty(&config.cloudinary.cloud_name)),
        ("cloudinary.upload_preset", mask(&config.cloudinary.upload_preset)),
        ("supabase.url", or_empty(&config.supabase.url)),
        ("supabase.anon_key", mask(&config.supabase.anon_key)),
    ]
}

pub fn run(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;

    let items = entries(&config);
    let width = items.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in items {
        println!("{:width$}  {}", key, value, width = width);
    }

    let missing = config.missing_remote_settings();
    if !missing.is_empty() {
        println!();
        println!("Not set (remote calls will fail): {}", missing.join(", "));
    }

    Ok(())
}
