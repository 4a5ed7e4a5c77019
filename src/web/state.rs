use crate::services::gallery::GalleryClients;
use crate::web::session::SessionStore;
use crate::Config;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tera::{Tera, Value};

pub struct AppState {
    pub config: Config,
    pub clients: GalleryClients,
    pub templates: Tera,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(config: Config, clients: GalleryClients) -> Result<Self> {
        let mut templates = Tera::default();

        templates.register_filter("format_date", format_date_filter);
        templates.add_raw_templates(vec![
            ("css/gallery.css", include_str!("../../templates/css/gallery.css")),
            ("base.html", include_str!("../../templates/base.html")),
            ("gallery/index.html", include_str!("../../templates/gallery/index.html")),
            ("gallery/form.html", include_str!("../../templates/gallery/form.html")),
            ("gallery/grid.html", include_str!("../../templates/gallery/grid.html")),
        ])?;

        Ok(Self {
            config,
            clients,
            templates,
            sessions: Arc::new(SessionStore::default()),
        })
    }
}

/// Renders a store timestamp as a short date (`5/1/2024` by default).
fn format_date_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let date_str = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("format_date requires a string"))?;

    let format = args
        .get("format")
        .and_then(|v| v.as_str())
        .unwrap_or("%-m/%-d/%Y");

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date_str) {
        return Ok(Value::String(dt.format(format).to_string()));
    }

    // Postgres `timestamptz` without the `T` separator.
    if let Ok(dt) = chrono::DateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Ok(Value::String(dt.format(format).to_string()));
    }

    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Value::String(dt.format(format).to_string()));
    }

    Ok(Value::String(date_str.to_string()))
}
