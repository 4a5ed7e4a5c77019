use crate::{web, Config};
use anyhow::Result;
use std::path::Path;

pub async fn run(config_path: &Path, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = Config::load(config_path)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate()?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Starting gallery at http://{}", addr);

    web::serve(config, &addr).await
}
