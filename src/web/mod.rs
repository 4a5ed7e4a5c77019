mod error;
mod extractors;
mod handlers;
mod routes;
pub mod security;
pub mod session;
mod state;

pub use state::AppState;

use crate::services::gallery::GalleryClients;
use crate::services::registry;
use crate::Config;
use anyhow::Result;
use axum::middleware;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

/// The full application router over a prepared state.
pub fn router(state: Arc<AppState>) -> Router {
    let max_upload = state.config.server.max_upload_bytes();

    Router::new()
        .merge(routes::gallery_routes(max_upload))
        .merge(routes::htmx_routes())
        .merge(routes::api_routes())
        .layer(middleware::from_fn(security::apply_security_headers))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: Config, addr: &str) -> Result<()> {
    let shared = registry::clients(&config);
    let clients = GalleryClients::new(shared.host.clone(), shared.store.clone());

    let state = Arc::new(AppState::new(config, clients)?);

    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            let removed = sessions.cleanup();
            if removed > 0 {
                tracing::debug!("Dropped {} idle gallery session(s)", removed);
            }
        }
    });

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Gallery listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;

    Ok(())
}
