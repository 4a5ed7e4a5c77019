use super::handlers;
use super::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub fn gallery_routes(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::gallery::index))
        .route(
            "/upload",
            post(handlers::gallery::upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/health", get(handlers::gallery::health))
}

pub fn htmx_routes() -> Router<Arc<AppState>> {
    Router::new().route("/htmx/gallery", get(handlers::htmx::gallery))
}

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/media", get(handlers::api::list_media))
}
