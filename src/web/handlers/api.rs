use crate::services::pagination::{self, PAGE_SIZE};
use crate::web::state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
}

fn json_envelope(data: serde_json::Value, total: u64, page: u32) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "data": data,
        "meta": {
            "total": total,
            "page": page,
            "per_page": PAGE_SIZE,
            "total_pages": pagination::total_pages(total, PAGE_SIZE),
        }
    }))
}

/// Read-only listing, independent of any browser session. Pages past the end
/// come back empty with the true total.
pub async fn list_media(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> Response {
    let page = params.page.unwrap_or(1).clamp(1, u32::MAX as i64) as u32;

    match state.clients.store.query(page, PAGE_SIZE).await {
        Ok(result) => {
            json_envelope(serde_json::json!(result.rows), result.total_count, page).into_response()
        }
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}
