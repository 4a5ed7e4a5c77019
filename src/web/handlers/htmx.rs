use crate::web::error::AppResult;
use crate::web::extractors::SessionId;
use crate::web::handlers::gallery::{make_context, view_for_page, PageQuery};
use crate::web::state::AppState;
use axum::extract::{Query, State};
use axum::response::Html;
use axum_extra::extract::CookieJar;
use std::sync::Arc;

/// Grid and page controls only, swapped into `#gallery` by the pager links.
pub async fn gallery(
    State(state): State<Arc<AppState>>,
    SessionId { id, jar }: SessionId,
    Query(query): Query<PageQuery>,
) -> AppResult<(CookieJar, Html<String>)> {
    let view = view_for_page(&state, &id, query.page).await;

    let html = state
        .templates
        .render("gallery/grid.html", &make_context(&view))?;
    Ok((jar, Html(html)))
}
