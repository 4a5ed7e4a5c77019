use crate::models::SelectedFile;
use crate::services::gallery::GalleryView;
use crate::services::lazy_tile::{tiles_for, OBSERVER_OPTIONS, PLACEHOLDER_TEXT};
use crate::web::error::{AppError, AppResult};
use crate::web::extractors::{HxRequest, SessionId};
use crate::web::session::SessionStore;
use crate::web::state::AppState;
use axum::extract::{Multipart, Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use std::sync::Arc;
use tera::Context;

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

pub(crate) fn make_context(view: &GalleryView) -> Context {
    let mut ctx = Context::new();
    ctx.insert("title", &view.title);
    ctx.insert("uploading", &view.uploading);
    ctx.insert("error", &view.error);
    ctx.insert(
        "selected_file",
        &view.selected_file.as_ref().map(|f| f.file_name.as_str()),
    );
    ctx.insert("tiles", &tiles_for(&view.rows));
    ctx.insert("page", &view.current_page);
    ctx.insert("total_pages", &view.total_pages());
    ctx.insert("total_count", &view.total_count);
    ctx.insert("has_previous", &view.has_previous());
    ctx.insert("has_next", &view.has_next());
    ctx.insert("previous_page", &view.current_page.saturating_sub(1).max(1));
    ctx.insert("next_page", &(view.current_page + 1).min(view.total_pages().max(1)));
    ctx.insert("observer", &OBSERVER_OPTIONS);
    ctx.insert("placeholder_text", PLACEHOLDER_TEXT);
    ctx
}

/// The browser's view, or a fresh one seeded with page 1.
pub(crate) async fn load_view(state: &AppState, session_id: &str) -> GalleryView {
    if let Some(view) = state.sessions.get(session_id) {
        return view;
    }
    let mut view = GalleryView::new();
    // A failed first load leaves its message on the view.
    let _ = view.load_initial(&state.clients).await;
    view
}

/// Loads the session view and applies a requested page change. A new session
/// asking for a page opens that page directly.
pub(crate) async fn view_for_page(
    state: &AppState,
    session_id: &str,
    page: Option<i64>,
) -> GalleryView {
    let view = match (state.sessions.get(session_id), page) {
        (Some(mut view), Some(page)) => {
            let _ = view.change_page(page, &state.clients).await;
            view
        }
        (Some(view), None) => view,
        (None, Some(page)) => {
            let mut view = GalleryView::new();
            let _ = view.load_page(page, &state.clients).await;
            view
        }
        (None, None) => load_view(state, session_id).await,
    };
    state.sessions.put(session_id, view.clone());
    view
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    SessionId { id, jar }: SessionId,
    Query(query): Query<PageQuery>,
) -> AppResult<(CookieJar, Html<String>)> {
    let view = view_for_page(&state, &id, query.page).await;

    let html = state
        .templates
        .render("gallery/index.html", &make_context(&view))?;
    Ok((jar, Html(html)))
}

struct UploadForm {
    title: String,
    file: Option<SelectedFile>,
}

async fn read_upload_form(multipart: &mut Multipart) -> AppResult<UploadForm> {
    let mut form = UploadForm {
        title: String::new(),
        file: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => {
                form.title = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
            }
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let mime_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        mime_guess::from_path(&file_name)
                            .first_or_octet_stream()
                            .to_string()
                    });
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;

                // An untouched file input still sends an empty, nameless part.
                if !file_name.is_empty() || !data.is_empty() {
                    form.file = Some(SelectedFile::new(file_name, mime_type, data.to_vec()));
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Writes back an interrupted view if the request is dropped while a
/// submission is in flight, so the session never stays `uploading`.
struct InFlightSubmission<'a> {
    sessions: &'a SessionStore,
    session_id: &'a str,
    pending: Option<GalleryView>,
}

impl<'a> InFlightSubmission<'a> {
    fn start(sessions: &'a SessionStore, session_id: &'a str, view: &GalleryView) -> Self {
        sessions.put(session_id, view.clone());
        Self {
            sessions,
            session_id,
            pending: Some(view.clone()),
        }
    }

    fn complete(mut self, view: GalleryView) {
        self.pending = None;
        self.sessions.put(self.session_id, view);
    }
}

impl Drop for InFlightSubmission<'_> {
    fn drop(&mut self) {
        if let Some(mut view) = self.pending.take() {
            tracing::warn!("Upload request dropped before the submission finished");
            view.abandon_submit();
            self.sessions.put(self.session_id, view);
        }
    }
}

fn back_to_gallery(is_htmx: bool) -> Response {
    if is_htmx {
        (
            [(header::HeaderName::from_static("hx-redirect"), "/")],
            "",
        )
            .into_response()
    } else {
        Redirect::to("/").into_response()
    }
}

/// Select + submit in one request. The outcome, including any error, lives on
/// the session view and shows up on the page the browser is sent back to.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    SessionId { id, jar }: SessionId,
    HxRequest(is_htmx): HxRequest,
    mut multipart: Multipart,
) -> AppResult<(CookieJar, Response)> {
    let form = read_upload_form(&mut multipart).await?;
    let mut view = load_view(&state, &id).await;

    view.set_title(form.title);
    // Without a new file the previously selected one, if any, is reused.
    let accepted = match form.file {
        Some(file) => view.select_file(file),
        None => true,
    };

    if accepted {
        if let Ok(submission) = view.begin_submit() {
            let in_flight = InFlightSubmission::start(&state.sessions, &id, &view);
            if let Err(e) = view.finish_submit(submission, &state.clients).await {
                tracing::debug!("Submission ended with {} error: {}", e.kind(), e);
            }
            in_flight.complete(view);
            return Ok((jar, back_to_gallery(is_htmx)));
        }
    }

    state.sessions.put(&id, view);
    Ok((jar, back_to_gallery(is_htmx)))
}

pub async fn health() -> &'static str {
    "ok"
}
