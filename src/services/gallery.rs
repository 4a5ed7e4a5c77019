//! Per-visitor gallery state and the upload workflow.
//!
//! A submission runs `Validating -> Uploading -> Inserting -> Reloading` and
//! always ends in `Idle`. The first failing step stops the chain and its
//! message becomes the visible error. Nothing is retried, and an asset that
//! was uploaded before a failed insert stays at the media host.

use crate::models::{MediaRecord, MediaType, NewMedia, SelectedFile};
use crate::services::pagination::{self, PAGE_SIZE};
use crate::services::store::MediaStore;
use crate::services::upload::MediaHost;
use crate::GalleryError;
use serde::Serialize;
use std::sync::Arc;

pub const MSG_WRONG_FILE_TYPE: &str = "Please select an image or video file";
pub const MSG_MISSING_INPUT: &str = "Please select a file and provide a title";
pub const MSG_INTERRUPTED: &str = "Upload was interrupted, please try again";

#[derive(Clone)]
pub struct GalleryClients {
    pub host: Arc<dyn MediaHost>,
    pub store: Arc<dyn MediaStore>,
}

impl GalleryClients {
    pub fn new(host: Arc<dyn MediaHost>, store: Arc<dyn MediaStore>) -> Self {
        Self { host, store }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionPhase {
    Idle,
    Validating,
    Uploading,
    Inserting,
    Reloading,
}

/// A validated submission, taken out of the view so the view can be
/// published as `uploading` before any remote call starts.
#[derive(Debug)]
pub struct Submission {
    file: SelectedFile,
    title: String,
    media_type: MediaType,
}

#[derive(Debug, Clone)]
pub struct GalleryView {
    pub selected_file: Option<SelectedFile>,
    pub title: String,
    pub uploading: bool,
    pub error: Option<String>,
    pub rows: Vec<MediaRecord>,
    pub total_count: u64,
    pub current_page: u32,
    pub phase: SubmissionPhase,
}

impl Default for GalleryView {
    fn default() -> Self {
        Self::new()
    }
}

impl GalleryView {
    pub fn new() -> Self {
        Self {
            selected_file: None,
            title: String::new(),
            uploading: false,
            error: None,
            rows: Vec::new(),
            total_count: 0,
            current_page: 1,
            phase: SubmissionPhase::Idle,
        }
    }

    pub fn page_size(&self) -> u32 {
        PAGE_SIZE
    }

    pub fn total_pages(&self) -> u32 {
        pagination::total_pages(self.total_count, PAGE_SIZE)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Accepts images and videos only. Anything else clears the selection.
    pub fn select_file(&mut self, file: SelectedFile) -> bool {
        if file.media_type().is_some() {
            self.selected_file = Some(file);
            self.error = None;
            true
        } else {
            self.error = Some(MSG_WRONG_FILE_TYPE.to_string());
            self.selected_file = None;
            false
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Runs the whole submission chain.
    pub async fn submit(&mut self, clients: &GalleryClients) -> Result<(), GalleryError> {
        let submission = self.begin_submit()?;
        self.finish_submit(submission, clients).await
    }

    /// Validation step. On success the view is `uploading` with no error.
    pub fn begin_submit(&mut self) -> Result<Submission, GalleryError> {
        self.phase = SubmissionPhase::Validating;

        let prepared = match &self.selected_file {
            Some(file) if !self.title.is_empty() => file
                .media_type()
                .map(|media_type| (file.clone(), media_type)),
            _ => None,
        };

        let Some((file, media_type)) = prepared else {
            self.error = Some(MSG_MISSING_INPUT.to_string());
            self.phase = SubmissionPhase::Idle;
            return Err(GalleryError::Validation(MSG_MISSING_INPUT.to_string()));
        };

        self.uploading = true;
        self.error = None;
        self.phase = SubmissionPhase::Uploading;

        Ok(Submission {
            file,
            title: self.title.clone(),
            media_type,
        })
    }

    /// Upload, insert, reload, reset. `uploading` is cleared whatever happens.
    pub async fn finish_submit(
        &mut self,
        submission: Submission,
        clients: &GalleryClients,
    ) -> Result<(), GalleryError> {
        let result = self.run_remote_steps(submission, clients).await;

        match &result {
            Ok(()) => {
                self.selected_file = None;
                self.title.clear();
            }
            Err(e) => {
                self.error = Some(e.to_string());
            }
        }

        self.uploading = false;
        self.phase = SubmissionPhase::Idle;
        result
    }

    /// Ends a submission whose remote steps never completed. The selection and
    /// title stay so the same file can be sent again.
    pub fn abandon_submit(&mut self) {
        self.error = Some(MSG_INTERRUPTED.to_string());
        self.uploading = false;
        self.phase = SubmissionPhase::Idle;
    }

    async fn run_remote_steps(
        &mut self,
        submission: Submission,
        clients: &GalleryClients,
    ) -> Result<(), GalleryError> {
        self.phase = SubmissionPhase::Uploading;
        let asset = clients.host.upload(&submission.file).await?;

        self.phase = SubmissionPhase::Inserting;
        let record = NewMedia {
            title: submission.title,
            media_type: submission.media_type,
            cloudinary_url: asset.url,
            cloudinary_public_id: asset.public_id,
        };
        if let Err(e) = clients.store.insert(&record).await {
            tracing::warn!(
                "Asset {} was uploaded but has no media record; it is left at the host",
                record.cloudinary_public_id
            );
            return Err(e);
        }

        self.phase = SubmissionPhase::Reloading;
        self.reload(clients.store.as_ref()).await
    }

    /// Moves to `target`, clamped to the known pages, and fetches it.
    pub async fn change_page(
        &mut self,
        target: i64,
        clients: &GalleryClients,
    ) -> Result<(), GalleryError> {
        self.current_page = pagination::clamp_page(target, self.total_pages());
        self.reload(clients.store.as_ref()).await.inspect_err(|e| {
            self.error = Some(e.to_string());
        })
    }

    pub async fn load_initial(&mut self, clients: &GalleryClients) -> Result<(), GalleryError> {
        self.current_page = 1;
        self.reload(clients.store.as_ref()).await.inspect_err(|e| {
            self.error = Some(e.to_string());
        })
    }

    /// Opens `target` without a known total. Only a page past the end needs a
    /// second query, for the last real page.
    pub async fn load_page(
        &mut self,
        target: i64,
        clients: &GalleryClients,
    ) -> Result<(), GalleryError> {
        self.current_page = pagination::clamp_page(target, u32::MAX);
        self.reload(clients.store.as_ref()).await.inspect_err(|e| {
            self.error = Some(e.to_string());
        })?;

        let last = self.total_pages().max(1);
        if self.current_page > last {
            self.current_page = last;
            self.reload(clients.store.as_ref()).await.inspect_err(|e| {
                self.error = Some(e.to_string());
            })?;
        }
        Ok(())
    }

    async fn reload(&mut self, store: &dyn MediaStore) -> Result<(), GalleryError> {
        let page = store.query(self.current_page, PAGE_SIZE).await?;
        self.rows = page.rows;
        self.total_count = page.total_count;
        Ok(())
    }
}
