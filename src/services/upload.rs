use crate::config::CloudinaryConfig;
use crate::models::{SelectedFile, UploadedAsset};
use crate::GalleryError;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use url::Url;

/// Stores an asset at the media host.
#[async_trait]
pub trait MediaHost: Send + Sync {
    async fn upload(&self, file: &SelectedFile) -> Result<UploadedAsset, GalleryError>;
}

/// Unsigned uploads to Cloudinary's resource-type auto-detecting endpoint.
#[derive(Clone, Debug)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    api_base: String,
    cloud_name: String,
    upload_preset: String,
}

#[derive(Deserialize)]
struct HostErrorBody {
    error: HostErrorMessage,
}

#[derive(Deserialize)]
struct HostErrorMessage {
    message: String,
}

impl CloudinaryClient {
    pub fn new(config: &CloudinaryConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            cloud_name: config.cloud_name.clone(),
            upload_preset: config.upload_preset.clone(),
        }
    }

    /// Built per call so an empty cloud name only fails when an upload is tried.
    pub fn endpoint(&self) -> Result<Url, GalleryError> {
        if self.cloud_name.is_empty() {
            return Err(GalleryError::Upload(
                "Media host is not configured: cloud name is empty".to_string(),
            ));
        }
        let raw = format!("{}/v1_1/{}/auto/upload", self.api_base, self.cloud_name);
        Url::parse(&raw)
            .map_err(|e| GalleryError::Upload(format!("Invalid upload endpoint '{}': {}", raw, e)))
    }

    fn form(&self, file: &SelectedFile) -> Result<Form, GalleryError> {
        let part = Part::bytes(file.data.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| GalleryError::Upload(e.to_string()))?;

        Ok(Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone()))
    }
}

#[async_trait]
impl MediaHost for CloudinaryClient {
    async fn upload(&self, file: &SelectedFile) -> Result<UploadedAsset, GalleryError> {
        let result = async {
            let endpoint = self.endpoint()?;
            let form = self.form(file)?;

            let response = self
                .http
                .post(endpoint)
                .multipart(form)
                .send()
                .await
                .map_err(|e| GalleryError::Upload(e.to_string()))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| GalleryError::Upload(e.to_string()))?;

            if !status.is_success() {
                let message = serde_json::from_str::<HostErrorBody>(&body)
                    .map(|b| b.error.message)
                    .unwrap_or_else(|_| format!("Upload failed with status {}: {}", status, body));
                return Err(GalleryError::Upload(message));
            }

            serde_json::from_str::<UploadedAsset>(&body).map_err(|e| {
                GalleryError::Upload(format!("Unexpected upload response: {}", e))
            })
        }
        .await;

        match &result {
            Ok(asset) => {
                tracing::info!(
                    "Uploaded {} ({} bytes) as {}",
                    file.file_name,
                    file.data.len(),
                    asset.public_id
                );
            }
            Err(e) => {
                tracing::error!("Error uploading {} to media host: {}", file.file_name, e);
            }
        }

        result
    }
}
