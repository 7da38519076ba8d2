// Copyright (c) 2025 - Cowboy AI, Inc.

//! Asset Uploader
//!
//! Persists building images in the external upload service:
//!
//! ```text
//! POST {base_url}/upload/image   (multipart, field "file")
//! 2xx → {"imageUrl": "...", "imagePublicId": "..."}
//! ```
//!
//! There is no retry here; a failed upload fails the calling write.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

/// Configuration for the upload service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Upload service base URL
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            base_url: "http://upload-service:3000".to_string(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Upload errors
#[derive(Debug, Error)]
pub enum UploadError {
    /// Transport or decoding failure
    #[error("Upload request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upload service refused the file
    #[error("Upload service returned {status}: {body}")]
    Rejected { status: StatusCode, body: String },

    /// Client could not be built
    #[error("Upload client configuration error: {0}")]
    Configuration(String),
}

/// Binary content supplied with a create/update request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub file_name: String,
    pub content_type: Option<String>,
    pub content: Bytes,
}

impl ImageAsset {
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            content: content.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Where an uploaded asset now lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedAsset {
    pub url: String,
    pub storage_key: String,
}

/// Binary object store client
#[async_trait]
pub trait AssetUploader: Send + Sync {
    async fn upload(&self, asset: &ImageAsset) -> Result<UploadedAsset, UploadError>;
}

/// HTTP client for the upload service
pub struct HttpAssetUploader {
    config: UploadConfig,
    client: Client,
}

impl HttpAssetUploader {
    /// Create a new client; the configured timeout bounds every request
    pub fn new(config: UploadConfig) -> Result<Self, UploadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| UploadError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!("{}/upload/image", self.config.base_url.trim_end_matches('/'))
    }
}

/// Upload service response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    image_url: String,
    image_public_id: String,
}

#[async_trait]
impl AssetUploader for HttpAssetUploader {
    async fn upload(&self, asset: &ImageAsset) -> Result<UploadedAsset, UploadError> {
        let mut part = Part::bytes(asset.content.to_vec()).file_name(asset.file_name.clone());
        if let Some(content_type) = &asset.content_type {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new().part("file", part);

        debug!(
            file_name = %asset.file_name,
            size = asset.content.len(),
            "Uploading image"
        );

        let response = self
            .client
            .post(self.endpoint())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Upload service rejected image");
            return Err(UploadError::Rejected { status, body });
        }

        let body: UploadResponse = response.json().await?;
        Ok(UploadedAsset {
            url: body.image_url,
            storage_key: body.image_public_id,
        })
    }
}
