//! Multipart HTTP implementation of the upload gateway.

use crate::{UploadConfig, UploadGateway};
use blockpress_error::{BlockpressResult, ConfigError, RetryableError, UploadError, UploadErrorKind};
use blockpress_media::{ImageBlob, PermanentPrefixes};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::{instrument, warn};
use uuid::Uuid;

/// Longest response body excerpt carried in an error.
const MAX_ERROR_BODY: usize = 200;

/// Success body returned by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    /// Whether the object was stored
    #[serde(default)]
    pub success: bool,
    /// Durable URL of the stored object
    #[serde(default)]
    pub url: Option<String>,
    /// Failure description when `success` is false
    #[serde(default)]
    pub error: Option<String>,
}

/// Map an HTTP status and body to a durable URL or an upload error.
///
/// Only a 2xx response with `{ "success": true, "url": "<non-empty>" }`
/// succeeds.
pub fn parse_upload_response(status: u16, body: &str) -> Result<String, UploadError> {
    if !(200..300).contains(&status) {
        let message: String = body.chars().take(MAX_ERROR_BODY).collect();
        return Err(UploadError::new(UploadErrorKind::Status {
            status_code: status,
            message,
        }));
    }

    let response: UploadResponse = serde_json::from_str(body)
        .map_err(|e| UploadError::new(UploadErrorKind::MalformedResponse(e.to_string())))?;

    if !response.success {
        return Err(UploadError::new(UploadErrorKind::Rejected(
            response
                .error
                .unwrap_or_else(|| "success=false".to_string()),
        )));
    }

    match response.url {
        Some(url) if !url.trim().is_empty() => Ok(url),
        _ => Err(UploadError::new(UploadErrorKind::MalformedResponse(
            "missing url".to_string(),
        ))),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> UploadError {
    if err.is_timeout() {
        UploadError::new(UploadErrorKind::Timeout)
    } else {
        UploadError::new(UploadErrorKind::Transport(err.to_string()))
    }
}

/// Upload gateway posting `file` (and optionally `folder`) as multipart form data.
#[derive(Debug, Clone)]
pub struct HttpUploadGateway {
    client: reqwest::Client,
    endpoint: String,
    default_folder: Option<String>,
    prefixes: PermanentPrefixes,
    max_retries: usize,
    retry_backoff_ms: u64,
}

impl HttpUploadGateway {
    /// Create a gateway from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the HTTP client
    /// cannot be built.
    #[instrument(skip(config), fields(endpoint = %config.endpoint(), timeout_secs = config.timeout_secs()))]
    pub fn new(config: &UploadConfig) -> BlockpressResult<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build HTTP client: {}", e)))?;

        tracing::debug!("Created upload gateway");
        Ok(Self {
            client,
            endpoint: config.endpoint().clone(),
            default_folder: config.folder().clone(),
            prefixes: config.prefixes(),
            max_retries: *config.max_retries(),
            retry_backoff_ms: *config.retry_backoff_ms(),
        })
    }

    /// Endpoint uploads are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn form(blob: &ImageBlob, folder: Option<&str>) -> Result<Form, UploadError> {
        let media_type = blob
            .validate()
            .map_err(|e| UploadError::new(UploadErrorKind::Rejected(e.kind.to_string())))?;

        let part = Part::stream_with_length(blob.data().clone(), blob.len() as u64)
            .file_name(format!("{}.{}", Uuid::new_v4().simple(), media_type.extension()))
            .mime_str(media_type.mime())
            .map_err(|e| UploadError::new(UploadErrorKind::Rejected(e.to_string())))?;

        let form = Form::new().part("file", part);
        Ok(match folder {
            Some(folder) => form.text("folder", folder.to_string()),
            None => form,
        })
    }

    async fn send_once(&self, blob: &ImageBlob, folder: Option<&str>) -> Result<String, UploadError> {
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(Self::form(blob, folder)?)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;
        parse_upload_response(status, &body)
    }
}

#[async_trait::async_trait]
impl UploadGateway for HttpUploadGateway {
    #[instrument(skip(self, blob), fields(size = blob.len(), mime_type = %blob.mime_type(), endpoint = %self.endpoint))]
    async fn upload(&self, blob: &ImageBlob, folder: Option<&str>) -> Result<String, UploadError> {
        let folder = folder.or(self.default_folder.as_deref());

        let retry_strategy = ExponentialBackoff::from_millis(self.retry_backoff_ms.max(1))
            .factor(2)
            .max_delay(Duration::from_secs(5))
            .map(jitter)
            .take(self.max_retries);

        let url = Retry::spawn(retry_strategy, move || async move {
            match self.send_once(blob, folder).await {
                Ok(url) => Ok(url),
                Err(e) if e.is_retryable() => {
                    warn!(error = %e, "Transient upload failure, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => {
                    warn!(error = %e, "Upload failed");
                    Err(RetryError::Permanent(e))
                }
            }
        })
        .await?;

        if !self.prefixes.matches(&url) {
            warn!(url = %url, "Gateway returned a URL outside the permanent prefixes");
        }
        tracing::info!(url = %url, "Uploaded image");
        Ok(url)
    }
}
