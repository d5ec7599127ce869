//! Fallback fetching for local references the session store does not hold.
//!
//! A `blob:` reference can outlive the store that issued it, for example when
//! content is reopened from an earlier session. Fetching it directly is a
//! best-effort recovery only.

use blockpress_error::{MediaError, MediaErrorKind};
use blockpress_media::{ImageBlob, LOCAL_REF_SCHEME};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Fetches the payload behind a reference outside the ephemeral store.
#[async_trait::async_trait]
pub trait ReferenceFetcher: Send + Sync {
    /// Fetch the image behind `reference`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the reference cannot be resolved, `InvalidPayload` if it
    /// resolves to something that is not an image.
    async fn fetch(&self, reference: &str) -> Result<ImageBlob, MediaError>;
}

#[async_trait::async_trait]
impl<T: ReferenceFetcher + ?Sized> ReferenceFetcher for Arc<T> {
    async fn fetch(&self, reference: &str) -> Result<ImageBlob, MediaError> {
        (**self).fetch(reference).await
    }
}

/// Fetcher that never recovers anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFallback;

#[async_trait::async_trait]
impl ReferenceFetcher for NoFallback {
    async fn fetch(&self, reference: &str) -> Result<ImageBlob, MediaError> {
        Err(MediaError::new(MediaErrorKind::NotFound(reference.to_string())))
    }
}

/// Fetcher for `blob:` references that wrap an HTTP(S) origin URL.
///
/// `blob:https://craft.example/3f2a...` is fetched as
/// `https://craft.example/3f2a...`; the `Content-Type` header supplies the
/// media type.
#[derive(Debug, Clone)]
pub struct HttpReferenceFetcher {
    client: reqwest::Client,
}

impl HttpReferenceFetcher {
    /// Create a fetcher whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MediaError::new(MediaErrorKind::NotFound(format!("http client: {}", e))))?;
        Ok(Self { client })
    }

    fn target_url(reference: &str) -> Option<&str> {
        let inner = reference.strip_prefix(LOCAL_REF_SCHEME)?;
        (inner.starts_with("http://") || inner.starts_with("https://")).then_some(inner)
    }
}

#[async_trait::async_trait]
impl ReferenceFetcher for HttpReferenceFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, reference: &str) -> Result<ImageBlob, MediaError> {
        let not_found =
            |detail: String| MediaError::new(MediaErrorKind::NotFound(format!("{}: {}", reference, detail)));

        let url = Self::target_url(reference)
            .ok_or_else(|| not_found("no fetchable origin".to_string()))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| not_found(e.to_string()))?;

        if !response.status().is_success() {
            return Err(not_found(format!("status {}", response.status())));
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let data = response.bytes().await.map_err(|e| not_found(e.to_string()))?;

        let blob = ImageBlob::new(data, mime_type);
        blob.validate()?;
        tracing::debug!(size = blob.len(), "Fetched local reference directly");
        Ok(blob)
    }
}
