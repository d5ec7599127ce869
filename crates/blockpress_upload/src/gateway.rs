//! Upload gateway trait.

use blockpress_error::UploadError;
use blockpress_media::ImageBlob;
use std::sync::Arc;

/// Exchanges an image blob for a durable URL.
///
/// Implementations must bound the time a single call may take and report every
/// failure as an [`UploadError`].
#[async_trait::async_trait]
pub trait UploadGateway: Send + Sync {
    /// Upload `blob`, optionally into the destination `folder`.
    ///
    /// # Returns
    ///
    /// The durable URL of the stored object
    async fn upload(&self, blob: &ImageBlob, folder: Option<&str>) -> Result<String, UploadError>;
}

#[async_trait::async_trait]
impl<T: UploadGateway + ?Sized> UploadGateway for Arc<T> {
    async fn upload(&self, blob: &ImageBlob, folder: Option<&str>) -> Result<String, UploadError> {
        (**self).upload(blob, folder).await
    }
}
