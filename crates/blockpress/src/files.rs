//! Image files on disk.

use blockpress_error::{BlockpressResult, MediaError, MediaErrorKind};
use blockpress_media::{ImageBlob, ImageMediaType};
use blockpress_upload::UploadGateway;
use std::path::Path;

/// Read an image file, taking its media type from the extension.
///
/// # Errors
///
/// - `InvalidPayload` if the extension is not a recognized image type or the
///   file is empty
/// - `NotFound` if the file cannot be read
pub async fn read_image_file(path: &Path) -> Result<ImageBlob, MediaError> {
    let media_type = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ImageMediaType::from_extension)
        .ok_or_else(|| {
            MediaError::new(MediaErrorKind::InvalidPayload(format!(
                "{}: not a recognized image extension",
                path.display()
            )))
        })?;

    let data = tokio::fs::read(path).await.map_err(|e| {
        MediaError::new(MediaErrorKind::NotFound(format!("{}: {}", path.display(), e)))
    })?;

    let blob = ImageBlob::new(data, media_type.mime());
    blob.validate()?;
    Ok(blob)
}

/// Upload one image file and return its durable URL.
///
/// Gateway failures are returned as the gateway reported them.
#[tracing::instrument(skip(gateway, path), fields(path = %path.display()))]
pub async fn upload_image_file<G: UploadGateway + ?Sized>(
    gateway: &G,
    path: &Path,
    folder: Option<&str>,
) -> BlockpressResult<String> {
    let blob = read_image_file(path).await?;
    Ok(gateway.upload(&blob, folder).await?)
}
