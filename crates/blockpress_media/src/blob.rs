//! Binary image payloads.

use crate::ImageMediaType;
use blockpress_error::{MediaError, MediaErrorKind};
use bytes::Bytes;
use derive_getters::Getters;

/// Image bytes plus the media type the producer declared for them.
///
/// The declaration is not trusted until [`ImageBlob::validate`] accepts it;
/// the store and the inline-data decoder both validate before use.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ImageBlob {
    /// Raw payload
    data: Bytes,
    /// Declared MIME type
    mime_type: String,
}

impl ImageBlob {
    /// Wrap a payload and its declared MIME type.
    pub fn new(data: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check the payload is non-empty and declares a recognized image type.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPayload` otherwise.
    pub fn validate(&self) -> Result<ImageMediaType, MediaError> {
        if self.data.is_empty() {
            return Err(MediaError::new(MediaErrorKind::InvalidPayload(
                "payload is empty".to_string(),
            )));
        }
        self.mime_type.parse()
    }
}
