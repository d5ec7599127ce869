//! Top-level error wrapper types.

use crate::{ConfigError, JsonError, MediaError, PersistError, UploadError};

/// Every error the Blockpress crates can surface.
///
/// # Examples
///
/// ```
/// use blockpress_error::{BlockpressError, ConfigError};
///
/// let err: BlockpressError = ConfigError::new("missing endpoint").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum BlockpressErrorKind {
    /// Store or inline-data error
    #[from(MediaError)]
    Media(MediaError),
    /// Upload gateway error
    #[from(UploadError)]
    Upload(UploadError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Document (de)serialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Document persistence error
    #[from(PersistError)]
    Persist(PersistError),
}

/// Blockpress error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Blockpress Error: {}", _0)]
pub struct BlockpressError(Box<BlockpressErrorKind>);

impl BlockpressError {
    /// Create a new error from a kind.
    pub fn new(kind: BlockpressErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BlockpressErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to BlockpressErrorKind
impl<T> From<T> for BlockpressError
where
    T: Into<BlockpressErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Blockpress operations.
pub type BlockpressResult<T> = std::result::Result<T, BlockpressError>;
