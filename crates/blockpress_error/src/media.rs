//! Media error types.

/// Kinds of media errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum MediaErrorKind {
    /// Payload was empty or did not declare a recognized image type
    #[display("Invalid payload: {}", _0)]
    InvalidPayload(String),
    /// No store entry exists for the reference
    #[display("Reference not found: {}", _0)]
    NotFound(String),
    /// Reference string does not belong to the expected scheme
    #[display("Malformed reference: {}", _0)]
    MalformedReference(String),
    /// Inline payload could not be decoded
    #[display("Decode failed: {}", _0)]
    Decode(String),
}

/// Media error with location tracking.
///
/// # Examples
///
/// ```
/// use blockpress_error::{MediaError, MediaErrorKind};
///
/// let err = MediaError::new(MediaErrorKind::NotFound("blob:blockpress/42".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// assert!(err.is_not_found());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Media Error: {} at line {} in {}", kind, line, file)]
pub struct MediaError {
    /// The kind of error that occurred
    pub kind: MediaErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl MediaError {
    /// Create a new media error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: MediaErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether this error is a missing-entry lookup.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, MediaErrorKind::NotFound(_))
    }

    /// Whether this error is a rejected payload.
    pub fn is_invalid_payload(&self) -> bool {
        matches!(self.kind, MediaErrorKind::InvalidPayload(_))
    }
}
