//! Upload gateway error types.

/// Specific upload failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum UploadErrorKind {
    /// Request never produced a response (connection refused, reset, DNS)
    #[display("transport: {}", _0)]
    Transport(String),
    /// Gateway answered with a non-success HTTP status
    #[display("status {}: {}", status_code, message)]
    Status {
        /// HTTP status code
        status_code: u16,
        /// Response body or reason phrase
        message: String,
    },
    /// Request exceeded the configured timeout
    #[display("timeout")]
    Timeout,
    /// Response body was not `{ success: true, url }`
    #[display("malformed response: {}", _0)]
    MalformedResponse(String),
    /// Gateway answered `success: false`
    #[display("rejected: {}", _0)]
    Rejected(String),
}

impl UploadErrorKind {
    /// Whether a later attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            UploadErrorKind::Transport(_) => true,
            UploadErrorKind::Status { status_code, .. } => {
                *status_code == 429 || (500..=599).contains(status_code)
            }
            UploadErrorKind::Timeout
            | UploadErrorKind::MalformedResponse(_)
            | UploadErrorKind::Rejected(_) => false,
        }
    }
}

/// Upload error with location tracking.
///
/// # Examples
///
/// ```
/// use blockpress_error::{UploadError, UploadErrorKind};
///
/// let err = UploadError::new(UploadErrorKind::Timeout);
/// assert_eq!(err.reason(), "UploadFailed(timeout)");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("UploadFailed({}) at line {} in {}", kind, line, file)]
pub struct UploadError {
    /// The kind of error that occurred
    pub kind: UploadErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl UploadError {
    /// Create a new upload error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: UploadErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Short reason without source location, suitable for outcome reports.
    pub fn reason(&self) -> String {
        format!("UploadFailed({})", self.kind)
    }
}

/// Trait for errors that support retry logic.
///
/// # Examples
///
/// ```
/// use blockpress_error::{RetryableError, UploadError, UploadErrorKind};
///
/// let err = UploadError::new(UploadErrorKind::Status {
///     status_code: 503,
///     message: "Service unavailable".to_string(),
/// });
/// assert!(err.is_retryable());
/// assert!(!UploadError::new(UploadErrorKind::Timeout).is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    ///
    /// Transport failures, 429 and 5xx statuses are transient. Timeouts are
    /// not retried so the overall bound on a single upload holds.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for UploadError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
