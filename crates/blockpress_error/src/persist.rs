//! Document persistence error types.

/// Error reported by a document persister after a rewrite.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Persist Error: {} at line {} in {}", message, line, file)]
pub struct PersistError {
    /// Why the document could not be saved
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl PersistError {
    /// Create a new PersistError at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
