//! Error types for the Blockpress content pipeline.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use blockpress_error::{BlockpressResult, MediaError, MediaErrorKind};
//!
//! fn resolve(reference: &str) -> BlockpressResult<Vec<u8>> {
//!     Err(MediaError::new(MediaErrorKind::NotFound(reference.to_string())))?
//! }
//!
//! assert!(resolve("blob:blockpress/1").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod json;
mod media;
mod persist;
mod upload;

pub use config::ConfigError;
pub use error::{BlockpressError, BlockpressErrorKind, BlockpressResult};
pub use json::JsonError;
pub use media::{MediaError, MediaErrorKind};
pub use persist::PersistError;
pub use upload::{RetryableError, UploadError, UploadErrorKind};
