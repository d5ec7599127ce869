//! Upload gateway adapter for Blockpress.
//!
//! Exchanges one image blob for one durable URL by posting a multipart form to
//! the storage service. Every failure, including HTTP error statuses, comes
//! back as an [`UploadError`] rather than a panic.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod gateway;
mod http;

pub use blockpress_error::{RetryableError, UploadError, UploadErrorKind};
pub use config::{UploadConfig, UploadConfigBuilder};
pub use gateway::UploadGateway;
pub use http::{HttpUploadGateway, UploadResponse, parse_upload_response};
