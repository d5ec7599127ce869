//! Blockpress - rich-text image pipeline.
//!
//! Lets editors paste or drop images into forum posts, news and wiki pages
//! before the page is saved. Images are cached in a session-scoped ephemeral
//! store, referenced from the document by `blob:` URLs, and uploaded to
//! durable storage by an idempotent rewrite pass when the document is saved.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use blockpress::{
//!     Document, EditingSession, HttpUploadGateway, ImageBlob, JsonFilePersister, Node,
//!     RewriterConfig, SavePolicy, UploadConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = UploadConfig::load()?;
//!     let session = EditingSession::new(HttpUploadGateway::new(&config)?, RewriterConfig::from(&config));
//!
//!     let local_ref = session.insert_image(ImageBlob::new(std::fs::read("castle.png")?, "image/png"))?;
//!     let document = Document::from_nodes(vec![Node::image(local_ref)]);
//!
//!     let outcome = session
//!         .save(&document, &JsonFilePersister::new("post.json"), SavePolicy::RequireComplete)
//!         .await?;
//!     println!("saved: {}", outcome.is_saved());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `blockpress_error` - Error types
//! - `blockpress_media` - Image blobs, ephemeral store, reference classification
//! - `blockpress_upload` - Upload gateway adapter and configuration
//! - `blockpress_content` - Document model, rewrite pass, editing sessions
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod files;
mod persist;

pub use blockpress_content::*;
pub use blockpress_error::*;
pub use blockpress_media::*;
pub use blockpress_upload::*;
pub use files::{read_image_file, upload_image_file};
pub use persist::{JsonFilePersister, StdoutPersister};
