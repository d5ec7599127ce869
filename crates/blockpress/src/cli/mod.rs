//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the blockpress binary.

mod commands;
mod handlers;

pub use commands::{Cli, Commands};
pub use handlers::{classify_reference, rewrite_document, upload_file};
