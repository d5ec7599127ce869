//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Blockpress - upload pasted images and rewrite rich-text documents to durable URLs
#[derive(Parser, Debug)]
#[command(name = "blockpress")]
#[command(about = "Upload pasted images and rewrite rich-text documents to durable URLs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to bundled, home and ./blockpress.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a media reference
    Classify {
        /// The reference to classify
        value: String,

        /// Extra permanent prefix (repeatable)
        #[arg(long = "prefix")]
        prefixes: Vec<String>,
    },

    /// Upload an image file and print its durable URL
    Upload {
        /// Image file to upload
        file: PathBuf,

        /// Destination folder hint
        #[arg(long)]
        folder: Option<String>,
    },

    /// Upload every local and inline image in a JSON document and save the result
    Rewrite {
        /// Document to rewrite
        input: PathBuf,

        /// Where to save the rewritten document (stdout if omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Save even if some images could not be uploaded
        #[arg(long)]
        allow_partial: bool,

        /// Destination folder hint
        #[arg(long)]
        folder: Option<String>,
    },
}
