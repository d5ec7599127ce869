//! Blockpress CLI binary.
//!
//! This binary provides command-line access to the image pipeline:
//! - Classify media references
//! - Upload single images
//! - Rewrite documents so every image points at durable storage

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, classify_reference, rewrite_document, upload_file};

    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Classify { value, prefixes } => {
            classify_reference(config, &value, prefixes)?;
        }

        Commands::Upload { file, folder } => {
            upload_file(config, &file, folder).await?;
        }

        Commands::Rewrite {
            input,
            output,
            allow_partial,
            folder,
        } => {
            rewrite_document(config, &input, output, allow_partial, folder).await?;
        }
    }

    Ok(())
}
