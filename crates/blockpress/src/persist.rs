//! Document persisters used by the command-line tool.

use blockpress_content::{Document, DocumentPersister};
use blockpress_error::PersistError;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

/// Writes the document as pretty JSON to a file.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash never leaves a half-written document.
#[derive(Debug, Clone)]
pub struct JsonFilePersister {
    path: PathBuf,
}

impl JsonFilePersister {
    /// Persist to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl DocumentPersister for JsonFilePersister {
    #[tracing::instrument(skip(self, document), fields(path = %self.path.display()))]
    async fn persist(&self, document: &Document) -> Result<(), PersistError> {
        let json = document
            .to_json_pretty()
            .map_err(|e| PersistError::new(e.message))?;

        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, json.as_bytes())
            .await
            .map_err(|e| PersistError::new(format!("{}: {}", temp_path.display(), e)))?;

        tokio::fs::rename(&temp_path, &self.path).await.map_err(|e| {
            PersistError::new(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::info!(bytes = json.len(), "Wrote document");
        Ok(())
    }
}

/// Writes the document as pretty JSON to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutPersister;

#[async_trait::async_trait]
impl DocumentPersister for StdoutPersister {
    async fn persist(&self, document: &Document) -> Result<(), PersistError> {
        let mut json = document
            .to_json_pretty()
            .map_err(|e| PersistError::new(e.message))?;
        json.push('\n');

        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(json.as_bytes())
            .await
            .map_err(|e| PersistError::new(format!("stdout: {}", e)))?;
        stdout
            .flush()
            .await
            .map_err(|e| PersistError::new(format!("stdout: {}", e)))
    }
}
