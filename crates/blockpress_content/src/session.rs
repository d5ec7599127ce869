//! Editing sessions: one store, one rewriter, one document being edited.

use crate::{ContentRewriter, Document, NoFallback, ReferenceFetcher, RewriteReport, RewriterConfig};
use blockpress_error::{BlockpressResult, MediaError, PersistError};
use blockpress_media::{EphemeralImageStore, ImageBlob, ReferenceKind};
use blockpress_upload::UploadGateway;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Durably saves a rewritten document.
#[async_trait::async_trait]
pub trait DocumentPersister: Send + Sync {
    /// Persist `document`.
    async fn persist(&self, document: &Document) -> Result<(), PersistError>;
}

/// Whether a document with unresolved media may be saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::Display)]
pub enum SavePolicy {
    /// Refuse to persist while any node failed
    #[default]
    #[display("require-complete")]
    RequireComplete,
    /// Persist whatever could be rewritten
    #[display("allow-partial")]
    AllowPartial,
}

/// Result of [`EditingSession::save`].
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The document was persisted
    Saved {
        /// The rewrite that produced the persisted document
        report: RewriteReport,
        /// How many local references were released afterwards
        revoked: usize,
    },
    /// The policy refused a partially rewritten document; nothing was persisted
    Blocked {
        /// The rewrite that was refused
        report: RewriteReport,
    },
}

impl SaveOutcome {
    /// The rewrite report, saved or not.
    pub fn report(&self) -> &RewriteReport {
        match self {
            SaveOutcome::Saved { report, .. } | SaveOutcome::Blocked { report } => report,
        }
    }

    /// Whether the document was persisted.
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved { .. })
    }
}

/// Revokes everything left in the store when the session goes away.
struct RevokeOnDrop(Arc<EphemeralImageStore>);

impl Drop for RevokeOnDrop {
    fn drop(&mut self) {
        self.0.revoke_all();
    }
}

/// One editor's images and the rewriter that makes them durable.
///
/// Dropping the session (or calling [`close`](Self::close)) revokes every
/// outstanding local reference, mirroring an editor unmount.
pub struct EditingSession<G, F = NoFallback> {
    store: RevokeOnDrop,
    rewriter: ContentRewriter<G, F>,
}

impl<G: UploadGateway> EditingSession<G, NoFallback> {
    /// Start a session with a fresh store.
    pub fn new(gateway: G, config: RewriterConfig) -> Self {
        let store = Arc::new(EphemeralImageStore::new());
        let rewriter = ContentRewriter::new(Arc::clone(&store), gateway, config);
        Self {
            store: RevokeOnDrop(store),
            rewriter,
        }
    }
}

impl<G: UploadGateway, F: ReferenceFetcher> EditingSession<G, F> {
    /// Use `fetcher` when a local reference is not in this session's store.
    pub fn with_fetcher<F2: ReferenceFetcher>(self, fetcher: F2) -> EditingSession<G, F2> {
        EditingSession {
            store: self.store,
            rewriter: self.rewriter.with_fetcher(fetcher),
        }
    }

    /// The session's ephemeral store.
    pub fn store(&self) -> &Arc<EphemeralImageStore> {
        &self.store.0
    }

    /// Cache a pasted or dropped image and return the reference to embed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPayload` for empty or non-image payloads.
    pub fn insert_image(&self, blob: ImageBlob) -> Result<String, MediaError> {
        self.store.0.store(blob)
    }

    /// Run a rewrite pass without persisting anything.
    pub async fn rewrite(&self, document: &Document) -> RewriteReport {
        self.rewriter.rewrite(document).await
    }

    /// Rewrite `document`, persist it if `policy` allows, then release images.
    ///
    /// On success every local reference is revoked, except those of nodes
    /// that failed under [`SavePolicy::AllowPartial`]: those stay resolvable so
    /// a later save can retry them. A blocked or failed save revokes nothing.
    ///
    /// # Errors
    ///
    /// Returns the persister's error; the store is left untouched.
    #[instrument(skip(self, document, persister))]
    pub async fn save<P: DocumentPersister + ?Sized>(
        &self,
        document: &Document,
        persister: &P,
        policy: SavePolicy,
    ) -> BlockpressResult<SaveOutcome> {
        let report = self.rewriter.rewrite(document).await;

        if report.has_failures() && policy == SavePolicy::RequireComplete {
            warn!(
                failed = report.failures().count(),
                "Save blocked: document still has unresolved media"
            );
            return Ok(SaveOutcome::Blocked { report });
        }

        persister.persist(report.document()).await?;

        let retained: HashSet<String> = report
            .failures()
            .filter(|o| *o.kind() == ReferenceKind::Ephemeral)
            .map(|o| o.original().trim().to_string())
            .collect();
        let revoked = if retained.is_empty() {
            self.store.0.revoke_all()
        } else {
            self.store.0.revoke_except(&retained)
        };

        info!(
            status = %report.status(),
            revoked,
            retained = retained.len(),
            "Document saved"
        );
        Ok(SaveOutcome::Saved { report, revoked })
    }

    /// End the session, revoking every outstanding reference.
    pub fn close(self) -> usize {
        self.store.0.revoke_all()
    }
}
