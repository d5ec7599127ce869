//! The media rewrite pass.

use crate::{
    Document, MediaTarget, NoFallback, NodeOutcome, OutcomeStatus, ReferenceFetcher,
    RewriteReport, SkipReason,
};
use blockpress_error::MediaError;
use blockpress_media::{
    EphemeralImageStore, ImageBlob, PermanentPrefixes, ReferenceKind, classify, decode_inline_data,
};
use blockpress_upload::{UploadConfig, UploadGateway};
use derive_getters::Getters;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Rewrite pass settings.
#[derive(Debug, Clone, PartialEq, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct RewriterConfig {
    /// Durable storage prefixes for classification
    prefixes: PermanentPrefixes,
    /// Node types that carry media
    media_node_types: Vec<String>,
    /// Destination folder hint passed to the gateway
    folder: Option<String>,
    /// Upper bound on simultaneous uploads (0 = unbounded)
    max_concurrent_uploads: usize,
}

impl Default for RewriterConfig {
    fn default() -> Self {
        Self::from(&UploadConfig::default())
    }
}

impl From<&UploadConfig> for RewriterConfig {
    fn from(config: &UploadConfig) -> Self {
        Self {
            prefixes: config.prefixes(),
            media_node_types: vec!["image".to_string()],
            folder: config.folder().clone(),
            max_concurrent_uploads: *config.max_concurrent_uploads(),
        }
    }
}

/// Replaces ephemeral and inline media references with durable URLs.
///
/// The input document is never mutated; each pass returns a new document and
/// one [`NodeOutcome`] per media node. A node that fails keeps its original
/// reference, and no failure stops the other nodes.
pub struct ContentRewriter<G, F = NoFallback> {
    store: Arc<EphemeralImageStore>,
    gateway: G,
    fetcher: F,
    config: RewriterConfig,
}

impl<G: UploadGateway> ContentRewriter<G, NoFallback> {
    /// Create a rewriter without a fallback fetcher.
    pub fn new(store: Arc<EphemeralImageStore>, gateway: G, config: RewriterConfig) -> Self {
        Self {
            store,
            gateway,
            fetcher: NoFallback,
            config,
        }
    }
}

impl<G: UploadGateway, F: ReferenceFetcher> ContentRewriter<G, F> {
    /// Replace the fallback fetcher used when the store misses.
    pub fn with_fetcher<F2: ReferenceFetcher>(self, fetcher: F2) -> ContentRewriter<G, F2> {
        ContentRewriter {
            store: self.store,
            gateway: self.gateway,
            fetcher,
            config: self.config,
        }
    }

    /// The store ephemeral references are resolved against.
    pub fn store(&self) -> &Arc<EphemeralImageStore> {
        &self.store
    }

    /// Rewrite settings.
    pub fn config(&self) -> &RewriterConfig {
        &self.config
    }

    /// Run one rewrite pass over `document`.
    #[instrument(skip(self, document))]
    pub async fn rewrite(&self, document: &Document) -> RewriteReport {
        let targets = document.media_targets(&self.config.media_node_types);
        let limit = match self.config.max_concurrent_uploads {
            0 => targets.len().max(1),
            n => n,
        };
        debug!(nodes = targets.len(), limit, "Starting rewrite pass");

        let mut outcomes: Vec<NodeOutcome> = stream::iter(targets)
            .map(|target| self.process(target))
            .buffer_unordered(limit)
            .collect()
            .await;
        outcomes.sort_by(|a, b| a.path().cmp(b.path()));

        let mut rewritten = document.clone();
        for outcome in &outcomes {
            if let OutcomeStatus::Processed { url } = outcome.status()
                && let Some(node) = rewritten.node_at_mut(outcome.path())
            {
                node.mark_processed(url.clone());
            }
        }

        let report = RewriteReport::new(rewritten, outcomes);
        info!(
            status = %report.status(),
            processed = report.processed_count(),
            uploads = report.upload_count(),
            failed = report.failures().count(),
            "Rewrite pass finished"
        );
        report
    }

    async fn process(&self, target: MediaTarget) -> NodeOutcome {
        let original = target.media_ref.clone().unwrap_or_default();
        let kind = classify(&original, &self.config.prefixes);
        let outcome =
            |status, uploaded| NodeOutcome::new(target.path.clone(), original.clone(), kind, status, uploaded);

        if target.processed {
            return outcome(OutcomeStatus::Skipped(SkipReason::AlreadyProcessed), false);
        }

        let blob = match kind {
            ReferenceKind::Permanent => {
                return outcome(OutcomeStatus::Skipped(SkipReason::Permanent), false);
            }
            ReferenceKind::Unresolved if original.trim().is_empty() => {
                return outcome(OutcomeStatus::Skipped(SkipReason::MissingReference), false);
            }
            ReferenceKind::Unresolved => {
                return outcome(OutcomeStatus::Skipped(SkipReason::External), false);
            }
            ReferenceKind::Ephemeral => self.resolve_local(original.trim()).await,
            ReferenceKind::InlineData => decode_inline_data(original.trim()),
        };

        let blob = match blob {
            Ok(blob) => blob,
            Err(e) => {
                warn!(path = %target.path, kind = %kind, error = %e, "Media reference left unresolved");
                return outcome(OutcomeStatus::Failed(e.kind.to_string()), false);
            }
        };

        match self
            .gateway
            .upload(&blob, self.config.folder.as_deref())
            .await
        {
            Ok(url) => {
                debug!(path = %target.path, url = %url, "Media node rewritten");
                outcome(OutcomeStatus::Processed { url }, true)
            }
            Err(e) => {
                warn!(path = %target.path, error = %e, "Upload failed, keeping original reference");
                outcome(OutcomeStatus::Failed(e.reason()), true)
            }
        }
    }

    async fn resolve_local(&self, reference: &str) -> Result<ImageBlob, MediaError> {
        match self.store.resolve(reference) {
            Err(e) if e.is_not_found() => {
                debug!(reference, "Store miss, trying direct fetch");
                self.fetcher.fetch(reference).await
            }
            other => other,
        }
    }
}
