//! Per-node results of a rewrite pass.

use crate::{Document, NodePath};
use blockpress_media::ReferenceKind;
use derive_getters::Getters;
use serde::Serialize;

/// Why a node was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Node already carries the processed marker
    #[display("already processed")]
    AlreadyProcessed,
    /// Reference already points at durable storage
    #[display("permanent")]
    Permanent,
    /// Reference is hosted elsewhere
    #[display("external")]
    External,
    /// Node has no reference at all
    #[display("missing reference")]
    MissingReference,
}

/// What happened to one media node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Reference replaced by a durable URL
    Processed {
        /// The durable URL now in the document
        url: String,
    },
    /// Nothing to do
    Skipped(SkipReason),
    /// Resolution or upload failed; the original reference is kept
    Failed(String),
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutcomeStatus::Processed { url } => write!(f, "processed -> {}", url),
            OutcomeStatus::Skipped(reason) => write!(f, "skipped ({})", reason),
            OutcomeStatus::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Outcome for a single media node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters, derive_new::new)]
pub struct NodeOutcome {
    /// Location of the node
    path: NodePath,
    /// Reference found before the pass
    original: String,
    /// Classification of `original`
    kind: ReferenceKind,
    /// Result for this node
    status: OutcomeStatus,
    /// Whether the upload gateway was called for this node
    upload_attempted: bool,
}

impl NodeOutcome {
    /// Whether this node failed.
    pub fn is_failed(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed(_))
    }

    /// Whether this node was rewritten.
    pub fn is_processed(&self) -> bool {
        matches!(self.status, OutcomeStatus::Processed { .. })
    }
}

/// Aggregate state of a rewrite pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
pub enum RewriteStatus {
    /// Nothing needed rewriting
    #[display("unchanged")]
    Unchanged,
    /// Every node that needed rewriting was rewritten
    #[display("complete")]
    Complete,
    /// At least one node failed; the rest may have been rewritten
    #[display("partial")]
    Partial,
}

/// The rewritten document plus an outcome for every media node.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct RewriteReport {
    /// The rewritten document
    document: Document,
    /// One entry per media node, in document order
    outcomes: Vec<NodeOutcome>,
}

impl RewriteReport {
    pub(crate) fn new(document: Document, outcomes: Vec<NodeOutcome>) -> Self {
        Self { document, outcomes }
    }

    /// Take the rewritten document.
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Aggregate status.
    pub fn status(&self) -> RewriteStatus {
        if self.outcomes.iter().any(NodeOutcome::is_failed) {
            RewriteStatus::Partial
        } else if self.outcomes.iter().any(NodeOutcome::is_processed) {
            RewriteStatus::Complete
        } else {
            RewriteStatus::Unchanged
        }
    }

    /// Whether any node failed.
    pub fn has_failures(&self) -> bool {
        self.status() == RewriteStatus::Partial
    }

    /// Failed outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &NodeOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    /// Number of nodes rewritten.
    pub fn processed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_processed()).count()
    }

    /// Number of upload gateway calls made.
    pub fn upload_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.upload_attempted).count()
    }
}
