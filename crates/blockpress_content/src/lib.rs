//! Rich-text media rewriting for Blockpress.
//!
//! Images pasted into the editor are embedded as local `blob:` references or
//! inline `data:` URLs. Before a document is persisted, the
//! [`ContentRewriter`] uploads each of them through an [`UploadGateway`],
//! swaps in the durable URL and marks the node processed. Running the pass
//! again on the result uploads nothing.
//!
//! [`EditingSession`] ties one ephemeral image store to one editor and
//! releases every cached image once the document has been saved.
//!
//! [`UploadGateway`]: blockpress_upload::UploadGateway

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod fetch;
mod outcome;
mod rewriter;
mod session;

pub use document::{Document, MediaTarget, Node, NodePath, PROCESSED_ATTR, SRC_ATTR};
pub use fetch::{HttpReferenceFetcher, NoFallback, ReferenceFetcher};
pub use outcome::{NodeOutcome, OutcomeStatus, RewriteReport, RewriteStatus, SkipReason};
pub use rewriter::{ContentRewriter, RewriterConfig};
pub use session::{DocumentPersister, EditingSession, SaveOutcome, SavePolicy};
