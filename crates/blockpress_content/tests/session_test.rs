//! Tests for editing session save and revocation behavior.

mod test_utils;

use blockpress_content::{
    Document, EditingSession, Node, NodePath, RewriteStatus, RewriterConfig, SaveOutcome,
    SavePolicy,
};
use blockpress_error::BlockpressErrorKind;
use blockpress_media::{ImageBlob, PermanentPrefixes};
use std::sync::Arc;
use test_utils::{MockFetcher, MockGateway, MockPersister};

fn config() -> RewriterConfig {
    RewriterConfig::default()
        .with_prefixes(PermanentPrefixes::new(["https://cdn.example/storage/"]))
        .with_max_concurrent_uploads(1)
}

fn png() -> ImageBlob {
    ImageBlob::new(vec![1u8; 32], "image/png")
}

#[tokio::test]
async fn test_save_persists_and_revokes() {
    let gateway = MockGateway::new();
    let session = EditingSession::new(Arc::clone(&gateway), config());
    let persister = MockPersister::new();

    let first = session.insert_image(png()).unwrap();
    let second = session.insert_image(png()).unwrap();
    let document = Document::from_nodes(vec![Node::image(&first), Node::image(&second)]);

    let outcome = session
        .save(&document, &persister, SavePolicy::RequireComplete)
        .await
        .unwrap();

    match &outcome {
        SaveOutcome::Saved { report, revoked } => {
            assert_eq!(report.status(), RewriteStatus::Complete);
            assert_eq!(*revoked, 2);
        }
        other => panic!("expected save, got {:?}", other),
    }
    assert!(session.store().is_empty());

    let saved = persister.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(&saved[0], outcome.report().document());
    let node = saved[0].node_at(&NodePath::new(vec![0])).unwrap();
    assert!(node.is_processed());
}

#[tokio::test]
async fn test_require_complete_blocks_partial_document() {
    let gateway = MockGateway::failing_on(&[1]);
    let session = EditingSession::new(Arc::clone(&gateway), config());
    let persister = MockPersister::new();

    let local_ref = session.insert_image(png()).unwrap();
    let document = Document::from_nodes(vec![Node::image(&local_ref)]);

    let outcome = session
        .save(&document, &persister, SavePolicy::RequireComplete)
        .await
        .unwrap();

    assert!(!outcome.is_saved());
    assert_eq!(outcome.report().status(), RewriteStatus::Partial);
    assert!(persister.saved().is_empty());
    // The image stays available for the next attempt
    assert!(session.store().contains(&local_ref));

    let retry = session
        .save(&document, &persister, SavePolicy::RequireComplete)
        .await
        .unwrap();
    assert!(retry.is_saved());
    assert!(session.store().is_empty());
}

#[tokio::test]
async fn test_allow_partial_keeps_failed_images() {
    let gateway = MockGateway::failing_on(&[2]);
    let session = EditingSession::new(Arc::clone(&gateway), config());
    let persister = MockPersister::new();

    let ok = session.insert_image(png()).unwrap();
    let failed = session.insert_image(png()).unwrap();
    let unused = session.insert_image(png()).unwrap();
    let document = Document::from_nodes(vec![Node::image(&ok), Node::image(&failed)]);

    let outcome = session
        .save(&document, &persister, SavePolicy::AllowPartial)
        .await
        .unwrap();

    match outcome {
        SaveOutcome::Saved { report, revoked } => {
            assert_eq!(report.status(), RewriteStatus::Partial);
            assert_eq!(revoked, 2);
        }
        other => panic!("expected save, got {:?}", other),
    }
    assert_eq!(persister.saved().len(), 1);
    assert!(session.store().contains(&failed));
    assert!(!session.store().contains(&ok));
    assert!(!session.store().contains(&unused));
}

#[tokio::test]
async fn test_persist_failure_keeps_store() {
    let session = EditingSession::new(MockGateway::new(), config());
    let local_ref = session.insert_image(png()).unwrap();
    let document = Document::from_nodes(vec![Node::image(&local_ref)]);

    let err = session
        .save(&document, &MockPersister::failing(), SavePolicy::AllowPartial)
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), BlockpressErrorKind::Persist(_)));
    assert!(session.store().contains(&local_ref));
}

#[tokio::test]
async fn test_dropping_session_revokes_everything() {
    let session = EditingSession::new(MockGateway::new(), config());
    session.insert_image(png()).unwrap();
    session.insert_image(png()).unwrap();
    let store = Arc::clone(session.store());

    drop(session);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_close_reports_revoked_count() {
    let session = EditingSession::new(MockGateway::new(), config());
    session.insert_image(png()).unwrap();
    assert_eq!(session.close(), 1);
}

#[tokio::test]
async fn test_insert_rejects_invalid_payload() {
    let session = EditingSession::new(MockGateway::new(), config());
    let err = session
        .insert_image(ImageBlob::new(Vec::<u8>::new(), "image/png"))
        .unwrap_err();
    assert!(err.is_invalid_payload());
    assert!(session.store().is_empty());
}

#[tokio::test]
async fn test_session_fallback_fetcher() {
    let fetcher = MockFetcher::serving(png());
    let session = EditingSession::new(MockGateway::new(), config()).with_fetcher(Arc::clone(&fetcher));
    let document = Document::from_nodes(vec![Node::image("blob:https://craft.example/old-tab")]);

    let report = session.rewrite(&document).await;

    assert_eq!(report.processed_count(), 1);
    assert_eq!(fetcher.fetched().len(), 1);
}
