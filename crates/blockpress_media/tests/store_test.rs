//! Tests for the ephemeral image store.

use blockpress_media::{EphemeralImageStore, ImageBlob, ImageMediaType, MediaErrorKind};
use std::collections::HashSet;
use std::sync::Arc;

fn png(size: usize) -> ImageBlob {
    ImageBlob::new(vec![7u8; size], "image/png")
}

#[test]
fn test_store_and_resolve() {
    let store = EphemeralImageStore::new();
    let blob = png(500);

    let local_ref = store.store(blob.clone()).unwrap();

    assert!(local_ref.starts_with("blob:"));
    assert!(store.is_local_ref(&local_ref));
    assert_eq!(store.resolve(&local_ref).unwrap(), blob);
    // Reads do not consume the entry
    assert_eq!(store.resolve(&local_ref).unwrap(), blob);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_entry_metadata() {
    let store = EphemeralImageStore::new();
    let local_ref = store.store(ImageBlob::new(vec![1, 2, 3], "image/jpg")).unwrap();

    let entry = store.entry(&local_ref).unwrap();
    assert_eq!(entry.local_ref(), &local_ref);
    assert!(local_ref.ends_with(entry.id().as_str()));
    assert_eq!(*entry.media_type(), ImageMediaType::Jpeg);
    assert_eq!(entry.blob().len(), 3);
    assert_eq!(entry.size(), 3);
    assert!(*entry.created_at() <= chrono::Utc::now());
}

#[test]
fn test_references_are_unique() {
    let store = EphemeralImageStore::new();
    let refs: HashSet<String> = (0..50).map(|_| store.store(png(4)).unwrap()).collect();
    assert_eq!(refs.len(), 50);
    assert_eq!(store.len(), 50);
}

#[test]
fn test_rejects_empty_payload() {
    let store = EphemeralImageStore::new();
    let err = store.store(png(0)).unwrap_err();
    assert!(err.is_invalid_payload());
    assert!(store.is_empty());
}

#[test]
fn test_rejects_non_image_payload() {
    let store = EphemeralImageStore::new();
    let err = store
        .store(ImageBlob::new(b"%PDF-1.7".to_vec(), "application/pdf"))
        .unwrap_err();
    assert!(err.is_invalid_payload());
    assert!(store.is_empty());
}

#[test]
fn test_revoke_all_invalidates_references() {
    let store = EphemeralImageStore::new();
    let first = store.store(png(10)).unwrap();
    let second = store.store(png(20)).unwrap();

    assert_eq!(store.revoke_all(), 2);

    assert!(store.resolve(&first).unwrap_err().is_not_found());
    assert!(store.resolve(&second).unwrap_err().is_not_found());
    assert!(store.is_empty());
}

#[test]
fn test_revoke_all_is_idempotent() {
    let store = EphemeralImageStore::new();
    assert_eq!(store.revoke_all(), 0);

    store.store(png(10)).unwrap();
    assert_eq!(store.revoke_all(), 1);
    assert_eq!(store.revoke_all(), 0);
}

#[test]
fn test_revoke_single_reference() {
    let store = EphemeralImageStore::new();
    let keep = store.store(png(10)).unwrap();
    let drop = store.store(png(10)).unwrap();

    assert!(store.revoke(&drop));
    assert!(!store.revoke(&drop));
    assert!(store.contains(&keep));
    assert!(!store.contains(&drop));
}

#[test]
fn test_foreign_local_ref_is_not_found() {
    let store = EphemeralImageStore::new();
    let foreign = "blob:http://localhost:3000/2b5c1e70-0000-4000-8000-000000000000";

    assert!(store.is_local_ref(foreign));
    assert!(store.resolve(foreign).unwrap_err().is_not_found());
}

#[test]
fn test_non_local_ref_is_malformed() {
    let store = EphemeralImageStore::new();
    let err = store.resolve("https://cdn.example/storage/a.png").unwrap_err();
    assert!(matches!(err.kind, MediaErrorKind::MalformedReference(_)));
}

#[test]
fn test_concurrent_store_and_resolve() {
    let store = Arc::new(EphemeralImageStore::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                let local_ref = store.store(png(i + 1)).unwrap();
                assert_eq!(store.resolve(&local_ref).unwrap().len(), i + 1);
                local_ref
            })
        })
        .collect();

    let refs: HashSet<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(refs.len(), 8);
    assert_eq!(store.len(), 8);
}

#[test]
fn test_revoke_except_keeps_listed_references() {
    let store = EphemeralImageStore::new();
    let keep = store.store(png(10)).unwrap();
    store.store(png(10)).unwrap();
    store.store(png(10)).unwrap();

    let retained = HashSet::from([keep.clone()]);
    assert_eq!(store.revoke_except(&retained), 2);
    assert_eq!(store.len(), 1);
    assert!(store.contains(&keep));
}
