//! Session-scoped store of not-yet-uploaded images.

use crate::{is_local_ref, ImageBlob, ImageMediaType, LOCAL_REF_SCHEME};
use blockpress_error::{MediaError, MediaErrorKind};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Host segment of references issued by [`EphemeralImageStore`].
const LOCAL_REF_HOST: &str = "blockpress";

/// One cached image awaiting upload.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct EphemeralImageEntry {
    /// Opaque identifier (millisecond timestamp + random suffix)
    id: String,
    /// Reference embedded in the document, one-to-one with `id`
    local_ref: String,
    /// The cached payload
    blob: ImageBlob,
    /// Validated media type of `blob`
    media_type: ImageMediaType,
    /// When the image was inserted
    created_at: DateTime<Utc>,
}

impl EphemeralImageEntry {
    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.blob.len()
    }
}

/// In-memory map from local references to image blobs.
///
/// One store belongs to one editing session. Entries live until
/// [`revoke`](Self::revoke) or [`revoke_all`](Self::revoke_all); nothing is
/// persisted, so entries vanish with the process.
///
/// All methods take `&self` and are safe to call from concurrent upload tasks.
#[derive(Debug, Default)]
pub struct EphemeralImageStore {
    entries: Mutex<HashMap<String, EphemeralImageEntry>>,
}

impl EphemeralImageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, EphemeralImageEntry>> {
        // Entries stay consistent even if a holder panicked: every mutation is a
        // single map call.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn generate_id() -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("{}-{}", Utc::now().timestamp_millis(), &suffix[..12])
    }

    /// Cache a blob and return the local reference to embed in the document.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPayload` if the blob is empty or not a recognized image.
    #[tracing::instrument(skip(self, blob), fields(size = blob.len(), mime_type = %blob.mime_type()))]
    pub fn store(&self, blob: ImageBlob) -> Result<String, MediaError> {
        let media_type = blob.validate().inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected image payload");
        })?;

        let id = Self::generate_id();
        let local_ref = format!("{}{}/{}", LOCAL_REF_SCHEME, LOCAL_REF_HOST, id);
        let entry = EphemeralImageEntry {
            id: id.clone(),
            local_ref: local_ref.clone(),
            blob,
            media_type,
            created_at: Utc::now(),
        };

        let mut entries = self.entries();
        entries.insert(local_ref.clone(), entry);
        tracing::debug!(id = %id, outstanding = entries.len(), "Cached ephemeral image");
        Ok(local_ref)
    }

    /// Whether `value` uses the local reference scheme.
    ///
    /// True for references from any session, not only this store.
    pub fn is_local_ref(&self, value: &str) -> bool {
        is_local_ref(value)
    }

    /// Look up the blob behind a local reference.
    ///
    /// # Errors
    ///
    /// - `MalformedReference` if `local_ref` is not a `blob:` reference
    /// - `NotFound` if it was revoked or never issued by this store
    pub fn resolve(&self, local_ref: &str) -> Result<ImageBlob, MediaError> {
        if !is_local_ref(local_ref) {
            return Err(MediaError::new(MediaErrorKind::MalformedReference(
                local_ref.to_string(),
            )));
        }
        self.entries()
            .get(local_ref)
            .map(|entry| entry.blob.clone())
            .ok_or_else(|| MediaError::new(MediaErrorKind::NotFound(local_ref.to_string())))
    }

    /// Snapshot of the entry behind a local reference, if still outstanding.
    pub fn entry(&self, local_ref: &str) -> Option<EphemeralImageEntry> {
        self.entries().get(local_ref).cloned()
    }

    /// Whether the reference is still outstanding.
    pub fn contains(&self, local_ref: &str) -> bool {
        self.entries().contains_key(local_ref)
    }

    /// Release a single reference. Returns whether it was outstanding.
    pub fn revoke(&self, local_ref: &str) -> bool {
        let removed = self.entries().remove(local_ref).is_some();
        if removed {
            tracing::debug!(local_ref, "Revoked ephemeral image");
        }
        removed
    }

    /// Release every outstanding reference and free the blobs.
    ///
    /// Idempotent; returns how many references were released.
    pub fn revoke_all(&self) -> usize {
        let released = {
            let mut entries = self.entries();
            let count = entries.len();
            entries.clear();
            count
        };
        if released > 0 {
            tracing::info!(released, "Revoked all ephemeral images");
        }
        released
    }

    /// Release every reference not in `keep`.
    ///
    /// Returns how many references were released.
    pub fn revoke_except(&self, keep: &HashSet<String>) -> usize {
        let released = {
            let mut entries = self.entries();
            let before = entries.len();
            entries.retain(|local_ref, _| keep.contains(local_ref));
            before - entries.len()
        };
        if released > 0 {
            tracing::info!(released, kept = keep.len(), "Revoked ephemeral images");
        }
        released
    }

    /// Number of outstanding references.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether no references are outstanding.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
