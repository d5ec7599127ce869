//! Mock upload gateway, fallback fetcher and persister.

use async_trait::async_trait;
use blockpress_content::{Document, DocumentPersister, ReferenceFetcher};
use blockpress_error::{MediaError, MediaErrorKind, PersistError, UploadError, UploadErrorKind};
use blockpress_media::ImageBlob;
use blockpress_upload::UploadGateway;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Upload gateway that hands out `https://cdn.example/storage/<n>.png`.
#[derive(Default)]
pub struct MockGateway {
    calls: AtomicUsize,
    fail_on_calls: HashSet<usize>,
    fixed_url: Option<String>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    uploads: Mutex<Vec<(ImageBlob, Option<String>)>>,
}

impl MockGateway {
    /// Gateway where every upload succeeds.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Gateway that always answers with `url`.
    pub fn with_url(url: &str) -> Arc<Self> {
        Arc::new(Self {
            fixed_url: Some(url.to_string()),
            ..Self::default()
        })
    }

    /// Gateway that fails the given 1-based call numbers.
    pub fn failing_on(calls: &[usize]) -> Arc<Self> {
        Arc::new(Self {
            fail_on_calls: calls.iter().copied().collect(),
            ..Self::default()
        })
    }

    /// Gateway whose uploads each take `delay`.
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Self::default()
        })
    }

    /// Number of upload calls received.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of uploads observed at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Blobs and folders received, in call order.
    pub fn uploads(&self) -> Vec<(ImageBlob, Option<String>)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl UploadGateway for MockGateway {
    async fn upload(&self, blob: &ImageBlob, folder: Option<&str>) -> Result<String, UploadError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.uploads
            .lock()
            .unwrap()
            .push((blob.clone(), folder.map(str::to_string)));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_on_calls.contains(&call) {
            return Err(UploadError::new(UploadErrorKind::Status {
                status_code: 500,
                message: "storage unavailable".to_string(),
            }));
        }
        Ok(self
            .fixed_url
            .clone()
            .unwrap_or_else(|| format!("https://cdn.example/storage/{}.png", call)))
    }
}

/// Fallback fetcher serving a fixed blob for every reference, or nothing.
#[derive(Default)]
pub struct MockFetcher {
    blob: Option<ImageBlob>,
    fetched: Mutex<Vec<String>>,
}

impl MockFetcher {
    /// Fetcher that resolves every reference to `blob`.
    pub fn serving(blob: ImageBlob) -> Arc<Self> {
        Arc::new(Self {
            blob: Some(blob),
            ..Self::default()
        })
    }

    /// Fetcher that resolves nothing.
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// References the fetcher was asked for.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReferenceFetcher for MockFetcher {
    async fn fetch(&self, reference: &str) -> Result<ImageBlob, MediaError> {
        self.fetched.lock().unwrap().push(reference.to_string());
        self.blob
            .clone()
            .ok_or_else(|| MediaError::new(MediaErrorKind::NotFound(reference.to_string())))
    }
}

/// Persister recording every saved document.
#[derive(Default)]
pub struct MockPersister {
    fail: bool,
    saved: Mutex<Vec<Document>>,
}

impl MockPersister {
    /// Persister that accepts every document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Persister that rejects every document.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Documents persisted so far.
    pub fn saved(&self) -> Vec<Document> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentPersister for MockPersister {
    async fn persist(&self, document: &Document) -> Result<(), PersistError> {
        if self.fail {
            return Err(PersistError::new("database unavailable"));
        }
        self.saved.lock().unwrap().push(document.clone());
        Ok(())
    }
}
