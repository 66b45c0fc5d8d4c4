/// In-process backend for tests, with failure injection and call counters
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

use super::GalleryBackend;
use crate::error::{GalleryError, Result};
use crate::state::data::{ImageRecord, NewImage};

const URL_PREFIX: &str = "fake://objects/";

#[derive(Default)]
pub struct FakeBackend {
    /// Newest first, like a real listing
    pub records: Mutex<Vec<ImageRecord>>,
    pub objects: Mutex<HashMap<String, Vec<u8>>>,
    pub fail_list: AtomicBool,
    pub fail_store: AtomicBool,
    pub fail_insert: AtomicBool,
    pub fail_delete: AtomicBool,
    pub list_calls: AtomicUsize,
    pub store_calls: AtomicUsize,
    pub insert_calls: AtomicUsize,
    pub remove_calls: AtomicUsize,
    next_id: AtomicU64,
    delay: Duration,
}

impl FakeBackend {
    pub fn with_records(records: Vec<ImageRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    fn injected(flag: &AtomicBool, what: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(GalleryError::Status {
                status: 500,
                body: format!("injected {} failure", what),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl GalleryBackend for FakeBackend {
    fn backend_tag(&self) -> &'static str {
        "fake"
    }

    async fn list_images(&self) -> Result<Vec<ImageRecord>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        Self::injected(&self.fail_list, "list")?;
        Ok(self.records.lock().await.clone())
    }

    async fn store_object(
        &self,
        object_name: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        Self::injected(&self.fail_store, "store")?;
        self.objects.lock().await.insert(object_name.to_string(), bytes);
        Ok(object_name.to_string())
    }

    fn public_url(&self, reference: &str) -> String {
        format!("{}{}", URL_PREFIX, reference)
    }

    async fn insert_image(&self, image: &NewImage) -> Result<ImageRecord> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        Self::injected(&self.fail_insert, "insert")?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 100;
        let record = ImageRecord {
            id: id.to_string(),
            url: image.url.clone(),
            name: image.name.clone(),
            title: image.title.clone(),
            keywords: image.keywords.clone(),
            created_at: None,
        };
        self.records.lock().await.insert(0, record.clone());
        Ok(record)
    }

    async fn delete_image(&self, id: &str) -> Result<()> {
        self.pause().await;
        Self::injected(&self.fail_delete, "delete")?;
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(GalleryError::NotFound(format!("image {}", id)));
        }
        Ok(())
    }

    async fn remove_object(&self, reference: &str) -> Result<()> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        self.objects.lock().await.remove(reference);
        Ok(())
    }

    fn object_name_for_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(URL_PREFIX).map(str::to_string)
    }

    async fn fetch_object(&self, url: &str) -> Result<Vec<u8>> {
        let name = self
            .object_name_for_url(url)
            .ok_or_else(|| GalleryError::NotFound(url.to_string()))?;
        self.objects
            .lock()
            .await
            .get(&name)
            .cloned()
            .ok_or_else(|| GalleryError::NotFound(url.to_string()))
    }
}
