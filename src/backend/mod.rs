/// Storage backends for the gallery
///
/// A backend combines object storage (image bytes) with a metadata table
/// (one row per image). Two implementations exist:
/// - `local.rs` - SQLite catalog plus an objects directory on disk
/// - `supabase.rs` - hosted Storage API and PostgREST over HTTP
///
/// `Remote` wraps a shared backend with the optional per-call timeout and
/// implements the multi-step list/upload/delete flows used by the UI.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{BackendKind, GalleryConfig};
use crate::error::{GalleryError, Result};
use crate::state::data::{ImageRecord, NewImage, SelectedFile, Submission};

pub mod local;
pub mod supabase;

#[cfg(test)]
pub mod fake;

#[async_trait]
pub trait GalleryBackend: Send + Sync + 'static {
    fn backend_tag(&self) -> &'static str {
        "unknown"
    }

    /// All records, newest first
    async fn list_images(&self) -> Result<Vec<ImageRecord>>;

    /// Store image bytes under `object_name`, returning the storage reference
    async fn store_object(&self, object_name: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<String>;

    /// Public address for a storage reference
    fn public_url(&self, reference: &str) -> String;

    /// Record metadata for a stored object; the backend assigns the id
    async fn insert_image(&self, image: &NewImage) -> Result<ImageRecord>;

    async fn delete_image(&self, id: &str) -> Result<()>;

    async fn remove_object(&self, reference: &str) -> Result<()>;

    /// Inverse of `public_url` for urls this backend handed out
    fn object_name_for_url(&self, url: &str) -> Option<String>;

    /// Raw bytes behind a public url
    async fn fetch_object(&self, url: &str) -> Result<Vec<u8>>;
}

/// Build the backend selected in the configuration
pub fn open_backend(config: &GalleryConfig) -> Result<Arc<dyn GalleryBackend>> {
    match config.backend.kind {
        BackendKind::Local => {
            let backend = local::LocalBackend::open(&config.data_dir())?;
            tracing::info!(
                "Local catalog {} holds {} images",
                backend.path().display(),
                backend.image_count()?
            );
            Ok(Arc::new(backend))
        }
        BackendKind::Supabase => {
            let backend = supabase::SupabaseBackend::from_config(&config.backend)?;
            Ok(Arc::new(backend))
        }
    }
}

/// Object name for a new upload: `<unix-millis>-<uuid>.<ext>`
pub fn object_name_for(file: &SelectedFile, now: DateTime<Utc>) -> String {
    format!(
        "{}-{}.{}",
        now.timestamp_millis(),
        uuid::Uuid::new_v4().simple(),
        file.extension()
    )
}

/// Shared handle to the backend used by UI tasks
#[derive(Clone)]
pub struct Remote {
    backend: Arc<dyn GalleryBackend>,
    timeout: Option<Duration>,
}

impl Remote {
    pub fn new(backend: Arc<dyn GalleryBackend>, timeout: Option<Duration>) -> Self {
        Self { backend, timeout }
    }

    pub fn backend_tag(&self) -> &'static str {
        self.backend.backend_tag()
    }

    async fn bounded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| GalleryError::Timeout(limit))?,
            None => call.await,
        }
    }

    pub async fn list(self) -> Result<Vec<ImageRecord>> {
        let images = self.bounded(self.backend.list_images()).await?;
        tracing::info!(
            "Fetched {} images from {} backend",
            images.len(),
            self.backend.backend_tag()
        );
        Ok(images)
    }

    /// Store the bytes, resolve the public url, then record the metadata.
    /// If recording fails the stored object is removed again.
    pub async fn upload(self, submission: Submission) -> Result<ImageRecord> {
        let Submission { file, metadata } = submission;

        let bytes = tokio::fs::read(&file.path).await?;
        let object_name = object_name_for(&file, Utc::now());
        let content_type = file
            .content_type
            .as_deref()
            .unwrap_or("application/octet-stream");

        tracing::info!(
            "Uploading {} ({} bytes) as {}",
            file.file_name,
            bytes.len(),
            object_name
        );
        let reference = self
            .bounded(self.backend.store_object(&object_name, bytes, content_type))
            .await?;
        let url = self.backend.public_url(&reference);

        let new_image = NewImage::new(url, metadata);
        match self.bounded(self.backend.insert_image(&new_image)).await {
            Ok(record) => {
                tracing::info!("Recorded image {} at {}", record.id, record.url);
                Ok(record)
            }
            Err(e) => {
                tracing::error!("Recording metadata for {} failed: {}", reference, e);
                if let Err(cleanup) = self.bounded(self.backend.remove_object(&reference)).await {
                    tracing::warn!("Could not remove orphaned object {}: {}", reference, cleanup);
                }
                Err(e)
            }
        }
    }

    /// Delete the metadata row, then the stored object. Returns the deleted id.
    pub async fn delete(self, record: ImageRecord) -> Result<String> {
        self.bounded(self.backend.delete_image(&record.id)).await?;

        match self.backend.object_name_for_url(&record.url) {
            Some(reference) => {
                if let Err(e) = self.bounded(self.backend.remove_object(&reference)).await {
                    tracing::warn!(
                        "Image {} deleted but object {} remains: {}",
                        record.id,
                        reference,
                        e
                    );
                }
            }
            None => tracing::warn!("No stored object known for {}", record.url),
        }

        tracing::info!("Deleted image {}", record.id);
        Ok(record.id)
    }

    pub async fn fetch_object(self, url: String) -> Result<Vec<u8>> {
        self.bounded(self.backend.fetch_object(&url)).await
    }
}
