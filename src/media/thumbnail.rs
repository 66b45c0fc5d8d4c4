use image::imageops::FilterType;
use std::path::{Path, PathBuf};

use super::preview::{decode_scaled, Preview};
use crate::backend::Remote;
use crate::error::Result;

/// Get the thumbnail path for an image id (doesn't generate, just returns the expected path).
/// Characters outside [A-Za-z0-9_-] are replaced so any backend id maps to a plain file name.
pub fn thumbnail_path(cache_dir: &Path, image_id: &str) -> PathBuf {
    let safe: String = image_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    cache_dir.join(format!("{}.png", safe))
}

/// Check if a thumbnail exists for an image id
pub fn thumbnail_exists(cache_dir: &Path, image_id: &str) -> bool {
    thumbnail_path(cache_dir, image_id).exists()
}

/// Load the grid thumbnail for an image, generating and caching it on first use
pub async fn load_thumbnail(
    remote: Remote,
    cache_dir: PathBuf,
    image_id: String,
    url: String,
    size: u32,
) -> Result<Preview> {
    let cached = thumbnail_path(&cache_dir, &image_id);

    if thumbnail_exists(&cache_dir, &image_id) {
        if let Ok(bytes) = tokio::fs::read(&cached).await {
            match tokio::task::spawn_blocking(move || decode_scaled(&bytes, size)).await? {
                Ok(preview) => return Ok(preview),
                Err(e) => tracing::warn!(
                    "Ignoring unreadable cached thumbnail {}: {}",
                    cached.display(),
                    e
                ),
            }
        }
    }

    let bytes = remote.fetch_object(url).await?;
    tokio::task::spawn_blocking(move || generate_thumbnail(&bytes, &cached, size)).await?
}

/// Decode, resize, save to the cache, and return the display handle
fn generate_thumbnail(bytes: &[u8], cache_path: &Path, size: u32) -> Result<Preview> {
    let img = image::load_from_memory(bytes)?;
    let thumbnail = img.resize(size, size, FilterType::Lanczos3);

    if let Some(parent) = cache_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    // A failed cache write only costs a regeneration next time
    match thumbnail.save(cache_path) {
        Ok(()) => tracing::debug!("Generated thumbnail: {}", cache_path.display()),
        Err(e) => tracing::warn!("Could not cache thumbnail {}: {}", cache_path.display(), e),
    }

    let rgba = thumbnail.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Preview::from_rgba(width, height, rgba.into_raw()))
}

/// Drop the cached thumbnail of a deleted image
pub fn evict(cache_dir: &Path, image_id: &str) {
    let path = thumbnail_path(cache_dir, image_id);
    match std::fs::remove_file(&path) {
        Ok(()) => tracing::debug!("Evicted thumbnail {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Could not evict thumbnail {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeBackend;
    use crate::backend::GalleryBackend;
    use crate::media::preview::encoded_png;
    use std::sync::Arc;

    #[test]
    fn test_ids_become_plain_file_names() {
        let dir = Path::new("/cache");
        assert_eq!(
            thumbnail_path(dir, "5b1f0c1e-8a1d"),
            PathBuf::from("/cache/5b1f0c1e-8a1d.png")
        );
        assert_eq!(thumbnail_path(dir, "../x"), PathBuf::from("/cache/___x.png"));
    }

    #[tokio::test]
    async fn test_thumbnail_is_cached_after_first_load() {
        let cache = tempfile::tempdir().unwrap();
        let fake = Arc::new(FakeBackend::default());
        fake.store_object("p.png", encoded_png(600, 300), "image/png")
            .await
            .unwrap();
        let url = fake.public_url("p.png");
        let remote = Remote::new(fake.clone(), None);

        let first = load_thumbnail(
            remote.clone(),
            cache.path().to_path_buf(),
            "42".to_string(),
            url.clone(),
            256,
        )
        .await
        .unwrap();
        assert_eq!((first.width, first.height), (256, 128));
        assert!(thumbnail_exists(cache.path(), "42"));

        // The object is gone, so a second load must come from the cache
        fake.objects.lock().await.clear();
        let second = load_thumbnail(remote, cache.path().to_path_buf(), "42".to_string(), url, 256)
            .await
            .unwrap();
        assert_eq!((second.width, second.height), (256, 128));

        evict(cache.path(), "42");
        assert!(!thumbnail_exists(cache.path(), "42"));
        evict(cache.path(), "42");
    }

    #[tokio::test]
    async fn test_missing_object_is_an_error() {
        let cache = tempfile::tempdir().unwrap();
        let remote = Remote::new(Arc::new(FakeBackend::default()), None);

        let result = load_thumbnail(
            remote,
            cache.path().to_path_buf(),
            "1".to_string(),
            "fake://objects/none.png".to_string(),
            256,
        )
        .await;
        assert!(result.is_err());
    }
}
