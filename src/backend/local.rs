use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::GalleryBackend;
use crate::error::{GalleryError, Result};
use crate::state::data::{ImageRecord, NewImage};

/// Local backend: a SQLite catalog of image metadata plus a directory
/// holding the stored image bytes.
///
/// Layout under the data directory:
/// - `gallery.db` - the catalog
/// - `objects/` - one file per uploaded image
pub struct LocalBackend {
    conn: Arc<Mutex<Connection>>,
    db_path: PathBuf,
    objects_dir: PathBuf,
    /// `file://<objects_dir>/`, the prefix of every url we hand out
    url_prefix: String,
}

impl LocalBackend {
    /// Open (or create) the catalog and objects directory under `data_dir`
    pub fn open(data_dir: &Path) -> Result<Self> {
        let objects_dir = data_dir.join("objects");
        std::fs::create_dir_all(&objects_dir)?;
        let objects_dir = objects_dir.canonicalize().unwrap_or(objects_dir);

        let db_path = data_dir.join("gallery.db");
        let conn = Connection::open(&db_path)?;
        Self::init_schema(&conn)?;

        tracing::info!("Catalog opened at {}", db_path.display());

        let url_prefix = format!("file://{}/", objects_dir.display());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path,
            objects_dir,
            url_prefix,
        })
    }

    /// Creates the images table and its ordering index if they don't exist.
    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS images (
                id              TEXT PRIMARY KEY,
                url             TEXT NOT NULL,
                name            TEXT NOT NULL,
                title           TEXT NOT NULL,
                keywords_json   TEXT NOT NULL DEFAULT '[]',
                created_at      INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_images_created_at
             ON images(created_at DESC)",
            [],
        )?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    pub fn image_count(&self) -> Result<i64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))?;
        Ok(count)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| GalleryError::Database("catalog connection poisoned".to_string()))
    }

    /// Run a catalog query on the blocking pool
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| GalleryError::Database("catalog connection poisoned".to_string()))?;
            f(&guard)
        })
        .await?
    }

    fn object_path(&self, object_name: &str) -> Result<PathBuf> {
        let valid = !object_name.is_empty()
            && !object_name.contains(['/', '\\'])
            && object_name != "."
            && object_name != "..";
        if !valid {
            return Err(GalleryError::InvalidInput(format!(
                "object name {:?} is not a plain file name",
                object_name
            )));
        }
        Ok(self.objects_dir.join(object_name))
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<(ImageRecord, String)> {
    let created_ms: i64 = row.get(5)?;
    let record = ImageRecord {
        id: row.get(0)?,
        url: row.get(1)?,
        name: row.get(2)?,
        title: row.get(3)?,
        keywords: Vec::new(),
        created_at: DateTime::<Utc>::from_timestamp_millis(created_ms),
    };
    Ok((record, row.get(4)?))
}

#[async_trait]
impl GalleryBackend for LocalBackend {
    fn backend_tag(&self) -> &'static str {
        "local"
    }

    async fn list_images(&self) -> Result<Vec<ImageRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, url, name, title, keywords_json, created_at
                 FROM images
                 ORDER BY created_at DESC, rowid DESC",
            )?;

            let rows = stmt.query_map([], row_to_record)?;

            let mut images = Vec::new();
            for row in rows {
                let (mut record, keywords_json) = row?;
                record.keywords = serde_json::from_str(&keywords_json)?;
                images.push(record);
            }
            Ok(images)
        })
        .await
    }

    async fn store_object(
        &self,
        object_name: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String> {
        let path = self.object_path(object_name)?;
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!("Stored object {}", path.display());
        Ok(object_name.to_string())
    }

    fn public_url(&self, reference: &str) -> String {
        format!("{}{}", self.url_prefix, reference)
    }

    async fn insert_image(&self, image: &NewImage) -> Result<ImageRecord> {
        let now = Utc::now();
        let record = ImageRecord {
            id: uuid::Uuid::new_v4().to_string(),
            url: image.url.clone(),
            name: image.name.clone(),
            title: image.title.clone(),
            keywords: image.keywords.clone(),
            created_at: DateTime::<Utc>::from_timestamp_millis(now.timestamp_millis()),
        };
        let keywords_json = serde_json::to_string(&record.keywords)?;

        let row = record.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO images (id, url, name, title, keywords_json, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    row.id,
                    row.url,
                    row.name,
                    row.title,
                    keywords_json,
                    now.timestamp_millis()
                ],
            )?;
            Ok(())
        })
        .await?;

        Ok(record)
    }

    async fn delete_image(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let deleted = conn.execute("DELETE FROM images WHERE id = ?1", params![id])?;
            if deleted == 0 {
                return Err(GalleryError::NotFound(format!("image {}", id)));
            }
            Ok(())
        })
        .await
    }

    async fn remove_object(&self, reference: &str) -> Result<()> {
        let path = self.object_path(reference)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Object {} already gone", path.display());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn object_name_for_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.url_prefix)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }

    async fn fetch_object(&self, url: &str) -> Result<Vec<u8>> {
        let name = self
            .object_name_for_url(url)
            .ok_or_else(|| GalleryError::NotFound(url.to_string()))?;
        let path = self.object_path(&name)?;
        Ok(tokio::fs::read(&path).await?)
    }
}

impl std::fmt::Debug for LocalBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalBackend")
            .field("db_path", &self.db_path)
            .field("objects_dir", &self.objects_dir)
            .finish()
    }
}
