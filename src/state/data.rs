/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the storage backends and the UI layer.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Represents a single image in the gallery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Opaque identifier assigned by the backend
    pub id: String,
    /// Public address of the stored image bytes
    pub url: String,
    /// Short label (e.g., "sunset-01")
    pub name: String,
    /// Display title
    pub title: String,
    /// Free-text tags, in the order they were entered
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Metadata collected by the upload form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMetadata {
    pub name: String,
    pub title: String,
    pub keywords: Vec<String>,
}

/// Insert payload for recording a freshly stored image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewImage {
    pub url: String,
    pub name: String,
    pub title: String,
    pub keywords: Vec<String>,
}

impl NewImage {
    pub fn new(url: String, metadata: ImageMetadata) -> Self {
        Self {
            url,
            name: metadata.name,
            title: metadata.title,
            keywords: metadata.keywords,
        }
    }
}

/// A file picked or dropped into the upload form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    /// Filename only (e.g., "IMG_0001.jpg")
    pub file_name: String,
    /// Declared content type, e.g. "image/png"
    pub content_type: Option<String>,
}

impl SelectedFile {
    pub fn from_path(path: PathBuf) -> Self {
        let file_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let content_type = crate::media::content_type_for(&path).map(str::to_string);

        Self {
            path,
            file_name,
            content_type,
        }
    }

    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("image/"))
    }

    /// Lowercased extension used for generated object names
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| "bin".to_string())
    }
}

/// A validated upload ready to be handed to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub file: SelectedFile,
    pub metadata: ImageMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserializes_backend_row() {
        let row = r#"{
            "id": "5b1f0c1e-8a1d-4c43-9d1a-2b0f6f3a9e11",
            "url": "https://demo.supabase.co/storage/v1/object/public/images/1.png",
            "name": "a",
            "title": "Apple",
            "keywords": ["fruit"],
            "created_at": "2024-03-01T10:00:00+00:00"
        }"#;

        let record: ImageRecord = serde_json::from_str(row).unwrap();
        assert_eq!(record.title, "Apple");
        assert_eq!(record.keywords, vec!["fruit".to_string()]);
        assert!(record.created_at.is_some());
    }

    #[test]
    fn test_missing_keywords_default_to_empty() {
        let row = r#"{"id":"1","url":"u","name":"n","title":"t"}"#;
        let record: ImageRecord = serde_json::from_str(row).unwrap();
        assert!(record.keywords.is_empty());
        assert_eq!(record.created_at, None);
    }

    #[test]
    fn test_selected_file_detects_images() {
        let png = SelectedFile::from_path(PathBuf::from("/tmp/Holiday.PNG"));
        assert_eq!(png.file_name, "Holiday.PNG");
        assert_eq!(png.content_type.as_deref(), Some("image/png"));
        assert!(png.is_image());
        assert_eq!(png.extension(), "png");

        let text = SelectedFile::from_path(PathBuf::from("/tmp/notes.txt"));
        assert!(!text.is_image());

        let bare = SelectedFile::from_path(PathBuf::from("/tmp/README"));
        assert_eq!(bare.extension(), "bin");
    }
}
