/// Application error types
///
/// Every payload is a rendered string so the error can be cloned into
/// iced messages and carried back to the UI thread.
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GalleryError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File I/O error: {0}")]
    Io(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("HTTP transport error: {0}")]
    Http(String),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Image decode error: {0}")]
    ImageDecode(String),

    #[error("Remote call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl GalleryError {
    /// Short description suitable for a log line next to a notification
    pub fn user_message(&self) -> String {
        match self {
            GalleryError::Timeout(_) => "The server took too long to respond".to_string(),
            GalleryError::Status { status, .. } => {
                format!("Server responded with status {}", status)
            }
            GalleryError::NotFound(what) => format!("{} no longer exists", what),
            GalleryError::ImageDecode(msg) => format!("Cannot load image: {}", msg),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;

impl From<std::io::Error> for GalleryError {
    fn from(e: std::io::Error) -> Self {
        GalleryError::Io(e.to_string())
    }
}

impl From<rusqlite::Error> for GalleryError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::QueryReturnedNoRows => {
                GalleryError::NotFound("image record".to_string())
            }
            other => GalleryError::Database(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for GalleryError {
    fn from(e: reqwest::Error) -> Self {
        GalleryError::Http(e.to_string())
    }
}

impl From<serde_json::Error> for GalleryError {
    fn from(e: serde_json::Error) -> Self {
        GalleryError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for GalleryError {
    fn from(e: toml::de::Error) -> Self {
        GalleryError::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for GalleryError {
    fn from(e: toml::ser::Error) -> Self {
        GalleryError::Config(e.to_string())
    }
}

impl From<image::ImageError> for GalleryError {
    fn from(e: image::ImageError) -> Self {
        GalleryError::ImageDecode(e.to_string())
    }
}

impl From<tokio::task::JoinError> for GalleryError {
    fn from(e: tokio::task::JoinError) -> Self {
        GalleryError::Task(e.to_string())
    }
}
