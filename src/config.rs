/// Application configuration
///
/// Stored as TOML in the user's config directory:
/// - Linux: ~/.config/image-gallery/config.toml
/// - macOS: ~/Library/Application Support/image-gallery/config.toml
/// - Windows: %APPDATA%\image-gallery\config.toml
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

const APP_DIR: &str = "image-gallery";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub backend: BackendConfig,
    pub network: NetworkConfig,
    pub ui: UiConfig,
    /// Overrides the thumbnail cache location
    pub cache_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendKind {
    #[serde(rename = "local")]
    Local,
    #[serde(rename = "supabase")]
    Supabase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
    /// Local backend: directory holding the catalog and stored objects
    pub data_dir: Option<PathBuf>,
    /// Supabase backend: project url, e.g. https://xyz.supabase.co
    pub project_url: Option<String>,
    pub api_key: Option<String>,
    pub bucket: String,
    pub table: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Local,
            data_dir: None,
            project_url: None,
            api_key: None,
            bucket: "images".to_string(),
            table: "images".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Upper bound for every remote call. No bound when unset.
    pub timeout_secs: Option<u64>,
}

impl NetworkConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub toast_secs: u64,
    pub thumbnail_size: u32,
    pub preview_size: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_secs: 5,
            thumbnail_size: 256,
            preview_size: 512,
        }
    }
}

impl GalleryConfig {
    /// Load configuration from the default location.
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::info!("Configuration loaded from {:?}", path);
            Ok(config)
        } else {
            tracing::info!("Using default configuration");
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::info!("Configuration saved to {:?}", path);
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// Where the local backend keeps its catalog and objects
    pub fn data_dir(&self) -> PathBuf {
        self.backend.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
        })
    }

    /// Thumbnail cache, ~/.cache/image-gallery/thumbnails on Linux
    pub fn thumbnail_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join("thumbnails")
        })
    }
}
