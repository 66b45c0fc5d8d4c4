/// Image decoding helpers
///
/// This module handles:
/// - Detecting the content type of picked or dropped files
/// - Generating upload previews
/// - Generating and caching grid thumbnails
use std::path::Path;

pub mod preview;
pub mod thumbnail;

/// Extensions offered by the file picker
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff", "ico", "avif",
];

/// Declared content type of a file, judged by its extension
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    image::ImageFormat::from_path(path)
        .ok()
        .map(|format| format.to_mime_type())
}
