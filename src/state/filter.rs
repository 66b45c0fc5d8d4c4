/// Search filtering over the gallery
///
/// A record is visible when its name, title, or any keyword contains the
/// query after lowercasing both sides. Nothing else is normalized: a query of
/// "  " only matches fields that contain two spaces.
use super::data::ImageRecord;

/// Returns true if the record matches the (already lowercased) needle
fn matches(image: &ImageRecord, needle: &str) -> bool {
    image.name.to_lowercase().contains(needle)
        || image.title.to_lowercase().contains(needle)
        || image
            .keywords
            .iter()
            .any(|keyword| keyword.to_lowercase().contains(needle))
}

/// Derive the visible subset of `images` for `query`, preserving order
pub fn filter_images(images: &[ImageRecord], query: &str) -> Vec<ImageRecord> {
    let needle = query.to_lowercase();
    images
        .iter()
        .filter(|image| matches(image, &needle))
        .cloned()
        .collect()
}
