/// Preview generation for the upload form
/// Decodes the selected file off the UI thread and scales it down for display
use iced::widget::image::Handle;
use image::imageops::FilterType;
use std::path::PathBuf;

use crate::error::Result;

/// A decoded, display-ready image
#[derive(Debug, Clone)]
pub struct Preview {
    pub width: u32,
    pub height: u32,
    pub handle: Handle,
}

impl Preview {
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            handle: Handle::from_rgba(width, height, pixels),
        }
    }
}

/// Load a preview for the file at `path`, no larger than `max_side` on either edge
pub async fn load_preview(path: PathBuf, max_side: u32) -> Result<Preview> {
    let bytes = tokio::fs::read(&path).await?;

    // Spawn blocking task for CPU-bound work
    let preview = tokio::task::spawn_blocking(move || decode_scaled(&bytes, max_side)).await??;

    tracing::debug!(
        "Generated preview {}x{} for {}",
        preview.width,
        preview.height,
        path.display()
    );
    Ok(preview)
}

/// Decode image bytes and downscale so neither edge exceeds `max_side`
pub fn decode_scaled(bytes: &[u8], max_side: u32) -> Result<Preview> {
    let img = image::load_from_memory(bytes)?;

    let img = if img.width() > max_side || img.height() > max_side {
        img.resize(max_side, max_side, FilterType::Lanczos3)
    } else {
        img
    };

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Preview::from_rgba(width, height, rgba.into_raw()))
}

#[cfg(test)]
pub(crate) fn encoded_png(width: u32, height: u32) -> Vec<u8> {
    let buffer = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
    let mut bytes = std::io::Cursor::new(Vec::new());
    buffer
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}
