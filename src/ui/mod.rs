/// View layer
///
/// - `upload.rs` - the upload form
/// - `grid.rs` - search bar and image grid
/// - `toast.rs` - notification stack

pub mod grid;
pub mod toast;
pub mod upload;
