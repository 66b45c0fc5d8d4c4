/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The canonical image list and its search view (gallery.rs, filter.rs)
/// - The upload form (upload.rs)
/// - Toast notifications (notify.rs)

pub mod data;
pub mod filter;
pub mod gallery;
pub mod notify;
pub mod upload;
