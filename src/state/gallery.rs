/// The gallery: canonical image list, search query and the visible subset
///
/// All mutations happen on the UI thread when a backend task completes.
/// Every mutator recomputes the visible subset before returning, so the grid
/// never shows a result for an older list or an older query.
use std::collections::HashSet;

use super::data::ImageRecord;
use super::filter::filter_images;
use super::notify::Notification;
use crate::error::Result;

#[derive(Debug, Default)]
pub struct Gallery {
    /// Newest first
    images: Vec<ImageRecord>,
    query: String,
    visible: Vec<ImageRecord>,
    /// Ids with a delete request in flight
    deleting: HashSet<String>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn visible(&self) -> &[ImageRecord] {
        &self.visible
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn get(&self, id: &str) -> Option<&ImageRecord> {
        self.images.iter().find(|image| image.id == id)
    }

    pub fn is_deleting(&self, id: &str) -> bool {
        self.deleting.contains(id)
    }

    pub fn set_query(&mut self, query: String) {
        self.query = query;
        self.refilter();
    }

    fn refilter(&mut self) {
        self.visible = filter_images(&self.images, &self.query);
    }

    /// Apply the result of a full list fetch. On failure the current list is kept.
    pub fn on_fetched(&mut self, result: Result<Vec<ImageRecord>>) -> Option<Notification> {
        match result {
            Ok(images) => {
                self.images = images;
                self.deleting.retain(|id| self.images.iter().any(|image| &image.id == id));
                self.refilter();
                None
            }
            Err(e) => {
                tracing::error!("Error fetching images: {}", e);
                Some(Notification::destructive(
                    "Error fetching images",
                    "Please try again later.",
                ))
            }
        }
    }

    /// Apply the result of an upload. A new record goes to the front of the list.
    pub fn on_uploaded(&mut self, result: Result<ImageRecord>) -> Notification {
        match result {
            Ok(record) => {
                // A refresh may have raced the upload and already listed it
                self.images.retain(|image| image.id != record.id);
                self.images.insert(0, record);
                self.refilter();
                Notification::normal(
                    "Image uploaded successfully",
                    "Your image has been added to the gallery.",
                )
            }
            Err(e) => {
                tracing::error!("Error uploading image: {}", e);
                Notification::destructive("Error uploading image", "Please try again later.")
            }
        }
    }

    /// Mark a delete as in flight. Returns the record to delete, or None if
    /// the id is unknown or already being deleted.
    pub fn begin_delete(&mut self, id: &str) -> Option<ImageRecord> {
        if self.deleting.contains(id) {
            tracing::debug!("Delete of {} already in flight", id);
            return None;
        }
        let record = self.get(id)?.clone();
        self.deleting.insert(record.id.clone());
        Some(record)
    }

    /// Apply the result of a delete started with `begin_delete`
    pub fn on_deleted(&mut self, id: &str, result: Result<String>) -> Notification {
        self.deleting.remove(id);

        match result {
            Ok(deleted) => {
                self.images.retain(|image| image.id != deleted);
                self.refilter();
                Notification::normal(
                    "Image deleted",
                    "The image has been removed from the gallery.",
                )
            }
            Err(e) => {
                tracing::error!("Error deleting image {}: {}", id, e);
                Notification::destructive("Error deleting image", "Please try again later.")
            }
        }
    }
}
