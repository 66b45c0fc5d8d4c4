/// Upload form state
///
/// Holds the metadata fields, the selected file and its preview, and the
/// drag-over flag. The form never talks to a backend itself: a valid
/// `submit` hands back a `Submission` and clears the form.
use std::path::PathBuf;

use super::data::{ImageMetadata, SelectedFile, Submission};
use super::notify::Notification;
use crate::error::Result;
use crate::media::preview::Preview;

/// Split the raw keywords field on commas and trim each piece.
/// Empty pieces are kept: "red,,blue" gives ["red", "", "blue"].
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',').map(|k| k.trim().to_string()).collect()
}

/// Ask the caller to decode a preview for `path`.
/// The result must be passed back with the same `generation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRequest {
    pub generation: u64,
    pub path: PathBuf,
}

#[derive(Debug, Default)]
pub struct UploadForm {
    name: String,
    title: String,
    keywords: String,
    file: Option<SelectedFile>,
    preview: Option<Preview>,
    /// Bumped on every selection or reset so late previews can be discarded
    preview_generation: u64,
    drag_active: bool,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn keywords(&self) -> &str {
        &self.keywords
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub fn set_keywords(&mut self, keywords: String) {
        self.keywords = keywords;
    }

    pub fn drag_entered(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_left(&mut self) {
        self.drag_active = false;
    }

    /// File chosen through the picker. The picker only offers images,
    /// so the content type is not checked again.
    pub fn select_file(&mut self, path: PathBuf) -> PreviewRequest {
        self.replace_file(SelectedFile::from_path(path))
    }

    /// File dropped onto the form. Non-images are rejected with a notification
    /// and leave the current selection untouched.
    pub fn drop_file(
        &mut self,
        path: PathBuf,
    ) -> std::result::Result<PreviewRequest, Notification> {
        self.drag_active = false;

        let file = SelectedFile::from_path(path);
        if !file.is_image() {
            tracing::warn!("Rejected dropped file {:?} ({:?})", file.path, file.content_type);
            return Err(Notification::destructive(
                "Invalid file",
                "Please upload an image file.",
            ));
        }

        Ok(self.replace_file(file))
    }

    fn replace_file(&mut self, file: SelectedFile) -> PreviewRequest {
        self.preview_generation += 1;
        self.preview = None;

        let request = PreviewRequest {
            generation: self.preview_generation,
            path: file.path.clone(),
        };
        self.file = Some(file);
        request
    }

    /// Apply a finished preview. Returns false when it belongs to an
    /// earlier selection and was discarded.
    pub fn preview_loaded(&mut self, generation: u64, result: Result<Preview>) -> bool {
        if generation != self.preview_generation {
            tracing::debug!(
                "Discarding stale preview {} (current {})",
                generation,
                self.preview_generation
            );
            return false;
        }

        match result {
            Ok(preview) => self.preview = Some(preview),
            Err(e) => {
                tracing::warn!("Preview generation failed: {}", e);
                self.preview = None;
            }
        }
        true
    }

    /// Validate and take the submission. Leaves the form untouched when
    /// the name, the title or the file is missing.
    pub fn submit(&mut self) -> Option<Submission> {
        if self.name.is_empty() || self.title.is_empty() {
            return None;
        }
        let file = self.file.clone()?;

        let submission = Submission {
            file,
            metadata: ImageMetadata {
                name: self.name.clone(),
                title: self.title.clone(),
                keywords: parse_keywords(&self.keywords),
            },
        };

        self.reset();
        Some(submission)
    }

    fn reset(&mut self) {
        self.name.clear();
        self.title.clear();
        self.keywords.clear();
        self.file = None;
        self.preview = None;
        self.preview_generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GalleryError;

    fn tiny_preview() -> Preview {
        Preview::from_rgba(1, 1, vec![255, 0, 0, 255])
    }

    fn filled_form() -> UploadForm {
        let mut form = UploadForm::new();
        form.set_name("sunset".to_string());
        form.set_title("Sunset over the bay".to_string());
        form.set_keywords("sky, sea".to_string());
        form.select_file(PathBuf::from("/photos/sunset.jpg"));
        form
    }

    #[test]
    fn test_parse_keywords_trims() {
        assert_eq!(parse_keywords("red, blue ,  green"), vec!["red", "blue", "green"]);
    }

    #[test]
    fn test_parse_keywords_keeps_empty_entries() {
        assert_eq!(parse_keywords("red,,blue"), vec!["red", "", "blue"]);
        assert_eq!(parse_keywords(""), vec![""]);
    }

    #[test]
    fn test_valid_submit_emits_once_and_resets() {
        let mut form = filled_form();

        let submission = form.submit().expect("form is valid");
        assert_eq!(submission.metadata.name, "sunset");
        assert_eq!(submission.metadata.keywords, vec!["sky", "sea"]);
        assert_eq!(submission.file.file_name, "sunset.jpg");

        assert_eq!(form.name(), "");
        assert_eq!(form.title(), "");
        assert_eq!(form.keywords(), "");
        assert!(form.file().is_none());
        assert!(form.preview().is_none());

        assert!(form.submit().is_none());
    }

    #[test]
    fn test_missing_fields_emit_nothing() {
        let mut no_name = filled_form();
        no_name.set_name(String::new());
        assert!(no_name.submit().is_none());
        assert_eq!(no_name.title(), "Sunset over the bay");
        assert!(no_name.file().is_some());

        let mut no_title = filled_form();
        no_title.set_title(String::new());
        assert!(no_title.submit().is_none());
        assert_eq!(no_title.name(), "sunset");

        let mut no_file = UploadForm::new();
        no_file.set_name("a".to_string());
        no_file.set_title("b".to_string());
        assert!(no_file.submit().is_none());
        assert_eq!(no_file.name(), "a");
    }

    #[test]
    fn test_drop_rejects_non_images() {
        let mut form = filled_form();
        form.drag_entered();

        let err = form.drop_file(PathBuf::from("/docs/report.pdf")).unwrap_err();
        assert!(err.is_destructive());
        assert_eq!(err.title, "Invalid file");
        assert!(!form.is_drag_active());
        assert_eq!(form.file().unwrap().file_name, "sunset.jpg");
    }

    #[test]
    fn test_drop_and_picker_converge() {
        let mut form = UploadForm::new();
        form.drag_entered();
        let request = form.drop_file(PathBuf::from("/photos/cat.png")).unwrap();
        assert!(!form.is_drag_active());
        assert_eq!(request.path, PathBuf::from("/photos/cat.png"));
        assert_eq!(form.file().unwrap().content_type.as_deref(), Some("image/png"));

        assert!(form.preview_loaded(request.generation, Ok(tiny_preview())));
        assert!(form.preview().is_some());

        let next = form.select_file(PathBuf::from("/photos/dog.jpg"));
        assert!(form.preview().is_none());
        assert!(next.generation > request.generation);
    }

    #[test]
    fn test_drag_leave_clears_state() {
        let mut form = UploadForm::new();
        form.drag_entered();
        assert!(form.is_drag_active());
        form.drag_left();
        assert!(!form.is_drag_active());
    }

    #[test]
    fn test_stale_preview_is_discarded() {
        let mut form = UploadForm::new();
        let first = form.select_file(PathBuf::from("/photos/one.png"));
        let second = form.select_file(PathBuf::from("/photos/two.png"));

        assert!(!form.preview_loaded(first.generation, Ok(tiny_preview())));
        assert!(form.preview().is_none());

        assert!(form.preview_loaded(second.generation, Ok(tiny_preview())));
        assert!(form.preview().is_some());
    }

    #[test]
    fn test_preview_after_submit_is_discarded() {
        let mut form = UploadForm::new();
        form.set_name("n".to_string());
        form.set_title("t".to_string());
        let request = form.select_file(PathBuf::from("/photos/one.png"));
        assert!(form.submit().is_some());

        assert!(!form.preview_loaded(request.generation, Ok(tiny_preview())));
        assert!(form.preview().is_none());
    }

    #[test]
    fn test_failed_preview_keeps_file() {
        let mut form = UploadForm::new();
        let request = form.select_file(PathBuf::from("/photos/broken.png"));
        let applied = form.preview_loaded(
            request.generation,
            Err(GalleryError::ImageDecode("truncated".to_string())),
        );
        assert!(applied);
        assert!(form.preview().is_none());
        assert!(form.file().is_some());
    }
}
