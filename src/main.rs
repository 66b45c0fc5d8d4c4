use iced::widget::{column, container, row, text};
use iced::{event, time, window, Element, Event, Length, Subscription, Task, Theme};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::{Duration, Instant};

mod backend;
mod config;
mod error;
mod logging;
mod media;
mod state;
mod ui;

use backend::Remote;
use config::GalleryConfig;
use error::GalleryError;
use media::preview::Preview;
use state::data::ImageRecord;
use state::gallery::Gallery;
use state::notify::{Notification, Toasts};
use state::upload::{PreviewRequest, UploadForm};

/// Main application state
struct ImageGallery {
    config: GalleryConfig,
    /// None when the configured backend could not be opened
    remote: Option<Remote>,
    gallery: Gallery,
    form: UploadForm,
    toasts: Toasts,
    /// Decoded grid thumbnails by image id
    thumbnails: HashMap<String, Preview>,
    thumbnails_pending: HashSet<String>,
    /// Ids whose thumbnail could not be loaded; retried on refresh
    thumbnails_failed: HashSet<String>,
    /// Uploads in flight
    uploading: usize,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Initial load or refresh completed
    ImagesFetched(Result<Vec<ImageRecord>, GalleryError>),
    /// User clicked "Refresh"
    Refresh,
    SearchChanged(String),
    /// User clicked a card's delete button
    DeleteRequested(String),
    ImageDeleted(String, Result<String, GalleryError>),
    ThumbnailLoaded(String, Result<Preview, GalleryError>),

    NameChanged(String),
    TitleChanged(String),
    KeywordsChanged(String),
    /// User clicked "Select Image"
    PickFile,
    FilePicked(Option<PathBuf>),
    FileHovered,
    FilesHoveredLeft,
    FileDropped(PathBuf),
    PreviewLoaded(u64, Result<Preview, GalleryError>),
    Submit,
    Uploaded(Result<ImageRecord, GalleryError>),

    DismissToast(u64),
    Tick(Instant),
}

impl ImageGallery {
    /// Create the application and start the initial fetch
    fn new(config: GalleryConfig) -> (Self, Task<Message>) {
        let mut toasts = Toasts::new(Duration::from_secs(config.ui.toast_secs));

        let remote = match backend::open_backend(&config) {
            Ok(backend) => Some(Remote::new(backend, config.network.timeout())),
            Err(e) => {
                tracing::error!("Could not open {:?} backend: {}", config.backend.kind, e);
                toasts.push(
                    Notification::destructive("Storage unavailable", e.user_message()),
                    Instant::now(),
                );
                None
            }
        };

        let app = ImageGallery::with_remote(config, remote, toasts);

        if let Some(remote) = &app.remote {
            tracing::info!("Image Gallery started with {} backend", remote.backend_tag());
        }
        let fetch = app.fetch_images();
        (app, fetch)
    }

    fn with_remote(config: GalleryConfig, remote: Option<Remote>, toasts: Toasts) -> Self {
        ImageGallery {
            config,
            remote,
            gallery: Gallery::new(),
            form: UploadForm::new(),
            toasts,
            thumbnails: HashMap::new(),
            thumbnails_pending: HashSet::new(),
            thumbnails_failed: HashSet::new(),
            uploading: 0,
        }
    }

    fn notify(&mut self, notification: Notification) {
        if notification.is_destructive() {
            tracing::warn!("{}: {}", notification.title, notification.description);
        }
        self.toasts.push(notification, Instant::now());
    }

    fn remote_or_notify(&mut self) -> Option<Remote> {
        if self.remote.is_none() {
            self.notify(Notification::destructive(
                "Storage unavailable",
                "Check the backend section of the configuration file.",
            ));
        }
        self.remote.clone()
    }

    fn fetch_images(&self) -> Task<Message> {
        match self.remote.clone() {
            Some(remote) => Task::perform(remote.list(), Message::ImagesFetched),
            None => Task::none(),
        }
    }

    fn load_preview(&self, request: PreviewRequest) -> Task<Message> {
        let generation = request.generation;
        Task::perform(
            media::preview::load_preview(request.path, self.config.ui.preview_size),
            move |result| Message::PreviewLoaded(generation, result),
        )
    }

    /// Start thumbnail loads for every record that has none yet
    fn request_thumbnails(&mut self) -> Task<Message> {
        let Some(remote) = self.remote.clone() else {
            return Task::none();
        };
        let cache_dir = self.config.thumbnail_cache_dir();
        let size = self.config.ui.thumbnail_size;

        let mut tasks = Vec::new();
        for record in self.gallery.images() {
            if self.thumbnails.contains_key(&record.id)
                || self.thumbnails_pending.contains(&record.id)
                || self.thumbnails_failed.contains(&record.id)
            {
                continue;
            }
            self.thumbnails_pending.insert(record.id.clone());

            let id = record.id.clone();
            tasks.push(Task::perform(
                media::thumbnail::load_thumbnail(
                    remote.clone(),
                    cache_dir.clone(),
                    record.id.clone(),
                    record.url.clone(),
                    size,
                ),
                move |result| Message::ThumbnailLoaded(id.clone(), result),
            ));
        }
        Task::batch(tasks)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ImagesFetched(result) => {
                if let Some(notification) = self.gallery.on_fetched(result) {
                    self.notify(notification);
                }
                self.request_thumbnails()
            }
            Message::Refresh => {
                if self.remote_or_notify().is_none() {
                    return Task::none();
                }
                self.thumbnails_failed.clear();
                self.fetch_images()
            }
            Message::SearchChanged(query) => {
                self.gallery.set_query(query);
                Task::none()
            }
            Message::DeleteRequested(id) => {
                let Some(remote) = self.remote_or_notify() else {
                    return Task::none();
                };
                match self.gallery.begin_delete(&id) {
                    Some(record) => Task::perform(remote.delete(record), move |result| {
                        Message::ImageDeleted(id.clone(), result)
                    }),
                    None => Task::none(),
                }
            }
            Message::ImageDeleted(id, result) => {
                let deleted = result.is_ok();
                let notification = self.gallery.on_deleted(&id, result);
                if deleted {
                    self.thumbnails.remove(&id);
                    self.thumbnails_failed.remove(&id);
                    media::thumbnail::evict(&self.config.thumbnail_cache_dir(), &id);
                }
                self.notify(notification);
                Task::none()
            }
            Message::ThumbnailLoaded(id, result) => {
                self.thumbnails_pending.remove(&id);
                match result {
                    Ok(preview) => {
                        self.thumbnails.insert(id, preview);
                    }
                    Err(e) => {
                        tracing::warn!("Thumbnail for {} failed: {}", id, e);
                        self.thumbnails_failed.insert(id);
                    }
                }
                Task::none()
            }

            Message::NameChanged(name) => {
                self.form.set_name(name);
                Task::none()
            }
            Message::TitleChanged(title) => {
                self.form.set_title(title);
                Task::none()
            }
            Message::KeywordsChanged(keywords) => {
                self.form.set_keywords(keywords);
                Task::none()
            }
            Message::PickFile => Task::perform(
                async {
                    rfd::AsyncFileDialog::new()
                        .set_title("Select Image")
                        .add_filter("Images", media::IMAGE_EXTENSIONS)
                        .pick_file()
                        .await
                        .map(|handle| handle.path().to_path_buf())
                },
                Message::FilePicked,
            ),
            Message::FilePicked(Some(path)) => {
                let request = self.form.select_file(path);
                self.load_preview(request)
            }
            Message::FilePicked(None) => Task::none(),
            Message::FileHovered => {
                self.form.drag_entered();
                Task::none()
            }
            Message::FilesHoveredLeft => {
                self.form.drag_left();
                Task::none()
            }
            Message::FileDropped(path) => match self.form.drop_file(path) {
                Ok(request) => self.load_preview(request),
                Err(notification) => {
                    self.notify(notification);
                    Task::none()
                }
            },
            Message::PreviewLoaded(generation, result) => {
                self.form.preview_loaded(generation, result);
                Task::none()
            }
            Message::Submit => {
                // The form is only consumed once a backend is available
                let Some(remote) = self.remote_or_notify() else {
                    return Task::none();
                };
                let Some(submission) = self.form.submit() else {
                    return Task::none();
                };
                self.uploading += 1;
                Task::perform(remote.upload(submission), Message::Uploaded)
            }
            Message::Uploaded(result) => {
                self.uploading = self.uploading.saturating_sub(1);
                let notification = self.gallery.on_uploaded(result);
                self.notify(notification);
                self.request_thumbnails()
            }

            Message::DismissToast(id) => {
                self.toasts.dismiss(id);
                Task::none()
            }
            Message::Tick(now) => {
                self.toasts.prune(now);
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let header = column![
            text("Image Gallery").size(40),
            text("Upload and organize your images with ease").size(16),
        ]
        .spacing(6);

        let body = row![
            ui::upload::view(&self.form, self.uploading),
            ui::grid::view(&self.gallery, &self.thumbnails, &self.thumbnails_failed),
        ]
        .spacing(32)
        .height(Length::Fill);

        let content = column![header, body, ui::toast::view(&self.toasts)]
            .spacing(24)
            .padding(32);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let drops = event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileHovered(_)) => Some(Message::FileHovered),
            Event::Window(window::Event::FilesHoveredLeft) => Some(Message::FilesHoveredLeft),
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            _ => None,
        });

        if self.toasts.is_empty() {
            drops
        } else {
            Subscription::batch([
                drops,
                time::every(Duration::from_millis(500)).map(Message::Tick),
            ])
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    logging::init_logging();

    let config = GalleryConfig::load().unwrap_or_else(|e| {
        tracing::error!("Falling back to default configuration: {}", e);
        GalleryConfig::default()
    });

    // Write the defaults on first start so there is a file to edit
    let config_path = GalleryConfig::config_path();
    if !config_path.exists() {
        if let Err(e) = config.save_to(&config_path) {
            tracing::warn!("Could not write {}: {}", config_path.display(), e);
        }
    }

    iced::application("Image Gallery", ImageGallery::update, ImageGallery::view)
        .subscription(ImageGallery::subscription)
        .theme(ImageGallery::theme)
        .window_size((1280.0, 860.0))
        .centered()
        .run_with(move || ImageGallery::new(config))
}
