use eframe::egui;
use futures::channel::mpsc::UnboundedSender;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::document::Sprite;
use crate::monitor::{Monitor, MonitorHandle, MonitorScheduler};

/// Bytes read per monitor tick.
pub const LOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Progress reported by a background file load.
#[derive(Debug)]
pub enum LoadEvent {
    Progress { path: PathBuf, fraction: f32 },
    Loaded(Box<Sprite>),
    Failed { path: PathBuf, error: String },
}

/// Reads a sprite file a chunk per tick, then decodes it and removes itself.
pub struct FileLoad {
    path: PathBuf,
    file: Option<File>,
    total: u64,
    bytes: Vec<u8>,
    chunk_size: usize,
    events: UnboundedSender<LoadEvent>,
}

impl FileLoad {
    pub fn new(path: impl Into<PathBuf>, events: UnboundedSender<LoadEvent>) -> Self {
        Self {
            path: path.into(),
            file: None,
            total: 0,
            bytes: Vec::new(),
            chunk_size: LOAD_CHUNK_SIZE,
            events,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    fn send(&self, event: LoadEvent) {
        if self.events.unbounded_send(event).is_err() {
            log::debug!("Load of {} finished after the receiver went away", self.path.display());
        }
    }

    fn fail(&self, error: impl std::fmt::Display) {
        log::error!("Failed to load {}: {}", self.path.display(), error);
        self.send(LoadEvent::Failed {
            path: self.path.clone(),
            error: error.to_string(),
        });
    }

    /// Reads the next chunk. `Ok(true)` at end of file.
    fn step(&mut self) -> std::io::Result<bool> {
        let file = match &mut self.file {
            Some(file) => file,
            None => {
                let file = File::open(&self.path)?;
                self.total = file.metadata()?.len();
                self.file.insert(file)
            }
        };

        let start = self.bytes.len();
        self.bytes.resize(start + self.chunk_size, 0);
        let read = file.read(&mut self.bytes[start..])?;
        self.bytes.truncate(start + read);
        Ok(read == 0)
    }
}

impl Monitor for FileLoad {
    fn poll(&mut self, handle: MonitorHandle, scheduler: &mut MonitorScheduler) {
        match self.step() {
            Ok(false) => {
                let fraction = if self.total == 0 {
                    1.0
                } else {
                    (self.bytes.len() as f64 / self.total as f64).min(1.0) as f32
                };
                self.send(LoadEvent::Progress {
                    path: self.path.clone(),
                    fraction,
                });
            }
            Ok(true) => {
                match Sprite::decode(&self.path, &self.bytes) {
                    Ok(sprite) => {
                        log::info!("Loaded {} ({} bytes)", self.path.display(), self.bytes.len());
                        self.send(LoadEvent::Loaded(Box::new(sprite)));
                    }
                    Err(err) => self.fail(err),
                }
                scheduler.remove_monitor(handle);
            }
            Err(err) => {
                self.fail(err);
                scheduler.remove_monitor(handle);
            }
        }
    }

    fn teardown(self: Box<Self>) {
        log::debug!("File load monitor for {} released", self.path.display());
    }
}

/// Registers a [`FileLoad`] monitor for `path`.
pub fn start_file_load(
    path: &Path,
    monitors: &mut MonitorScheduler,
    events: UnboundedSender<LoadEvent>,
) -> MonitorHandle {
    log::info!("Opening {}", path.display());
    monitors.add_monitor(Box::new(FileLoad::new(path, events)))
}

/// Check if a file is an image based on its extension
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" | "pcx" | "tga"))
}

/// Collects files dropped onto the window until the idle pass takes them.
#[derive(Debug, Default)]
pub struct FileDropHandler {
    pending: Vec<PathBuf>,
}

impl FileDropHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues any newly dropped image files. Returns how many were queued.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> usize {
        let before = self.pending.len();
        ctx.input(|i| {
            for file in &i.raw.dropped_files {
                match &file.path {
                    Some(path) if is_image_file(path) => self.pending.push(path.clone()),
                    Some(path) => {
                        log::warn!("Dropped file is not a supported type: {}", path.display())
                    }
                    None => log::warn!("Dropped file has no path: {}", file.name),
                }
            }
        });
        self.pending.len() - before
    }

    pub fn take(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.pending)
    }

    /// Preview files being dragged over the application
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order, TextStyle};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let text = ctx.input(|i| {
            let mut text = "Dropping files:\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                } else {
                    text += "\n(Path not available)";
                }
            }
            text
        });

        let painter =
            ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}
