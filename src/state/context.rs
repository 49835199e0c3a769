use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use std::path::Path;

use crate::command::CommandHistory;
use crate::document::{Palette, Sprite};
use crate::event_loop::IdleFlags;
use crate::file_handler::{self, LoadEvent};
use crate::layout::LayoutDirs;
use crate::monitor::{MonitorHandle, MonitorScheduler};
use crate::panels::{ModalDialog, StatusBar};
use crate::recent::RecentFiles;
use crate::recorder::ScreenRecorder;
use crate::screen::{self, ScreenBuffer};
use crate::tools::ToolRegistry;

/// Everything commands operate on: the open sprite, its undo history, the
/// tools, the screen and the windows on top of it.
pub struct EditorContext {
    pub sprite: Option<Sprite>,
    pub history: CommandHistory,
    pub tools: ToolRegistry,
    pub status: StatusBar,
    /// Open modal dialogs, front-most last
    pub dialogs: Vec<ModalDialog>,
    pub recent: RecentFiles,
    pub recorder: ScreenRecorder,
    pub layouts: LayoutDirs,
    pub screen: ScreenBuffer,
    /// Palette the screen is currently drawn with
    pub palette: Palette,
    pub exit_requested: bool,
    load_tx: UnboundedSender<LoadEvent>,
    load_rx: UnboundedReceiver<LoadEvent>,
}

impl std::fmt::Debug for EditorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorContext")
            .field("sprite", &self.sprite.as_ref().map(Sprite::title))
            .field("history", &self.history)
            .field("dialogs", &self.dialogs.len())
            .field("screen", &self.screen)
            .finish()
    }
}

impl EditorContext {
    pub fn new(layouts: LayoutDirs, recorder: ScreenRecorder) -> Self {
        let (load_tx, load_rx) = mpsc::unbounded();
        Self {
            sprite: None,
            history: CommandHistory::new(),
            tools: ToolRegistry::builtin(),
            status: StatusBar::default(),
            dialogs: Vec::new(),
            recent: RecentFiles::new(),
            recorder,
            layouts,
            screen: ScreenBuffer::default(),
            palette: Palette::default(),
            exit_requested: false,
            load_tx,
            load_rx,
        }
    }

    pub fn has_modal(&self) -> bool {
        !self.dialogs.is_empty()
    }

    /// Starts loading `path` in the background.
    pub fn open_file(&mut self, path: &Path, monitors: &mut MonitorScheduler) -> MonitorHandle {
        self.status.set_text(format!("Loading {}...", path.display()));
        self.status.set_progress(0.0);
        file_handler::start_file_load(path, monitors, self.load_tx.clone())
    }

    /// Applies the events sent by background loads since the last call.
    /// Returns how many were handled.
    pub fn drain_loads(&mut self, idle: &IdleFlags) -> usize {
        let mut handled = 0;
        while let Ok(Some(event)) = self.load_rx.try_next() {
            handled += 1;
            match event {
                LoadEvent::Progress { fraction, .. } => self.status.set_progress(fraction),
                LoadEvent::Loaded(sprite) => {
                    self.status.clear_progress();
                    self.status.set_text(format!("{} loaded", sprite.title()));
                    self.set_sprite(*sprite, idle);
                }
                LoadEvent::Failed { path, error } => {
                    self.status.clear_progress();
                    self.status
                        .set_text(format!("Error loading {}: {}", path.display(), error));
                }
            }
        }
        handled
    }

    /// Makes `sprite` the edited sprite, dropping the undo history of the
    /// previous one.
    pub fn set_sprite(&mut self, sprite: Sprite, idle: &IdleFlags) {
        if let Some(path) = &sprite.path {
            self.recent.push(path);
            idle.set(IdleFlags::REBUILD_RECENT_LIST);
        }
        self.history.clear();
        self.sprite = Some(sprite);
        idle.set(IdleFlags::REFRESH_FULL_SCREEN);
    }

    /// Fits the screen to the canvas. A reallocated screen is blank, so a full
    /// refresh is scheduled.
    pub fn resize_screen(&mut self, physical: [usize; 2], scale: usize, idle: &IdleFlags) -> bool {
        let resized = self.screen.resize(physical, scale);
        if resized {
            idle.set(IdleFlags::REFRESH_FULL_SCREEN);
        }
        resized
    }

    /// Redraws the screen after the sprite changed.
    pub fn sprite_changed(&mut self) -> bool {
        screen::update_screen_for_sprite(self.sprite.as_ref(), &mut self.palette, &mut self.screen)
    }

    /// Full redraw: re-selects the sprite palette (or the default one) and
    /// repaints everything.
    pub fn refresh_screen(&mut self) {
        self.palette = self
            .sprite
            .as_ref()
            .map(|s| s.palette.clone())
            .unwrap_or_default();
        self.screen.clear();
        if let Some(sprite) = &self.sprite {
            self.screen.draw_sprite(sprite);
        }
    }
}
