//! Deferred work performed once per main-loop iteration.
//!
//! Commands and background loads do not touch the menus or the screen
//! directly. They raise [`IdleFlags`] bits instead, and [`run_idle`] services
//! them after input has been processed.
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::GuiResult;
use crate::screen::Flip;

/// Process-wide set of pending idle work, shared between the UI and whoever
/// schedules work for it.
#[derive(Debug, Clone, Default)]
pub struct IdleFlags(Arc<AtomicU32>);

impl IdleFlags {
    /// Rebuild the "recent files" menu.
    pub const REBUILD_RECENT_LIST: u32 = 2;
    /// Redraw the whole screen.
    pub const REFRESH_FULL_SCREEN: u32 = 4;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, bits: u32) {
        self.0.fetch_or(bits, Ordering::SeqCst);
    }

    pub fn clear(&self, bits: u32) {
        self.0.fetch_and(!bits, Ordering::SeqCst);
    }

    pub fn contains(&self, bits: u32) -> bool {
        self.0.load(Ordering::SeqCst) & bits == bits
    }

    pub fn bits(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }
}

/// The window came back to the foreground: everything gets redrawn.
pub fn display_switch_in(flags: &IdleFlags) {
    flags.set(IdleFlags::REFRESH_FULL_SCREEN);
}

/// What the idle pass needs from the application.
pub trait IdleHost {
    /// Rebuilds the recent-files menu. Returns false if the menu does not
    /// exist yet, in which case the request stays pending.
    fn rebuild_recent_list(&mut self) -> bool;

    /// Redraws every widget.
    fn refresh_screen(&mut self);

    /// Files dropped onto the window since the last pass.
    fn take_dropped_files(&mut self) -> Vec<PathBuf>;

    fn open_dropped(&mut self, path: PathBuf) -> GuiResult<()>;

    /// Services pending screenshots and screen recording.
    fn poll_recording(&mut self) -> GuiResult<()>;

    /// Pushes the back buffer to the display.
    fn flip(&mut self) -> Option<Flip>;
}

/// What one idle pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IterationReport {
    pub rebuilt_recent_list: bool,
    pub refreshed_screen: bool,
    pub opened_files: usize,
    pub flip: Option<Flip>,
}

/// Runs the per-iteration steps in order: idle flags, dropped files,
/// recording, flip. A failing step is logged and does not stop later ones.
pub fn run_idle(flags: &IdleFlags, host: &mut dyn IdleHost) -> IterationReport {
    let mut report = IterationReport::default();

    if flags.contains(IdleFlags::REBUILD_RECENT_LIST) && host.rebuild_recent_list() {
        flags.clear(IdleFlags::REBUILD_RECENT_LIST);
        report.rebuilt_recent_list = true;
    }

    if flags.contains(IdleFlags::REFRESH_FULL_SCREEN) {
        flags.clear(IdleFlags::REFRESH_FULL_SCREEN);
        host.refresh_screen();
        report.refreshed_screen = true;
    }

    for path in host.take_dropped_files() {
        log::info!("Opening dropped file: {}", path.display());
        match host.open_dropped(path) {
            Ok(()) => report.opened_files += 1,
            Err(err) => log::error!("Failed to open dropped file: {}", err),
        }
    }

    if let Err(err) = host.poll_recording() {
        log::error!("Screen recording failed: {}", err);
    }

    report.flip = host.flip();
    report
}
