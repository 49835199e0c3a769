use std::path::PathBuf;

use eframe_sprite::error::{GuiError, GuiResult};
use eframe_sprite::event_loop::{IdleFlags, IdleHost, display_switch_in, run_idle};
use eframe_sprite::screen::{Flip, PixelRect};

#[derive(Default)]
struct FakeHost {
    menu_ready: bool,
    rebuilds: usize,
    refreshes: usize,
    dropped: Vec<PathBuf>,
    opened: Vec<PathBuf>,
    recording_fails: bool,
    recording_polls: usize,
    flips: usize,
    /// Order the steps ran in
    trace: Vec<&'static str>,
}

impl IdleHost for FakeHost {
    fn rebuild_recent_list(&mut self) -> bool {
        self.trace.push("recent");
        self.rebuilds += 1;
        self.menu_ready
    }

    fn refresh_screen(&mut self) {
        self.trace.push("refresh");
        self.refreshes += 1;
    }

    fn take_dropped_files(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.dropped)
    }

    fn open_dropped(&mut self, path: PathBuf) -> GuiResult<()> {
        self.trace.push("drop");
        if path.extension().is_some_and(|ext| ext == "txt") {
            return Err(GuiError::WidgetFileNotFound(path.display().to_string()));
        }
        self.opened.push(path);
        Ok(())
    }

    fn poll_recording(&mut self) -> GuiResult<()> {
        self.trace.push("record");
        self.recording_polls += 1;
        if self.recording_fails {
            return Err(GuiError::Io(std::io::Error::other("disk full")));
        }
        Ok(())
    }

    fn flip(&mut self) -> Option<Flip> {
        self.trace.push("flip");
        self.flips += 1;
        Some(Flip::Dirty(PixelRect::new(0, 0, 4, 4)))
    }
}

#[test]
fn test_flags_are_shared_between_clones() {
    let flags = IdleFlags::new();
    let other = flags.clone();
    other.set(IdleFlags::REFRESH_FULL_SCREEN);
    assert!(flags.contains(IdleFlags::REFRESH_FULL_SCREEN));
    assert!(!flags.contains(IdleFlags::REFRESH_FULL_SCREEN | IdleFlags::REBUILD_RECENT_LIST));

    flags.clear(IdleFlags::REFRESH_FULL_SCREEN);
    assert_eq!(other.bits(), 0);
}

#[test]
fn test_refresh_runs_exactly_once() {
    let flags = IdleFlags::new();
    display_switch_in(&flags);
    let mut host = FakeHost::default();

    let report = run_idle(&flags, &mut host);
    assert!(report.refreshed_screen);
    assert!(!flags.contains(IdleFlags::REFRESH_FULL_SCREEN));

    let report = run_idle(&flags, &mut host);
    assert!(!report.refreshed_screen);
    assert_eq!(host.refreshes, 1);
}

#[test]
fn test_recent_list_retried_until_menu_exists() {
    let flags = IdleFlags::new();
    flags.set(IdleFlags::REBUILD_RECENT_LIST);
    let mut host = FakeHost::default();

    let report = run_idle(&flags, &mut host);
    assert!(!report.rebuilt_recent_list);
    assert!(flags.contains(IdleFlags::REBUILD_RECENT_LIST));

    host.menu_ready = true;
    let report = run_idle(&flags, &mut host);
    assert!(report.rebuilt_recent_list);
    assert!(!flags.contains(IdleFlags::REBUILD_RECENT_LIST));

    run_idle(&flags, &mut host);
    assert_eq!(host.rebuilds, 2);
}

#[test]
fn test_steps_run_in_order() {
    let flags = IdleFlags::new();
    flags.set(IdleFlags::REBUILD_RECENT_LIST | IdleFlags::REFRESH_FULL_SCREEN);
    let mut host = FakeHost {
        menu_ready: true,
        dropped: vec![PathBuf::from("a.png")],
        ..Default::default()
    };

    let report = run_idle(&flags, &mut host);
    assert_eq!(host.trace, ["recent", "refresh", "drop", "record", "flip"]);
    assert_eq!(report.flip, Some(Flip::Dirty(PixelRect::new(0, 0, 4, 4))));
}

#[test]
fn test_failing_steps_do_not_stop_the_pass() {
    let flags = IdleFlags::new();
    let mut host = FakeHost {
        dropped: vec![
            PathBuf::from("notes.txt"),
            PathBuf::from("hero.png"),
        ],
        recording_fails: true,
        ..Default::default()
    };

    let report = run_idle(&flags, &mut host);
    assert_eq!(report.opened_files, 1);
    assert_eq!(host.opened, [PathBuf::from("hero.png")]);
    assert_eq!(host.recording_polls, 1);
    assert_eq!(host.flips, 1);
}
