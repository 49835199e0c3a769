use std::path::Path;

use eframe_sprite::event_loop::IdleFlags;
use eframe_sprite::file_handler::{FileLoad, LoadEvent, is_image_file};
use eframe_sprite::layout::LayoutDirs;
use eframe_sprite::recorder::ScreenRecorder;
use eframe_sprite::{EditorContext, MonitorScheduler};
use futures::channel::mpsc;

fn write_png(path: &Path, width: u32, height: u32) {
    let image = image::RgbaImage::from_fn(width, height, |x, _| {
        if x % 2 == 0 {
            image::Rgba([255, 0, 0, 255])
        } else {
            image::Rgba([0, 0, 255, 255])
        }
    });
    image.save(path).unwrap();
}

/// Ticks until every monitor is gone.
fn run_to_completion(monitors: &mut MonitorScheduler) -> usize {
    let mut ticks = 0;
    while !monitors.is_empty() {
        let timer = monitors.timer_id().unwrap();
        monitors.on_timer(timer);
        ticks += 1;
        assert!(ticks < 1000, "load never finished");
    }
    ticks
}

#[test]
fn test_load_reports_progress_then_sprite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stripes.png");
    write_png(&path, 16, 8);

    let (tx, mut rx) = mpsc::unbounded();
    let mut monitors = MonitorScheduler::default();
    monitors.add_monitor(Box::new(FileLoad::new(&path, tx).with_chunk_size(32)));
    let ticks = run_to_completion(&mut monitors);
    assert!(ticks > 1);
    assert!(!monitors.is_timer_running());

    let mut progress = Vec::new();
    let mut loaded = None;
    while let Ok(Some(event)) = rx.try_next() {
        match event {
            LoadEvent::Progress { fraction, .. } => progress.push(fraction),
            LoadEvent::Loaded(sprite) => loaded = Some(sprite),
            LoadEvent::Failed { error, .. } => panic!("load failed: {}", error),
        }
    }

    assert_eq!(progress.len(), ticks - 1);
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(progress.last().copied(), Some(1.0));

    let sprite = loaded.unwrap();
    assert_eq!((sprite.width, sprite.height), (16, 8));
    assert_eq!(sprite.palette.colors().len(), 2);
    assert_eq!(sprite.path.as_deref(), Some(path.as_path()));
}

#[test]
fn test_missing_file_fails_and_removes_monitor() {
    let dir = tempfile::tempdir().unwrap();
    let (tx, mut rx) = mpsc::unbounded();
    let mut monitors = MonitorScheduler::default();
    monitors.add_monitor(Box::new(FileLoad::new(dir.path().join("gone.png"), tx)));

    assert_eq!(run_to_completion(&mut monitors), 1);
    assert!(matches!(rx.try_next(), Ok(Some(LoadEvent::Failed { .. }))));
}

#[test]
fn test_undecodable_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fake.png");
    std::fs::write(&path, b"definitely not a png").unwrap();

    let (tx, mut rx) = mpsc::unbounded();
    let mut monitors = MonitorScheduler::default();
    monitors.add_monitor(Box::new(FileLoad::new(&path, tx)));
    run_to_completion(&mut monitors);

    let mut failed = false;
    while let Ok(Some(event)) = rx.try_next() {
        failed |= matches!(event, LoadEvent::Failed { .. });
    }
    assert!(failed);
}

#[test]
fn test_editor_opens_file_in_background() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hero.png");
    write_png(&path, 4, 4);

    let mut editor = EditorContext::new(LayoutDirs::default(), ScreenRecorder::new(dir.path()));
    let mut monitors = MonitorScheduler::default();
    let idle = IdleFlags::new();

    editor.open_file(&path, &mut monitors);
    assert_eq!(editor.status.progress(), Some(0.0));
    run_to_completion(&mut monitors);

    assert!(editor.drain_loads(&idle) >= 2);
    assert!(editor.sprite.is_some());
    assert_eq!(editor.status.progress(), None);
    assert_eq!(editor.status.text(), "hero.png loaded");
    assert_eq!(editor.recent.files(), [path.clone()]);
    assert!(idle.contains(IdleFlags::REBUILD_RECENT_LIST | IdleFlags::REFRESH_FULL_SCREEN));
}

#[test]
fn test_image_extensions() {
    assert!(is_image_file(Path::new("a/b/sprite.PNG")));
    assert!(is_image_file(Path::new("walk.gif")));
    assert!(!is_image_file(Path::new("notes.txt")));
    assert!(!is_image_file(Path::new("README")));
}
