use egui::ColorImage;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::GuiResult;
use crate::util::time;

/// Time between two recorded frames.
pub const RECORD_INTERVAL: Duration = Duration::from_millis(1000 / 12);

/// Writes screenshots and screen recordings as PNG files.
#[derive(Debug)]
pub struct ScreenRecorder {
    dir: PathBuf,
    screenshot_pending: bool,
    recording: bool,
    last_frame: Option<Instant>,
    frames: usize,
}

impl ScreenRecorder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            screenshot_pending: false,
            recording: false,
            last_frame: None,
            frames: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Captures the screen on the next [`poll`](Self::poll).
    pub fn request_screenshot(&mut self) {
        self.screenshot_pending = true;
    }

    /// Starts or stops recording. Returns whether it is now recording.
    pub fn toggle_recording(&mut self) -> bool {
        self.recording = !self.recording;
        self.last_frame = None;
        log::info!("Screen recording {}", if self.recording { "started" } else { "stopped" });
        self.recording
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn is_idle(&self) -> bool {
        !self.recording && !self.screenshot_pending
    }

    /// Frames written since the recorder was created.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Writes a pending screenshot, and a recording frame when one is due.
    /// Returns the files written.
    pub fn poll(&mut self, screen: &ColorImage, now: Instant) -> GuiResult<Vec<PathBuf>> {
        let mut written = Vec::new();

        if self.screenshot_pending {
            self.screenshot_pending = false;
            written.push(self.write_frame(screen, "shot")?);
        }

        if self.recording
            && self
                .last_frame
                .is_none_or(|last| now.duration_since(last) >= RECORD_INTERVAL)
        {
            self.last_frame = Some(now);
            written.push(self.write_frame(screen, "rec")?);
        }

        Ok(written)
    }

    fn write_frame(&mut self, screen: &ColorImage, prefix: &str) -> GuiResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!(
            "{}{}-{:04}.png",
            prefix,
            time::timestamp_millis(),
            self.frames
        ));

        let [w, h] = screen.size;
        let raw: Vec<u8> = screen
            .pixels
            .iter()
            .flat_map(|p| p.to_srgba_unmultiplied())
            .collect();
        let buffer = image::RgbaImage::from_raw(w as u32, h as u32, raw).ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, "screen buffer size mismatch")
        })?;
        buffer.save(&path)?;

        self.frames += 1;
        log::debug!("Wrote {}", path.display());
        Ok(path)
    }
}
