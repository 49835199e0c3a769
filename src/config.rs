//! Sectioned key/value configuration store.
//!
//! Values are kept as strings and converted on access, so a hand-edited file
//! with a bad value degrades to the caller's default instead of failing to load.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GuiResult;

/// File name used inside the per-user storage directory.
pub const CONFIG_FILE_NAME: &str = "sprite.json";

/// Integer rectangle stored under a config key as `"x y w h"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl ConfigRect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigStore {
    sections: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the store from `path`. A missing file yields an empty store bound
    /// to the same path, so the first `save` creates it.
    pub fn load(path: impl AsRef<Path>) -> GuiResult<Self> {
        let path = path.as_ref();
        let mut store = if path.exists() {
            let json = fs::read_to_string(path)?;
            serde_json::from_str::<ConfigStore>(&json)?
        } else {
            log::info!("No config file at {}, using defaults", path.display());
            Self::default()
        };
        store.path = Some(path.to_path_buf());
        Ok(store)
    }

    /// Writes the store back to the path it was loaded from (no-op when the
    /// store was never bound to a file).
    pub fn save(&self) -> GuiResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::debug!("Config saved to {}", path.display());
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get_string(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|s| s.get(key))
            .map(String::as_str)
    }

    pub fn set_string(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.sections
            .entry(section.to_owned())
            .or_default()
            .insert(key.to_owned(), value.into());
    }

    pub fn remove(&mut self, section: &str, key: &str) {
        if let Some(s) = self.sections.get_mut(section) {
            s.remove(key);
        }
    }

    pub fn get_int(&self, section: &str, key: &str, default: i32) -> i32 {
        self.get_string(section, key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    pub fn set_int(&mut self, section: &str, key: &str, value: i32) {
        self.set_string(section, key, value.to_string());
    }

    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        match self.get_string(section, key).map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if matches!(v.as_str(), "yes" | "true" | "1" | "on") => true,
            Some(v) if matches!(v.as_str(), "no" | "false" | "0" | "off") => false,
            _ => default,
        }
    }

    pub fn set_bool(&mut self, section: &str, key: &str, value: bool) {
        self.set_string(section, key, if value { "yes" } else { "no" });
    }

    pub fn get_rect(&self, section: &str, key: &str) -> Option<ConfigRect> {
        let value = self.get_string(section, key)?;
        let parts: Vec<i32> = value
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<_, _>>()
            .ok()?;
        match parts.as_slice() {
            [x, y, w, h] => Some(ConfigRect::new(*x, *y, *w, *h)),
            _ => None,
        }
    }

    pub fn set_rect(&mut self, section: &str, key: &str, rect: ConfigRect) {
        self.set_string(
            section,
            key,
            format!("{} {} {} {}", rect.x, rect.y, rect.w, rect.h),
        );
    }
}

/// Loads the `WindowPos` of `section`, falling back to `default`.
///
/// The size is kept between the default size and the screen size, then the
/// origin is moved so the whole rectangle stays on screen.
pub fn load_window_pos(
    config: &ConfigStore,
    section: &str,
    default: ConfigRect,
    screen_w: i32,
    screen_h: i32,
) -> ConfigRect {
    let pos = config.get_rect(section, "WindowPos").unwrap_or(default);

    let w = pos.w.min(screen_w).max(default.w);
    let h = pos.h.min(screen_h).max(default.h);
    let x = pos.x.min(screen_w - w).max(0);
    let y = pos.y.min(screen_h - h).max(0);

    ConfigRect::new(x, y, w, h)
}

pub fn save_window_pos(config: &mut ConfigStore, section: &str, rect: ConfigRect) {
    config.set_rect(section, "WindowPos", rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_values_fall_back_to_default() {
        let mut config = ConfigStore::new();
        config.set_string("GfxMode", "Width", "wide");
        config.set_string("GfxMode", "FullScreen", "maybe");
        config.set_string("Win", "WindowPos", "1 2 3");

        assert_eq!(config.get_int("GfxMode", "Width", 640), 640);
        assert!(config.get_bool("GfxMode", "FullScreen", true));
        assert_eq!(config.get_rect("Win", "WindowPos"), None);
    }
}
