use std::path::{Path, PathBuf};

use crate::config::ConfigStore;

/// Longest list kept.
pub const MAX_RECENT_FILES: usize = 8;

const SECTION: &str = "RecentFiles";

/// Most recently opened files, newest first, and the File menu entries built
/// from them.
#[derive(Debug, Default)]
pub struct RecentFiles {
    files: Vec<PathBuf>,
    /// Labels shown in the menu; `None` until the menu exists
    menu: Option<Vec<String>>,
}

impl RecentFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(config: &ConfigStore) -> Self {
        let files = (0..MAX_RECENT_FILES)
            .filter_map(|i| config.get_string(SECTION, &format!("File{}", i)))
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect();
        Self { files, menu: None }
    }

    pub fn save(&self, config: &mut ConfigStore) {
        for i in 0..MAX_RECENT_FILES {
            let key = format!("File{}", i);
            match self.files.get(i) {
                Some(path) => config.set_string(SECTION, &key, path.display().to_string()),
                None => config.remove(SECTION, &key),
            }
        }
    }

    /// Moves `path` to the front of the list.
    pub fn push(&mut self, path: &Path) {
        self.files.retain(|p| p != path);
        self.files.insert(0, path.to_path_buf());
        self.files.truncate(MAX_RECENT_FILES);
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Creates the (empty) menu. Until then rebuilds are refused.
    pub fn attach_menu(&mut self) {
        if self.menu.is_none() {
            self.menu = Some(Vec::new());
        }
    }

    /// Regenerates the menu entries from the list. Returns false when there
    /// is no menu to rebuild yet.
    pub fn rebuild_menu(&mut self) -> bool {
        let Some(menu) = &mut self.menu else {
            return false;
        };
        *menu = self
            .files
            .iter()
            .map(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string())
            })
            .collect();
        log::debug!("Recent files menu rebuilt with {} entries", menu.len());
        true
    }

    /// Menu labels paired with their files. Files whose path is not valid
    /// UTF-8 cannot be passed back to `open_file` and are left out.
    pub fn menu_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.menu
            .iter()
            .flatten()
            .zip(&self.files)
            .filter_map(|(label, path)| Some((label.as_str(), path.to_str()?)))
    }
}
