//! Dialog layouts loaded from JSON window definitions.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GuiError, GuiResult};

/// Layouts shipped inside the binary, consulted last.
const BUILTIN_LAYOUTS: &[(&str, &str)] = &[
    ("newlay.json", include_str!("../data/jids/newlay.json")),
    ("openfile.json", include_str!("../data/jids/openfile.json")),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Label,
    Entry,
    Button,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetDef {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    #[serde(default)]
    pub text: String,
}

impl WidgetDef {
    /// Buttons close the window they are in.
    pub fn is_killer(&self) -> bool {
        self.kind == WidgetKind::Button
    }
}

/// A top-level window as described by a layout file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowDef {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub widgets: Vec<WidgetDef>,
}

impl WindowDef {
    /// The widget called `name`.
    pub fn find_widget(&self, name: &str) -> GuiResult<&WidgetDef> {
        self.widgets
            .iter()
            .find(|w| w.name == name)
            .ok_or_else(|| GuiError::WidgetNotFound(name.to_owned()))
    }

    pub fn find_widget_mut(&mut self, name: &str) -> GuiResult<&mut WidgetDef> {
        self.widgets
            .iter_mut()
            .find(|w| w.name == name)
            .ok_or_else(|| GuiError::WidgetNotFound(name.to_owned()))
    }

    /// Text of the widget called `name`.
    pub fn text(&self, name: &str) -> GuiResult<&str> {
        Ok(&self.find_widget(name)?.text)
    }
}

/// Where layout files are searched for.
#[derive(Debug, Clone, Default)]
pub struct LayoutDirs {
    /// Data directory holding a `jids/` folder
    pub data_dir: Option<PathBuf>,
}

impl LayoutDirs {
    pub fn new(data_dir: Option<PathBuf>) -> Self {
        Self { data_dir }
    }

    fn candidates(&self, file: &str) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(file)];
        if let Some(dir) = &self.data_dir {
            paths.push(dir.join("jids").join(file));
        }
        paths
    }
}

/// All windows defined in `file`.
pub fn load_layout(dirs: &LayoutDirs, file: &str) -> GuiResult<Vec<WindowDef>> {
    for path in dirs.candidates(file) {
        if path.is_file() {
            log::debug!("Loading layout {}", path.display());
            return parse_layout(&path.display().to_string(), &fs::read_to_string(&path)?);
        }
    }

    let name = Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file);
    match BUILTIN_LAYOUTS.iter().find(|(builtin, _)| *builtin == name) {
        Some((_, json)) => parse_layout(file, json),
        None => Err(GuiError::WidgetFileNotFound(file.to_owned())),
    }
}

/// The window called `name` from `file`.
pub fn load_widget(dirs: &LayoutDirs, file: &str, name: &str) -> GuiResult<WindowDef> {
    load_layout(dirs, file)?
        .into_iter()
        .find(|window| window.name == name)
        .ok_or_else(|| GuiError::WidgetNotFound(name.to_owned()))
}

fn parse_layout(file: &str, json: &str) -> GuiResult<Vec<WindowDef>> {
    serde_json::from_str(json).map_err(|source| GuiError::InvalidLayout {
        file: file.to_owned(),
        source,
    })
}
