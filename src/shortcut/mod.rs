//! Keyboard shortcuts: chord parsing, the binding table and key resolution.
mod accel;
mod resolver;
mod table;

pub use accel::{Accelerator, ChordKey, KeyChord, KeyPress, ModifierMask};
pub use resolver::{KeyResolver, Resolution, ToolCycle, TopLevel};
pub use table::{Binding, BindingTarget, ShortcutTable};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::command::Params;
use crate::error::GuiResult;
use crate::tools::{ToolId, ToolRegistry};

const BUILTIN_SHORTCUTS: &str = include_str!("defaults.json");

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandShortcut {
    pub shortcut: String,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolShortcut {
    pub shortcut: String,
    pub tool: String,
}

/// Shortcut definitions as stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShortcutConfig {
    pub commands: Vec<CommandShortcut>,
    pub tools: Vec<ToolShortcut>,
}

impl ShortcutConfig {
    /// The shortcuts shipped with the editor.
    pub fn builtin() -> GuiResult<Self> {
        Ok(serde_json::from_str(BUILTIN_SHORTCUTS)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> GuiResult<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Adds every entry to `table`. Tools unknown to `tools` are skipped.
    pub fn apply(&self, table: &mut ShortcutTable, tools: &ToolRegistry) {
        for entry in &self.commands {
            table.bind_command(&entry.shortcut, &entry.command, entry.params.as_ref());
        }
        for entry in &self.tools {
            let id = ToolId::new(&entry.tool);
            if tools.contains(&id) {
                table.bind_tool(&entry.shortcut, &id);
            } else {
                log::warn!("Shortcut '{}' names unknown tool '{}'", entry.shortcut, entry.tool);
            }
        }
    }
}
