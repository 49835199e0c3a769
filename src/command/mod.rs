mod commands;
mod context;
mod history;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use thiserror::Error;

use crate::error::GuiError;

pub use commands::{builtin_commands, complete_dialog};
pub use context::CommandContext;
pub use history::{CommandHistory, Edit};

/// Names of the builtin commands.
pub mod ids {
    pub const NEW_FILE: &str = "new_file";
    pub const OPEN_FILE: &str = "open_file";
    pub const EXIT: &str = "exit";
    pub const UNDO: &str = "undo";
    pub const REDO: &str = "redo";
    pub const NEW_LAYER: &str = "new_layer";
    pub const REMOVE_LAYER: &str = "remove_layer";
    pub const SCREEN_SHOT: &str = "screen_shot";
    pub const RECORD_SCREEN: &str = "record_screen";
}

/// Result type for command operations
pub type CommandResult = Result<(), CommandError>;

/// Errors that can occur during command execution
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}'")]
    Unknown(String),

    #[error("Command '{0}' is not available right now")]
    Disabled(String),

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameters { name: String, reason: String },

    #[error("Cannot {0} now")]
    InvalidState(&'static str),

    #[error(transparent)]
    Gui(#[from] GuiError),
}

/// Named string parameters bound to a command invocation.
///
/// Compared structurally; an absent parameter set equals an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_owned(), value.to_owned());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Parses `key` as a number, `Ok(None)` when absent.
    pub fn get_usize(&self, key: &str) -> Result<Option<usize>, CommandError> {
        self.get(key)
            .map(|v| {
                v.trim().parse().map_err(|_| CommandError::InvalidParameters {
                    name: key.to_owned(),
                    reason: format!("'{}' is not a number", v),
                })
            })
            .transpose()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// An action the user can invoke from a menu, a button or a shortcut.
pub trait Command {
    /// Identifier used by shortcuts and menus
    fn id(&self) -> &'static str;

    /// Name shown to the user
    fn friendly_name(&self) -> &'static str;

    /// Global commands run from a shortcut even while a modal window is open.
    fn is_global(&self) -> bool {
        false
    }

    fn enabled(&self, _ctx: &CommandContext<'_>) -> bool {
        true
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, params: &Params) -> CommandResult;
}

/// Lookup table from command id to command object.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, Rc<dyn Command>>,
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<_> = self.commands.keys().collect();
        ids.sort();
        f.debug_struct("CommandRegistry").field("commands", &ids).finish()
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every builtin command.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for command in builtin_commands() {
            registry.register(command);
        }
        registry
    }

    pub fn register(&mut self, command: Rc<dyn Command>) {
        self.commands.insert(command.id(), command);
    }

    pub fn unregister(&mut self, id: &str) -> Option<Rc<dyn Command>> {
        self.commands.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<Rc<dyn Command>> {
        self.commands.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.commands.contains_key(id)
    }

    pub fn is_global(&self, id: &str) -> bool {
        self.commands.get(id).is_some_and(|c| c.is_global())
    }

    /// Looks up and runs `id` if it is enabled.
    pub fn execute(&self, id: &str, params: &Params, ctx: &mut CommandContext<'_>) -> CommandResult {
        let command = self
            .get(id)
            .ok_or_else(|| CommandError::Unknown(id.to_owned()))?;
        if !command.enabled(ctx) {
            return Err(CommandError::Disabled(id.to_owned()));
        }
        log::info!("Executing command: {}", id);
        command.execute(ctx, params)
    }
}
