#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod components;
pub mod config;
pub mod document;
pub mod error;
pub mod event_loop;
pub mod file_handler;
pub mod gfx_mode;
pub mod gui;
pub mod layer;
pub mod layout;
pub mod monitor;
pub mod panels;
pub mod recent;
pub mod recorder;
pub mod screen;
pub mod shortcut;
pub mod state;
pub mod tools;
pub mod util;

pub use app::{AppOptions, SpriteApp};
pub use command::{Command, CommandHistory, CommandRegistry, Params};
pub use document::Sprite;
pub use error::{GuiError, GuiResult};
pub use gui::GuiContext;
pub use monitor::{Monitor, MonitorHandle, MonitorScheduler};
pub use shortcut::{KeyResolver, ShortcutTable, ToolCycle};
pub use state::EditorContext;
