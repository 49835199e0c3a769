//! Process-scoped registries shared by the UI: commands, shortcuts, monitors
//! and the idle flags.
use crate::command::{CommandContext, CommandError, CommandRegistry, CommandResult, Params};
use crate::error::GuiResult;
use crate::event_loop::IdleFlags;
use crate::monitor::MonitorScheduler;
use crate::shortcut::{KeyPress, KeyResolver, Resolution, ShortcutConfig, ShortcutTable, ToolCycle, TopLevel};
use crate::state::EditorContext;

pub struct GuiContext {
    pub commands: CommandRegistry,
    pub shortcuts: ShortcutTable,
    pub monitors: MonitorScheduler,
    pub idle: IdleFlags,
    pub tool_cycle: ToolCycle,
}

impl std::fmt::Debug for GuiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuiContext")
            .field("commands", &self.commands)
            .field("shortcuts", &self.shortcuts.len())
            .field("monitors", &self.monitors)
            .field("idle", &self.idle.bits())
            .field("tool_cycle", &self.tool_cycle)
            .finish()
    }
}

impl Default for GuiContext {
    fn default() -> Self {
        Self::new(CommandRegistry::with_builtin(), MonitorScheduler::default())
    }
}

impl GuiContext {
    pub fn new(commands: CommandRegistry, monitors: MonitorScheduler) -> Self {
        Self {
            commands,
            shortcuts: ShortcutTable::new(),
            monitors,
            idle: IdleFlags::new(),
            tool_cycle: ToolCycle::default(),
        }
    }

    /// Binds the built-in shortcuts, then the entries of `user` on top.
    pub fn load_shortcuts(
        &mut self,
        editor: &EditorContext,
        user: Option<&ShortcutConfig>,
    ) -> GuiResult<()> {
        ShortcutConfig::builtin()?.apply(&mut self.shortcuts, &editor.tools);
        if let Some(user) = user {
            user.apply(&mut self.shortcuts, &editor.tools);
        }
        log::info!("{} keyboard shortcuts bound", self.shortcuts.len());
        Ok(())
    }

    /// Resolves a key press and carries out the result. Command failures are
    /// logged and shown in the status bar.
    pub fn handle_key(
        &mut self,
        press: &KeyPress,
        top_levels: &[TopLevel],
        editor: &mut EditorContext,
    ) -> Resolution {
        let resolution = self.resolve(press, top_levels, editor);
        self.apply(&resolution, editor);
        resolution
    }

    pub fn resolve(
        &self,
        press: &KeyPress,
        top_levels: &[TopLevel],
        editor: &EditorContext,
    ) -> Resolution {
        KeyResolver::new(&self.shortcuts, &self.commands, &editor.tools)
            .with_cycle(self.tool_cycle)
            .resolve(press, top_levels)
    }

    /// Runs the command or switches the tool a resolution names.
    pub fn apply(&mut self, resolution: &Resolution, editor: &mut EditorContext) {
        match resolution {
            Resolution::Execute { command_id, params } => {
                self.run_command(command_id, params, editor);
            }
            Resolution::ChangeTool(tool_id) => {
                editor.tools.select(tool_id);
            }
            Resolution::Suppressed => log::debug!("Shortcut suppressed by a modal window"),
            Resolution::NoMatch => {}
        }
    }

    pub fn execute(&mut self, id: &str, params: &Params, editor: &mut EditorContext) -> CommandResult {
        let mut ctx = CommandContext::new(editor, &mut self.monitors, &self.idle);
        self.commands.execute(id, params, &mut ctx)
    }

    /// Like [`execute`](Self::execute) but reports errors instead of
    /// returning them.
    pub fn run_command(&mut self, id: &str, params: &Params, editor: &mut EditorContext) {
        if let Err(err) = self.execute(id, params, editor) {
            match &err {
                CommandError::Gui(gui) if gui.is_resource_not_found() => {
                    log::warn!("Command '{}' aborted: {}", id, gui)
                }
                _ => log::error!("Command '{}' failed: {}", id, err),
            }
            editor.status.set_text(err.to_string());
        }
    }

    /// Releases every monitor and binding.
    pub fn shutdown(&mut self) {
        self.monitors.shutdown();
        self.shortcuts.clear();
    }
}
