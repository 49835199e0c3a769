use super::accel::KeyPress;
use super::table::{BindingTarget, ShortcutTable};
use crate::command::{CommandRegistry, Params};
use crate::tools::{ToolId, ToolRegistry};

/// What to do when a tool chord is pressed while the active tool is the last
/// member of the group of tools sharing that chord.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToolCycle {
    /// Go back to the tool of the first matching binding.
    #[default]
    Restart,
    /// Keep the last tool selected.
    Saturate,
}

/// A top-level window, listed front to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopLevel {
    /// A modal window currently running in the foreground
    Foreground,
    /// The desktop window; `main` when it is the application's top window
    Desktop { main: bool },
    /// Any other non-modal window
    Window,
}

/// Outcome of resolving one key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Execute { command_id: String, params: Params },
    ChangeTool(ToolId),
    /// A command binding matched but the focused window may not run it
    Suppressed,
    NoMatch,
}

impl Resolution {
    /// Whether the press was eaten by the shortcut layer.
    pub fn is_consumed(&self) -> bool {
        matches!(self, Self::Execute { .. } | Self::ChangeTool(_))
    }
}

/// Turns key presses into commands or tool switches.
pub struct KeyResolver<'a> {
    table: &'a ShortcutTable,
    commands: &'a CommandRegistry,
    tools: &'a ToolRegistry,
    cycle: ToolCycle,
}

impl<'a> KeyResolver<'a> {
    pub fn new(
        table: &'a ShortcutTable,
        commands: &'a CommandRegistry,
        tools: &'a ToolRegistry,
    ) -> Self {
        Self {
            table,
            commands,
            tools,
            cycle: ToolCycle::default(),
        }
    }

    pub fn with_cycle(mut self, cycle: ToolCycle) -> Self {
        self.cycle = cycle;
        self
    }

    /// Resolves `press` against the bindings in registration order.
    ///
    /// `top_levels` must be ordered front to back. Bindings whose command or
    /// tool is no longer registered are skipped.
    pub fn resolve(&self, press: &KeyPress, top_levels: &[TopLevel]) -> Resolution {
        for binding in self.table.iter() {
            if !binding.is_key_pressed(press) {
                continue;
            }

            match &binding.target {
                BindingTarget::ChangeTool { tool_id } => {
                    if !self.tools.contains(tool_id) {
                        continue;
                    }
                    return Resolution::ChangeTool(self.pick_tool(tool_id, press));
                }
                BindingTarget::ExecuteCommand { command_id, params } => {
                    if !self.commands.contains(command_id) {
                        continue;
                    }
                    let execute = Resolution::Execute {
                        command_id: command_id.clone(),
                        params: params.clone(),
                    };

                    if self.commands.is_global(command_id) {
                        return execute;
                    }
                    for level in top_levels {
                        match level {
                            TopLevel::Foreground => return Resolution::Suppressed,
                            TopLevel::Desktop { main: true } => return execute,
                            TopLevel::Desktop { main: false } | TopLevel::Window => {}
                        }
                    }
                    return Resolution::Suppressed;
                }
            }
        }

        Resolution::NoMatch
    }

    /// Cycles through the tools sharing the pressed chord.
    fn pick_tool(&self, matched: &ToolId, press: &KeyPress) -> ToolId {
        let group: Vec<&ToolId> = self
            .tools
            .iter()
            .map(|tool| &tool.id)
            .filter(|id| {
                self.table
                    .find_binding_for_tool(id)
                    .is_some_and(|b| b.is_key_pressed(press))
            })
            .collect();

        if group.len() >= 2 {
            let active = self.tools.active();
            if let Some(i) = group.iter().position(|id| Some(*id) == active) {
                if i + 1 < group.len() {
                    return group[i + 1].clone();
                }
                if self.cycle == ToolCycle::Saturate {
                    return group[i].clone();
                }
            }
        }

        matched.clone()
    }
}
