use super::accel::{Accelerator, KeyPress};
use crate::command::Params;
use crate::tools::ToolId;

/// What a binding does when its accelerator matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingTarget {
    ExecuteCommand { command_id: String, params: Params },
    ChangeTool { tool_id: ToolId },
}

/// An accelerator together with its dispatch target.
#[derive(Debug, Clone)]
pub struct Binding {
    pub accel: Accelerator,
    pub target: BindingTarget,
}

impl Binding {
    fn new(target: BindingTarget) -> Self {
        Self {
            accel: Accelerator::new(),
            target,
        }
    }

    pub fn is_key_pressed(&self, press: &KeyPress) -> bool {
        self.accel.check(press)
    }

    fn is_for_command(&self, command_id: &str, params: &Params) -> bool {
        matches!(&self.target,
            BindingTarget::ExecuteCommand { command_id: id, params: p }
                if id == command_id && p == params)
    }

    fn is_for_tool(&self, tool_id: &ToolId) -> bool {
        matches!(&self.target, BindingTarget::ChangeTool { tool_id: id } if id == tool_id)
    }
}

/// Ordered collection of keyboard bindings.
///
/// There is at most one command binding per `(command_id, params)` pair and at
/// most one tool binding per tool; binding again appends chords to the
/// existing entry.
#[derive(Debug, Clone, Default)]
pub struct ShortcutTable {
    bindings: Vec<Binding>,
}

impl ShortcutTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `chords` to execute `command_id`. `None` params are the same as
    /// an empty parameter set.
    pub fn bind_command(
        &mut self,
        chords: &str,
        command_id: &str,
        params: Option<&Params>,
    ) -> &Accelerator {
        let params = params.cloned().unwrap_or_default();
        let index = match self.position_for_command(command_id, &params) {
            Some(index) => index,
            None => {
                self.bindings.push(Binding::new(BindingTarget::ExecuteCommand {
                    command_id: command_id.to_owned(),
                    params,
                }));
                self.bindings.len() - 1
            }
        };

        let binding = &mut self.bindings[index];
        binding.accel.add_keys_from_str(chords);
        &binding.accel
    }

    /// Binds `chords` to switch to `tool_id`.
    pub fn bind_tool(&mut self, chords: &str, tool_id: &ToolId) -> &Accelerator {
        let index = match self.bindings.iter().position(|b| b.is_for_tool(tool_id)) {
            Some(index) => index,
            None => {
                self.bindings.push(Binding::new(BindingTarget::ChangeTool {
                    tool_id: tool_id.clone(),
                }));
                self.bindings.len() - 1
            }
        };

        let binding = &mut self.bindings[index];
        binding.accel.add_keys_from_str(chords);
        &binding.accel
    }

    pub fn find_binding_for_command(
        &self,
        command_id: &str,
        params: Option<&Params>,
    ) -> Option<&Binding> {
        let empty = Params::new();
        let params = params.unwrap_or(&empty);
        self.position_for_command(command_id, params)
            .map(|index| &self.bindings[index])
    }

    pub fn find_binding_for_tool(&self, tool_id: &ToolId) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.is_for_tool(tool_id))
    }

    /// Accelerator shown next to a command in menus.
    pub fn accel_for_command(&self, command_id: &str, params: Option<&Params>) -> Option<&Accelerator> {
        self.find_binding_for_command(command_id, params)
            .map(|b| &b.accel)
            .filter(|accel| !accel.is_empty())
    }

    pub fn accel_for_tool(&self, tool_id: &ToolId) -> Option<&Accelerator> {
        self.find_binding_for_tool(tool_id)
            .map(|b| &b.accel)
            .filter(|accel| !accel.is_empty())
    }

    /// First command binding matching `press`, ignoring focus rules.
    pub fn command_for_key(&self, press: &KeyPress) -> Option<(&str, &Params)> {
        self.bindings.iter().find_map(|b| match &b.target {
            BindingTarget::ExecuteCommand { command_id, params } if b.is_key_pressed(press) => {
                Some((command_id.as_str(), params))
            }
            _ => None,
        })
    }

    /// Bindings in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    fn position_for_command(&self, command_id: &str, params: &Params) -> Option<usize> {
        self.bindings
            .iter()
            .position(|b| b.is_for_command(command_id, params))
    }
}
