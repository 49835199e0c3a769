use super::{CommandError, CommandResult};
use crate::document::Sprite;
use crate::layer::Layer;

/// An undoable change to a sprite.
#[derive(Debug, Clone)]
pub enum Edit {
    AddLayer { index: usize, layer: Layer },
    RemoveLayer { index: usize, layer: Layer },
}

impl Edit {
    /// Label used in "Undo ..." menu entries
    pub fn label(&self) -> &'static str {
        match self {
            Edit::AddLayer { .. } => "New Layer",
            Edit::RemoveLayer { .. } => "Remove Layer",
        }
    }

    fn apply(&self, sprite: &mut Sprite) {
        match self {
            Edit::AddLayer { index, layer } => sprite.insert_layer(*index, layer.clone()),
            Edit::RemoveLayer { index, .. } => {
                sprite.remove_layer(*index);
            }
        }
    }

    fn revert(&self, sprite: &mut Sprite) {
        match self {
            Edit::AddLayer { index, .. } => {
                sprite.remove_layer(*index);
            }
            Edit::RemoveLayer { index, layer } => sprite.insert_layer(*index, layer.clone()),
        }
    }
}

/// Manages the history of executed edits for undo/redo functionality
#[derive(Debug, Default)]
pub struct CommandHistory {
    /// Stack of edits that can be undone
    undo_stack: Vec<Edit>,
    /// Stack of edits that can be redone
    redo_stack: Vec<Edit>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `edit` and records it.
    pub fn execute(&mut self, edit: Edit, sprite: &mut Sprite) {
        edit.apply(sprite);
        self.undo_stack.push(edit);
        self.redo_stack.clear(); // Clear redo stack when a new edit is executed
    }

    pub fn undo(&mut self, sprite: &mut Sprite) -> CommandResult {
        let edit = self.undo_stack.pop().ok_or(CommandError::InvalidState("undo"))?;
        edit.revert(sprite);
        self.redo_stack.push(edit);
        Ok(())
    }

    pub fn redo(&mut self, sprite: &mut Sprite) -> CommandResult {
        let edit = self.redo_stack.pop().ok_or(CommandError::InvalidState("redo"))?;
        edit.apply(sprite);
        self.undo_stack.push(edit);
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_label(&self) -> Option<&'static str> {
        self.undo_stack.last().map(Edit::label)
    }

    pub fn redo_label(&self) -> Option<&'static str> {
        self.redo_stack.last().map(Edit::label)
    }

    pub fn undo_stack(&self) -> &[Edit] {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &[Edit] {
        &self.redo_stack
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
