use std::path::Path;
use std::rc::Rc;

use super::{Command, CommandContext, CommandError, CommandResult, Edit, Params, ids};
use crate::document::Sprite;
use crate::layer::Layer;
use crate::layout;
use crate::panels::{DialogAction, ModalDialog};

/// Size of sprites created by `new_file` without parameters.
const DEFAULT_SPRITE_SIZE: (usize, usize) = (32, 32);

/// Every command the editor ships with.
pub fn builtin_commands() -> Vec<Rc<dyn Command>> {
    vec![
        Rc::new(NewFileCommand),
        Rc::new(OpenFileCommand),
        Rc::new(ExitCommand),
        Rc::new(UndoCommand),
        Rc::new(RedoCommand),
        Rc::new(NewLayerCommand),
        Rc::new(RemoveLayerCommand),
        Rc::new(ScreenShotCommand),
        Rc::new(RecordScreenCommand),
    ]
}

struct NewFileCommand;

impl Command for NewFileCommand {
    fn id(&self) -> &'static str {
        ids::NEW_FILE
    }

    fn friendly_name(&self) -> &'static str {
        "New"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, params: &Params) -> CommandResult {
        let width = params.get_usize("width")?.unwrap_or(DEFAULT_SPRITE_SIZE.0);
        let height = params.get_usize("height")?.unwrap_or(DEFAULT_SPRITE_SIZE.1);
        if width == 0 || height == 0 {
            return Err(CommandError::InvalidParameters {
                name: "width".to_owned(),
                reason: format!("{}x{} is empty", width, height),
            });
        }

        ctx.editor.set_sprite(Sprite::new(width, height), ctx.idle);
        ctx.editor
            .status
            .set_text(format!("New sprite {}x{}", width, height));
        Ok(())
    }
}

/// Opens `filename`, or asks for one with the "open_file" dialog.
struct OpenFileCommand;

impl Command for OpenFileCommand {
    fn id(&self) -> &'static str {
        ids::OPEN_FILE
    }

    fn friendly_name(&self) -> &'static str {
        "Open"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, params: &Params) -> CommandResult {
        if let Some(filename) = params.get("filename") {
            ctx.editor.open_file(Path::new(filename), ctx.monitors);
            return Ok(());
        }

        let window = layout::load_widget(&ctx.editor.layouts, "openfile.json", "open_file")?;
        let dialog = ModalDialog::new(window, DialogAction::OpenFile);
        // Fails early if the layout has no file name entry
        dialog.entry_text("filename")?;
        ctx.editor.dialogs.push(dialog);
        Ok(())
    }
}

struct ExitCommand;

impl Command for ExitCommand {
    fn id(&self) -> &'static str {
        ids::EXIT
    }

    fn friendly_name(&self) -> &'static str {
        "Exit"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, _params: &Params) -> CommandResult {
        ctx.editor.exit_requested = true;
        Ok(())
    }
}

struct UndoCommand;

impl Command for UndoCommand {
    fn id(&self) -> &'static str {
        ids::UNDO
    }

    fn friendly_name(&self) -> &'static str {
        "Undo"
    }

    fn enabled(&self, ctx: &CommandContext<'_>) -> bool {
        ctx.editor.sprite.is_some() && ctx.editor.history.can_undo()
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, _params: &Params) -> CommandResult {
        let editor = &mut *ctx.editor;
        let sprite = editor.sprite.as_mut().ok_or(CommandError::InvalidState("undo"))?;
        editor.history.undo(sprite)?;
        editor.sprite_changed();
        Ok(())
    }
}

struct RedoCommand;

impl Command for RedoCommand {
    fn id(&self) -> &'static str {
        ids::REDO
    }

    fn friendly_name(&self) -> &'static str {
        "Redo"
    }

    fn enabled(&self, ctx: &CommandContext<'_>) -> bool {
        ctx.editor.sprite.is_some() && ctx.editor.history.can_redo()
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, _params: &Params) -> CommandResult {
        let editor = &mut *ctx.editor;
        let sprite = editor.sprite.as_mut().ok_or(CommandError::InvalidState("redo"))?;
        editor.history.redo(sprite)?;
        editor.sprite_changed();
        Ok(())
    }
}

/// Shows the "new_layer" dialog with a free "Layer N" name filled in. The
/// layer is added when the dialog is closed with "ok".
struct NewLayerCommand;

impl Command for NewLayerCommand {
    fn id(&self) -> &'static str {
        ids::NEW_LAYER
    }

    fn friendly_name(&self) -> &'static str {
        "New Layer"
    }

    fn enabled(&self, ctx: &CommandContext<'_>) -> bool {
        ctx.editor.sprite.is_some()
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, _params: &Params) -> CommandResult {
        let name = ctx
            .editor
            .sprite
            .as_ref()
            .ok_or(CommandError::InvalidState("add a layer"))?
            .unique_layer_name();

        let window = layout::load_widget(&ctx.editor.layouts, "newlay.json", "new_layer")?;
        let mut dialog = ModalDialog::new(window, DialogAction::NewLayer);
        dialog.set_entry_text("name", &name)?;
        ctx.editor.dialogs.push(dialog);
        Ok(())
    }
}

/// Removes the layer at `index`, or the active layer.
struct RemoveLayerCommand;

impl Command for RemoveLayerCommand {
    fn id(&self) -> &'static str {
        ids::REMOVE_LAYER
    }

    fn friendly_name(&self) -> &'static str {
        "Remove Layer"
    }

    fn enabled(&self, ctx: &CommandContext<'_>) -> bool {
        ctx.editor
            .sprite
            .as_ref()
            .is_some_and(|sprite| !sprite.layers.is_empty())
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, params: &Params) -> CommandResult {
        let editor = &mut *ctx.editor;
        let sprite = editor
            .sprite
            .as_mut()
            .ok_or(CommandError::InvalidState("remove a layer"))?;
        let index = params.get_usize("index")?.unwrap_or(sprite.active_layer);
        let layer = sprite
            .layers
            .get(index)
            .cloned()
            .ok_or_else(|| CommandError::InvalidParameters {
                name: "index".to_owned(),
                reason: format!("no layer {}", index),
            })?;

        editor.history.execute(Edit::RemoveLayer { index, layer }, sprite);
        editor.sprite_changed();
        Ok(())
    }
}

/// Saves the screen to a PNG file. Available even while a dialog is open.
struct ScreenShotCommand;

impl Command for ScreenShotCommand {
    fn id(&self) -> &'static str {
        ids::SCREEN_SHOT
    }

    fn friendly_name(&self) -> &'static str {
        "Screen Shot"
    }

    fn is_global(&self) -> bool {
        true
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, _params: &Params) -> CommandResult {
        ctx.editor.recorder.request_screenshot();
        Ok(())
    }
}

struct RecordScreenCommand;

impl Command for RecordScreenCommand {
    fn id(&self) -> &'static str {
        ids::RECORD_SCREEN
    }

    fn friendly_name(&self) -> &'static str {
        "Record Screen"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, _params: &Params) -> CommandResult {
        let recording = ctx.editor.recorder.toggle_recording();
        let text = if recording {
            format!("Recording to {}", ctx.editor.recorder.dir().display())
        } else {
            format!("Recording stopped, {} frames saved", ctx.editor.recorder.frames())
        };
        ctx.editor.status.set_text(text);
        Ok(())
    }
}

/// Finishes a dialog closed with `killer`. Anything but "ok" cancels it.
pub fn complete_dialog(
    ctx: &mut CommandContext<'_>,
    dialog: ModalDialog,
    killer: &str,
) -> CommandResult {
    if killer != "ok" {
        log::debug!("Dialog '{}' closed with '{}'", dialog.window.name, killer);
        return Ok(());
    }

    match dialog.action {
        DialogAction::NewLayer => {
            let name = dialog.entry_text("name")?.trim().to_owned();
            let editor = &mut *ctx.editor;
            let sprite = editor
                .sprite
                .as_mut()
                .ok_or(CommandError::InvalidState("add a layer"))?;
            let name = if name.is_empty() {
                sprite.unique_layer_name()
            } else {
                name
            };

            let index = (sprite.active_layer + 1).min(sprite.layers.len());
            let layer = Layer::new(&name, sprite.width, sprite.height);
            editor.history.execute(Edit::AddLayer { index, layer }, sprite);
            editor.status.set_text(format!("Layer '{}' added", name));
            editor.sprite_changed();
            Ok(())
        }
        DialogAction::OpenFile => {
            let filename = dialog.entry_text("filename")?.trim();
            if filename.is_empty() {
                return Err(CommandError::InvalidParameters {
                    name: "filename".to_owned(),
                    reason: "no file name given".to_owned(),
                });
            }
            ctx.editor.open_file(Path::new(filename), ctx.monitors);
            Ok(())
        }
    }
}

