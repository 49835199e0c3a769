use crate::SpriteApp;
use crate::command::{Params, ids};
use crate::components::ToolButton;

pub fn tools_panel(app: &mut SpriteApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(180.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active = app.editor.tools.active().cloned();
            let gui_scale = app.gui_scale as f32;
            let mut clicked = None;
            ui.horizontal_wrapped(|ui| {
                for tool in app.editor.tools.iter() {
                    let shortcut = app
                        .gui
                        .shortcuts
                        .accel_for_tool(&tool.id)
                        .map(|accel| accel.to_string());
                    let selected = active.as_ref() == Some(&tool.id);
                    if ToolButton::new(tool, shortcut, selected)
                        .scale(gui_scale)
                        .show(ui)
                        .clicked()
                    {
                        clicked = Some(tool.id.clone());
                    }
                }
            });
            if let Some(tool_id) = clicked {
                log::info!("Tool selected from UI: {}", tool_id);
                app.editor.tools.select(&tool_id);
            }
            ui.separator();

            // Undo/Redo section
            ui.horizontal(|ui| {
                let history = &app.editor.history;
                let undo = history.undo_label().map(|l| format!("Undo {}", l));
                let redo = history.redo_label().map(|l| format!("Redo {}", l));

                let undo_button = egui::Button::new("Undo");
                if ui
                    .add_enabled(undo.is_some(), undo_button)
                    .on_hover_text(undo.unwrap_or_default())
                    .clicked()
                {
                    app.queue_command(ids::UNDO, Params::new());
                }
                let redo_button = egui::Button::new("Redo");
                if ui
                    .add_enabled(redo.is_some(), redo_button)
                    .on_hover_text(redo.unwrap_or_default())
                    .clicked()
                {
                    app.queue_command(ids::REDO, Params::new());
                }
            });

            ui.separator();
            ui.heading("Layers");

            let Some(sprite) = &mut app.editor.sprite else {
                ui.label("No sprite");
                return;
            };
            let mut visibility_changed = false;
            // Top layer first
            for index in (0..sprite.layers.len()).rev() {
                let layer = &mut sprite.layers[index];
                let is_active = index == sprite.active_layer;
                ui.horizontal(|ui| {
                    if ui.checkbox(&mut layer.visible, "").changed() {
                        visibility_changed = true;
                    }
                    let label = if layer.is_set() {
                        format!("[{}]", layer.name)
                    } else {
                        layer.name.clone()
                    };
                    if ui.selectable_label(is_active, label).clicked() {
                        sprite.active_layer = index;
                    }
                });
            }
            if visibility_changed {
                app.editor.sprite_changed();
            }

            ui.horizontal(|ui| {
                if ui.button("New Layer").clicked() {
                    app.queue_command(ids::NEW_LAYER, Params::new());
                }
                if ui.button("Remove").clicked() {
                    app.queue_command(ids::REMOVE_LAYER, Params::new());
                }
            });
        });
}
