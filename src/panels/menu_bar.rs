use crate::SpriteApp;
use crate::command::{Params, ids};

/// (label, command) pairs of each menu, `None` for a separator.
const FILE_MENU: &[Option<(&str, &str)>] = &[
    Some(("New", ids::NEW_FILE)),
    Some(("Open...", ids::OPEN_FILE)),
    None,
    Some(("Screen Shot", ids::SCREEN_SHOT)),
    Some(("Record Screen", ids::RECORD_SCREEN)),
    None,
    Some(("Exit", ids::EXIT)),
];

const EDIT_MENU: &[Option<(&str, &str)>] = &[Some(("Undo", ids::UNDO)), Some(("Redo", ids::REDO))];

const LAYER_MENU: &[Option<(&str, &str)>] = &[
    Some(("New Layer...", ids::NEW_LAYER)),
    Some(("Remove Layer", ids::REMOVE_LAYER)),
];

pub fn menu_bar(app: &mut SpriteApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                command_items(app, ui, &FILE_MENU[..2]);
                recent_menu(app, ui);
                command_items(app, ui, &FILE_MENU[2..]);
            });
            ui.menu_button("Edit", |ui| command_items(app, ui, EDIT_MENU));
            ui.menu_button("Layer", |ui| command_items(app, ui, LAYER_MENU));

            if let Some(sprite) = &app.editor.sprite {
                ui.separator();
                ui.label(format!("{} ({}x{})", sprite.title(), sprite.width, sprite.height));
            }
        });
    });
}

fn command_items(app: &mut SpriteApp, ui: &mut egui::Ui, items: &[Option<(&str, &str)>]) {
    for item in items {
        let Some((label, id)) = *item else {
            ui.separator();
            continue;
        };
        let shortcut = app
            .gui
            .shortcuts
            .accel_for_command(id, None)
            .map(|accel| accel.to_string())
            .unwrap_or_default();
        let enabled = app.is_command_enabled(id);

        let button = egui::Button::new(label).shortcut_text(shortcut);
        if ui.add_enabled(enabled, button).clicked() {
            app.queue_command(id, Params::new());
            ui.close_menu();
        }
    }
}

fn recent_menu(app: &mut SpriteApp, ui: &mut egui::Ui) {
    let entries: Vec<(String, String)> = app
        .editor
        .recent
        .menu_entries()
        .map(|(label, path)| (label.to_owned(), path.to_owned()))
        .collect();

    ui.add_enabled_ui(!entries.is_empty(), |ui| {
        ui.menu_button("Open Recent", |ui| {
            for (label, path) in entries {
                if ui.button(label).on_hover_text(&path).clicked() {
                    app.queue_command(ids::OPEN_FILE, Params::new().with("filename", &path));
                    ui.close_menu();
                }
            }
        });
    });
}
