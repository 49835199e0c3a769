use crate::config::{self, ConfigRect, ConfigStore};
use crate::error::GuiResult;
use crate::layout::{WidgetKind, WindowDef};

/// What happens when a dialog is closed with its default button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    NewLayer,
    OpenFile,
}

/// A modal window built from a layout definition.
#[derive(Debug, Clone)]
pub struct ModalDialog {
    pub window: WindowDef,
    pub action: DialogAction,
    /// Set on the first frame from the saved `WindowPos`
    pos: Option<ConfigRect>,
}

impl ModalDialog {
    pub fn new(window: WindowDef, action: DialogAction) -> Self {
        Self {
            window,
            action,
            pos: None,
        }
    }

    /// Current text of the entry called `name`.
    pub fn entry_text(&self, name: &str) -> GuiResult<&str> {
        self.window.text(name)
    }

    pub fn set_entry_text(&mut self, name: &str, text: &str) -> GuiResult<()> {
        self.window.find_widget_mut(name)?.text = text.to_owned();
        Ok(())
    }

    /// Draws the dialog over a darkened screen. Returns the name of the button
    /// that closed it, if one was pressed this frame.
    pub fn show(&mut self, ctx: &egui::Context, config: &mut ConfigStore) -> Option<String> {
        let screen = ctx.screen_rect();
        let section = self.window.name.clone();
        let pos = *self.pos.get_or_insert_with(|| {
            let default = ConfigRect::new(0, 0, 240, 80);
            let mut rect = config::load_window_pos(
                config,
                &section,
                default,
                screen.width() as i32,
                screen.height() as i32,
            );
            if config.get_rect(&section, "WindowPos").is_none() {
                // Center when never placed before
                rect.x = (screen.width() as i32 - rect.w) / 2;
                rect.y = (screen.height() as i32 - rect.h) / 3;
            }
            rect
        });

        egui::Area::new(egui::Id::new("modal_backdrop"))
            .order(egui::Order::Middle)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                ui.painter()
                    .rect_filled(screen, 0.0, egui::Color32::from_black_alpha(128));
                ui.allocate_rect(screen, egui::Sense::click());
            });

        let mut killer = None;
        let response = egui::Window::new(&self.window.title)
            .id(egui::Id::new(("dialog", &self.window.name)))
            .order(egui::Order::Foreground)
            .collapsible(false)
            .resizable(false)
            .default_pos(egui::pos2(pos.x as f32, pos.y as f32))
            .min_width(pos.w as f32)
            .show(ctx, |ui| {
                ui.vertical(|ui| {
                    let mut buttons = Vec::new();
                    for widget in &mut self.window.widgets {
                        if widget.is_killer() {
                            buttons.push(widget);
                            continue;
                        }
                        match widget.kind {
                            WidgetKind::Label => {
                                ui.label(&widget.text);
                            }
                            WidgetKind::Entry => {
                                let edit = ui.text_edit_singleline(&mut widget.text);
                                if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter))
                                {
                                    killer = Some("ok".to_owned());
                                }
                            }
                            WidgetKind::Button => {}
                        }
                    }
                    ui.separator();
                    ui.horizontal(|ui| {
                        for button in buttons {
                            if ui.button(&button.text).clicked() {
                                killer = Some(button.name.clone());
                            }
                        }
                    });
                });
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    killer = Some("cancel".to_owned());
                }
            });

        if killer.is_some() {
            if let Some(response) = response {
                let rect = response.response.rect;
                config::save_window_pos(
                    config,
                    &section,
                    ConfigRect::new(
                        rect.min.x as i32,
                        rect.min.y as i32,
                        rect.width() as i32,
                        rect.height() as i32,
                    ),
                );
            }
        }
        killer
    }
}
