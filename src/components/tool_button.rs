use eframe::egui;

use crate::tools::ToolInfo;

/// Square tool bar button showing a tool glyph, with the tool name and its
/// shortcut as tooltip.
pub struct ToolButton<'a> {
    pub tool: &'a ToolInfo,
    pub shortcut: Option<String>,
    pub selected: bool,
    /// Multiplier for the button and glyph size
    pub scale: f32,
}

impl<'a> ToolButton<'a> {
    pub fn new(tool: &'a ToolInfo, shortcut: Option<String>, selected: bool) -> Self {
        Self {
            tool,
            shortcut,
            selected,
            scale: 1.0,
        }
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let button_size = egui::vec2(24.0, 24.0) * self.scale;
        let (rect, response) = ui.allocate_exact_size(button_size, egui::Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                egui::Color32::from_rgb(100, 181, 246) // Light blue when selected
            } else if response.hovered() {
                egui::Color32::from_gray(40)
            } else {
                egui::Color32::from_gray(30)
            };
            ui.painter().rect_filled(rect, 4.0, bg_color);

            let text_color = if self.selected {
                egui::Color32::BLACK
            } else {
                egui::Color32::WHITE
            };
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                self.tool.icon,
                egui::FontId::proportional(14.0 * self.scale),
                text_color,
            );

            if self.selected {
                ui.painter().rect_stroke(
                    rect,
                    4.0,
                    egui::Stroke::new(2.0, egui::Color32::from_rgb(33, 150, 243)),
                );
            }
        }

        let tooltip = match &self.shortcut {
            Some(shortcut) => format!("{} ({})", self.tool.name, shortcut),
            None => self.tool.name.clone(),
        };
        response.on_hover_text(tooltip)
    }
}
