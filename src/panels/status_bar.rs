use crate::document::Palette;

/// Message line and progress bar at the bottom of the main window.
#[derive(Debug, Default, Clone)]
pub struct StatusBar {
    text: String,
    progress: Option<f32>,
}

impl StatusBar {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn progress(&self) -> Option<f32> {
        self.progress
    }

    pub fn set_progress(&mut self, fraction: f32) {
        self.progress = Some(fraction.clamp(0.0, 1.0));
    }

    pub fn clear_progress(&mut self) {
        self.progress = None;
    }
}

pub fn status_bar(status: &StatusBar, palette: &Palette, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(status.text());

            if let Some(fraction) = status.progress() {
                ui.add(
                    egui::ProgressBar::new(fraction)
                        .desired_width(160.0)
                        .show_percentage(),
                );
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                // Drawn right to left, so reverse to keep palette order
                for &color in palette.colors().iter().take(32).rev() {
                    let (rect, _) =
                        ui.allocate_exact_size(egui::vec2(8.0, 12.0), egui::Sense::hover());
                    ui.painter().rect_filled(rect, 0.0, color);
                }
            });
        });
    });
}
