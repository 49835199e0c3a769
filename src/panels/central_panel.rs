use crate::SpriteApp;

/// Paints the screen texture, letterboxed and scaled by whole pixels, and
/// feeds the pointer to the software cursor.
pub fn central_panel(app: &mut SpriteApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(egui::Color32::from_gray(24)))
        .show(ctx, |ui| {
            let canvas_rect = ui.available_rect_before_wrap();
            let ppp = ctx.pixels_per_point();
            let physical = [
                (canvas_rect.width() * ppp) as usize,
                (canvas_rect.height() * ppp) as usize,
            ];
            app.editor
                .resize_screen(physical, app.mode.scale as usize, &app.gui.idle);
            let screen = &mut app.editor.screen;

            let response = ui.allocate_rect(canvas_rect, egui::Sense::hover());
            let [w, h] = screen.size();
            let scale = screen.scale() as f32 / ppp;
            let origin = canvas_rect.min;

            let cursor = response.hover_pos().and_then(|pos| {
                let x = ((pos.x - origin.x) / scale).floor();
                let y = ((pos.y - origin.y) / scale).floor();
                (x >= 0.0 && y >= 0.0 && (x as usize) < w && (y as usize) < h)
                    .then_some([x as usize, y as usize])
            });
            screen.set_cursor(cursor);
            if cursor.is_some() && screen.is_double_buffered() {
                ctx.set_cursor_icon(egui::CursorIcon::None);
            }

            if let Some(texture) = app.surface.texture_id() {
                let size = egui::vec2(w as f32, h as f32) * scale;
                ui.painter().image(
                    texture,
                    egui::Rect::from_min_size(origin, size),
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
        });
}
