use crate::MaskEditorApp;

pub fn central_panel(app: &mut MaskEditorApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(egui::Color32::from_gray(0xf5)))
        .show(ctx, |ui| {
            let canvas_rect = ui.available_rect_before_wrap();
            let ppp = ctx.pixels_per_point();
            let canvas_size = (
                (canvas_rect.width() * ppp).round().max(1.0) as u32,
                (canvas_rect.height() * ppp).round().max(1.0) as u32,
            );
            app.sync_canvas_size(canvas_size);

            let response = ui.allocate_rect(canvas_rect, egui::Sense::click_and_drag());

            // Handle input
            app.handle_input(ctx, canvas_rect, canvas_size);

            // Render the canvas
            if let Some(texture) = app.canvas_texture(ctx) {
                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                ui.painter()
                    .image(texture.id(), canvas_rect, uv, egui::Color32::WHITE);
            }

            if response.hovered() || app.is_pointer_captured() {
                if let Some(editor) = app.editor() {
                    ctx.set_cursor_icon(editor.cursor_icon());
                }
            }
        });
}
