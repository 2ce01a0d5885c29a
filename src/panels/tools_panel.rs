use crate::MaskEditorApp;
use crate::export::{MAX_EXPORT_SIZE, MIN_EXPORT_SIZE};
use crate::tools::{ToolKind, MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};

fn tool_label(tool: ToolKind) -> String {
    let icon = match tool {
        ToolKind::Select => "⬚",
        ToolKind::Brush => "🖌",
        ToolKind::Pen => "✒",
        ToolKind::Circle => "◯",
        ToolKind::Rect => "▭",
    };
    format!("{} {}", icon, tool.name())
}

pub fn tools_panel(app: &mut MaskEditorApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("tools_panel").show(ctx, |ui| {
        let Some(editor) = app.editor_mut() else {
            ui.label("Preparing canvas…");
            return;
        };

        ui.horizontal_wrapped(|ui| {
            let active = editor.tool();
            for tool in ToolKind::ALL {
                if ui.selectable_label(active == tool, tool_label(tool)).clicked() {
                    log::info!("Tool selected from UI: {}", tool.name());
                    editor.set_tool(tool);
                }
            }

            ui.separator();

            let mut brush_size = editor.brush_size();
            let slider = egui::Slider::new(&mut brush_size, MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE)
                .text("Brush")
                .integer();
            if ui.add(slider).changed() {
                editor.set_brush_size(brush_size);
            }

            ui.separator();

            let size = editor.export_size();
            let (mut width, mut height) = (size.width(), size.height());
            ui.label("Export");
            let w_changed = ui
                .add(egui::DragValue::new(&mut width).range(MIN_EXPORT_SIZE..=MAX_EXPORT_SIZE))
                .changed();
            ui.label("×");
            let h_changed = ui
                .add(egui::DragValue::new(&mut height).range(MIN_EXPORT_SIZE..=MAX_EXPORT_SIZE))
                .changed();
            if w_changed || h_changed {
                editor.set_export_size(width, height);
            }

            ui.separator();

            if editor.is_pen_authoring() {
                if ui.button("Finish").clicked() {
                    editor.finish_pen();
                }
                if ui.button("Cancel").clicked() {
                    editor.cancel_pen();
                }
                ui.separator();
            }
        });

        ui.horizontal(|ui| {
            if ui.button("Background…").clicked() {
                app.pick_background();
            }
            let has_background = app.editor().is_some_and(|e| e.background().is_some());
            if ui.add_enabled(has_background, egui::Button::new("Clear BG")).clicked() {
                if let Some(editor) = app.editor_mut() {
                    editor.clear_background();
                }
            }

            ui.separator();

            if ui.button("Clear").clicked() {
                if let Some(editor) = app.editor_mut() {
                    editor.clear();
                }
            }
            if ui.button("Export").clicked() {
                app.export_mask();
            }

            if let Some(status) = app.status() {
                ui.separator();
                ui.label(status);
            }
        });
    });
}
