//! Transient UI drawn over the composited display surface.

use egui::Pos2;
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, StrokeDash, Transform};

use super::shape_painter::polyline_path;
use crate::geometry::{Handle, HANDLE_DRAW_SIZE};
use crate::tools::{ActiveGesture, SelectionOverlay, ShapeDrag, ToolKind, ToolOverlay};

const OUTLINE_WIDTH: f32 = 1.5;
const PREVIEW_DASH: [f32; 2] = [6.0, 6.0];
const CURSOR_DASH: [f32; 2] = [4.0, 4.0];

fn accent() -> Color {
    Color::from_rgba8(0x00, 0xa2, 0xff, 255)
}

fn accent_dark() -> Color {
    Color::from_rgba8(0x00, 0x5e, 0xaa, 255)
}

fn solid(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

fn outline(dash: Option<[f32; 2]>) -> Stroke {
    Stroke {
        width: OUTLINE_WIDTH,
        dash: dash.and_then(|d| StrokeDash::new(d.to_vec(), 0.0)),
        ..Default::default()
    }
}

/// Draws the rect/circle preview, pen preview, selection chrome and brush
/// cursor for the current tool state.
pub fn draw_overlay(pixmap: &mut Pixmap, overlay: &ToolOverlay<'_>) {
    match overlay.gesture {
        Some(ActiveGesture::DragRect(drag)) => draw_rect_preview(pixmap, drag),
        Some(ActiveGesture::DragCircle(drag)) => draw_circle_preview(pixmap, drag),
        Some(ActiveGesture::PenAuthoring(path)) => {
            draw_pen_preview(pixmap, &path.preview_points(overlay.pointer));
        }
        _ => {}
    }

    if let Some(selection) = overlay.selection {
        draw_selection(pixmap, &selection);
    }

    if overlay.tool == ToolKind::Brush {
        if let Some(pointer) = overlay.pointer {
            draw_brush_cursor(pixmap, pointer, overlay.brush_size);
        }
    }
}

fn draw_rect_preview(pixmap: &mut Pixmap, drag: &ShapeDrag) {
    let rect = egui::Rect::from_two_pos(drag.anchor, drag.current);
    if let Some(r) = Rect::from_ltrb(rect.min.x, rect.min.y, rect.max.x, rect.max.y) {
        let path = PathBuilder::from_rect(r);
        pixmap.stroke_path(&path, &solid(accent()), &outline(Some(PREVIEW_DASH)), Transform::identity(), None);
    }
}

fn draw_circle_preview(pixmap: &mut Pixmap, drag: &ShapeDrag) {
    let radius = drag.anchor.distance(drag.current);
    if let Some(path) = PathBuilder::from_circle(drag.anchor.x, drag.anchor.y, radius) {
        pixmap.stroke_path(&path, &solid(accent()), &outline(Some(PREVIEW_DASH)), Transform::identity(), None);
    }
}

fn draw_pen_preview(pixmap: &mut Pixmap, points: &[Pos2]) {
    if points.len() < 2 {
        return;
    }
    // Two points still close into a visible edge
    let Some(path) = polyline_path(points, true) else {
        return;
    };
    let fill = solid(Color::from_rgba8(255, 0, 0, 64));
    pixmap.fill_path(&path, &fill, FillRule::EvenOdd, Transform::identity(), None);
    pixmap.stroke_path(&path, &solid(accent()), &outline(None), Transform::identity(), None);
}

fn draw_selection(pixmap: &mut Pixmap, selection: &SelectionOverlay) {
    let b = selection.bounds;
    if let Some(r) = Rect::from_ltrb(b.min.x, b.min.y, b.max.x, b.max.y) {
        let path = PathBuilder::from_rect(r);
        pixmap.stroke_path(&path, &solid(accent()), &outline(Some(PREVIEW_DASH)), Transform::identity(), None);
    }

    let half = HANDLE_DRAW_SIZE / 2.0;
    for handle in Handle::ALL {
        let center = handle.position(b);
        let Some(square) = Rect::from_xywh(center.x - half, center.y - half, HANDLE_DRAW_SIZE, HANDLE_DRAW_SIZE) else {
            continue;
        };
        let (fill, stroke) = if selection.highlighted == Some(handle) {
            (accent(), accent_dark())
        } else {
            (Color::WHITE, accent())
        };
        let path = PathBuilder::from_rect(square);
        pixmap.fill_path(&path, &solid(fill), FillRule::Winding, Transform::identity(), None);
        pixmap.stroke_path(&path, &solid(stroke), &outline(None), Transform::identity(), None);
    }
}

fn draw_brush_cursor(pixmap: &mut Pixmap, pointer: Pos2, brush_size: f32) {
    let radius = (brush_size / 2.0).max(1.0);
    if let Some(path) = PathBuilder::from_circle(pointer.x, pointer.y, radius) {
        pixmap.stroke_path(&path, &solid(accent()), &outline(Some(CURSOR_DASH)), Transform::identity(), None);
    }
}
