use egui::Pos2;
use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

use crate::shape::{Shape, ShapeGeometry};

/// Opaque white paint used for mask content
pub fn mask_paint() -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(255, 255, 255, 255);
    paint.anti_alias = true;
    paint
}

/// Draws one shape filled (or stroked for brush strokes) into `pixmap`.
///
/// The shape's own transform is applied first, then `global`. The live
/// mask uses the identity as `global`; export passes its resolution scale.
pub fn draw_shape(pixmap: &mut Pixmap, shape: &Shape, global: Transform, paint: &Paint<'_>) {
    let transform = shape.transform.to_affine().post_concat(global);
    draw_geometry(pixmap, shape.geometry(), transform, paint);
}

pub fn draw_geometry(
    pixmap: &mut Pixmap,
    geometry: &ShapeGeometry,
    transform: Transform,
    paint: &Paint<'_>,
) {
    match geometry {
        ShapeGeometry::Rect(rect) => {
            if let Some(r) = Rect::from_ltrb(rect.min.x, rect.min.y, rect.max.x, rect.max.y) {
                let path = PathBuilder::from_rect(r);
                pixmap.fill_path(&path, paint, FillRule::Winding, transform, None);
            }
        }
        ShapeGeometry::Circle { center, radius } => {
            if let Some(path) = PathBuilder::from_circle(center.x, center.y, *radius) {
                pixmap.fill_path(&path, paint, FillRule::Winding, transform, None);
            }
        }
        ShapeGeometry::Polygon(points) => {
            if let Some(path) = polygon_path(points) {
                pixmap.fill_path(&path, paint, FillRule::EvenOdd, transform, None);
            }
        }
        ShapeGeometry::Brush {
            points,
            stroke_width,
        } => draw_brush_points(pixmap, points, *stroke_width, transform, paint),
    }
}

/// Strokes a polyline with round caps and joins.
///
/// A stroke whose points all coincide becomes a dot of the brush diameter.
pub fn draw_brush_points(
    pixmap: &mut Pixmap,
    points: &[Pos2],
    width: f32,
    transform: Transform,
    paint: &Paint<'_>,
) {
    let Some(first) = points.first() else {
        return;
    };
    if points.iter().all(|p| p == first) {
        if let Some(dot) = PathBuilder::from_circle(first.x, first.y, width / 2.0) {
            pixmap.fill_path(&dot, paint, FillRule::Winding, transform, None);
        }
        return;
    }
    let Some(path) = polyline_path(points, false) else {
        return;
    };
    let stroke = Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    };
    pixmap.stroke_path(&path, paint, &stroke, transform, None);
}

/// Closed path through `points`, `None` below three points
pub fn polygon_path(points: &[Pos2]) -> Option<Path> {
    if points.len() < 3 {
        return None;
    }
    polyline_path(points, true)
}

pub fn polyline_path(points: &[Pos2], close: bool) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    if close {
        pb.close();
    }
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id_generator::ShapeId;

    fn alpha_at(pixmap: &Pixmap, x: u32, y: u32) -> u8 {
        pixmap.pixel(x, y).map_or(0, |p| p.alpha())
    }

    #[test]
    fn test_rect_fills_its_interior_only() {
        let mut pixmap = Pixmap::new(40, 40).unwrap();
        let shape = Shape::new(
            ShapeId(1),
            ShapeGeometry::Rect(egui::Rect::from_min_max(Pos2::new(10.0, 10.0), Pos2::new(20.0, 20.0))),
        );
        draw_shape(&mut pixmap, &shape, Transform::identity(), &mask_paint());
        assert_eq!(alpha_at(&pixmap, 15, 15), 255);
        assert_eq!(alpha_at(&pixmap, 30, 30), 0);
    }

    #[test]
    fn test_global_scale_moves_shape() {
        let mut pixmap = Pixmap::new(80, 80).unwrap();
        let shape = Shape::new(
            ShapeId(1),
            ShapeGeometry::Circle {
                center: Pos2::new(20.0, 20.0),
                radius: 5.0,
            },
        );
        draw_shape(&mut pixmap, &shape, Transform::from_scale(2.0, 2.0), &mask_paint());
        assert_eq!(alpha_at(&pixmap, 40, 40), 255);
        assert_eq!(alpha_at(&pixmap, 20, 20), 0);
    }

    #[test]
    fn test_single_point_brush_draws_dot() {
        let mut pixmap = Pixmap::new(40, 40).unwrap();
        let points = [Pos2::new(20.0, 20.0), Pos2::new(20.0, 20.0)];
        draw_brush_points(&mut pixmap, &points, 10.0, Transform::identity(), &mask_paint());
        assert_eq!(alpha_at(&pixmap, 20, 20), 255);
        assert_eq!(alpha_at(&pixmap, 35, 35), 0);
    }
}
