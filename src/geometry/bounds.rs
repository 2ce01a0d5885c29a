use egui::{Pos2, Rect};

use crate::shape::{Shape, ShapeGeometry};

/// Number of samples used to approximate a circle's outline
pub const CIRCLE_BOUNDS_SAMPLES: usize = 12;

/// Local-space points whose transformed hull bounds the shape.
pub(crate) fn outline_samples(geometry: &ShapeGeometry) -> Vec<Pos2> {
    match geometry {
        ShapeGeometry::Rect(rect) => vec![
            rect.left_top(),
            rect.right_top(),
            rect.right_bottom(),
            rect.left_bottom(),
        ],
        ShapeGeometry::Circle { center, radius } => (0..CIRCLE_BOUNDS_SAMPLES)
            .map(|i| {
                let angle = i as f32 / CIRCLE_BOUNDS_SAMPLES as f32 * std::f32::consts::TAU;
                Pos2::new(
                    center.x + angle.cos() * radius,
                    center.y + angle.sin() * radius,
                )
            })
            .collect(),
        ShapeGeometry::Polygon(points) | ShapeGeometry::Brush { points, .. } => points.clone(),
    }
}

/// Calculate the bounding box for a set of points
pub(crate) fn calculate_bounds(points: &[Pos2]) -> Option<Rect> {
    let first = *points.first()?;
    let mut rect = Rect::from_min_max(first, first);
    for point in &points[1..] {
        rect.extend_with(*point);
    }
    Some(rect)
}

/// Axis-aligned screen-space bounds of a shape under its transform.
pub fn bounds_in_screen_space(shape: &Shape) -> Option<Rect> {
    let transformed: Vec<Pos2> = outline_samples(shape.geometry())
        .into_iter()
        .map(|p| shape.transform.apply(p))
        .collect();
    calculate_bounds(&transformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id_generator::ShapeId;
    use egui::vec2;

    #[test]
    fn test_translated_rect_bounds() {
        let mut shape = Shape::new(
            ShapeId(1),
            ShapeGeometry::Rect(Rect::from_min_size(Pos2::new(10.0, 10.0), vec2(100.0, 50.0))),
        );
        shape.transform.translation = vec2(20.0, 5.0);
        let bounds = bounds_in_screen_space(&shape).unwrap();
        assert!((bounds.min - Pos2::new(30.0, 15.0)).length() < 1e-4);
        assert!((bounds.size() - vec2(100.0, 50.0)).length() < 1e-4);
    }

    #[test]
    fn test_rotated_square_grows() {
        let mut shape = Shape::new(
            ShapeId(1),
            ShapeGeometry::Rect(Rect::from_min_size(Pos2::ZERO, vec2(10.0, 10.0))),
        );
        shape.transform.rotation = std::f32::consts::FRAC_PI_4;
        let bounds = bounds_in_screen_space(&shape).unwrap();
        let diagonal = 10.0 * std::f32::consts::SQRT_2;
        assert!((bounds.width() - diagonal).abs() < 1e-3);
        assert!((bounds.center() - Pos2::new(5.0, 5.0)).length() < 1e-3);
    }

    #[test]
    fn test_circle_bounds_cover_radius() {
        let shape = Shape::new(
            ShapeId(1),
            ShapeGeometry::Circle {
                center: Pos2::new(50.0, 50.0),
                radius: 20.0,
            },
        );
        let bounds = bounds_in_screen_space(&shape).unwrap();
        assert!((bounds.min.x - 30.0).abs() < 1e-3);
        assert!((bounds.max.x - 70.0).abs() < 1e-3);
        // 12 samples include the top and bottom of the circle
        assert!((bounds.min.y - 30.0).abs() < 1e-3);
    }
}
