use egui::{CursorIcon, Pos2, Rect};

use super::bounds::bounds_in_screen_space;
use crate::shape::{Shape, ShapeGeometry};

/// Half-extent of the square around each handle that counts as a hit
pub const HANDLE_HIT_RADIUS: f32 = 16.0;
/// Distance from a bounds edge that still grabs that edge's handle
pub const EDGE_TOLERANCE: f32 = 10.0;
/// Visual size of a drawn handle
pub const HANDLE_DRAW_SIZE: f32 = 14.0;

/// The eight handles around a selection's bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    TopLeft,
    TopMiddle,
    TopRight,
    MiddleLeft,
    MiddleRight,
    BottomLeft,
    BottomMiddle,
    BottomRight,
}

/// What dragging a handle does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Rotate,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleHit {
    pub handle: Handle,
    pub kind: HandleKind,
}

impl Handle {
    /// Test order: top row, middle row, bottom row
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::TopMiddle,
        Handle::TopRight,
        Handle::MiddleLeft,
        Handle::MiddleRight,
        Handle::BottomLeft,
        Handle::BottomMiddle,
        Handle::BottomRight,
    ];

    pub fn position(&self, bounds: Rect) -> Pos2 {
        match self {
            Handle::TopLeft => bounds.left_top(),
            Handle::TopMiddle => bounds.center_top(),
            Handle::TopRight => bounds.right_top(),
            Handle::MiddleLeft => bounds.left_center(),
            Handle::MiddleRight => bounds.right_center(),
            Handle::BottomLeft => bounds.left_bottom(),
            Handle::BottomMiddle => bounds.center_bottom(),
            Handle::BottomRight => bounds.right_bottom(),
        }
    }

    /// Corners rotate, edge midpoints resize
    pub fn kind(&self) -> HandleKind {
        match self {
            Handle::TopLeft | Handle::TopRight | Handle::BottomLeft | Handle::BottomRight => {
                HandleKind::Rotate
            }
            _ => HandleKind::Resize,
        }
    }

    pub fn is_horizontal_edge(&self) -> bool {
        matches!(self, Handle::MiddleLeft | Handle::MiddleRight)
    }

    pub fn is_vertical_edge(&self) -> bool {
        matches!(self, Handle::TopMiddle | Handle::BottomMiddle)
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            Handle::TopLeft | Handle::BottomRight => CursorIcon::ResizeNwSe,
            Handle::TopRight | Handle::BottomLeft => CursorIcon::ResizeNeSw,
            Handle::MiddleLeft | Handle::MiddleRight => CursorIcon::ResizeHorizontal,
            Handle::TopMiddle | Handle::BottomMiddle => CursorIcon::ResizeVertical,
        }
    }

    fn hit(self) -> HandleHit {
        HandleHit {
            handle: self,
            kind: self.kind(),
        }
    }
}

/// Calculate distance from a point to a line segment, clamped to its endpoints
pub fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let along = point_vec.dot(line_vec);
    if along <= 0.0 {
        return point_vec.length();
    }
    let len_sq = line_vec.length_sq();
    if len_sq <= along {
        return point.distance(line_end);
    }
    let projection = line_start + line_vec * (along / len_sq);
    point.distance(projection)
}

/// Even-odd ray cast against a closed vertex list
pub fn point_in_polygon(point: Pos2, vertices: &[Pos2]) -> bool {
    let mut inside = false;
    let mut j = vertices.len().wrapping_sub(1);
    for (i, vi) in vertices.iter().enumerate() {
        let vj = vertices[j];
        if (vi.y > point.y) != (vj.y > point.y) {
            let cross_x = (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x;
            if point.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Tests a screen point against a shape in its own local space.
pub fn point_in_shape(point: Pos2, shape: &Shape) -> bool {
    let local = shape.transform.invert(point);
    match shape.geometry() {
        ShapeGeometry::Rect(rect) => {
            local.x >= rect.min.x
                && local.y >= rect.min.y
                && local.x <= rect.max.x
                && local.y <= rect.max.y
        }
        ShapeGeometry::Circle { center, radius } => {
            (local - *center).length_sq() <= radius * radius
        }
        ShapeGeometry::Polygon(points) => point_in_polygon(local, points),
        ShapeGeometry::Brush {
            points,
            stroke_width,
        } => {
            let reach = stroke_width / 2.0;
            points
                .windows(2)
                .any(|seg| distance_to_line_segment(local, seg[0], seg[1]) <= reach)
        }
    }
}

/// Topmost (last added) shape under the point
pub fn hit_test_topmost(point: Pos2, shapes: &[Shape]) -> Option<&Shape> {
    shapes.iter().rev().find(|s| point_in_shape(point, s))
}

/// Which handle of a shape's bounds, if any, is under the point.
pub fn handle_at(point: Pos2, shape: &Shape) -> Option<HandleHit> {
    let bounds = bounds_in_screen_space(shape)?;
    handle_at_bounds(point, bounds)
}

pub fn handle_at_bounds(point: Pos2, bounds: Rect) -> Option<HandleHit> {
    for handle in Handle::ALL {
        let pos = handle.position(bounds);
        if (point.x - pos.x).abs() <= HANDLE_HIT_RADIUS && (point.y - pos.y).abs() <= HANDLE_HIT_RADIUS {
            return Some(handle.hit());
        }
    }

    // Edge bands make thin edges easier to grab
    let within_x = point.x >= bounds.min.x && point.x <= bounds.max.x;
    let within_y = point.y >= bounds.min.y && point.y <= bounds.max.y;
    if within_x && (point.y - bounds.min.y).abs() <= EDGE_TOLERANCE {
        return Some(Handle::TopMiddle.hit());
    }
    if within_x && (point.y - bounds.max.y).abs() <= EDGE_TOLERANCE {
        return Some(Handle::BottomMiddle.hit());
    }
    if within_y && (point.x - bounds.min.x).abs() <= EDGE_TOLERANCE {
        return Some(Handle::MiddleLeft.hit());
    }
    if within_y && (point.x - bounds.max.x).abs() <= EDGE_TOLERANCE {
        return Some(Handle::MiddleRight.hit());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id_generator::ShapeId;
    use egui::vec2;

    fn big_rect() -> Shape {
        Shape::new(
            ShapeId(1),
            ShapeGeometry::Rect(Rect::from_min_size(Pos2::new(100.0, 100.0), vec2(200.0, 100.0))),
        )
    }

    #[test]
    fn test_distance_to_segment_clamps() {
        let a = Pos2::new(0.0, 0.0);
        let b = Pos2::new(10.0, 0.0);
        assert!((distance_to_line_segment(Pos2::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-5);
        assert!((distance_to_line_segment(Pos2::new(-4.0, 3.0), a, b) - 5.0).abs() < 1e-5);
        assert!((distance_to_line_segment(Pos2::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-5);
        // Degenerate segment
        assert!((distance_to_line_segment(Pos2::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_polygon_even_odd() {
        let square = [
            Pos2::new(0.0, 0.0),
            Pos2::new(10.0, 0.0),
            Pos2::new(10.0, 10.0),
            Pos2::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Pos2::new(5.0, 5.0), &square));
        assert!(!point_in_polygon(Pos2::new(15.0, 5.0), &square));
        assert!(!point_in_polygon(Pos2::new(5.0, 5.0), &[]));
    }

    #[test]
    fn test_corner_handles_rotate_and_edges_resize() {
        let shape = big_rect();
        let hit = handle_at(Pos2::new(102.0, 98.0), &shape).unwrap();
        assert_eq!(hit.handle, Handle::TopLeft);
        assert_eq!(hit.kind, HandleKind::Rotate);

        let hit = handle_at(Pos2::new(300.0, 150.0), &shape).unwrap();
        assert_eq!(hit.handle, Handle::MiddleRight);
        assert_eq!(hit.kind, HandleKind::Resize);
    }

    #[test]
    fn test_edge_band_maps_to_midpoint_handle() {
        let shape = big_rect();
        // Along the bottom edge, far from the bottom-middle handle
        let hit = handle_at(Pos2::new(140.0, 205.0), &shape).unwrap();
        assert_eq!(hit.handle, Handle::BottomMiddle);
        // Deep inside: no handle
        assert!(handle_at(Pos2::new(200.0, 150.0), &shape).is_none());
    }

    #[test]
    fn test_rotated_brush_hit() {
        let mut shape = Shape::new(
            ShapeId(3),
            ShapeGeometry::Brush {
                points: vec![Pos2::new(0.0, 0.0), Pos2::new(100.0, 0.0)],
                stroke_width: 10.0,
            },
        );
        shape.transform.rotation = std::f32::consts::FRAC_PI_2;
        // Pivot is (50, 0); the stroke now runs vertically through x = 50
        assert!(point_in_shape(Pos2::new(52.0, 40.0), &shape));
        assert!(!point_in_shape(Pos2::new(90.0, 0.0), &shape));
    }
}
