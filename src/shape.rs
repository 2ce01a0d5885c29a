use egui::{Pos2, Rect};

use crate::geometry::Transform;
use crate::id_generator::ShapeId;

/// Local-space geometry of a shape, fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeGeometry {
    /// Axis-aligned rectangle (non-negative size)
    Rect(Rect),
    /// Filled circle
    Circle { center: Pos2, radius: f32 },
    /// Closed polygon, at least three vertices
    Polygon(Vec<Pos2>),
    /// Open polyline stroked with a round brush, at least two points
    Brush { points: Vec<Pos2>, stroke_width: f32 },
}

impl ShapeGeometry {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Rect(_) => "rect",
            Self::Circle { .. } => "circle",
            Self::Polygon(_) => "polygon",
            Self::Brush { .. } => "brush",
        }
    }

    /// Pivot a fresh shape rotates and scales around.
    ///
    /// Rects and circles use their centre, polygons and brush strokes the
    /// mean of their points.
    pub fn default_pivot(&self) -> Pos2 {
        match self {
            Self::Rect(rect) => rect.center(),
            Self::Circle { center, .. } => *center,
            Self::Polygon(points) | Self::Brush { points, .. } => centroid(points),
        }
    }
}

/// Arithmetic mean of a point list (origin for an empty list)
pub fn centroid(points: &[Pos2]) -> Pos2 {
    if points.is_empty() {
        return Pos2::ZERO;
    }
    let sum = points
        .iter()
        .fold(egui::Vec2::ZERO, |acc, p| acc + p.to_vec2());
    (sum / points.len() as f32).to_pos2()
}

/// A mask shape: immutable geometry placed by a transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    id: ShapeId,
    geometry: ShapeGeometry,
    pub transform: Transform,
}

impl Shape {
    /// New shape with the identity transform pivoting on its own centre.
    pub fn new(id: ShapeId, geometry: ShapeGeometry) -> Self {
        let transform = Transform::identity_at(geometry.default_pivot());
        Self {
            id,
            geometry,
            transform,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn geometry(&self) -> &ShapeGeometry {
        &self.geometry
    }

    pub fn kind_name(&self) -> &'static str {
        self.geometry.kind_name()
    }
}

/// Factory functions for the shapes each tool commits
pub mod factory {
    use super::*;

    /// Normalized rectangle spanned by two drag points
    pub fn rect_from_drag(anchor: Pos2, release: Pos2) -> ShapeGeometry {
        ShapeGeometry::Rect(Rect::from_two_pos(anchor, release))
    }

    /// Circle centred on the anchor reaching the release point
    pub fn circle_from_drag(anchor: Pos2, release: Pos2) -> ShapeGeometry {
        ShapeGeometry::Circle {
            center: anchor,
            radius: anchor.distance(release),
        }
    }

    /// Brush stroke; a single-point buffer repeats the point
    pub fn brush(mut points: Vec<Pos2>, stroke_width: f32) -> Option<ShapeGeometry> {
        let first = *points.first()?;
        if points.len() < 2 {
            points.push(first);
        }
        Some(ShapeGeometry::Brush {
            points,
            stroke_width,
        })
    }

    /// Polygon, rejected below three vertices
    pub fn polygon(points: Vec<Pos2>) -> Option<ShapeGeometry> {
        (points.len() >= 3).then_some(ShapeGeometry::Polygon(points))
    }
}
