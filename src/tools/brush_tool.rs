use egui::Pos2;
use log::info;

use crate::id_generator::ShapeId;
use crate::shape::factory;
use crate::shape_store::ShapeStore;

/// Smallest and largest brush diameters
pub const MIN_BRUSH_SIZE: f32 = 1.0;
pub const MAX_BRUSH_SIZE: f32 = 128.0;
pub const DEFAULT_BRUSH_SIZE: f32 = 24.0;

/// Helper struct gathering points while a brush stroke is drawn
#[derive(Debug, Clone, PartialEq)]
pub struct BrushStroke {
    points: Vec<Pos2>,
    width: f32,
}

impl BrushStroke {
    /// Start a stroke at the anchor point
    pub fn new(anchor: Pos2, width: f32) -> Self {
        Self {
            points: vec![anchor],
            width,
        }
    }

    pub fn add_point(&mut self, point: Pos2) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Turns the accumulated points into one brush shape.
    pub fn commit(self, store: &mut ShapeStore) -> Option<ShapeId> {
        let point_count = self.points.len();
        let geometry = factory::brush(self.points, self.width)?;
        let id = store.add(geometry);
        info!("Committed brush stroke {} ({} points, width {})", id, point_count, self.width);
        Some(id)
    }
}
