use egui::Pos2;
use log::{debug, info};

use crate::id_generator::ShapeId;
use crate::shape::factory;
use crate::shape_store::ShapeStore;

/// Clicking this close to the first vertex closes the polygon
pub const CLOSE_THRESHOLD: f32 = 8.0;

/// Vertices of the polygon currently being authored with the pen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PenPath {
    vertices: Vec<Pos2>,
}

impl PenPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Pos2] {
        &self.vertices
    }

    /// Appends a vertex; repeating the last vertex exactly is ignored.
    pub fn push(&mut self, pos: Pos2) {
        if self.vertices.last() == Some(&pos) {
            return;
        }
        self.vertices.push(pos);
    }

    /// A click near vertex 1 closes the path once two vertices exist.
    pub fn is_closing_click(&self, pos: Pos2) -> bool {
        match self.vertices.first() {
            Some(first) if self.vertices.len() >= 2 => {
                (pos - *first).length_sq() <= CLOSE_THRESHOLD * CLOSE_THRESHOLD
            }
            _ => false,
        }
    }

    /// Committed vertices followed by the live pointer as a virtual vertex
    pub fn preview_points(&self, pointer: Option<Pos2>) -> Vec<Pos2> {
        let mut points = self.vertices.clone();
        points.extend(pointer);
        points
    }

    /// Commits the polygon, or discards it below three vertices.
    pub fn finish(self, store: &mut ShapeStore) -> Option<ShapeId> {
        let count = self.vertices.len();
        match factory::polygon(self.vertices) {
            Some(geometry) => {
                let id = store.add(geometry);
                info!("Committed polygon {} with {} vertices", id, count);
                Some(id)
            }
            None => {
                debug!("Discarding pen path with {} vertices", count);
                None
            }
        }
    }
}
