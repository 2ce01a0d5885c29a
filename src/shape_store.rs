use log::debug;

use crate::id_generator::{ShapeId, ShapeIdGenerator};
use crate::shape::{Shape, ShapeGeometry};

/// Ordered collection of mask shapes.
///
/// Insertion order is paint order: later shapes draw on top and win hit tests.
#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    shapes: Vec<Shape>,
    ids: ShapeIdGenerator,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new shape on top and returns its id.
    pub fn add(&mut self, geometry: ShapeGeometry) -> ShapeId {
        let id = self.ids.generate_id();
        debug!("Adding {} shape {}", geometry.kind_name(), id);
        self.shapes.push(Shape::new(id, geometry));
        id
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.shapes.iter().position(|s| s.id() == id)?;
        Some(self.shapes.remove(index))
    }

    /// Drops every shape. Ids keep counting up.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
