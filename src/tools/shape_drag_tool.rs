use egui::Pos2;
use log::info;

use crate::id_generator::ShapeId;
use crate::shape::factory;
use crate::shape_store::ShapeStore;

/// Anchor-to-pointer drag shared by the rectangle and circle tools.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDrag {
    pub anchor: Pos2,
    pub current: Pos2,
}

impl ShapeDrag {
    pub fn new(anchor: Pos2) -> Self {
        Self {
            anchor,
            current: anchor,
        }
    }

    pub fn update(&mut self, pos: Pos2) {
        self.current = pos;
    }

    /// Commits a rectangle spanning anchor and release point.
    /// Zero-size drags still produce a (degenerate) shape.
    pub fn commit_rect(self, release: Pos2, store: &mut ShapeStore) -> ShapeId {
        let id = store.add(factory::rect_from_drag(self.anchor, release));
        info!("Committed rect {} from {:?} to {:?}", id, self.anchor, release);
        id
    }

    /// Commits a circle centred on the anchor through the release point.
    pub fn commit_circle(self, release: Pos2, store: &mut ShapeStore) -> ShapeId {
        let id = store.add(factory::circle_from_drag(self.anchor, release));
        info!(
            "Committed circle {} at {:?} r={:.1}",
            id,
            self.anchor,
            self.anchor.distance(release)
        );
        id
    }
}
