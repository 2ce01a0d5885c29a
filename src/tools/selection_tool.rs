use egui::{CursorIcon, Pos2, Rect};
use log::debug;

use crate::geometry::{bounds_in_screen_space, handle_at, hit_test_topmost, Handle, HandleHit, HandleKind, Transform};
use crate::id_generator::ShapeId;
use crate::shape::Shape;
use crate::shape_store::ShapeStore;

/// Fraction of the raw drag ratio applied to the scale
pub const RESIZE_SENSITIVITY: f32 = 0.35;
pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 10.0;

/// What the pointer is over while the select tool is idle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTarget {
    Handle(HandleHit),
    Body,
}

impl HoverTarget {
    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            HoverTarget::Handle(hit) => hit.handle.cursor_icon(),
            HoverTarget::Body => CursorIcon::Move,
        }
    }

    pub fn handle(&self) -> Option<Handle> {
        match self {
            HoverTarget::Handle(hit) => Some(hit.handle),
            HoverTarget::Body => None,
        }
    }
}

/// Snapshot taken when a move/resize/rotate drag starts
#[derive(Debug, Clone, PartialEq)]
pub struct SelectDrag {
    pub shape_id: ShapeId,
    pub handle: Option<Handle>,
    pub start: Pos2,
    pub initial: Transform,
    pub initial_bounds: Rect,
}

/// Outcome of a pointer press with the select tool
#[derive(Debug, Clone, PartialEq)]
pub enum SelectPress {
    Move(SelectDrag),
    Resize(SelectDrag),
    Rotate(SelectDrag),
    /// Clicked empty space
    Deselect,
}

impl SelectPress {
    pub fn shape_id(&self) -> Option<ShapeId> {
        match self {
            SelectPress::Move(drag) | SelectPress::Resize(drag) | SelectPress::Rotate(drag) => {
                Some(drag.shape_id)
            }
            SelectPress::Deselect => None,
        }
    }
}

fn begin_drag(shape: &Shape, pos: Pos2, handle: Option<HandleHit>) -> Option<SelectPress> {
    let initial_bounds = bounds_in_screen_space(shape)?;
    let drag = SelectDrag {
        shape_id: shape.id(),
        handle: handle.map(|hit| hit.handle),
        start: pos,
        initial: shape.transform,
        initial_bounds,
    };
    Some(match handle.map(|hit| hit.kind) {
        Some(HandleKind::Rotate) => SelectPress::Rotate(drag),
        Some(HandleKind::Resize) => SelectPress::Resize(drag),
        None => SelectPress::Move(drag),
    })
}

/// Decides what a press does: the selected shape's handles and bounds take
/// priority, then the topmost shape under the pointer.
pub fn press(pos: Pos2, selected: Option<ShapeId>, store: &ShapeStore) -> SelectPress {
    if let Some(shape) = selected.and_then(|id| store.get(id)) {
        if let Some(hit) = handle_at(pos, shape) {
            if let Some(press) = begin_drag(shape, pos, Some(hit)) {
                return press;
            }
        }
        let inside = bounds_in_screen_space(shape).is_some_and(|b| b.contains(pos));
        if inside {
            if let Some(press) = begin_drag(shape, pos, None) {
                return press;
            }
        }
    }

    match hit_test_topmost(pos, store.shapes()) {
        Some(shape) => {
            debug!("Selected shape {}", shape.id());
            let handle = handle_at(pos, shape);
            begin_drag(shape, pos, handle).unwrap_or(SelectPress::Deselect)
        }
        None => SelectPress::Deselect,
    }
}

/// Hover feedback for the selected shape
pub fn hover(pos: Pos2, selected: Option<&Shape>) -> Option<HoverTarget> {
    let shape = selected?;
    if let Some(hit) = handle_at(pos, shape) {
        return Some(HoverTarget::Handle(hit));
    }
    bounds_in_screen_space(shape)
        .filter(|b| b.contains(pos))
        .map(|_| HoverTarget::Body)
}

impl SelectDrag {
    /// Translation follows the total pointer delta.
    pub fn moved(&self, pos: Pos2) -> Transform {
        let mut t = self.initial;
        t.translation = self.initial.translation + (pos - self.start);
        t
    }

    /// Uniform scale driven by distance from the initial bounds centre.
    ///
    /// Edge handles only use the displacement along their axis.
    pub fn resized(&self, pos: Pos2) -> Transform {
        let center = self.initial_bounds.center();
        let v0 = self.start - center;
        let v1 = pos - center;
        let (from, to) = match self.handle {
            Some(h) if h.is_horizontal_edge() => (v0.x.abs(), v1.x.abs()),
            Some(h) if h.is_vertical_edge() => (v0.y.abs(), v1.y.abs()),
            _ => (v0.length(), v1.length()),
        };
        // A drag starting on the centre has no reference distance
        let ratio = if from == 0.0 { 1.0 } else { to / from };
        let factor = resize_factor(ratio);

        let mut t = self.initial;
        t.scale = self.initial.scale * factor;
        t
    }

    /// Rotation follows the pointer's angle around the initial bounds centre.
    pub fn rotated(&self, pos: Pos2) -> Transform {
        let center = self.initial_bounds.center();
        let mut t = self.initial;
        t.rotation = self.initial.rotation + angle_around(center, pos) - angle_around(center, self.start);
        t
    }
}

/// Damps a raw ratio toward 1 and clamps it to the scale bounds
pub fn resize_factor(ratio: f32) -> f32 {
    if !ratio.is_finite() {
        return 1.0;
    }
    (1.0 + (ratio - 1.0) * RESIZE_SENSITIVITY).clamp(MIN_SCALE, MAX_SCALE)
}

// atan2 of a point around a centre, 0 when they coincide
fn angle_around(center: Pos2, pos: Pos2) -> f32 {
    let v = pos - center;
    if v.x == 0.0 && v.y == 0.0 {
        0.0
    } else {
        v.y.atan2(v.x)
    }
}
