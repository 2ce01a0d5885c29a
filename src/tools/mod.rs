use egui::{CursorIcon, Pos2, Rect};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::geometry::{bounds_in_screen_space, Handle};
use crate::id_generator::ShapeId;
use crate::shape_store::ShapeStore;

mod brush_tool;
mod pen_tool;
pub mod selection_tool;
mod shape_drag_tool;

pub use brush_tool::{BrushStroke, DEFAULT_BRUSH_SIZE, MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};
pub use pen_tool::{PenPath, CLOSE_THRESHOLD};
pub use selection_tool::{HoverTarget, SelectDrag, SelectPress};
pub use shape_drag_tool::ShapeDrag;

/// The five mutually exclusive editing tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Select,
    Brush,
    Pen,
    Circle,
    Rect,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Select,
        ToolKind::Brush,
        ToolKind::Pen,
        ToolKind::Circle,
        ToolKind::Rect,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Brush => "Brush",
            ToolKind::Pen => "Pen",
            ToolKind::Circle => "Circle",
            ToolKind::Rect => "Rectangle",
        }
    }
}

/// Keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Enter,
    Escape,
    Delete,
}

/// One in-progress interaction, carrying the data of the tool that owns it.
///
/// The active tool is derived from the variant, so a gesture can never be
/// paired with the wrong tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveGesture {
    DragRect(ShapeDrag),
    DragCircle(ShapeDrag),
    BrushStroke(BrushStroke),
    /// Lives across several clicks until finished or cancelled
    PenAuthoring(PenPath),
    SelectMove(SelectDrag),
    SelectResize(SelectDrag),
    SelectRotate(SelectDrag),
}

impl ActiveGesture {
    pub fn tool(&self) -> ToolKind {
        match self {
            ActiveGesture::DragRect(_) => ToolKind::Rect,
            ActiveGesture::DragCircle(_) => ToolKind::Circle,
            ActiveGesture::BrushStroke(_) => ToolKind::Brush,
            ActiveGesture::PenAuthoring(_) => ToolKind::Pen,
            ActiveGesture::SelectMove(_)
            | ActiveGesture::SelectResize(_)
            | ActiveGesture::SelectRotate(_) => ToolKind::Select,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActiveGesture::DragRect(_) => "DragRect",
            ActiveGesture::DragCircle(_) => "DragCircle",
            ActiveGesture::BrushStroke(_) => "BrushStroke",
            ActiveGesture::PenAuthoring(_) => "PenAuthoring",
            ActiveGesture::SelectMove(_) => "SelectMove",
            ActiveGesture::SelectResize(_) => "SelectResize",
            ActiveGesture::SelectRotate(_) => "SelectRotate",
        }
    }
}

impl SelectPress {
    /// The drag gesture this press starts, if any
    pub fn into_gesture(self) -> Option<ActiveGesture> {
        match self {
            SelectPress::Move(drag) => Some(ActiveGesture::SelectMove(drag)),
            SelectPress::Resize(drag) => Some(ActiveGesture::SelectResize(drag)),
            SelectPress::Rotate(drag) => Some(ActiveGesture::SelectRotate(drag)),
            SelectPress::Deselect => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolState {
    Idle(ToolKind),
    Active(ActiveGesture),
}

impl ToolState {
    pub fn tool(&self) -> ToolKind {
        match self {
            ToolState::Idle(kind) => *kind,
            ToolState::Active(gesture) => gesture.tool(),
        }
    }
}

/// Selection outline data handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionOverlay {
    pub bounds: Rect,
    pub highlighted: Option<Handle>,
}

/// Everything transient the renderer draws on top of the mask
#[derive(Debug, Clone, Copy)]
pub struct ToolOverlay<'a> {
    pub tool: ToolKind,
    pub gesture: Option<&'a ActiveGesture>,
    pub pointer: Option<Pos2>,
    pub brush_size: f32,
    pub selection: Option<SelectionOverlay>,
}

/// Interprets pointer and keyboard input for the active tool and turns it
/// into shape store mutations.
#[derive(Debug, Clone)]
pub struct ToolStateMachine {
    state: ToolState,
    selection: Option<ShapeId>,
    hover: Option<HoverTarget>,
    pointer: Option<Pos2>,
    brush_size: f32,
}

impl Default for ToolStateMachine {
    fn default() -> Self {
        Self::new(ToolKind::Brush, DEFAULT_BRUSH_SIZE)
    }
}

impl ToolStateMachine {
    pub fn new(tool: ToolKind, brush_size: f32) -> Self {
        Self {
            state: ToolState::Idle(tool),
            selection: None,
            hover: None,
            pointer: None,
            brush_size: brush_size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE),
        }
    }

    pub fn tool(&self) -> ToolKind {
        self.state.tool()
    }

    pub fn state(&self) -> &ToolState {
        &self.state
    }

    pub fn gesture(&self) -> Option<&ActiveGesture> {
        match &self.state {
            ToolState::Active(gesture) => Some(gesture),
            ToolState::Idle(_) => None,
        }
    }

    pub fn current_state_name(&self) -> &'static str {
        self.gesture().map_or("Idle", ActiveGesture::name)
    }

    pub fn selection(&self) -> Option<ShapeId> {
        self.selection
    }

    pub fn hover(&self) -> Option<HoverTarget> {
        self.hover
    }

    pub fn pointer(&self) -> Option<Pos2> {
        self.pointer
    }

    pub fn brush_size(&self) -> f32 {
        self.brush_size
    }

    pub fn set_brush_size(&mut self, size: f32) {
        self.brush_size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
    }

    pub fn is_pen_authoring(&self) -> bool {
        matches!(self.state, ToolState::Active(ActiveGesture::PenAuthoring(_)))
    }

    /// Switches tool. Leaving the pen finishes its polygon; any other
    /// gesture in flight is dropped along with the selection.
    pub fn set_tool(&mut self, tool: ToolKind, store: &mut ShapeStore) {
        if tool == self.tool() {
            return;
        }
        if self.is_pen_authoring() {
            self.finish_pen(store);
        }
        info!("Switching tool {} -> {}", self.tool().name(), tool.name());
        self.state = ToolState::Idle(tool);
        self.selection = None;
        self.hover = None;
    }

    pub fn on_pointer_down(&mut self, pos: Pos2, store: &mut ShapeStore) {
        self.pointer = Some(pos);
        let tool = self.tool();
        match tool {
            ToolKind::Select => self.press_select(pos, store),
            ToolKind::Pen => self.press_pen(pos, store),
            ToolKind::Brush => {
                self.state = ToolState::Active(ActiveGesture::BrushStroke(BrushStroke::new(
                    pos,
                    self.brush_size,
                )));
            }
            ToolKind::Rect => {
                self.state = ToolState::Active(ActiveGesture::DragRect(ShapeDrag::new(pos)));
            }
            ToolKind::Circle => {
                self.state = ToolState::Active(ActiveGesture::DragCircle(ShapeDrag::new(pos)));
            }
        }
        debug!("Pointer down at {:?}: {}", pos, self.current_state_name());
    }

    fn press_select(&mut self, pos: Pos2, store: &ShapeStore) {
        let press = selection_tool::press(pos, self.selection, store);
        self.selection = press.shape_id();
        self.hover = self
            .selection
            .and_then(|id| selection_tool::hover(pos, store.get(id)));
        self.state = match press.into_gesture() {
            Some(gesture) => ToolState::Active(gesture),
            None => ToolState::Idle(ToolKind::Select),
        };
    }

    fn press_pen(&mut self, pos: Pos2, store: &mut ShapeStore) {
        let state = std::mem::replace(&mut self.state, ToolState::Idle(ToolKind::Pen));
        let mut path = match state {
            ToolState::Active(ActiveGesture::PenAuthoring(path)) => path,
            _ => PenPath::new(),
        };
        if path.is_closing_click(pos) {
            path.finish(store);
            return;
        }
        path.push(pos);
        self.state = ToolState::Active(ActiveGesture::PenAuthoring(path));
    }

    pub fn on_pointer_move(&mut self, pos: Pos2, primary_held: bool, store: &mut ShapeStore) {
        self.pointer = Some(pos);
        match &mut self.state {
            ToolState::Active(ActiveGesture::DragRect(drag))
            | ToolState::Active(ActiveGesture::DragCircle(drag)) => drag.update(pos),
            ToolState::Active(ActiveGesture::BrushStroke(stroke)) => {
                if primary_held {
                    stroke.add_point(pos);
                }
            }
            ToolState::Active(ActiveGesture::PenAuthoring(path)) => {
                if primary_held {
                    path.push(pos);
                }
            }
            ToolState::Active(ActiveGesture::SelectMove(drag)) => {
                apply_transform(store, drag.shape_id, drag.moved(pos));
            }
            ToolState::Active(ActiveGesture::SelectResize(drag)) => {
                apply_transform(store, drag.shape_id, drag.resized(pos));
            }
            ToolState::Active(ActiveGesture::SelectRotate(drag)) => {
                apply_transform(store, drag.shape_id, drag.rotated(pos));
            }
            ToolState::Idle(ToolKind::Select) => {
                let selected = self.selection.and_then(|id| store.get(id));
                self.hover = selection_tool::hover(pos, selected);
            }
            ToolState::Idle(_) => {}
        }
    }

    /// Ends the current gesture. Pen authoring survives pointer-up.
    pub fn on_pointer_up(&mut self, pos: Pos2, store: &mut ShapeStore) {
        self.pointer = Some(pos);
        let tool = self.tool();
        let state = std::mem::replace(&mut self.state, ToolState::Idle(tool));
        match state {
            ToolState::Active(ActiveGesture::DragRect(drag)) => {
                drag.commit_rect(pos, store);
            }
            ToolState::Active(ActiveGesture::DragCircle(drag)) => {
                drag.commit_circle(pos, store);
            }
            ToolState::Active(ActiveGesture::BrushStroke(stroke)) => {
                stroke.commit(store);
            }
            ToolState::Active(ActiveGesture::PenAuthoring(path)) => {
                self.state = ToolState::Active(ActiveGesture::PenAuthoring(path));
            }
            ToolState::Active(gesture) => {
                debug!("Finished {}", gesture.name());
                let selected = self.selection.and_then(|id| store.get(id));
                self.hover = selection_tool::hover(pos, selected);
            }
            ToolState::Idle(_) => {}
        }
    }

    /// The pointer left the surface: end the gesture as if released there.
    pub fn on_pointer_leave(&mut self, pos: Pos2, store: &mut ShapeStore) {
        self.on_pointer_up(pos, store);
        self.pointer = None;
        self.hover = None;
    }

    pub fn on_double_click(&mut self, store: &mut ShapeStore) {
        if self.is_pen_authoring() {
            self.finish_pen(store);
        }
    }

    /// Returns true when the key was consumed.
    pub fn on_key(&mut self, key: EditorKey, store: &mut ShapeStore) -> bool {
        match key {
            EditorKey::Enter if self.is_pen_authoring() => {
                self.finish_pen(store);
                true
            }
            EditorKey::Escape if self.is_pen_authoring() => {
                self.cancel_pen();
                true
            }
            EditorKey::Delete if self.tool() == ToolKind::Select && self.gesture().is_none() => {
                self.delete_selected(store)
            }
            _ => false,
        }
    }

    /// Commits the pen polygon when it has at least three vertices.
    pub fn finish_pen(&mut self, store: &mut ShapeStore) -> Option<ShapeId> {
        if !self.is_pen_authoring() {
            return None;
        }
        match std::mem::replace(&mut self.state, ToolState::Idle(ToolKind::Pen)) {
            ToolState::Active(ActiveGesture::PenAuthoring(path)) => path.finish(store),
            _ => None,
        }
    }

    pub fn cancel_pen(&mut self) {
        if self.is_pen_authoring() {
            debug!("Pen path cancelled");
            self.state = ToolState::Idle(ToolKind::Pen);
        }
    }

    pub fn delete_selected(&mut self, store: &mut ShapeStore) -> bool {
        let Some(id) = self.selection.take() else {
            return false;
        };
        self.hover = None;
        let removed = store.remove(id).is_some();
        if removed {
            info!("Deleted shape {}", id);
        }
        removed
    }

    /// Drops any gesture and selection, keeping the tool.
    pub fn reset(&mut self) {
        self.state = ToolState::Idle(self.tool());
        self.selection = None;
        self.hover = None;
    }

    pub fn overlay<'a>(&'a self, store: &ShapeStore) -> ToolOverlay<'a> {
        let selection = if self.tool() == ToolKind::Select {
            self.selection
                .and_then(|id| store.get(id))
                .and_then(bounds_in_screen_space)
                .map(|bounds| SelectionOverlay {
                    bounds,
                    highlighted: self.hover.and_then(|h| h.handle()),
                })
        } else {
            None
        };
        ToolOverlay {
            tool: self.tool(),
            gesture: self.gesture(),
            pointer: self.pointer,
            brush_size: self.brush_size,
            selection,
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self.tool() {
            ToolKind::Select => self.hover.map_or(CursorIcon::Default, |h| h.cursor_icon()),
            _ => CursorIcon::Crosshair,
        }
    }
}

fn apply_transform(store: &mut ShapeStore, id: ShapeId, transform: crate::geometry::Transform) {
    if let Some(shape) = store.get_mut(id) {
        shape.transform = transform;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeGeometry;

    #[test]
    fn test_gesture_determines_tool() {
        let gesture = ActiveGesture::DragCircle(ShapeDrag::new(Pos2::ZERO));
        assert_eq!(ToolState::Active(gesture).tool(), ToolKind::Circle);
        assert_eq!(ToolState::Idle(ToolKind::Pen).tool(), ToolKind::Pen);
    }

    #[test]
    fn test_select_hover_sets_cursor() {
        let mut store = ShapeStore::new();
        store.add(ShapeGeometry::Rect(Rect::from_min_max(
            Pos2::new(0.0, 0.0),
            Pos2::new(100.0, 100.0),
        )));
        let mut tools = ToolStateMachine::new(ToolKind::Select, DEFAULT_BRUSH_SIZE);
        tools.on_pointer_down(Pos2::new(50.0, 50.0), &mut store);
        tools.on_pointer_up(Pos2::new(50.0, 50.0), &mut store);

        tools.on_pointer_move(Pos2::new(100.0, 50.0), false, &mut store);
        assert_eq!(tools.cursor_icon(), CursorIcon::ResizeHorizontal);
        assert_eq!(
            tools.overlay(&store).selection.and_then(|s| s.highlighted),
            Some(Handle::MiddleRight)
        );

        tools.on_pointer_move(Pos2::new(50.0, 50.0), false, &mut store);
        assert_eq!(tools.cursor_icon(), CursorIcon::Move);
    }

    #[test]
    fn test_brush_cursor_outside_select() {
        let tools = ToolStateMachine::default();
        assert_eq!(tools.tool(), ToolKind::Brush);
        assert_eq!(tools.cursor_icon(), CursorIcon::Crosshair);
    }
}
