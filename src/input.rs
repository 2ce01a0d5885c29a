use egui::{Context, Key, PointerButton, Pos2, Rect};

use crate::tools::EditorKey;

/// Editor input in canvas pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasEvent {
    /// Primary button pressed over the canvas
    PointerDown(Pos2),
    /// Pointer moved over the canvas, or anywhere while a press is captured
    PointerMove { pos: Pos2, primary_held: bool },
    PointerUp(Pos2),
    /// Pointer left the canvas without a captured press
    PointerLeave(Pos2),
    DoubleClick,
    Key(EditorKey),
}

/// Maps a screen position onto the canvas pixel grid.
///
/// `canvas_rect` is where the canvas is shown on screen and `canvas_size` its
/// intrinsic pixel size, so the mapping stays correct at any display scale.
pub fn screen_to_canvas(screen: Pos2, canvas_rect: Rect, canvas_size: (u32, u32)) -> Pos2 {
    let sx = if canvas_rect.width() > 0.0 {
        canvas_size.0 as f32 / canvas_rect.width()
    } else {
        1.0
    };
    let sy = if canvas_rect.height() > 0.0 {
        canvas_size.1 as f32 / canvas_rect.height()
    } else {
        1.0
    };
    let local = screen - canvas_rect.min;
    Pos2::new(local.x * sx, local.y * sy)
}

/// Handles converting raw egui input into canvas events.
///
/// A press that starts on the canvas captures the pointer: moves and the
/// release are delivered even outside the canvas, and no leave is reported
/// until the button is released.
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    captured: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Process this frame's egui input into canvas events
    pub fn process_input(
        &mut self,
        ctx: &Context,
        canvas_rect: Rect,
        canvas_size: (u32, u32),
    ) -> Vec<CanvasEvent> {
        let keyboard_free = !ctx.wants_keyboard_input();
        let mut events = Vec::new();

        ctx.input(|input| {
            let hover = input.pointer.hover_pos();
            let on_canvas = hover.filter(|p| canvas_rect.contains(*p));
            let tracked = if self.captured { hover } else { on_canvas };

            match tracked {
                Some(screen) => {
                    let pos = screen_to_canvas(screen, canvas_rect, canvas_size);
                    if Some(pos) != self.last_pointer_pos {
                        events.push(CanvasEvent::PointerMove {
                            pos,
                            primary_held: input.pointer.button_down(PointerButton::Primary),
                        });
                    }
                    self.last_pointer_pos = Some(pos);
                }
                None => {
                    if let Some(last) = self.last_pointer_pos.take() {
                        if self.captured {
                            events.push(CanvasEvent::PointerUp(last));
                            self.captured = false;
                        } else {
                            events.push(CanvasEvent::PointerLeave(last));
                        }
                    }
                }
            }

            if input.pointer.button_pressed(PointerButton::Primary) {
                if let Some(screen) = on_canvas {
                    let pos = screen_to_canvas(screen, canvas_rect, canvas_size);
                    events.push(CanvasEvent::PointerDown(pos));
                    self.captured = true;
                    self.last_pointer_pos = Some(pos);
                }
            }
            if input.pointer.button_double_clicked(PointerButton::Primary) && on_canvas.is_some() {
                events.push(CanvasEvent::DoubleClick);
            }
            if input.pointer.button_released(PointerButton::Primary) && self.captured {
                let pos = hover
                    .map(|screen| screen_to_canvas(screen, canvas_rect, canvas_size))
                    .or(self.last_pointer_pos);
                if let Some(pos) = pos {
                    events.push(CanvasEvent::PointerUp(pos));
                }
                self.captured = false;
            }

            if keyboard_free {
                if input.key_pressed(Key::Enter) {
                    events.push(CanvasEvent::Key(EditorKey::Enter));
                }
                if input.key_pressed(Key::Escape) {
                    events.push(CanvasEvent::Key(EditorKey::Escape));
                }
                if input.key_pressed(Key::Delete) || input.key_pressed(Key::Backspace) {
                    events.push(CanvasEvent::Key(EditorKey::Delete));
                }
            }
        });

        events
    }
}
