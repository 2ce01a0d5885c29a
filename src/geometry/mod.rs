//! Geometry engine: affine placement, bounds and hit testing.
//!
//! Everything here is pure and works without a rendering surface.

mod bounds;
pub mod hit_testing;
mod transform;

pub use bounds::{bounds_in_screen_space, CIRCLE_BOUNDS_SAMPLES};
pub use hit_testing::{
    distance_to_line_segment, handle_at, handle_at_bounds, hit_test_topmost, point_in_polygon,
    point_in_shape, Handle, HandleHit, HandleKind, EDGE_TOLERANCE, HANDLE_DRAW_SIZE,
    HANDLE_HIT_RADIUS,
};
pub use transform::Transform;
