use egui::{Pos2, Vec2};

/// Placement of a shape on the canvas, applied around a pivot.
///
/// The pivot lives in the shape's local (authored) coordinates. Mapping a
/// local point `p` to the canvas is
/// `pivot + translation + R(rotation) * S(scale) * (p - pivot)`,
/// the same composition the rasterizer uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Offset applied after rotation and scale
    pub translation: Vec2,
    /// Scale factor (1.0 = original size)
    pub scale: Vec2,
    /// Rotation in radians, clockwise on screen (y points down)
    pub rotation: f32,
    /// Local-space point that rotation and scale are applied around
    pub pivot: Pos2,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity_at(Pos2::ZERO)
    }
}

impl Transform {
    /// Identity transform pivoting around `pivot`
    pub fn identity_at(pivot: Pos2) -> Self {
        Self {
            translation: Vec2::ZERO,
            scale: Vec2::splat(1.0),
            rotation: 0.0,
            pivot,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.translation == Vec2::ZERO && self.scale == Vec2::splat(1.0) && self.rotation == 0.0
    }

    /// Maps a local point to screen space.
    pub fn apply(&self, local: Pos2) -> Pos2 {
        let (sin, cos) = self.rotation.sin_cos();
        let d = (local - self.pivot) * self.scale;
        let rotated = Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos);
        self.pivot + self.translation + rotated
    }

    /// Maps a screen point back into local space.
    ///
    /// A zero scale on an axis is treated as 1 so the result stays finite.
    pub fn invert(&self, screen: Pos2) -> Pos2 {
        let (sin, cos) = (-self.rotation).sin_cos();
        let d = screen - (self.pivot + self.translation);
        let unrotated = Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos);
        let sx = if self.scale.x == 0.0 { 1.0 } else { self.scale.x };
        let sy = if self.scale.y == 0.0 { 1.0 } else { self.scale.y };
        self.pivot + Vec2::new(unrotated.x / sx, unrotated.y / sy)
    }

    /// The same mapping as [`Transform::apply`] as a rasterizer matrix.
    pub fn to_affine(&self) -> tiny_skia::Transform {
        let (sin, cos) = self.rotation.sin_cos();
        let sx = cos * self.scale.x;
        let kx = -sin * self.scale.y;
        let ky = sin * self.scale.x;
        let sy = cos * self.scale.y;
        let origin = self.pivot + self.translation;
        let tx = origin.x - (sx * self.pivot.x + kx * self.pivot.y);
        let ty = origin.y - (ky * self.pivot.x + sy * self.pivot.y);
        tiny_skia::Transform::from_row(sx, ky, kx, sy, tx, ty)
    }
}
