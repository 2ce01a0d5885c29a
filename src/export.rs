//! Binary mask export.
//!
//! Shapes are redrawn at the requested resolution into a fresh surface
//! (white on opaque black, no tint, background or UI chrome) and encoded as
//! a single-channel PNG.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{GrayImage, ImageFormat, Luma};
use log::info;
use tiny_skia::{Color, Pixmap, Transform};

use crate::error::{EditorError, EditorResult};
use crate::renderer::{draw_shape, mask_paint};
use crate::shape::Shape;

pub const MIN_EXPORT_SIZE: u32 = 64;
pub const MAX_EXPORT_SIZE: u32 = 4096;

/// Coverage at or above this level exports as white
const WHITE_THRESHOLD: u8 = 128;

/// Output resolution of an exported mask, always within
/// `MIN_EXPORT_SIZE..=MAX_EXPORT_SIZE` on both sides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSize {
    width: u32,
    height: u32,
}

impl ExportSize {
    /// Builds a size with both sides clamped to the supported range
    pub fn clamped(width: u32, height: u32) -> Self {
        Self {
            width: width.clamp(MIN_EXPORT_SIZE, MAX_EXPORT_SIZE),
            height: height.clamp(MIN_EXPORT_SIZE, MAX_EXPORT_SIZE),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// A rendered black/white mask
#[derive(Debug, Clone)]
pub struct MaskImage {
    image: GrayImage,
}

impl MaskImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    /// True for a white (masked) pixel; out-of-range reads as black
    pub fn is_white(&self, x: u32, y: u32) -> bool {
        self.image
            .get_pixel_checked(x, y)
            .is_some_and(|p| p.0[0] == u8::MAX)
    }

    /// `mask_{width}x{height}.png`
    pub fn file_name(&self) -> String {
        format!("mask_{}x{}.png", self.width(), self.height())
    }

    pub fn encode_png(&self) -> EditorResult<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        self.image
            .write_to(&mut out, ImageFormat::Png)
            .map_err(EditorError::ImageEncode)?;
        Ok(out.into_inner())
    }

    /// Writes the PNG into `dir` under [`MaskImage::file_name`].
    pub fn save_to(&self, dir: &Path) -> EditorResult<PathBuf> {
        let path = dir.join(self.file_name());
        std::fs::write(&path, self.encode_png()?)?;
        info!("Exported mask to {}", path.display());
        Ok(path)
    }
}

/// Rasterizes `shapes` at `export_size`.
///
/// Canvas coordinates are mapped with the per-axis ratio between the export
/// and canvas sizes, so silhouettes keep their relative placement at any
/// resolution.
pub fn export_mask(
    shapes: &[Shape],
    canvas_size: (u32, u32),
    export_size: ExportSize,
) -> EditorResult<MaskImage> {
    let (canvas_w, canvas_h) = canvas_size;
    if canvas_w == 0 || canvas_h == 0 {
        return Err(EditorError::InvalidSurfaceSize {
            width: canvas_w,
            height: canvas_h,
        });
    }
    let (width, height) = (export_size.width(), export_size.height());
    let mut pixmap = Pixmap::new(width, height).ok_or(EditorError::InvalidSurfaceSize { width, height })?;
    pixmap.fill(Color::BLACK);

    let global = Transform::from_scale(width as f32 / canvas_w as f32, height as f32 / canvas_h as f32);
    let paint = mask_paint();
    for shape in shapes {
        draw_shape(&mut pixmap, shape, global, &paint);
    }

    // Opaque surface, so the red channel is the white coverage
    let data = pixmap.data();
    let image = GrayImage::from_fn(width, height, |x, y| {
        let idx = (y as usize * width as usize + x as usize) * 4;
        if data[idx] >= WHITE_THRESHOLD {
            Luma([u8::MAX])
        } else {
            Luma([0])
        }
    });

    info!("Rendered {} shapes into {}x{} mask", shapes.len(), width, height);
    Ok(MaskImage { image })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id_generator::ShapeId;
    use crate::shape::ShapeGeometry;
    use egui::Pos2;

    #[test]
    fn test_export_size_is_clamped() {
        let size = ExportSize::clamped(10, 9000);
        assert_eq!((size.width(), size.height()), (MIN_EXPORT_SIZE, MAX_EXPORT_SIZE));
        let size = ExportSize::clamped(512, 256);
        assert_eq!((size.width(), size.height()), (512, 256));
        let size = ExportSize::clamped(0, u32::MAX);
        assert_eq!((size.width(), size.height()), (MIN_EXPORT_SIZE, MAX_EXPORT_SIZE));
    }

    #[test]
    fn test_export_at_largest_size() {
        let shape = Shape::new(
            ShapeId(1),
            ShapeGeometry::Rect(egui::Rect::from_min_max(Pos2::new(50.0, 50.0), Pos2::new(100.0, 100.0))),
        );
        let mask = export_mask(&[shape], (100, 100), ExportSize::clamped(u32::MAX, u32::MAX)).unwrap();
        assert_eq!((mask.width(), mask.height()), (MAX_EXPORT_SIZE, MAX_EXPORT_SIZE));
        assert!(mask.is_white(MAX_EXPORT_SIZE - 1, MAX_EXPORT_SIZE - 1));
        assert!(!mask.is_white(0, 0));
    }

    #[test]
    fn test_empty_store_exports_black() {
        let mask = export_mask(&[], (100, 100), ExportSize::clamped(64, 64)).unwrap();
        assert_eq!(mask.file_name(), "mask_64x64.png");
        assert!(mask.image().pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_png_decodes_back_as_grayscale() {
        let shape = Shape::new(
            ShapeId(1),
            ShapeGeometry::Rect(egui::Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(50.0, 100.0))),
        );
        let mask = export_mask(&[shape], (100, 100), ExportSize::clamped(100, 100)).unwrap();
        let bytes = mask.encode_png().unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_luma8();
        assert_eq!(decoded.dimensions(), (100, 100));
        assert_eq!(decoded.get_pixel(10, 50).0[0], 255);
        assert_eq!(decoded.get_pixel(90, 50).0[0], 0);
    }

    #[test]
    fn test_zero_canvas_is_rejected() {
        assert!(export_mask(&[], (0, 10), ExportSize::clamped(64, 64)).is_err());
    }
}
