//! Raster surfaces for the live editor.
//!
//! The renderer owns two equally sized pixmaps: the mask (white shapes on
//! transparent) and the display the user sees (tinted mask over a
//! background, plus tool chrome).

use log::{debug, warn};
use tiny_skia::{
    BlendMode, Color, FilterQuality, Paint, Pixmap, PixmapPaint, Rect, Transform,
};

use crate::background::BackgroundImage;
use crate::error::{EditorError, EditorResult};
use crate::shape::Shape;
use crate::tools::{ActiveGesture, ToolOverlay};

mod overlay;
pub mod shape_painter;

pub use shape_painter::{draw_shape, mask_paint};

/// Edge length of one checkerboard tile in pixels
pub const CHECKER_TILE: u32 = 16;

/// Everything a render pass reads
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub shapes: &'a [Shape],
    pub overlay: ToolOverlay<'a>,
    pub background: Option<&'a BackgroundImage>,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    mask: Pixmap,
    display: Pixmap,
    checkerboard: Pixmap,
}

fn new_surface(width: u32, height: u32) -> EditorResult<Pixmap> {
    Pixmap::new(width, height).ok_or(EditorError::InvalidSurfaceSize { width, height })
}

fn tint_paint() -> Paint<'static> {
    let mut paint = Paint::default();
    // rgba(255, 0, 0, 0.35)
    paint.set_color(Color::from_rgba8(255, 0, 0, 89));
    paint.blend_mode = BlendMode::SourceIn;
    paint
}

fn checkerboard(width: u32, height: u32) -> EditorResult<Pixmap> {
    let mut pixmap = new_surface(width, height)?;
    pixmap.fill(Color::from_rgba8(0xee, 0xee, 0xee, 255));

    let mut dark = Paint::default();
    dark.set_color(Color::from_rgba8(0xcc, 0xcc, 0xcc, 255));
    dark.anti_alias = false;

    for ty in 0..height.div_ceil(CHECKER_TILE) {
        for tx in 0..width.div_ceil(CHECKER_TILE) {
            if (tx + ty) % 2 == 0 {
                continue;
            }
            let tile = CHECKER_TILE as f32;
            if let Some(rect) = Rect::from_xywh(tx as f32 * tile, ty as f32 * tile, tile, tile) {
                pixmap.fill_rect(rect, &dark, Transform::identity(), None);
            }
        }
    }
    Ok(pixmap)
}

impl Renderer {
    /// Creates blank surfaces of the given size
    ///
    /// Returns:
    ///     EditorResult<Self>: fails for a zero width or height
    pub fn new(width: u32, height: u32) -> EditorResult<Self> {
        Ok(Self {
            mask: new_surface(width, height)?,
            display: new_surface(width, height)?,
            checkerboard: checkerboard(width, height)?,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.mask.width(), self.mask.height())
    }

    pub fn mask(&self) -> &Pixmap {
        &self.mask
    }

    pub fn display(&self) -> &Pixmap {
        &self.display
    }

    /// Reallocates both surfaces, carrying the old mask over scaled to the
    /// new size.
    pub fn resize(&mut self, width: u32, height: u32) -> EditorResult<()> {
        if self.size() == (width, height) {
            return Ok(());
        }
        let (old_w, old_h) = self.size();
        let mut mask = new_surface(width, height)?;
        let scale = Transform::from_scale(width as f32 / old_w as f32, height as f32 / old_h as f32);
        let paint = PixmapPaint {
            quality: FilterQuality::Bicubic,
            ..Default::default()
        };
        mask.draw_pixmap(0, 0, self.mask.as_ref(), &paint, scale, None);

        self.mask = mask;
        self.display = new_surface(width, height)?;
        self.checkerboard = checkerboard(width, height)?;
        debug!("Resized surfaces {}x{} -> {}x{}", old_w, old_h, width, height);
        Ok(())
    }

    /// Redraws both surfaces from scratch. Identical input gives identical
    /// pixels.
    pub fn render(&mut self, input: &RenderInput<'_>) {
        self.render_mask(input);
        self.composite_display(input.background);
        overlay::draw_overlay(&mut self.display, &input.overlay);
    }

    fn render_mask(&mut self, input: &RenderInput<'_>) {
        self.mask.fill(Color::TRANSPARENT);
        let paint = mask_paint();
        for shape in input.shapes {
            draw_shape(&mut self.mask, shape, Transform::identity(), &paint);
        }
        if let Some(ActiveGesture::BrushStroke(stroke)) = input.overlay.gesture {
            shape_painter::draw_brush_points(
                &mut self.mask,
                stroke.points(),
                stroke.width(),
                Transform::identity(),
                &paint,
            );
        }
    }

    fn composite_display(&mut self, background: Option<&BackgroundImage>) {
        self.display.fill(Color::TRANSPARENT);
        self.display.draw_pixmap(
            0,
            0,
            self.mask.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );

        let (width, height) = self.size();
        match Rect::from_xywh(0.0, 0.0, width as f32, height as f32) {
            Some(full) => self.display.fill_rect(full, &tint_paint(), Transform::identity(), None),
            None => warn!("Skipping mask tint for {}x{} surface", width, height),
        }

        let behind = PixmapPaint {
            blend_mode: BlendMode::DestinationOver,
            quality: FilterQuality::Bicubic,
            ..Default::default()
        };
        match background {
            Some(bg) => {
                let (bw, bh) = bg.size();
                let stretch =
                    Transform::from_scale(width as f32 / bw as f32, height as f32 / bh as f32);
                self.display
                    .draw_pixmap(0, 0, bg.pixmap().as_ref(), &behind, stretch, None);
            }
            None => {
                let tiles = PixmapPaint {
                    quality: FilterQuality::Nearest,
                    ..behind
                };
                self.display.draw_pixmap(
                    0,
                    0,
                    self.checkerboard.as_ref(),
                    &tiles,
                    Transform::identity(),
                    None,
                );
            }
        }
    }

    /// True when no mask pixel has any coverage
    pub fn mask_is_empty(&self) -> bool {
        self.mask.pixels().iter().all(|p| p.alpha() == 0)
    }

    /// The display surface as an egui image ready for texture upload
    pub fn display_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_premultiplied(
            [self.display.width() as usize, self.display.height() as usize],
            self.display.data(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape_store::ShapeStore;
    use crate::shape::ShapeGeometry;
    use crate::tools::{ToolKind, ToolStateMachine};
    use egui::Pos2;

    fn rect_store() -> ShapeStore {
        let mut store = ShapeStore::new();
        store.add(ShapeGeometry::Rect(egui::Rect::from_min_max(
            Pos2::new(8.0, 8.0),
            Pos2::new(24.0, 24.0),
        )));
        store
    }

    fn render(renderer: &mut Renderer, store: &ShapeStore, tools: &ToolStateMachine) {
        let input = RenderInput {
            shapes: store.shapes(),
            overlay: tools.overlay(store),
            background: None,
        };
        renderer.render(&input);
    }

    #[test]
    fn test_zero_size_surface_is_rejected() {
        assert!(matches!(
            Renderer::new(0, 10),
            Err(EditorError::InvalidSurfaceSize { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_display_tints_mask_over_checkerboard() {
        let store = rect_store();
        let tools = ToolStateMachine::new(ToolKind::Rect, 24.0);
        let mut renderer = Renderer::new(64, 64).unwrap();
        render(&mut renderer, &store, &tools);

        let inside = renderer.display().pixel(16, 16).unwrap();
        assert_eq!(inside.alpha(), 255);
        assert!(inside.red() > inside.green());

        // Untouched area shows the first (light) checker tile
        let outside = renderer.display().pixel(40, 40).unwrap();
        assert_eq!((outside.red(), outside.green(), outside.alpha()), (0xee, 0xee, 255));
        let dark_tile = renderer.display().pixel(56, 40).unwrap();
        assert_eq!(dark_tile.red(), 0xcc);
    }

    #[test]
    fn test_render_is_idempotent() {
        let store = rect_store();
        let tools = ToolStateMachine::new(ToolKind::Select, 24.0);
        let mut renderer = Renderer::new(48, 48).unwrap();
        render(&mut renderer, &store, &tools);
        let first = renderer.display().data().to_vec();
        render(&mut renderer, &store, &tools);
        assert_eq!(first, renderer.display().data());
    }

    #[test]
    fn test_resize_keeps_mask_content() {
        let store = rect_store();
        let tools = ToolStateMachine::new(ToolKind::Rect, 24.0);
        let mut renderer = Renderer::new(32, 32).unwrap();
        render(&mut renderer, &store, &tools);

        renderer.resize(64, 64).unwrap();
        assert_eq!(renderer.size(), (64, 64));
        assert!(!renderer.mask_is_empty());
        assert!(renderer.mask().pixel(32, 32).unwrap().alpha() > 200);
        assert_eq!(renderer.mask().pixel(4, 4).unwrap().alpha(), 0);
    }

    fn render_over(renderer: &mut Renderer, store: &ShapeStore, tools: &ToolStateMachine, bg: &BackgroundImage) {
        let input = RenderInput {
            shapes: store.shapes(),
            overlay: tools.overlay(store),
            background: Some(bg),
        };
        renderer.render(&input);
    }

    // Accent blue drawn over the light checker
    fn is_accent(px: tiny_skia::PremultipliedColorU8) -> bool {
        px.alpha() == 255 && px.blue() > px.red().saturating_add(80)
    }

    fn is_light_tile(px: tiny_skia::PremultipliedColorU8) -> bool {
        (px.red(), px.green(), px.blue(), px.alpha()) == (0xee, 0xee, 0xee, 255)
    }

    /// Pixels whose centre lies within `tolerance` of the circle
    fn ring_pixels(pixmap: &Pixmap, center: Pos2, radius: f32, tolerance: f32) -> Vec<tiny_skia::PremultipliedColorU8> {
        let mut out = Vec::new();
        for y in 0..pixmap.height() {
            for x in 0..pixmap.width() {
                let d = Pos2::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                if (d - radius).abs() <= tolerance {
                    out.extend(pixmap.pixel(x, y));
                }
            }
        }
        out
    }

    #[test]
    fn test_background_is_stretched_behind_tint() {
        let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([10, 20, 30, 255]));
        let mut png = std::io::Cursor::new(Vec::new());
        img.write_to(&mut png, image::ImageFormat::Png).unwrap();
        let bg = BackgroundImage::from_bytes("bg.png", png.get_ref()).unwrap();

        let store = rect_store();
        let tools = ToolStateMachine::new(ToolKind::Select, 24.0);
        let mut renderer = Renderer::new(64, 64).unwrap();
        render_over(&mut renderer, &store, &tools, &bg);

        // Far from the 4x4 source, so stretched rather than tiled or clipped
        let plain = renderer.display().pixel(50, 50).unwrap();
        assert!(plain.alpha() >= 254);
        assert!(plain.red().abs_diff(10) <= 2);
        assert!(plain.green().abs_diff(20) <= 2);
        assert!(plain.blue().abs_diff(30) <= 2);

        let tinted = renderer.display().pixel(16, 16).unwrap();
        assert!(tinted.alpha() >= 254);
        assert!(tinted.red() > 80);
        assert!(tinted.green() < 20);
    }

    #[test]
    fn test_rect_preview_is_dashed_outline() {
        let mut store = ShapeStore::new();
        let mut tools = ToolStateMachine::new(ToolKind::Rect, 24.0);
        tools.on_pointer_down(Pos2::new(10.0, 10.0), &mut store);
        tools.on_pointer_move(Pos2::new(50.0, 40.0), true, &mut store);
        let mut renderer = Renderer::new(64, 64).unwrap();
        render(&mut renderer, &store, &tools);

        // First dash of the top edge, then the gap after it
        assert!(is_accent(renderer.display().pixel(12, 10).unwrap()));
        let gap = renderer.display().pixel(19, 10).unwrap();
        assert_eq!((gap.red(), gap.blue(), gap.alpha()), (0xcc, 0xcc, 255));
        // Nothing committed and nothing filled
        assert!(renderer.mask_is_empty());
        assert!(is_light_tile(renderer.display().pixel(30, 25).unwrap()));
    }

    #[test]
    fn test_circle_preview_is_outline_only() {
        let mut store = ShapeStore::new();
        let mut tools = ToolStateMachine::new(ToolKind::Circle, 24.0);
        let center = Pos2::new(50.0, 50.0);
        tools.on_pointer_down(center, &mut store);
        tools.on_pointer_move(Pos2::new(70.0, 50.0), true, &mut store);
        let mut renderer = Renderer::new(100, 100).unwrap();
        render(&mut renderer, &store, &tools);

        let ring = ring_pixels(renderer.display(), center, 20.0, 0.5);
        let on = ring.iter().filter(|px| is_accent(**px)).count();
        assert!(on > 0);
        // Dashed, so part of the ring stays clear
        assert!(on < ring.len());
        assert!(ring_pixels(renderer.display(), center, 10.0, 5.0).iter().all(|px| !is_accent(*px)));
    }

    #[test]
    fn test_pen_preview_fills_through_pointer() {
        let mut store = ShapeStore::new();
        let mut tools = ToolStateMachine::new(ToolKind::Pen, 24.0);
        for pos in [Pos2::new(10.0, 10.0), Pos2::new(60.0, 10.0)] {
            tools.on_pointer_down(pos, &mut store);
            tools.on_pointer_up(pos, &mut store);
        }
        // Hovering supplies the third corner
        tools.on_pointer_move(Pos2::new(60.0, 60.0), false, &mut store);
        let mut renderer = Renderer::new(64, 64).unwrap();
        render(&mut renderer, &store, &tools);

        let inside = renderer.display().pixel(50, 20).unwrap();
        assert_eq!(inside.alpha(), 255);
        assert!(inside.red() > inside.green() + 40);
        assert!(is_light_tile(renderer.display().pixel(20, 50).unwrap()));
        assert!(store.is_empty());
    }

    #[test]
    fn test_hovered_handle_is_highlighted() {
        let mut store = ShapeStore::new();
        store.add(ShapeGeometry::Rect(egui::Rect::from_min_max(
            Pos2::new(20.0, 20.0),
            Pos2::new(60.0, 60.0),
        )));
        let mut tools = ToolStateMachine::new(ToolKind::Select, 24.0);
        tools.on_pointer_down(Pos2::new(40.0, 40.0), &mut store);
        tools.on_pointer_up(Pos2::new(40.0, 40.0), &mut store);
        tools.on_pointer_move(Pos2::new(20.0, 20.0), false, &mut store);
        let mut renderer = Renderer::new(80, 80).unwrap();
        render(&mut renderer, &store, &tools);

        let hovered = renderer.display().pixel(17, 17).unwrap();
        assert_eq!((hovered.red(), hovered.green(), hovered.blue(), hovered.alpha()), (0x00, 0xa2, 0xff, 255));
        let idle = renderer.display().pixel(63, 63).unwrap();
        assert_eq!((idle.red(), idle.green(), idle.blue(), idle.alpha()), (255, 255, 255, 255));
    }

    #[test]
    fn test_brush_cursor_drawn_while_idle() {
        let mut store = ShapeStore::new();
        let mut tools = ToolStateMachine::new(ToolKind::Brush, 24.0);
        let pointer = Pos2::new(40.0, 40.0);
        tools.on_pointer_move(pointer, false, &mut store);
        let mut renderer = Renderer::new(80, 80).unwrap();
        render(&mut renderer, &store, &tools);

        assert!(renderer.mask_is_empty());
        let ring = ring_pixels(renderer.display(), pointer, 12.0, 0.5);
        assert!(ring.iter().any(|px| is_accent(*px)));
        assert!(!is_accent(renderer.display().pixel(40, 40).unwrap()));
    }

    #[test]
    fn test_display_image_matches_surface() {
        let renderer = Renderer::new(20, 10).unwrap();
        assert_eq!(renderer.display_image().size, [20, 10]);
    }
}
