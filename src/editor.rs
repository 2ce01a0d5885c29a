//! One mask editing session.
//!
//! `MaskEditor` ties the shape store, the tool state machine, the renderer
//! and the optional background together. It is the only type the UI talks
//! to and it works without a window, which is what the integration tests
//! drive.
//!
//! Every mutating call re-renders both surfaces before returning, so the
//! display always reflects the latest state. [`MaskEditor::revision`]
//! increases with every render so a UI can tell when to upload a new
//! texture.
//!
//! ```rust,no_run
//! use mask_editor::editor::MaskEditor;
//! use mask_editor::tools::ToolKind;
//! use egui::Pos2;
//!
//! let mut editor = MaskEditor::new(640, 480, &Default::default())?;
//! editor.set_tool(ToolKind::Rect);
//! editor.pointer_down(Pos2::new(10.0, 10.0));
//! editor.pointer_up(Pos2::new(110.0, 60.0));
//! let mask = editor.export()?;
//! # Ok::<(), mask_editor::error::EditorError>(())
//! ```

use std::path::Path;

use egui::{CursorIcon, Pos2};
use log::{debug, info, warn};

use crate::background::BackgroundImage;
use crate::config::EditorConfig;
use crate::error::EditorResult;
use crate::export::{export_mask, ExportSize, MaskImage};
use crate::id_generator::ShapeId;
use crate::renderer::{RenderInput, Renderer};
use crate::shape_store::ShapeStore;
use crate::tools::{EditorKey, ToolKind, ToolStateMachine};

#[derive(Debug)]
pub struct MaskEditor {
    store: ShapeStore,
    tools: ToolStateMachine,
    renderer: Renderer,
    background: Option<BackgroundImage>,
    export_size: ExportSize,
    revision: u64,
}

impl MaskEditor {
    /// Creates a session with a `width` x `height` canvas.
    ///
    /// The export size comes from the config, or else is seeded from the
    /// initial canvas size.
    pub fn new(width: u32, height: u32, config: &EditorConfig) -> EditorResult<Self> {
        let renderer = Renderer::new(width, height)?;
        let export_size = config
            .export_size()
            .unwrap_or_else(|| ExportSize::clamped(width, height));
        let mut editor = Self {
            store: ShapeStore::new(),
            tools: ToolStateMachine::new(config.tool, config.brush_size),
            renderer,
            background: None,
            export_size,
            revision: 0,
        };
        editor.render();
        Ok(editor)
    }

    fn render(&mut self) {
        let input = RenderInput {
            shapes: self.store.shapes(),
            overlay: self.tools.overlay(&self.store),
            background: self.background.as_ref(),
        };
        self.renderer.render(&input);
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    pub fn tools(&self) -> &ToolStateMachine {
        &self.tools
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn tool(&self) -> ToolKind {
        self.tools.tool()
    }

    pub fn selection(&self) -> Option<ShapeId> {
        self.tools.selection()
    }

    pub fn brush_size(&self) -> f32 {
        self.tools.brush_size()
    }

    pub fn export_size(&self) -> ExportSize {
        self.export_size
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        self.renderer.size()
    }

    pub fn background(&self) -> Option<&BackgroundImage> {
        self.background.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_pen_authoring(&self) -> bool {
        self.tools.is_pen_authoring()
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        self.tools.cursor_icon()
    }

    pub fn pointer_down(&mut self, pos: Pos2) {
        self.tools.on_pointer_down(pos, &mut self.store);
        self.render();
    }

    pub fn pointer_move(&mut self, pos: Pos2, primary_held: bool) {
        self.tools.on_pointer_move(pos, primary_held, &mut self.store);
        self.render();
    }

    pub fn pointer_up(&mut self, pos: Pos2) {
        self.tools.on_pointer_up(pos, &mut self.store);
        self.render();
    }

    pub fn pointer_leave(&mut self, last_pos: Pos2) {
        self.tools.on_pointer_leave(last_pos, &mut self.store);
        self.render();
    }

    pub fn double_click(&mut self) {
        self.tools.on_double_click(&mut self.store);
        self.render();
    }

    /// Returns true when the key did something.
    pub fn key_pressed(&mut self, key: EditorKey) -> bool {
        let handled = self.tools.on_key(key, &mut self.store);
        if handled {
            self.render();
        }
        handled
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tools.set_tool(tool, &mut self.store);
        self.render();
    }

    pub fn set_brush_size(&mut self, size: f32) {
        self.tools.set_brush_size(size);
        self.render();
    }

    pub fn set_export_size(&mut self, width: u32, height: u32) {
        self.export_size = ExportSize::clamped(width, height);
        debug!("Export size set to {}x{}", self.export_size.width(), self.export_size.height());
    }

    /// Resizes the canvas surfaces, keeping the current mask content.
    pub fn resize_canvas(&mut self, width: u32, height: u32) -> EditorResult<()> {
        self.renderer.resize(width, height)?;
        self.render();
        Ok(())
    }

    /// Removes every shape and any gesture in progress.
    pub fn clear(&mut self) {
        let count = self.store.len();
        self.store.clear();
        self.tools.reset();
        self.render();
        info!("Cleared {} shapes", count);
    }

    pub fn finish_pen(&mut self) -> Option<ShapeId> {
        let id = self.tools.finish_pen(&mut self.store);
        self.render();
        id
    }

    pub fn cancel_pen(&mut self) {
        self.tools.cancel_pen();
        self.render();
    }

    pub fn delete_selected(&mut self) -> bool {
        let removed = self.tools.delete_selected(&mut self.store);
        self.render();
        removed
    }

    /// Installs a background image and adopts its size for export.
    ///
    /// On failure the background is cleared so the checkerboard shows.
    pub fn load_background_bytes(&mut self, name: &str, bytes: &[u8]) -> EditorResult<()> {
        let result = BackgroundImage::from_bytes(name, bytes);
        self.install_background(result)
    }

    pub fn load_background_path(&mut self, path: &Path) -> EditorResult<()> {
        let result = BackgroundImage::from_path(path);
        self.install_background(result)
    }

    fn install_background(&mut self, result: EditorResult<BackgroundImage>) -> EditorResult<()> {
        match result {
            Ok(bg) => {
                let (w, h) = bg.size();
                self.export_size = ExportSize::clamped(w, h);
                self.background = Some(bg);
                self.render();
                Ok(())
            }
            Err(err) => {
                warn!("Failed to load background: {}", err);
                self.background = None;
                self.render();
                Err(err)
            }
        }
    }

    pub fn clear_background(&mut self) {
        if self.background.take().is_some() {
            debug!("Background cleared");
        }
        self.render();
    }

    /// Rasterizes the current shapes at the export size.
    pub fn export(&self) -> EditorResult<MaskImage> {
        export_mask(self.store.shapes(), self.renderer.size(), self.export_size)
    }
}
