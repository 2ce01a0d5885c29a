use crate::background::IMAGE_EXTENSIONS;
use crate::config::EditorConfig;
use crate::editor::MaskEditor;
use crate::file_handler::{take_dropped_images, DroppedImage};
use crate::input::{CanvasEvent, InputHandler};
use crate::panels::{central_panel, tools_panel};

pub struct MaskEditorApp {
    config: EditorConfig,
    /// Created on the first frame, once the canvas size is known
    editor: Option<MaskEditor>,
    input: InputHandler,
    texture: Option<egui::TextureHandle>,
    uploaded_revision: Option<u64>,
    status: Option<String>,
}

impl MaskEditorApp {
    /// Called once before the first frame.
    pub fn new(_cc: &eframe::CreationContext<'_>, config: EditorConfig) -> Self {
        Self {
            config,
            editor: None,
            input: InputHandler::new(),
            texture: None,
            uploaded_revision: None,
            status: None,
        }
    }

    pub fn editor(&self) -> Option<&MaskEditor> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut MaskEditor> {
        self.editor.as_mut()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_pointer_captured(&self) -> bool {
        self.input.is_captured()
    }

    /// Creates the editor on first call, then keeps its surfaces matched to
    /// the panel.
    pub fn sync_canvas_size(&mut self, (width, height): (u32, u32)) {
        match &mut self.editor {
            Some(editor) => {
                if editor.canvas_size() != (width, height) {
                    if let Err(err) = editor.resize_canvas(width, height) {
                        log::warn!("Canvas resize failed: {}", err);
                    }
                }
            }
            None => match MaskEditor::new(width, height, &self.config) {
                Ok(editor) => {
                    log::info!("Canvas created at {}x{}", width, height);
                    self.editor = Some(editor);
                }
                Err(err) => log::warn!("Canvas creation failed: {}", err),
            },
        }
    }

    pub fn handle_input(&mut self, ctx: &egui::Context, canvas_rect: egui::Rect, canvas_size: (u32, u32)) {
        let events = self.input.process_input(ctx, canvas_rect, canvas_size);
        let Some(editor) = &mut self.editor else {
            return;
        };
        for event in events {
            match event {
                CanvasEvent::PointerDown(pos) => editor.pointer_down(pos),
                CanvasEvent::PointerMove { pos, primary_held } => editor.pointer_move(pos, primary_held),
                CanvasEvent::PointerUp(pos) => editor.pointer_up(pos),
                CanvasEvent::PointerLeave(pos) => editor.pointer_leave(pos),
                CanvasEvent::DoubleClick => editor.double_click(),
                CanvasEvent::Key(key) => {
                    editor.key_pressed(key);
                }
            }
        }
    }

    /// The display surface as a texture, re-uploaded when it changed
    pub fn canvas_texture(&mut self, ctx: &egui::Context) -> Option<&egui::TextureHandle> {
        let editor = self.editor.as_ref()?;
        let revision = editor.revision();
        if self.texture.is_none() || self.uploaded_revision != Some(revision) {
            let image = editor.renderer().display_image();
            match &mut self.texture {
                Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
                None => {
                    self.texture = Some(ctx.load_texture("mask_canvas", image, egui::TextureOptions::LINEAR));
                }
            }
            self.uploaded_revision = Some(revision);
        }
        self.texture.as_ref()
    }

    pub fn pick_background(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &IMAGE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        let Some(editor) = &mut self.editor else {
            return;
        };
        self.status = match editor.load_background_path(&path) {
            Ok(()) => None,
            Err(err) => Some(format!("Background not loaded: {}", err)),
        };
    }

    fn load_dropped(&mut self, ctx: &egui::Context) {
        let dropped = take_dropped_images(ctx);
        let Some(editor) = &mut self.editor else {
            return;
        };
        // The last dropped image wins
        for image in dropped {
            let result = match image {
                DroppedImage::Bytes { name, bytes } => editor.load_background_bytes(&name, &bytes),
                DroppedImage::Path(path) => editor.load_background_path(&path),
            };
            self.status = result.err().map(|err| format!("Background not loaded: {}", err));
        }
    }

    /// Renders the mask at the export size and saves it into a chosen folder.
    pub fn export_mask(&mut self) {
        let Some(editor) = &self.editor else {
            return;
        };
        let mask = match editor.export() {
            Ok(mask) => mask,
            Err(err) => {
                log::warn!("Export failed: {}", err);
                self.status = Some(format!("Export failed: {}", err));
                return;
            }
        };
        let Some(dir) = rfd::FileDialog::new()
            .set_title(format!("Save {}", mask.file_name()))
            .pick_folder()
        else {
            return;
        };
        self.status = Some(match mask.save_to(&dir) {
            Ok(path) => format!("Saved {}", path.display()),
            Err(err) => {
                log::warn!("Export failed: {}", err);
                format!("Export failed: {}", err)
            }
        });
    }
}

impl eframe::App for MaskEditorApp {
    /// Called each time the UI needs repainting.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.load_dropped(ctx);
        tools_panel(self, ctx);
        central_panel(self, ctx);
    }
}
