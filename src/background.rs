use std::path::Path;

use log::{debug, info};
use tiny_skia::{ColorU8, Pixmap};

use crate::error::{EditorError, EditorResult};

/// Decoded background image drawn behind the tinted mask.
#[derive(Debug, Clone)]
pub struct BackgroundImage {
    name: String,
    pixmap: Pixmap,
}

impl BackgroundImage {
    /// Decodes an encoded image (PNG, JPEG, ...) into a premultiplied pixmap.
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> EditorResult<Self> {
        let name = name.into();
        let decoded = image::load_from_memory(bytes).map_err(EditorError::ImageDecode)?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        debug!("Decoded background {}: {}x{}", name, width, height);

        let mut pixmap = Pixmap::new(width, height)
            .ok_or(EditorError::InvalidSurfaceSize { width, height })?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }

        info!("Loaded background {} ({}x{})", name, width, height);
        Ok(Self { name, pixmap })
    }

    pub fn from_path(path: &Path) -> EditorResult<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_bytes(name, &bytes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Natural pixel size of the image
    pub fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

/// Lowercase extensions accepted as backgrounds
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// True for file names with an extension the decoder understands
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}
