use std::path::PathBuf;
use std::sync::Arc;

use crate::background::has_image_extension;

/// An image file dropped onto the window
#[derive(Debug, Clone)]
pub enum DroppedImage {
    /// Contents delivered in memory
    Bytes { name: String, bytes: Arc<[u8]> },
    /// Native drop, read from disk when loaded
    Path(PathBuf),
}

/// Collects the image files dropped this frame
pub fn take_dropped_images(ctx: &egui::Context) -> Vec<DroppedImage> {
    let dropped = ctx.input(|i| i.raw.dropped_files.clone());
    dropped.into_iter().filter_map(classify).collect()
}

fn classify(file: egui::DroppedFile) -> Option<DroppedImage> {
    let looks_like_image = if !file.mime.is_empty() {
        file.mime.starts_with("image/")
    } else {
        file.path.as_deref().is_some_and(has_image_extension)
            || has_image_extension(std::path::Path::new(&file.name))
    };
    if !looks_like_image {
        log::warn!("Dropped file is not a supported type: {}", display_name(&file));
        return None;
    }

    if let Some(bytes) = file.bytes.clone() {
        log::info!("Processing image from memory: {} ({} bytes)", display_name(&file), bytes.len());
        Some(DroppedImage::Bytes {
            name: display_name(&file),
            bytes,
        })
    } else if let Some(path) = file.path {
        log::info!("Processing image from path: {}", path.display());
        Some(DroppedImage::Path(path))
    } else {
        log::warn!("Dropped file has no accessible data: {}", file.name);
        None
    }
}

fn display_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}
