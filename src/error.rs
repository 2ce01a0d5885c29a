use thiserror::Error;

/// Errors surfaced by the mask editor core.
///
/// Most failures inside the editor are recovered locally (logged and
/// ignored); these are the ones an outer caller may want to report.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Invalid surface size: {width}x{height}")]
    InvalidSurfaceSize { width: u32, height: u32 },

    #[error("Failed to decode image: {0}")]
    ImageDecode(#[source] image::ImageError),

    #[error("Failed to encode mask: {0}")]
    ImageEncode(#[source] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;
