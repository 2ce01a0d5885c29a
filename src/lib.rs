#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod background;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod file_handler;
pub mod geometry;
pub mod id_generator;
pub mod input;
pub mod panels;
pub mod renderer;
pub mod shape;
pub mod shape_store;
pub mod tools;

pub use app::MaskEditorApp;
pub use editor::MaskEditor;
pub use error::{EditorError, EditorResult};
pub use export::{ExportSize, MaskImage};
pub use renderer::Renderer;
pub use shape::{Shape, ShapeGeometry};
pub use shape_store::ShapeStore;
pub use tools::{EditorKey, ToolKind};
