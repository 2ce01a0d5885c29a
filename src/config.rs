use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::EditorResult;
use crate::export::ExportSize;
use crate::tools::{ToolKind, DEFAULT_BRUSH_SIZE, MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};

/// Environment variable naming an optional JSON config file
pub const CONFIG_ENV_VAR: &str = "MASK_EDITOR_CONFIG";

/// Start-up settings for the editor. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub tool: ToolKind,
    pub brush_size: f32,
    /// Fixed export resolution; when unset the first canvas size is used
    pub export_width: Option<u32>,
    pub export_height: Option<u32>,
    /// Initial window size in points
    pub window_size: [f32; 2],
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tool: ToolKind::Brush,
            brush_size: DEFAULT_BRUSH_SIZE,
            export_width: None,
            export_height: None,
            window_size: [1024.0, 768.0],
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.brush_size = config.brush_size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
        Ok(config)
    }

    pub fn from_path(path: &Path) -> EditorResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Loads the file named by `MASK_EDITOR_CONFIG`, falling back to the
    /// defaults when it is unset or unreadable.
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            return Self::default();
        };
        let path = Path::new(&path);
        match Self::from_path(path) {
            Ok(config) => {
                info!("Loaded editor config from {}", path.display());
                config
            }
            Err(err) => {
                warn!("Ignoring config {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Export size when both sides are configured
    pub fn export_size(&self) -> Option<ExportSize> {
        match (self.export_width, self.export_height) {
            (Some(w), Some(h)) => Some(ExportSize::clamped(w, h)),
            _ => None,
        }
    }
}
