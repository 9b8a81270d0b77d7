use std::fs;
use std::path::{Path, PathBuf};

use egui::Color32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tools::{DrawingState, clamp_brush_size, parse_hex_color};

/// Environment variable naming the config file for the desktop app
pub const CONFIG_ENV_VAR: &str = "PROMPT_CANVAS_CONFIG";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Editor configuration. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of history snapshots; `None` keeps every one
    pub max_history: Option<usize>,
    pub default_brush_size: f32,
    /// `#rrggbb`
    pub default_color: String,
    /// Where exported PNGs are written
    pub export_dir: PathBuf,
    /// JSON file holding generations, collections and settings
    pub library_path: PathBuf,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history: Some(50),
            default_brush_size: 5.0,
            default_color: "#000000".to_owned(),
            export_dir: PathBuf::from("."),
            library_path: PathBuf::from("prompt_canvas_library.json"),
        }
    }
}

impl EditorConfig {
    /// Read a JSON config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from the file named by `PROMPT_CANVAS_CONFIG`, if set
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Drawing settings a fresh session starts with
    pub fn drawing_defaults(&self) -> DrawingState {
        let color = parse_hex_color(&self.default_color).unwrap_or_else(|| {
            log::warn!("Invalid default color {:?}, using black", self.default_color);
            Color32::BLACK
        });
        DrawingState {
            color,
            brush_size: clamp_brush_size(self.default_brush_size),
            ..DrawingState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: EditorConfig = serde_json::from_str(r#"{ "max_history": null }"#).unwrap();
        assert_eq!(config.max_history, None);
        assert_eq!(config.default_brush_size, 5.0);
    }

    #[test]
    fn test_drawing_defaults_clamp_and_parse() {
        let config = EditorConfig {
            default_brush_size: 90.0,
            default_color: "#ff0000".to_owned(),
            ..EditorConfig::default()
        };
        let drawing = config.drawing_defaults();
        assert_eq!(drawing.brush_size, 50.0);
        assert_eq!(drawing.color, Color32::from_rgb(255, 0, 0));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = EditorConfig::load(Path::new("/nonexistent/prompt_canvas.json")).unwrap();
        assert_eq!(config, EditorConfig::default());
    }
}
