mod history;

pub use history::{HistorySnapshot, SnapshotHistory};

use egui::Color32;

use crate::error::EditorResult;
use crate::filter::{FilterKind, FilterPreset};
use crate::session::EditorSession;
use crate::tools::{ShapeKind, ToolMode};

/// User actions the editor UI issues against a session
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Set one filter parameter
    ApplyFilter { kind: FilterKind, value: f32 },
    /// Apply a named filter preset
    ApplyPreset(&'static FilterPreset),
    /// Every filter back to its identity value
    ResetFilters,
    /// Add to the rotation, e.g. +/-90 from the transform buttons
    Rotate(f32),
    SetTool(ToolMode),
    SetShape(ShapeKind),
    SetColor(Color32),
    SetBrushSize(f32),
    Undo,
    Redo,
}

impl Command {
    /// Run the command against the session
    pub fn execute(&self, session: &mut EditorSession) -> EditorResult<()> {
        match self {
            Command::ApplyFilter { kind, value } => {
                session.apply_filter(*kind, *value);
            }
            Command::ApplyPreset(preset) => session.apply_preset(preset),
            Command::ResetFilters => session.reset_filters(),
            Command::Rotate(degrees) => session.rotate_by(*degrees),
            Command::SetTool(mode) => session.set_tool(*mode),
            Command::SetShape(shape) => session.set_shape(*shape),
            Command::SetColor(color) => session.set_color(*color),
            Command::SetBrushSize(size) => {
                session.set_brush_size(*size);
            }
            Command::Undo => session.undo()?,
            Command::Redo => session.redo()?,
        }
        Ok(())
    }

    /// Short label for logs and the UI
    pub fn label(&self) -> String {
        match self {
            Command::ApplyFilter { kind, value } => format!("Set {kind} to {value}"),
            Command::ApplyPreset(preset) => format!("Preset {}", preset.name),
            Command::ResetFilters => "Reset filters".to_owned(),
            Command::Rotate(degrees) => format!("Rotate {degrees}°"),
            Command::SetTool(mode) => format!("Tool {}", mode.label()),
            Command::SetShape(shape) => format!("Shape {}", shape.label()),
            Command::SetColor(color) => format!("Color {}", crate::tools::to_hex_color(*color)),
            Command::SetBrushSize(size) => format!("Brush size {size}"),
            Command::Undo => "Undo".to_owned(),
            Command::Redo => "Redo".to_owned(),
        }
    }
}
