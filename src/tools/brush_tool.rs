use egui::Pos2;
use image::RgbaImage;

use super::{DrawingState, Tool, ToolMode};
use crate::raster::Ink;
use crate::stroke::Stroke;

/// Freehand brush. In eraser mode the same path clears pixels instead.
#[derive(Clone, Debug, Default)]
pub struct BrushTool {
    // Transient state: the stroke being drawn (if any)
    current_stroke: Option<Stroke>,
}

impl BrushTool {
    pub fn current_stroke(&self) -> Option<&Stroke> {
        self.current_stroke.as_ref()
    }
}

impl Tool for BrushTool {
    fn name(&self) -> &'static str {
        "Brush"
    }

    fn on_pointer_down(&mut self, pos: Pos2, settings: &DrawingState, _canvas: &mut RgbaImage) {
        let ink = match settings.mode {
            ToolMode::Eraser => Ink::Erase,
            _ => Ink::Paint(settings.color),
        };
        self.current_stroke = Some(Stroke::begin(pos, ink, settings.brush_size));
    }

    fn on_pointer_move(&mut self, pos: Pos2, canvas: &mut RgbaImage) {
        if let Some(stroke) = &mut self.current_stroke {
            stroke.extend_onto(pos, canvas);
        }
    }

    fn on_pointer_up(&mut self, canvas: &mut RgbaImage) -> bool {
        match self.current_stroke.take() {
            Some(stroke) => {
                // A click without movement still leaves a dot
                if stroke.points().len() == 1 {
                    stroke.paint_onto(canvas);
                }
                log::debug!("Brush stroke finished with {} points", stroke.points().len());
                true
            }
            None => false,
        }
    }

    fn is_stroking(&self) -> bool {
        self.current_stroke.is_some()
    }

    fn reset(&mut self) {
        self.current_stroke = None;
    }
}
