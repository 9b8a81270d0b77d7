use egui::Pos2;
use image::RgbaImage;

use super::{DrawingState, ShapeKind, Tool};
use crate::raster::{self, Ink};

/// Drag state of a shape being previewed
#[derive(Clone, Debug)]
struct ShapeDrag {
    start: Pos2,
    kind: ShapeKind,
    ink: Ink,
    width: f32,
    /// Bitmap as it was on pointer down; every preview starts from it
    base: RgbaImage,
    moved: bool,
}

impl ShapeDrag {
    fn draw(&self, end: Pos2, canvas: &mut RgbaImage) {
        match self.kind {
            ShapeKind::Circle => {
                let radius = self.start.distance(end);
                raster::stroke_circle(canvas, self.start, radius, self.width, self.ink);
            }
            ShapeKind::Square => raster::stroke_rect(canvas, self.start, end, self.width, self.ink),
            ShapeKind::Line => raster::draw_segment(canvas, self.start, end, self.width, self.ink),
        }
    }
}

/// Circle / square / line tool with live preview
#[derive(Clone, Debug, Default)]
pub struct ShapeTool {
    drag: Option<ShapeDrag>,
}

impl Tool for ShapeTool {
    fn name(&self) -> &'static str {
        "Shape"
    }

    fn on_pointer_down(&mut self, pos: Pos2, settings: &DrawingState, canvas: &mut RgbaImage) {
        self.drag = Some(ShapeDrag {
            start: pos,
            kind: settings.shape,
            ink: Ink::Paint(settings.color),
            width: settings.brush_size,
            base: canvas.clone(),
            moved: false,
        });
    }

    fn on_pointer_move(&mut self, pos: Pos2, canvas: &mut RgbaImage) {
        let Some(drag) = &mut self.drag else {
            return;
        };
        // Restore the pre-stroke pixels so earlier preview sizes never stick
        if canvas.dimensions() == drag.base.dimensions() {
            canvas.copy_from_slice(drag.base.as_raw());
        } else {
            *canvas = drag.base.clone();
        }
        drag.draw(pos, canvas);
        drag.moved = true;
    }

    fn on_pointer_up(&mut self, canvas: &mut RgbaImage) -> bool {
        match self.drag.take() {
            Some(drag) => {
                if !drag.moved {
                    drag.draw(drag.start, canvas);
                }
                log::debug!("{} committed at {:?}", drag.kind.label(), drag.start);
                true
            }
            None => false,
        }
    }

    fn is_stroking(&self) -> bool {
        self.drag.is_some()
    }

    fn reset(&mut self) {
        self.drag = None;
    }
}
