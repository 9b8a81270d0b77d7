use egui::Pos2;

use crate::raster::{self, Ink};
use image::RgbaImage;

/// A freehand path being laid down by the brush or eraser
#[derive(Clone, Debug)]
pub struct Stroke {
    points: Vec<Pos2>,
    ink: Ink,
    width: f32,
}

impl Stroke {
    /// Start a stroke at `start`
    pub fn begin(start: Pos2, ink: Ink, width: f32) -> Self {
        Self {
            points: vec![start],
            ink,
            width,
        }
    }

    /// Extend the path and composite only the newly added segment
    pub fn extend_onto(&mut self, pos: Pos2, pixels: &mut RgbaImage) {
        let last = self.last_point();
        self.points.push(pos);
        raster::draw_segment(pixels, last, pos, self.width, self.ink);
    }

    /// Composite the whole path, e.g. a click that never moved
    pub fn paint_onto(&self, pixels: &mut RgbaImage) {
        raster::draw_polyline(pixels, &self.points, self.width, self.ink);
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn last_point(&self) -> Pos2 {
        // `begin` always seeds one point
        self.points.last().copied().unwrap_or(Pos2::ZERO)
    }

    pub fn ink(&self) -> Ink {
        self.ink
    }

    pub fn width(&self) -> f32 {
        self.width
    }
}
