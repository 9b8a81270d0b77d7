//! Hard-edged rasterisation of strokes and shape outlines straight into an
//! RGBA buffer. Coverage is tested at pixel centres; anything outside the
//! buffer is clipped.

use egui::{Color32, Pos2};
use image::{Rgba, RgbaImage};

/// What a covered pixel receives
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ink {
    /// Composite the colour over the existing pixel
    Paint(Color32),
    /// Clear the pixel to fully transparent
    Erase,
}

impl Ink {
    fn apply(&self, dst: &mut Rgba<u8>) {
        match self {
            Self::Erase => *dst = Rgba([0, 0, 0, 0]),
            Self::Paint(color) => {
                let [sr, sg, sb, sa] = color.to_srgba_unmultiplied();
                if sa == 255 {
                    *dst = Rgba([sr, sg, sb, sa]);
                    return;
                }
                let src_a = sa as f32 / 255.0;
                let dst_a = dst[3] as f32 / 255.0;
                let out_a = src_a + dst_a * (1.0 - src_a);
                if out_a <= 0.0 {
                    *dst = Rgba([0, 0, 0, 0]);
                    return;
                }
                let blend = |s: u8, d: u8| {
                    let v = (s as f32 * src_a + d as f32 * dst_a * (1.0 - src_a)) / out_a;
                    v.round().clamp(0.0, 255.0) as u8
                };
                *dst = Rgba([
                    blend(sr, dst[0]),
                    blend(sg, dst[1]),
                    blend(sb, dst[2]),
                    (out_a * 255.0).round() as u8,
                ]);
            }
        }
    }
}

/// Visit every pixel whose centre lies in the (clipped) box and passes `covered`
fn fill_where<F>(pixels: &mut RgbaImage, min: Pos2, max: Pos2, ink: Ink, covered: F)
where
    F: Fn(Pos2) -> bool,
{
    let (width, height) = pixels.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    let x0 = min.x.floor().max(0.0) as u32;
    let y0 = min.y.floor().max(0.0) as u32;
    let x1 = max.x.ceil().min(width as f32 - 1.0);
    let y1 = max.y.ceil().min(height as f32 - 1.0);
    if x1 < 0.0 || y1 < 0.0 {
        return;
    }
    let (x1, y1) = (x1 as u32, y1 as u32);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let centre = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
            if covered(centre) {
                ink.apply(pixels.get_pixel_mut(x, y));
            }
        }
    }
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// A round-capped thick segment. `a == b` yields a dot.
pub fn draw_segment(pixels: &mut RgbaImage, a: Pos2, b: Pos2, width: f32, ink: Ink) {
    let half = (width / 2.0).max(0.5);
    let min = Pos2::new(a.x.min(b.x) - half, a.y.min(b.y) - half);
    let max = Pos2::new(a.x.max(b.x) + half, a.y.max(b.y) + half);
    fill_where(pixels, min, max, ink, |p| distance_to_segment(p, a, b) <= half);
}

/// A connected run of round-capped segments
pub fn draw_polyline(pixels: &mut RgbaImage, points: &[Pos2], width: f32, ink: Ink) {
    match points {
        [] => {}
        [single] => draw_segment(pixels, *single, *single, width, ink),
        _ => {
            for pair in points.windows(2) {
                draw_segment(pixels, pair[0], pair[1], width, ink);
            }
        }
    }
}

/// Outline of a circle. A zero radius degenerates to a dot of the line width.
pub fn stroke_circle(pixels: &mut RgbaImage, center: Pos2, radius: f32, width: f32, ink: Ink) {
    let half = (width / 2.0).max(0.5);
    let reach = radius + half;
    let min = Pos2::new(center.x - reach, center.y - reach);
    let max = Pos2::new(center.x + reach, center.y + reach);
    fill_where(pixels, min, max, ink, |p| (p.distance(center) - radius).abs() <= half);
}

/// Outline of the axis-aligned rectangle spanned by two corners.
/// Joins are mitred; a rectangle thinner than the line fills solid.
pub fn stroke_rect(pixels: &mut RgbaImage, a: Pos2, b: Pos2, width: f32, ink: Ink) {
    let half = (width / 2.0).max(0.5);
    let lo = Pos2::new(a.x.min(b.x), a.y.min(b.y));
    let hi = Pos2::new(a.x.max(b.x), a.y.max(b.y));
    let outer_min = Pos2::new(lo.x - half, lo.y - half);
    let outer_max = Pos2::new(hi.x + half, hi.y + half);
    let inner_min = Pos2::new(lo.x + half, lo.y + half);
    let inner_max = Pos2::new(hi.x - half, hi.y - half);

    fill_where(pixels, outer_min, outer_max, ink, |p| {
        let in_outer =
            p.x >= outer_min.x && p.x <= outer_max.x && p.y >= outer_min.y && p.y <= outer_max.y;
        let in_inner =
            p.x > inner_min.x && p.x < inner_max.x && p.y > inner_min.y && p.y < inner_max.y;
        in_outer && !in_inner
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(size: u32) -> RgbaImage {
        RgbaImage::from_pixel(size, size, Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn test_segment_covers_endpoints_and_clips() {
        let mut pixels = blank(20);
        draw_segment(&mut pixels, Pos2::new(-5.0, 10.0), Pos2::new(30.0, 10.0), 3.0, Ink::Paint(Color32::BLACK));
        assert_eq!(pixels.get_pixel(0, 10), &Rgba([0, 0, 0, 255]));
        assert_eq!(pixels.get_pixel(19, 10), &Rgba([0, 0, 0, 255]));
        assert_eq!(pixels.get_pixel(10, 2), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_erase_clears_alpha() {
        let mut pixels = blank(10);
        draw_segment(&mut pixels, Pos2::new(5.0, 5.0), Pos2::new(5.0, 5.0), 4.0, Ink::Erase);
        assert_eq!(pixels.get_pixel(4, 4)[3], 0);
        assert_eq!(pixels.get_pixel(0, 0)[3], 255);
    }

    #[test]
    fn test_circle_outline_leaves_centre_untouched() {
        let mut pixels = blank(40);
        stroke_circle(&mut pixels, Pos2::new(20.0, 20.0), 10.0, 2.0, Ink::Paint(Color32::BLACK));
        assert_eq!(pixels.get_pixel(20, 20), &Rgba([255, 255, 255, 255]));
        assert_eq!(pixels.get_pixel(29, 19), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_zero_radius_circle_draws_a_dot() {
        let mut pixels = blank(10);
        stroke_circle(&mut pixels, Pos2::new(5.0, 5.0), 0.0, 3.0, Ink::Paint(Color32::BLACK));
        assert_eq!(pixels.get_pixel(5, 5), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_translucent_paint_blends() {
        let mut pixels = blank(4);
        let ink = Ink::Paint(Color32::from_rgba_unmultiplied(0, 0, 0, 128));
        draw_segment(&mut pixels, Pos2::new(2.0, 2.0), Pos2::new(2.0, 2.0), 2.0, ink);
        let px = pixels.get_pixel(1, 1);
        assert!(px[0] > 100 && px[0] < 155);
        assert_eq!(px[3], 255);
    }
}
