use image::{Rgba, RgbaImage, imageops};
use rayon::prelude::*;

use super::FilterState;
use crate::image::RasterImage;

/// Sigma of the blur used as the low-pass for sharpening
const SHARPEN_SIGMA: f32 = 1.0;

/// 3x3 colour matrix acting on linear RGB in 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
struct ColorMatrix([[f32; 3]; 3]);

impl ColorMatrix {
    fn saturate(amount: f32) -> Self {
        let s = amount;
        Self([
            [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
            [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
            [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
        ])
    }

    fn hue_rotate(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self([
            [
                0.213 + cos * 0.787 - sin * 0.213,
                0.715 - cos * 0.715 - sin * 0.715,
                0.072 - cos * 0.072 + sin * 0.928,
            ],
            [
                0.213 - cos * 0.213 + sin * 0.143,
                0.715 + cos * 0.285 + sin * 0.140,
                0.072 - cos * 0.072 - sin * 0.283,
            ],
            [
                0.213 - cos * 0.213 - sin * 0.787,
                0.715 - cos * 0.715 + sin * 0.715,
                0.072 + cos * 0.928 + sin * 0.072,
            ],
        ])
    }

    fn sepia(amount: f32) -> Self {
        let inv = 1.0 - amount.min(1.0);
        Self([
            [0.393 + 0.607 * inv, 0.769 - 0.769 * inv, 0.189 - 0.189 * inv],
            [0.349 - 0.349 * inv, 0.686 + 0.314 * inv, 0.168 - 0.168 * inv],
            [0.272 - 0.272 * inv, 0.534 - 0.534 * inv, 0.131 + 0.869 * inv],
        ])
    }

    fn grayscale(amount: f32) -> Self {
        let inv = 1.0 - amount.min(1.0);
        Self([
            [0.2126 + 0.7874 * inv, 0.7152 - 0.7152 * inv, 0.0722 - 0.0722 * inv],
            [0.2126 - 0.2126 * inv, 0.7152 + 0.2848 * inv, 0.0722 - 0.0722 * inv],
            [0.2126 - 0.2126 * inv, 0.7152 - 0.7152 * inv, 0.0722 + 0.9278 * inv],
        ])
    }

    fn apply(&self, [r, g, b]: [f32; 3]) -> [f32; 3] {
        let m = &self.0;
        [
            (m[0][0] * r + m[0][1] * g + m[0][2] * b).clamp(0.0, 1.0),
            (m[1][0] * r + m[1][1] * g + m[1][2] * b).clamp(0.0, 1.0),
            (m[2][0] * r + m[2][1] * g + m[2][2] * b).clamp(0.0, 1.0),
        ]
    }
}

/// One per-pixel step of the pipeline
#[derive(Debug, Clone, Copy)]
enum PixelOp {
    Brightness(f32),
    Contrast(f32),
    Matrix(ColorMatrix),
    Opacity(f32),
}

impl PixelOp {
    fn apply(&self, px: [f32; 4]) -> [f32; 4] {
        let [r, g, b, a] = px;
        match self {
            Self::Brightness(k) => [
                (r * k).clamp(0.0, 1.0),
                (g * k).clamp(0.0, 1.0),
                (b * k).clamp(0.0, 1.0),
                a,
            ],
            Self::Contrast(k) => [
                ((r - 0.5) * k + 0.5).clamp(0.0, 1.0),
                ((g - 0.5) * k + 0.5).clamp(0.0, 1.0),
                ((b - 0.5) * k + 0.5).clamp(0.0, 1.0),
                a,
            ],
            Self::Matrix(matrix) => {
                let [r, g, b] = matrix.apply([r, g, b]);
                [r, g, b, a]
            }
            Self::Opacity(k) => [r, g, b, (a * k).clamp(0.0, 1.0)],
        }
    }
}

/// Render the bitmap with the filters applied.
///
/// Colour steps run in a fixed order: brightness, contrast, saturation, blur,
/// hue-rotate, sepia, opacity, grayscale, then sharpen. Rotation is an affine
/// step about the centre applied last. Steps at their identity value are
/// skipped, so the output is pixel-identical to the input for default filters.
pub fn render(image: &RasterImage, filters: &FilterState) -> RgbaImage {
    let mut pixels = image.pixels().clone();
    if filters.is_identity() {
        return pixels;
    }

    let mut before_blur = Vec::new();
    if filters.brightness != 100.0 {
        before_blur.push(PixelOp::Brightness(filters.brightness / 100.0));
    }
    if filters.contrast != 100.0 {
        before_blur.push(PixelOp::Contrast(filters.contrast / 100.0));
    }
    if filters.saturation != 100.0 {
        before_blur.push(PixelOp::Matrix(ColorMatrix::saturate(filters.saturation / 100.0)));
    }
    apply_pixel_ops(&mut pixels, &before_blur);

    if filters.blur > 0.0 {
        pixels = imageops::blur(&pixels, filters.blur);
    }

    let mut after_blur = Vec::new();
    if filters.hue != 0.0 {
        after_blur.push(PixelOp::Matrix(ColorMatrix::hue_rotate(filters.hue)));
    }
    if filters.sepia > 0.0 {
        after_blur.push(PixelOp::Matrix(ColorMatrix::sepia(filters.sepia / 100.0)));
    }
    if filters.opacity != 100.0 {
        after_blur.push(PixelOp::Opacity((filters.opacity / 100.0).min(1.0)));
    }
    if filters.grayscale > 0.0 {
        after_blur.push(PixelOp::Matrix(ColorMatrix::grayscale(filters.grayscale / 100.0)));
    }
    apply_pixel_ops(&mut pixels, &after_blur);

    if filters.sharpen > 0.0 {
        pixels = sharpen(&pixels, filters.sharpen / 100.0);
    }

    if filters.rotation % 360.0 != 0.0 {
        pixels = rotate_about_center(&pixels, filters.rotation);
    }

    pixels
}

/// Run a chain of per-pixel ops over every pixel, in parallel
fn apply_pixel_ops(pixels: &mut RgbaImage, ops: &[PixelOp]) {
    if ops.is_empty() {
        return;
    }
    let raw: &mut [u8] = pixels;
    raw.par_chunks_mut(4).for_each(|px| {
        let mut value = [
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
            px[3] as f32 / 255.0,
        ];
        for op in ops {
            value = op.apply(value);
        }
        for (channel, v) in px.iter_mut().zip(value) {
            *channel = to_u8(v);
        }
    });
}

/// Unsharp mask: push each pixel away from its blurred neighbourhood
fn sharpen(pixels: &RgbaImage, amount: f32) -> RgbaImage {
    let blurred = imageops::blur(pixels, SHARPEN_SIGMA);
    let mut out = pixels.clone();
    let raw: &mut [u8] = &mut out;
    raw.par_chunks_mut(4)
        .zip(blurred.as_raw().par_chunks(4))
        .for_each(|(px, low)| {
            for channel in 0..3 {
                let c = px[channel] as f32;
                let l = low[channel] as f32;
                px[channel] = (c + amount * (c - l)).round().clamp(0.0, 255.0) as u8;
            }
        });
    out
}

/// Rotate around the image centre, keeping the canvas size.
/// Pixels rotated in from outside the source are transparent.
pub fn rotate_about_center(pixels: &RgbaImage, degrees: f32) -> RgbaImage {
    let (width, height) = pixels.dimensions();
    let (sin, cos) = degrees.to_radians().sin_cos();
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;

    RgbaImage::from_fn(width, height, |x, y| {
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        let sx = (cos * dx + sin * dy + cx).floor();
        let sy = (-sin * dx + cos * dy + cy).floor();
        if sx < 0.0 || sy < 0.0 || sx >= width as f32 || sy >= height as f32 {
            Rgba([0, 0, 0, 0])
        } else {
            *pixels.get_pixel(sx as u32, sy as u32)
        }
    })
}

fn to_u8(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_hue_rotation_is_identity_matrix() {
        let matrix = ColorMatrix::hue_rotate(0.0);
        let out = matrix.apply([0.2, 0.4, 0.6]);
        for (got, want) in out.iter().zip([0.2, 0.4, 0.6]) {
            assert!((got - want).abs() < 1e-3);
        }
    }

    #[test]
    fn test_full_grayscale_equalises_channels() {
        let out = ColorMatrix::grayscale(1.0).apply([1.0, 0.0, 0.0]);
        assert!((out[0] - out[1]).abs() < 1e-4);
        assert!((out[1] - out[2]).abs() < 1e-4);
    }

    #[test]
    fn test_half_turn_moves_corner_pixel() {
        let mut pixels = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        pixels.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        let rotated = rotate_about_center(&pixels, 180.0);
        assert_eq!(rotated.get_pixel(3, 3), &Rgba([255, 0, 0, 255]));
        assert_eq!(rotated.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
    }
}
