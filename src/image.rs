use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

use egui::Color32;
use image::{ImageFormat, Rgba, RgbaImage};

use crate::error::{EditorError, EditorResult};

// Static counter for generating unique IDs
static NEXT_IMAGE_ID: AtomicUsize = AtomicUsize::new(1);

/// The bitmap being edited: an RGBA pixel grid with a process-unique id.
///
/// Drawing tools mutate the pixels in place. Filters never touch them; they
/// are only baked into a copy on export.
#[derive(Clone, Debug)]
pub struct RasterImage {
    id: usize,
    pixels: RgbaImage,
}

impl RasterImage {
    /// Wrap an already decoded RGBA buffer
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        let id = NEXT_IMAGE_ID.fetch_add(1, Ordering::SeqCst);
        Self { id, pixels }
    }

    /// A single-colour image, handy as a blank canvas
    pub fn solid(width: u32, height: u32, color: Color32) -> Self {
        let [r, g, b, a] = color.to_srgba_unmultiplied();
        Self::from_rgba(RgbaImage::from_pixel(width, height, Rgba([r, g, b, a])))
    }

    /// Decode an encoded byte source (PNG, JPEG, ...) into a bitmap
    pub fn decode(bytes: &[u8]) -> EditorResult<Self> {
        let decoded =
            image::load_from_memory(bytes).map_err(|err| EditorError::Decode(err.to_string()))?;
        let rgba = decoded.to_rgba8();
        if rgba.width() == 0 || rgba.height() == 0 {
            return Err(EditorError::Decode("image has no pixels".to_owned()));
        }
        log::debug!("Decoded image: {}x{}", rgba.width(), rgba.height());
        Ok(Self::from_rgba(rgba))
    }

    /// Encode the bitmap as PNG
    pub fn encode_png(&self) -> EditorResult<Vec<u8>> {
        encode_png(&self.pixels)
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> [usize; 2] {
        [self.width() as usize, self.height() as usize]
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    /// Replace the pixel data, keeping the id
    pub fn replace_pixels(&mut self, pixels: RgbaImage) {
        self.pixels = pixels;
    }

    /// Colour at `(x, y)`, or `None` outside the bitmap
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color32> {
        self.pixels.get_pixel_checked(x, y).map(|px| {
            let [r, g, b, a] = px.0;
            Color32::from_rgba_unmultiplied(r, g, b, a)
        })
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.pixels
    }
}

/// Encode any RGBA buffer as PNG bytes
pub fn encode_png(pixels: &RgbaImage) -> EditorResult<Vec<u8>> {
    let mut bytes = Vec::new();
    pixels
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|err| EditorError::Encode(err.to_string()))?;
    Ok(bytes)
}
