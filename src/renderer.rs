use std::borrow::Cow;

use egui::{Color32, ColorImage, Pos2, Rect, TextureHandle, TextureOptions, Vec2};
use image::RgbaImage;

use crate::session::EditorSession;

/// Keeps an egui texture in sync with the session's rendered bitmap and
/// maps between screen and bitmap coordinates.
#[derive(Default)]
pub struct CanvasRenderer {
    texture: Option<TextureHandle>,
    /// Session version the texture was built from
    synced_version: Option<u64>,
    image_size: Vec2,
}

impl std::fmt::Debug for CanvasRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasRenderer")
            .field("has_texture", &self.texture.is_some())
            .field("synced_version", &self.synced_version)
            .field("image_size", &self.image_size)
            .finish()
    }
}

impl CanvasRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-render and upload only when the session changed since the last sync
    pub fn sync(&mut self, ctx: &egui::Context, session: &EditorSession) {
        if self.synced_version == Some(session.version()) {
            return;
        }
        self.synced_version = Some(session.version());

        let Some(pixels) = canvas_pixels(session) else {
            self.texture = None;
            self.image_size = Vec2::ZERO;
            return;
        };
        let size = [pixels.width() as usize, pixels.height() as usize];
        let image = ColorImage::from_rgba_unmultiplied(size, pixels.as_raw());
        self.image_size = Vec2::new(size[0] as f32, size[1] as f32);

        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::NEAREST),
            None => {
                self.texture = Some(ctx.load_texture("canvas", image, TextureOptions::NEAREST));
            }
        }
    }

    pub fn image_size(&self) -> Vec2 {
        self.image_size
    }

    /// Where the bitmap goes inside `available`: centred, shrunk to fit
    /// but never enlarged.
    pub fn fit(&self, available: Rect) -> Option<Rect> {
        fit_rect(self.image_size, available)
    }

    pub fn paint(&self, painter: &egui::Painter, image_rect: Rect) {
        if let Some(texture) = &self.texture {
            let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
            painter.image(texture.id(), image_rect, uv, Color32::WHITE);
        }
    }

    /// Screen position to bitmap pixel coordinates
    pub fn screen_to_image(&self, image_rect: Rect, pos: Pos2) -> Pos2 {
        screen_to_image(self.image_size, image_rect, pos)
    }
}

/// What the canvas shows. While a stroke is in progress the raw bitmap is
/// shown so pointer moves skip the filter pipeline; the filtered render
/// comes back once the stroke is committed.
pub(crate) fn canvas_pixels(session: &EditorSession) -> Option<Cow<'_, RgbaImage>> {
    if session.is_stroking() {
        return session.image().map(|image| Cow::Borrowed(image.pixels()));
    }
    session.render().ok().map(Cow::Owned)
}

fn fit_rect(image_size: Vec2, available: Rect) -> Option<Rect> {
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return None;
    }
    let ratio = (available.width() / image_size.x)
        .min(available.height() / image_size.y)
        .min(1.0);
    Some(Rect::from_center_size(available.center(), image_size * ratio))
}

fn screen_to_image(image_size: Vec2, image_rect: Rect, pos: Pos2) -> Pos2 {
    if image_rect.width() <= 0.0 || image_rect.height() <= 0.0 {
        return Pos2::ZERO;
    }
    let rel = pos - image_rect.min;
    Pos2::new(
        rel.x * image_size.x / image_rect.width(),
        rel.y * image_size.y / image_rect.height(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_image_is_not_enlarged() {
        let available = Rect::from_min_size(Pos2::ZERO, Vec2::new(400.0, 300.0));
        let rect = fit_rect(Vec2::new(100.0, 50.0), available).unwrap();
        assert_eq!(rect.size(), Vec2::new(100.0, 50.0));
        assert_eq!(rect.center(), available.center());
    }

    #[test]
    fn test_large_image_is_shrunk_keeping_aspect() {
        let available = Rect::from_min_size(Pos2::ZERO, Vec2::new(400.0, 300.0));
        let rect = fit_rect(Vec2::new(800.0, 400.0), available).unwrap();
        assert_eq!(rect.size(), Vec2::new(400.0, 200.0));
    }

    #[test]
    fn test_screen_maps_to_scaled_pixels() {
        let image_rect = Rect::from_min_size(Pos2::new(10.0, 20.0), Vec2::new(400.0, 200.0));
        let pos = screen_to_image(Vec2::new(800.0, 400.0), image_rect, Pos2::new(110.0, 70.0));
        assert_eq!(pos, Pos2::new(200.0, 100.0));
    }

    #[test]
    fn test_stroke_in_progress_shows_unfiltered_bitmap() {
        use crate::filter::FilterKind;
        use crate::image::RasterImage;

        let mut session = EditorSession::default();
        session.load_raster(RasterImage::solid(10, 10, Color32::WHITE));
        session.apply_filter(FilterKind::Brightness, 0.0);
        assert_eq!(canvas_pixels(&session).unwrap().get_pixel(5, 5).0, [0, 0, 0, 255]);

        session.begin_stroke(Pos2::new(1.0, 1.0)).unwrap();
        let preview = canvas_pixels(&session).unwrap();
        assert!(matches!(preview, Cow::Borrowed(_)));
        assert_eq!(preview.get_pixel(5, 5).0, [255, 255, 255, 255]);
        drop(preview);

        session.end_stroke();
        assert_eq!(canvas_pixels(&session).unwrap().get_pixel(5, 5).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_empty_session_has_no_texture() {
        let ctx = egui::Context::default();
        let mut renderer = CanvasRenderer::new();
        renderer.sync(&ctx, &EditorSession::default());
        assert!(renderer.fit(Rect::from_min_size(Pos2::ZERO, Vec2::splat(100.0))).is_none());
    }
}
