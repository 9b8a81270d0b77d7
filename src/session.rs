//! The editor session ties the bitmap, filters, drawing tools and history
//! together. Each session owns its own bitmap; sessions share nothing.

use std::fs;
use std::path::{Path, PathBuf};

use egui::{Color32, Pos2};
use image::RgbaImage;

use crate::command::{HistorySnapshot, SnapshotHistory};
use crate::config::EditorConfig;
use crate::error::{EditorError, EditorResult};
use crate::filter::{self, FilterKind, FilterPreset, FilterState};
use crate::image::RasterImage;
use crate::tools::{DrawingEngine, DrawingState, ShapeKind, ToolMode};

/// An image being edited together with everything needed to edit it
#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    image: Option<RasterImage>,
    filters: FilterState,
    drawing: DrawingEngine,
    history: Option<SnapshotHistory>,
    /// Bumped on every change that affects `render`
    version: u64,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        let drawing = DrawingEngine::new(config.drawing_defaults());
        Self {
            config,
            image: None,
            filters: FilterState::default(),
            drawing,
            history: None,
            version: 0,
        }
    }

    /// Decode `bytes` and start editing them.
    ///
    /// On failure the previous image, filters and history are kept as they were.
    pub fn load_image(&mut self, bytes: &[u8]) -> EditorResult<()> {
        let image = RasterImage::decode(bytes).inspect_err(|err| {
            log::error!("Image load failed: {err}");
        })?;
        log::info!(
            "Loaded image {}x{} ({} bytes)",
            image.width(),
            image.height(),
            bytes.len()
        );
        self.start_editing(image);
        Ok(())
    }

    /// Start editing an already decoded bitmap
    pub fn load_raster(&mut self, image: RasterImage) {
        log::info!("Loaded bitmap {}x{}", image.width(), image.height());
        self.start_editing(image);
    }

    fn start_editing(&mut self, image: RasterImage) {
        let initial = HistorySnapshot::capture(image.pixels());
        self.history = Some(SnapshotHistory::new(initial, self.config.max_history));
        self.image = Some(image);
        self.filters = FilterState::default();
        self.drawing.reset(self.config.drawing_defaults());
        self.touch();
    }

    /// Close the current image
    pub fn close(&mut self) {
        self.image = None;
        self.history = None;
        self.drawing.reset(self.config.drawing_defaults());
        self.touch();
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// The unfiltered bitmap
    pub fn image(&self) -> Option<&RasterImage> {
        self.image.as_ref()
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn drawing(&self) -> &DrawingState {
        self.drawing.state()
    }

    pub fn history(&self) -> Option<&SnapshotHistory> {
        self.history.as_ref()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Changes whenever the rendered output may have changed
    pub fn version(&self) -> u64 {
        self.version
    }

    fn touch(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    // ---- filters -------------------------------------------------------

    /// Set one filter parameter (clamped to its range) and return the stored value
    pub fn apply_filter(&mut self, kind: FilterKind, value: f32) -> f32 {
        let stored = self.filters.set(kind, value);
        log::debug!("Filter {kind} = {stored}");
        self.touch();
        stored
    }

    pub fn apply_preset(&mut self, preset: &FilterPreset) {
        self.filters.apply_preset(preset);
        log::debug!("Applied preset {}", preset.name);
        self.touch();
    }

    pub fn reset_filters(&mut self) {
        self.filters = FilterState::default();
        self.touch();
    }

    /// Add `degrees` to the rotation
    pub fn rotate_by(&mut self, degrees: f32) {
        let rotation = self.filters.rotation + degrees;
        self.apply_filter(FilterKind::Rotation, rotation);
    }

    // ---- drawing settings ------------------------------------------------

    /// Switch tool; a stroke in progress is committed first
    pub fn set_tool(&mut self, mode: ToolMode) {
        self.finish_pending_stroke();
        self.drawing.set_mode(mode);
    }

    pub fn set_color(&mut self, color: Color32) {
        self.drawing.set_color(color);
    }

    /// Set the brush width (clamped to 1..=50) and return the stored width
    pub fn set_brush_size(&mut self, size: f32) -> f32 {
        self.drawing.set_brush_size(size)
    }

    pub fn set_shape(&mut self, shape: ShapeKind) {
        self.drawing.set_shape(shape);
    }

    pub fn is_stroking(&self) -> bool {
        self.drawing.is_stroking()
    }

    // ---- strokes ---------------------------------------------------------

    /// Pointer down at `pos` (bitmap coordinates)
    pub fn begin_stroke(&mut self, pos: Pos2) -> EditorResult<()> {
        if self.image.is_none() {
            log::warn!("Ignoring stroke: no image loaded");
            return Err(EditorError::UnsupportedOperation("drawing requires a loaded image"));
        }
        // A lost pointer-up must not leave an uncommitted stroke behind
        self.finish_pending_stroke();
        if let Some(image) = &mut self.image {
            self.drawing.begin_stroke(pos, image.pixels_mut());
        }
        self.touch();
        Ok(())
    }

    /// Pointer moved while pressed. Without a stroke in progress this does nothing.
    pub fn continue_stroke(&mut self, pos: Pos2) -> EditorResult<()> {
        let Some(image) = &mut self.image else {
            return Err(EditorError::UnsupportedOperation("drawing requires a loaded image"));
        };
        if self.drawing.is_stroking() {
            self.drawing.continue_stroke(pos, image.pixels_mut());
            self.touch();
        }
        Ok(())
    }

    /// Pointer released: commit the stroke and checkpoint it in history.
    /// Returns true if a checkpoint was added.
    pub fn end_stroke(&mut self) -> bool {
        let Some(image) = &mut self.image else {
            return false;
        };
        if !self.drawing.end_stroke(image.pixels_mut()) {
            return false;
        }
        let snapshot = HistorySnapshot::capture(image.pixels());
        if let Some(history) = &mut self.history {
            history.push(snapshot);
            log::debug!("Stroke committed, history at {}/{}", history.cursor() + 1, history.len());
        }
        self.touch();
        true
    }

    /// Pointer left the canvas: same as releasing it
    pub fn pointer_leave(&mut self) -> bool {
        self.end_stroke()
    }

    fn finish_pending_stroke(&mut self) {
        if self.drawing.is_stroking() {
            self.end_stroke();
        }
    }

    // ---- history ---------------------------------------------------------

    pub fn can_undo(&self) -> bool {
        self.history.as_ref().is_some_and(SnapshotHistory::can_undo)
    }

    pub fn can_redo(&self) -> bool {
        self.history.as_ref().is_some_and(SnapshotHistory::can_redo)
    }

    /// Show the previous snapshot. At the first one nothing changes.
    pub fn undo(&mut self) -> EditorResult<()> {
        self.finish_pending_stroke();
        let (Some(history), Some(image)) = (&mut self.history, &mut self.image) else {
            return Err(EditorError::UnsupportedOperation("undo requires a loaded image"));
        };
        let before = history.cursor();
        history.undo();
        if history.cursor() != before {
            image.replace_pixels(history.current().pixels().clone());
            self.touch();
        }
        Ok(())
    }

    /// Show the next snapshot. At the last one nothing changes.
    pub fn redo(&mut self) -> EditorResult<()> {
        self.finish_pending_stroke();
        let (Some(history), Some(image)) = (&mut self.history, &mut self.image) else {
            return Err(EditorError::UnsupportedOperation("redo requires a loaded image"));
        };
        let before = history.cursor();
        history.redo();
        if history.cursor() != before {
            image.replace_pixels(history.current().pixels().clone());
            self.touch();
        }
        Ok(())
    }

    // ---- output ----------------------------------------------------------

    /// The bitmap with the current filters applied, for display.
    /// The stored bitmap is not modified.
    pub fn render(&self) -> EditorResult<RgbaImage> {
        let image = self
            .image
            .as_ref()
            .ok_or(EditorError::UnsupportedOperation("nothing to render"))?;
        Ok(filter::render(image, &self.filters))
    }

    /// Flatten filters into a new bitmap of the same size
    pub fn export_image(&self) -> EditorResult<RasterImage> {
        Ok(RasterImage::from_rgba(self.render()?))
    }

    /// Flattened bitmap encoded as PNG
    pub fn export_png(&self) -> EditorResult<Vec<u8>> {
        self.export_image()?.encode_png()
    }

    /// Write the flattened PNG into the configured export directory
    pub fn save_png(&self, file_name: &str) -> EditorResult<PathBuf> {
        let path = self.config.export_dir.join(file_name);
        self.save_png_to(&path)?;
        Ok(path)
    }

    pub fn save_png_to(&self, path: &Path) -> EditorResult<()> {
        let bytes = self.export_png()?;
        fs::write(path, &bytes)?;
        log::info!("Exported {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}
