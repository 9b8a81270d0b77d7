use egui::{Color32, Pos2};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

mod brush_tool;
mod shape_tool;

pub use brush_tool::BrushTool;
pub use shape_tool::ShapeTool;

/// Smallest and largest brush width in pixels
pub const MIN_BRUSH_SIZE: f32 = 1.0;
pub const MAX_BRUSH_SIZE: f32 = 50.0;

/// Which kind of edit a pointer drag produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolMode {
    #[default]
    Brush,
    Eraser,
    Shape,
}

impl ToolMode {
    pub const ALL: [ToolMode; 3] = [ToolMode::Brush, ToolMode::Eraser, ToolMode::Shape];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Brush => "Brush",
            Self::Eraser => "Eraser",
            Self::Shape => "Shape",
        }
    }
}

/// Primitive drawn in shape mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShapeKind {
    #[default]
    Circle,
    Square,
    Line,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Circle, ShapeKind::Square, ShapeKind::Line];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Circle => "Circle",
            Self::Square => "Square",
            Self::Line => "Line",
        }
    }
}

/// Tool settings the user picks before drawing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingState {
    pub mode: ToolMode,
    pub color: Color32,
    pub brush_size: f32,
    pub shape: ShapeKind,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self {
            mode: ToolMode::Brush,
            color: Color32::BLACK,
            brush_size: 5.0,
            shape: ShapeKind::Circle,
        }
    }
}

impl DrawingState {
    /// Set the brush width, clamped to 1..=50. Returns the stored width.
    pub fn set_brush_size(&mut self, size: f32) -> f32 {
        self.brush_size = clamp_brush_size(size);
        self.brush_size
    }
}

pub fn clamp_brush_size(size: f32) -> f32 {
    if size.is_nan() {
        return MIN_BRUSH_SIZE;
    }
    size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE)
}

/// Parse `#rrggbb` (or `#rrggbbaa`) into a colour
pub fn parse_hex_color(hex: &str) -> Option<Color32> {
    let digits = hex.trim().strip_prefix('#')?;
    if !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    match digits.len() {
        6 => Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?)),
        8 => Some(Color32::from_rgba_unmultiplied(
            channel(0)?,
            channel(2)?,
            channel(4)?,
            channel(6)?,
        )),
        _ => None,
    }
}

/// Format a colour as `#rrggbb`
pub fn to_hex_color(color: Color32) -> String {
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// A raster tool driven by pointer events. Tools paint directly into the
/// bitmap they are handed.
pub trait Tool {
    /// Return the name of the tool
    fn name(&self) -> &'static str;

    /// Pointer pressed: start a stroke at `pos` using the given settings
    fn on_pointer_down(&mut self, pos: Pos2, settings: &DrawingState, canvas: &mut RgbaImage);

    /// Pointer dragged while pressed
    fn on_pointer_move(&mut self, pos: Pos2, canvas: &mut RgbaImage);

    /// Pointer released: finalise the bitmap.
    /// Returns false when no stroke was in progress.
    fn on_pointer_up(&mut self, canvas: &mut RgbaImage) -> bool;

    /// True between pointer down and pointer up
    fn is_stroking(&self) -> bool;

    /// Drop any in-progress stroke without touching the bitmap further
    fn reset(&mut self);
}

/// Enum representing all available tools
#[derive(Clone, Debug)]
pub enum ToolType {
    Brush(BrushTool),
    Shape(ShapeTool),
}

impl ToolType {
    /// Fresh tool instance for a mode
    pub fn for_mode(mode: ToolMode) -> Self {
        match mode {
            ToolMode::Brush | ToolMode::Eraser => Self::Brush(BrushTool::default()),
            ToolMode::Shape => Self::Shape(ShapeTool::default()),
        }
    }
}

impl Tool for ToolType {
    fn name(&self) -> &'static str {
        match self {
            Self::Brush(tool) => tool.name(),
            Self::Shape(tool) => tool.name(),
        }
    }

    fn on_pointer_down(&mut self, pos: Pos2, settings: &DrawingState, canvas: &mut RgbaImage) {
        match self {
            Self::Brush(tool) => tool.on_pointer_down(pos, settings, canvas),
            Self::Shape(tool) => tool.on_pointer_down(pos, settings, canvas),
        }
    }

    fn on_pointer_move(&mut self, pos: Pos2, canvas: &mut RgbaImage) {
        match self {
            Self::Brush(tool) => tool.on_pointer_move(pos, canvas),
            Self::Shape(tool) => tool.on_pointer_move(pos, canvas),
        }
    }

    fn on_pointer_up(&mut self, canvas: &mut RgbaImage) -> bool {
        match self {
            Self::Brush(tool) => tool.on_pointer_up(canvas),
            Self::Shape(tool) => tool.on_pointer_up(canvas),
        }
    }

    fn is_stroking(&self) -> bool {
        match self {
            Self::Brush(tool) => tool.is_stroking(),
            Self::Shape(tool) => tool.is_stroking(),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Brush(tool) => tool.reset(),
            Self::Shape(tool) => tool.reset(),
        }
    }
}

/// Destructive painter: owns the drawing settings and the active tool,
/// and turns begin/continue/end stroke calls into pixel edits.
#[derive(Clone, Debug)]
pub struct DrawingEngine {
    state: DrawingState,
    tool: ToolType,
}

impl Default for DrawingEngine {
    fn default() -> Self {
        Self::new(DrawingState::default())
    }
}

impl DrawingEngine {
    pub fn new(state: DrawingState) -> Self {
        Self {
            tool: ToolType::for_mode(state.mode),
            state,
        }
    }

    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    pub fn active_tool(&self) -> &ToolType {
        &self.tool
    }

    /// Switch tool mode. Callers end any stroke in progress first.
    pub fn set_mode(&mut self, mode: ToolMode) {
        if self.state.mode != mode {
            self.state.mode = mode;
            self.tool = ToolType::for_mode(mode);
        }
    }

    pub fn set_color(&mut self, color: Color32) {
        self.state.color = color;
    }

    pub fn set_brush_size(&mut self, size: f32) -> f32 {
        self.state.set_brush_size(size)
    }

    pub fn set_shape(&mut self, shape: ShapeKind) {
        self.state.shape = shape;
    }

    pub fn is_stroking(&self) -> bool {
        self.tool.is_stroking()
    }

    pub fn begin_stroke(&mut self, pos: Pos2, canvas: &mut RgbaImage) {
        self.tool.on_pointer_down(pos, &self.state, canvas);
    }

    pub fn continue_stroke(&mut self, pos: Pos2, canvas: &mut RgbaImage) {
        self.tool.on_pointer_move(pos, canvas);
    }

    /// Finalise the stroke. Returns true if one was in progress and the
    /// bitmap now needs a history checkpoint.
    pub fn end_stroke(&mut self, canvas: &mut RgbaImage) -> bool {
        self.tool.on_pointer_up(canvas)
    }

    /// Back to default settings with no stroke in progress
    pub fn reset(&mut self, state: DrawingState) {
        *self = Self::new(state);
    }
}
