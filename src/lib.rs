#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod config;
pub mod error;
pub mod file_handler;
pub mod filter;
pub mod image;
pub mod library;
pub mod panels;
pub mod raster;
pub mod renderer;
pub mod session;
pub mod stroke;
pub mod tools;
pub mod util;

pub use app::PaintApp;
pub use command::{Command, HistorySnapshot, SnapshotHistory};
pub use config::EditorConfig;
pub use error::{EditorError, EditorResult};
pub use filter::{FilterKind, FilterState};
pub use crate::image::RasterImage;
pub use renderer::CanvasRenderer;
pub use session::EditorSession;
pub use tools::{DrawingEngine, DrawingState, ShapeKind, Tool, ToolMode};
