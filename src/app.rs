use egui::{Pos2, Rect};

use crate::command::Command;
use crate::config::EditorConfig;
use crate::file_handler::FileHandler;
use crate::library::LibraryStore;
use crate::panels::{central_panel, tools_panel};
use crate::renderer::CanvasRenderer;
use crate::session::EditorSession;
use crate::util::time;

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct PaintApp {
    /// Whether the effects section starts expanded
    pub(crate) show_presets: bool,
    #[serde(skip)]
    session: EditorSession,
    #[serde(skip)]
    renderer: CanvasRenderer,
    #[serde(skip)]
    file_handler: FileHandler,
    /// Past generations, shown read-only in the side panel
    #[serde(skip)]
    library: LibraryStore,
    /// Last user-visible message (load errors, export path)
    #[serde(skip)]
    status: Option<String>,
    /// Last bitmap position fed to the session during a stroke
    #[serde(skip)]
    last_pointer: Option<Pos2>,
}

impl Default for PaintApp {
    fn default() -> Self {
        Self::with_config(EditorConfig::default())
    }
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: EditorConfig) -> Self {
        let restored: Option<Self> = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY));
        let show_presets = restored.map_or(true, |app| app.show_presets);
        Self {
            show_presets,
            ..Self::with_config(config)
        }
    }

    pub fn with_config(config: EditorConfig) -> Self {
        let library = load_library(&config);
        Self {
            show_presets: true,
            session: EditorSession::new(config),
            renderer: CanvasRenderer::new(),
            file_handler: FileHandler::new(),
            library,
            status: None,
            last_pointer: None,
        }
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn renderer(&self) -> &CanvasRenderer {
        &self.renderer
    }

    pub fn library(&self) -> &LibraryStore {
        &self.library
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn execute_command(&mut self, command: Command) {
        log::debug!("Executing command: {}", command.label());
        if let Err(err) = command.execute(&mut self.session) {
            log::warn!("{} failed: {}", command.label(), err);
            self.status = Some(err.to_string());
        }
    }

    /// Load encoded image bytes, reporting failures in the status line
    pub fn open_image(&mut self, name: &str, bytes: &[u8]) {
        match self.session.load_image(bytes) {
            Ok(()) => self.status = Some(format!("Opened {name}")),
            Err(err) => self.status = Some(format!("Could not open {name}: {err}")),
        }
    }

    /// Write the filtered image into the export directory
    pub fn export(&mut self) {
        match self.session.save_png(&time::export_file_name()) {
            Ok(path) => self.status = Some(format!("Exported to {}", path.display())),
            Err(err) => {
                log::error!("Export failed: {err}");
                self.status = Some(format!("Export failed: {err}"));
            }
        }
    }

    /// Feed pointer activity on the canvas into the session.
    /// Leaving the canvas mid-stroke commits the stroke, and so does a
    /// button that is no longer held, even when press and release land in
    /// the same frame.
    pub fn handle_canvas_input(&mut self, response: &egui::Response, image_rect: Rect) {
        let (pressed, released, down) = response.ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.primary_down(),
            )
        });
        let hover = response
            .hover_pos()
            .map(|pos| self.renderer.screen_to_image(image_rect, pos));

        if pressed && !self.session.is_stroking() {
            if let Some(pos) = hover {
                if let Err(err) = self.session.begin_stroke(pos) {
                    self.status = Some(err.to_string());
                }
                self.last_pointer = Some(pos);
            }
        } else if self.session.is_stroking() && response.contains_pointer() {
            if let Some(pos) = hover {
                if self.last_pointer != Some(pos) {
                    if let Err(err) = self.session.continue_stroke(pos) {
                        self.status = Some(err.to_string());
                    }
                    self.last_pointer = Some(pos);
                }
            }
        }

        if !self.session.is_stroking() {
            return;
        }
        if released || !down {
            self.session.end_stroke();
            self.last_pointer = None;
        } else if !response.contains_pointer() {
            self.session.pointer_leave();
            self.last_pointer = None;
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (undo, redo) = ctx.input(|i| {
            let command = i.modifiers.command;
            (
                command && !i.modifiers.shift && i.key_pressed(egui::Key::Z),
                command && (i.key_pressed(egui::Key::Y) || (i.modifiers.shift && i.key_pressed(egui::Key::Z))),
            )
        });
        if undo {
            self.execute_command(Command::Undo);
        } else if redo {
            self.execute_command(Command::Redo);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_library(config: &EditorConfig) -> LibraryStore {
    LibraryStore::load(&config.library_path).unwrap_or_else(|err| {
        log::warn!("Could not read library {}: {err}", config.library_path.display());
        LibraryStore::default()
    })
}

#[cfg(target_arch = "wasm32")]
fn load_library(_config: &EditorConfig) -> LibraryStore {
    LibraryStore::default()
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.file_handler.check_for_dropped_files(ctx) {
            // Only the last dropped image is kept open
            if let Some(dropped) = self.file_handler.take_dropped_images().pop() {
                self.open_image(&dropped.name, &dropped.bytes);
            }
        }
        self.handle_shortcuts(ctx);

        tools_panel(self, ctx);
        self.renderer.sync(ctx, &self.session);
        let version = self.session.version();
        central_panel(self, ctx);
        if self.session.version() != version {
            ctx.request_repaint();
        }

        self.file_handler.preview_files_being_dropped(ctx);
    }
}

#[cfg(test)]
mod tests {
    use egui::{Event, Modifiers, PointerButton, Pos2, RawInput, Rect, Vec2};

    use super::*;
    use crate::image::RasterImage;
    use crate::panels::central_panel;

    fn frame(app: &mut PaintApp, ctx: &egui::Context, events: Vec<Event>) {
        let input = RawInput {
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, Vec2::new(400.0, 300.0))),
            events,
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            app.renderer.sync(ctx, &app.session);
            central_panel(app, ctx);
        });
    }

    fn button(pos: Pos2, pressed: bool) -> Event {
        Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::default(),
        }
    }

    fn app_with_image() -> PaintApp {
        let mut app = PaintApp::with_config(EditorConfig::default());
        let bytes = RasterImage::solid(40, 40, egui::Color32::WHITE)
            .encode_png()
            .unwrap();
        app.open_image("blank.png", &bytes);
        app
    }

    #[test]
    fn test_click_within_one_frame_commits_stroke() {
        let ctx = egui::Context::default();
        let mut app = app_with_image();
        let centre = Pos2::new(200.0, 150.0);

        // Lay the canvas out and hover it first
        frame(&mut app, &ctx, vec![Event::PointerMoved(centre)]);
        frame(&mut app, &ctx, vec![Event::PointerMoved(centre)]);

        frame(&mut app, &ctx, vec![button(centre, true), button(centre, false)]);
        assert!(!app.session().is_stroking());
        assert_eq!(app.session().history().map(|h| h.len()), Some(2));

        // Moving with no button held must not paint
        let before = app.session().image().map(|image| image.pixels().clone());
        frame(&mut app, &ctx, vec![Event::PointerMoved(centre + Vec2::new(10.0, 0.0))]);
        assert!(!app.session().is_stroking());
        assert_eq!(app.session().history().map(|h| h.len()), Some(2));
        assert_eq!(app.session().image().map(|image| image.pixels().clone()), before);
    }

    #[test]
    fn test_drag_commits_on_release() {
        let ctx = egui::Context::default();
        let mut app = app_with_image();
        let start = Pos2::new(195.0, 150.0);

        frame(&mut app, &ctx, vec![Event::PointerMoved(start)]);
        frame(&mut app, &ctx, vec![Event::PointerMoved(start)]);
        frame(&mut app, &ctx, vec![button(start, true)]);
        assert!(app.session().is_stroking());

        let end = start + Vec2::new(10.0, 0.0);
        frame(&mut app, &ctx, vec![Event::PointerMoved(end)]);
        assert!(app.session().is_stroking());

        frame(&mut app, &ctx, vec![button(end, false)]);
        assert!(!app.session().is_stroking());
        assert_eq!(app.session().history().map(|h| h.len()), Some(2));
    }
}
