#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

// When compiling natively:
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = prompt_canvas::EditorConfig::from_env().unwrap_or_else(|err| {
        log::error!("{err}, using default config");
        prompt_canvas::EditorConfig::default()
    });

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Prompt Canvas")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "prompt_canvas",
        native_options,
        Box::new(|cc| Ok(Box::new(prompt_canvas::PaintApp::new(cc, config)))),
    )
}

// The editor core builds for the web, but the desktop shell is native only.
#[cfg(target_arch = "wasm32")]
fn main() {}
