#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;

use whiteboard::{EditorConfig, WhiteboardApp};

/// Directory holding saved documents and exports, overridable via `WHITEBOARD_DATA_DIR`.
fn data_dir() -> PathBuf {
    std::env::var_os("WHITEBOARD_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("whiteboard-data"))
}

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    // An optional config file path as the only argument
    let config = std::env::args().nth(1).and_then(|path| match EditorConfig::load(&path) {
        Ok(config) => Some(config),
        Err(err) => {
            log::error!("Ignoring config {}: {}", path, err);
            None
        }
    });

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 400.0])
            .with_drag_and_drop(true)
            .with_title("Whiteboard"),
        ..Default::default()
    };

    let data_dir = data_dir();
    eframe::run_native(
        "Whiteboard",
        native_options,
        Box::new(move |cc| Ok(Box::new(WhiteboardApp::new(cc, data_dir, config)))),
    )
}
