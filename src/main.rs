#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;

use freehand_session::PaintApp;
use freehand_session::state::SessionSnapshot;

// When compiling natively:
fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    // An optional snapshot file to open instead of the last session
    let snapshot = std::env::args_os().nth(1).map(PathBuf::from).and_then(|path| {
        match SessionSnapshot::load(&path) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                log::error!("Failed to load {}: {}", path.display(), e);
                None
            }
        }
    });

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_min_inner_size([400.0, 300.0])
            .with_title("Freehand"),
        ..Default::default()
    };

    eframe::run_native(
        "freehand_session",
        native_options,
        Box::new(|cc| Ok(Box::new(PaintApp::new(cc, snapshot)))),
    )
}
