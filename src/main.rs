mod app;
mod color;
mod coordinator;
mod data;
mod state;
mod ui;

use std::path::Path;

use app::PluvioApp;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let mut state = AppState::default();
    if let Some(arg) = std::env::args().nth(1) {
        state.load_path(Path::new(&arg));
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Pluvio – Precipitation Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(PluvioApp::new(state)))),
    )
}
