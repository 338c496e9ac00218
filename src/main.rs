mod app;
mod color;
mod data;
mod layers;
mod state;
mod ui;

use std::path::Path;

use app::SupplyExplorerApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Supply Explorer – Denver Metro",
        options,
        Box::new(|_cc| {
            let mut app = SupplyExplorerApp::default();
            app.state.load_default_data(Path::new("data"));
            Ok(Box::new(app))
        }),
    )
}
