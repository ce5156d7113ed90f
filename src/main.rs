#![windows_subsystem = "windows"]
mod app;
mod color_math;
mod exporter;
mod grouping;
mod palette;
mod recolor;
mod recolor_processor;
mod session;
mod settings_manager;
mod tint;
mod types;
mod ui;

use app::RecolorApp;
use eframe::egui;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_drag_and_drop(true)
            .with_icon(egui::IconData::default())
            .with_title("RecolorGUI - Pixel Art Recoloring Tool"),
        ..Default::default()
    };

    eframe::run_native(
        "RecolorGUI - Pixel Art Recoloring Tool",
        options,
        Box::new(|cc| Ok(Box::new(RecolorApp::new(cc)))),
    )
}
