//! Haplomap - Haplogroup Frequency Map & Report Viewer
//!
//! Loads a CSV of haplogroup frequencies per country plus country boundaries and
//! shows one haplogroup at a time as a choropleth map or a summary table.

mod config;
mod data;
mod gui;
mod map;
mod pipeline;
mod summary;

use config::{AppConfig, CONFIG_FILE};
use eframe::egui;
use gui::HaplomapApp;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load_or_default(CONFIG_FILE);

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1000.0, 600.0])
            .with_title("Haplomap"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Haplomap",
        options,
        Box::new(|cc| Ok(Box::new(HaplomapApp::new(cc, config)))),
    )
}
