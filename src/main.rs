mod app;
mod asset;
mod color;
mod config;
mod data;
mod pipeline;
mod state;
mod ui;

use app::QuakeViewApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load().unwrap_or_else(|e| {
        log::warn!("Ignoring configuration: {e:#}");
        DashboardConfig::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Earthquake Data Analysis",
        options,
        Box::new(|_cc| Ok(Box::new(QuakeViewApp::new(config)))),
    )
}
