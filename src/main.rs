mod app;
mod classifier;
mod color;
mod config;
mod data;
mod scoring;
mod state;
mod ui;

use app::FraudDetectorApp;
use classifier::Classifier;
use config::AppConfig;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load();

    // The model is loaded once; a failure is reported and the UI stays usable.
    let (classifier, load_error) = match classifier::load_model(&config.model_path) {
        Ok(model) => (Some(Box::new(model) as Box<dyn Classifier>), None),
        Err(e) => {
            log::error!("Failed to load model: {e:#}");
            (None, Some(format!("Failed to load model: {e:#}")))
        }
    };

    let mut state = AppState::new(classifier, config.rows_per_page);
    if let Some(msg) = load_error {
        state.show_error("Error", msg);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SP-Buy - Suspicious Order Detector",
        options,
        Box::new(move |cc| {
            color::apply_theme(&cc.egui_ctx);
            Ok(Box::new(FraudDetectorApp::new(state)))
        }),
    )
}
