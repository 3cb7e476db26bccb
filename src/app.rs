use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{panels, results};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FraudDetectorApp {
    pub state: AppState,
}

impl FraudDetectorApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for FraudDetectorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title + tabs ----
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            panels::header(ui, &mut self.state);
        });

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.tab {
            Tab::Manual => panels::manual_tab(ui, &mut self.state),
            Tab::Bulk => panels::bulk_tab(ui, &mut self.state),
        });

        // ---- Floating windows ----
        results::results_window(ctx, &mut self.state);
        panels::notice_window(ctx, &mut self.state);
    }
}
