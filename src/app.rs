use eframe::egui;

use crate::color::ChartPalette;
use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyEdaApp {
    pub state: AppState,
    palette: ChartPalette,
}

impl RustyEdaApp {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            state: AppState::new(config),
            palette: ChartPalette::default(),
        }
    }
}

impl eframe::App for RustyEdaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        panels::handle_dropped_files(ctx, &mut self.state);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: dashboard sections ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::dashboard(ui, &mut self.state, &self.palette);
        });
    }
}
