use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{kpis, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MarketDashApp {
    pub state: AppState,
}

impl MarketDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for MarketDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar and tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(crate::config::WINDOW_TITLE);
            ui.add_space(4.0);
            match self.state.active_tab {
                Tab::Kpis => kpis::kpi_tab(ui),
                Tab::TimeSeries => panels::time_series_tab(ui, &mut self.state),
            }
        });
    }
}
