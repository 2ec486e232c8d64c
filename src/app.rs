use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{catalog, charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LaptopTrendsApp {
    pub state: AppState,
}

impl LaptopTrendsApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for LaptopTrendsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.table.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a laptop catalog to start  (File → Open CSV…)");
                });
                return;
            }

            panels::metrics_strip(ui, &self.state);
            ui.separator();
            panels::tab_bar(ui, &mut self.state);
            ui.separator();

            match self.state.tab {
                Tab::Catalog => catalog::catalog(ui, &mut self.state),
                Tab::BrandShare => charts::brand_share_chart(ui, &self.state),
                Tab::Trends => charts::trend_chart(ui, &mut self.state),
            }
        });
    }
}
