use eframe::egui;

use crate::state::AppState;
use crate::ui::{map, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SupplyExplorerApp {
    pub state: AppState,
}

impl Default for SupplyExplorerApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl eframe::App for SupplyExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: summary stats ----
        egui::TopBottomPanel::bottom("stats_bar").show(ctx, |ui| {
            panels::stats_bar(ui, &self.state);
        });

        // ---- Left side panel: view and filter controls ----
        egui::SidePanel::left("control_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            map::map_plot(ui, &mut self.state);
        });
    }
}
