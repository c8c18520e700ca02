use eframe::egui;

use crate::state::AppState;
use crate::ui::{cards, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MotorsportsFilterApp {
    pub state: AppState,
}

impl MotorsportsFilterApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for MotorsportsFilterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(self.state.config.sidebar_width)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: result cards ----
        egui::CentralPanel::default().show(ctx, |ui| {
            cards::results(ui, &self.state);
        });
    }
}
