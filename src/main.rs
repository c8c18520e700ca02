mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::MotorsportsFilterApp;
use config::Config;
use data::model::SensorDataset;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("Ignoring unreadable config: {e}");
        Config::default()
    });
    let state = initial_state(config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([state.config.window_width, state.config.window_height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "OK Database – Motorsports Sensor Filter",
        options,
        Box::new(|_cc| Ok(Box::new(MotorsportsFilterApp::new(state)))),
    )
}

/// Built-in readings unless the config names a readings file that loads cleanly.
fn initial_state(config: Config) -> AppState {
    let Some(path) = config.data_path.clone() else {
        return AppState::new(SensorDataset::builtin(), config);
    };

    match data::loader::load_file(&path) {
        Ok(dataset) => {
            log::info!("Loaded {} readings from {}", dataset.len(), path.display());
            AppState::new(dataset, config)
        }
        Err(e) => {
            log::error!("Failed to load {}: {e:#}", path.display());
            let mut state = AppState::new(SensorDataset::builtin(), config);
            state.status_message = Some(format!("Error: {e:#}"));
            state
        }
    }
}
