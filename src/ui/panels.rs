use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::{Config, ViewMode, CONFIG_FILE};
use crate::data::filter::SENSOR_VALUE_RANGE;
use crate::data::model::{FilterField, SensorDataset};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
///
/// Widgets edit a copy of the current [`crate::data::filter::FilterState`]; the copy is handed back
/// to [`AppState::apply_filters`] once all controls have been drawn.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let mut filters = state.filters.clone();
    let mut reset = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Search");
            ui.add(
                egui::TextEdit::singleline(&mut filters.search)
                    .hint_text("Search data...")
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(12.0);

            selector(ui, &state.dataset, FilterField::SensorId, &mut filters.sensor_id);
            selector(ui, &state.dataset, FilterField::VehicleId, &mut filters.vehicle_id);
            selector(ui, &state.dataset, FilterField::TrackLayout, &mut filters.track_layout);

            ui.strong(format!("Minimum Sensor Value: {}", filters.min_sensor_value));
            ui.add(
                egui::Slider::new(&mut filters.min_sensor_value, SENSOR_VALUE_RANGE)
                    .step_by(1.0)
                    .show_value(false),
            );
            ui.add_space(12.0);

            selector(ui, &state.dataset, FilterField::Year, &mut filters.year);

            ui.separator();
            if ui
                .add_enabled(!filters.is_default(), egui::Button::new("Reset filters"))
                .clicked()
            {
                reset = true;
            }
        });

    if reset {
        state.reset_filters();
    } else {
        state.apply_filters(filters);
    }
}

/// A labelled combo box over the option list of one categorical field.
fn selector(ui: &mut Ui, dataset: &SensorDataset, field: FilterField, selected: &mut String) {
    ui.strong(field.label());
    egui::ComboBox::from_id_salt(field.label())
        .selected_text(selected.as_str())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in dataset.options(field) {
                ui.selectable_value(selected, option.clone(), option);
            }
        });
    ui.add_space(12.0);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Load built-in readings").clicked() {
                log::info!("Restoring built-in readings");
                state.set_dataset(SensorDataset::builtin());
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Save settings").clicked() {
                save_settings(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} readings loaded, {} visible",
            state.dataset.len(),
            state.visible_indices.len()
        ));

        ui.separator();

        ui.selectable_value(&mut state.view_mode, ViewMode::Cards, "Cards");
        ui.selectable_value(&mut state.view_mode, ViewMode::Table, "Table");

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog / settings
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sensor readings")
        .add_filter("Supported files", &["json", "csv"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!("Loaded {} readings from {}", dataset.len(), path.display());
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn save_settings(state: &mut AppState) {
    let config = Config {
        default_view: state.view_mode,
        ..state.config.clone()
    };
    match config.save_to(std::path::Path::new(CONFIG_FILE)) {
        Ok(()) => {
            log::info!("Saved settings to {CONFIG_FILE}");
            state.config = config;
            state.status_message = None;
        }
        Err(e) => {
            log::error!("Failed to save settings: {e}");
            state.status_message = Some(format!("Error: {e}"));
        }
    }
}
