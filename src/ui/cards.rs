use eframe::egui::{self, Color32, RichText, ScrollArea, Stroke, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::config::ViewMode;
use crate::data::model::{SensorReading, format_number};
use crate::state::AppState;

const CARD_SPACING: f32 = 20.0;

// ---------------------------------------------------------------------------
// Result area (central panel)
// ---------------------------------------------------------------------------

/// Render the visible readings as cards or a table, plus the value chart.
pub fn results(ui: &mut Ui, state: &AppState) {
    if let Some(message) = empty_message(state) {
        ui.add_space(30.0);
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(RichText::new(message).color(Color32::GRAY));
        });
        return;
    }

    legend(ui, state);
    ui.add_space(8.0);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            match state.view_mode {
                ViewMode::Cards => card_grid(ui, state),
                ViewMode::Table => table(ui, state),
            }
            ui.add_space(CARD_SPACING);
            value_chart(ui, state);
        });
}

pub const NO_READINGS: &str = "No readings loaded  (File → Open…)";
pub const NO_MATCHES: &str = "No data matches your filters";

/// Placeholder shown instead of results, if any.
pub fn empty_message(state: &AppState) -> Option<&'static str> {
    if state.dataset.is_empty() {
        Some(NO_READINGS)
    } else if state.visible_indices.is_empty() {
        Some(NO_MATCHES)
    } else {
        None
    }
}

fn legend(ui: &mut Ui, state: &AppState) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.label(format!("{}:", state.color_map.field));
        for (value, color) in state.color_map.legend_entries() {
            ui.label(RichText::new(format!("■ {value}")).color(*color));
        }
    });
}

// ---------------------------------------------------------------------------
// Card grid
// ---------------------------------------------------------------------------

/// Number of card columns that fit `available` width.
pub fn column_count(available: f32, min_card_width: f32) -> usize {
    let per_card = min_card_width + CARD_SPACING;
    (((available + CARD_SPACING) / per_card).floor() as usize).max(1)
}

fn card_grid(ui: &mut Ui, state: &AppState) {
    let available = ui.available_width();
    let columns = column_count(available, state.config.card_min_width);
    let card_width =
        ((available - CARD_SPACING * (columns as f32 - 1.0)) / columns as f32).max(0.0);

    egui::Grid::new("reading_cards")
        .num_columns(columns)
        .spacing([CARD_SPACING, CARD_SPACING])
        .show(ui, |ui: &mut Ui| {
            for (i, reading) in state.visible_readings().enumerate() {
                let accent = state.color_map.color_for(&reading.track_layout);
                card(ui, reading, accent, card_width);
                if (i + 1) % columns == 0 {
                    ui.end_row();
                }
            }
        });
}

fn card(ui: &mut Ui, reading: &SensorReading, accent: Color32, width: f32) {
    egui::Frame::group(ui.style())
        .stroke(Stroke::new(1.5, accent))
        .show(ui, |ui: &mut Ui| {
            // group frames add a 6px margin on each side
            ui.set_width((width - 12.0).max(0.0));
            ui.heading(format!("Sensor: {}", reading.sensor_id));
            ui.add_space(4.0);
            ui.label(format!("Vehicle: {}", reading.vehicle_id));
            ui.label(format!("Track: {}", reading.track_layout));
            ui.label(format!("Value: {}", format_number(reading.sensor_value)));
            ui.label(format!("Year: {}", reading.year));
        });
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

const TABLE_HEADERS: [&str; 6] = ["ID", "Sensor", "Vehicle", "Track", "Value", "Year"];

fn table(ui: &mut Ui, state: &AppState) {
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(40.0))
        .columns(Column::remainder(), TABLE_HEADERS.len() - 1)
        .header(22.0, |mut header| {
            for title in TABLE_HEADERS {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for reading in state.visible_readings() {
                body.row(20.0, |mut row| {
                    for value in reading.field_strings() {
                        row.col(|ui: &mut Ui| {
                            ui.label(value);
                        });
                    }
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Sensor value chart
// ---------------------------------------------------------------------------

fn value_chart(ui: &mut Ui, state: &AppState) {
    ui.strong("Sensor values");

    let bars: Vec<Bar> = state
        .visible_readings()
        .enumerate()
        .map(|(i, reading)| {
            Bar::new(i as f64, reading.sensor_value)
                .name(format!("{} / {}", reading.sensor_id, reading.vehicle_id))
                .fill(state.color_map.color_for(&reading.track_layout))
                .width(0.6)
        })
        .collect();

    Plot::new("sensor_values")
        .legend(Legend::default())
        .height(180.0)
        .y_axis_label("Value")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Visible readings"));
        });
}
