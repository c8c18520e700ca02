use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::{FilterField, SensorDataset, ALL};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.45);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: categorical value → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of one categorical field to distinct colours.
/// Cards and bars use it to tell track layouts apart.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub field: FilterField,
    /// First-occurrence order, same as the field's selector.
    entries: Vec<(String, Color32)>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from the option list of `field` (sentinel skipped).
    pub fn new(dataset: &SensorDataset, field: FilterField) -> Self {
        let values = dataset.options(field).get(1..).unwrap_or_default();
        let palette = generate_palette(values.len());
        let entries = values.iter().cloned().zip(palette).collect();

        ColorMap {
            field,
            entries,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &str) -> Color32 {
        if value == ALL {
            return self.default_color;
        }
        self.entries
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, c)| *c)
            .unwrap_or(self.default_color)
    }

    /// Return the legend entries (value label → colour) for the UI.
    pub fn legend_entries(&self) -> &[(String, Color32)] {
        &self.entries
    }
}
