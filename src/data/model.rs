use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Sentinel selector value meaning "no constraint on this field".
pub const ALL: &str = "all";

// ---------------------------------------------------------------------------
// SensorReading – one fixture row
// ---------------------------------------------------------------------------

/// A single sensor reading. Field names serialize in camelCase so readings
/// files use `sensorId`, `vehicleId`, `trackLayout`, `sensorValue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    #[serde(deserialize_with = "integral")]
    pub id: i64,
    pub sensor_id: String,
    pub vehicle_id: String,
    pub track_layout: String,
    pub sensor_value: f64,
    #[serde(deserialize_with = "integral")]
    pub year: i64,
}

/// Accepts `2022` as well as `2022.0`; fractional values are rejected.
fn integral<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
    }

    match Number::deserialize(deserializer)? {
        Number::Int(i) => Ok(i),
        Number::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        Number::Float(f) => Err(serde::de::Error::custom(format!(
            "expected an integral number, got {f}"
        ))),
    }
}

impl SensorReading {
    pub fn new(
        id: i64,
        sensor_id: &str,
        vehicle_id: &str,
        track_layout: &str,
        sensor_value: f64,
        year: i64,
    ) -> Self {
        Self {
            id,
            sensor_id: sensor_id.to_string(),
            vehicle_id: vehicle_id.to_string(),
            track_layout: track_layout.to_string(),
            sensor_value,
            year,
        }
    }

    /// String projection of every field, in declaration order. This is what
    /// the free-text search matches against.
    pub fn field_strings(&self) -> [String; 6] {
        [
            self.id.to_string(),
            self.sensor_id.clone(),
            self.vehicle_id.clone(),
            self.track_layout.clone(),
            format_number(self.sensor_value),
            self.year.to_string(),
        ]
    }
}

/// Plain decimal rendering without locale formatting: `95.5`, `2.1`, `100`.
pub fn format_number(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        let s = if v > 0.0 { "Infinity" } else { "-Infinity" };
        s.to_string()
    } else if v == 0.0 {
        // also covers -0.0
        "0".to_string()
    } else {
        format!("{v}")
    }
}

// ---------------------------------------------------------------------------
// FilterField – the categorical selectors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterField {
    SensorId,
    VehicleId,
    TrackLayout,
    Year,
}

impl FilterField {
    pub const ALL_FIELDS: [FilterField; 4] = [
        FilterField::SensorId,
        FilterField::VehicleId,
        FilterField::TrackLayout,
        FilterField::Year,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterField::SensorId => "Sensor ID",
            FilterField::VehicleId => "Vehicle ID",
            FilterField::TrackLayout => "Track Layout",
            FilterField::Year => "Year",
        }
    }

    /// The reading's value for this field, as offered in the selector.
    pub fn value_of(self, reading: &SensorReading) -> String {
        match self {
            FilterField::SensorId => reading.sensor_id.clone(),
            FilterField::VehicleId => reading.vehicle_id.clone(),
            FilterField::TrackLayout => reading.track_layout.clone(),
            FilterField::Year => reading.year.to_string(),
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// OptionLists – selector choices per categorical field
// ---------------------------------------------------------------------------

/// `["all", distinct values...]` for each [`FilterField`], distinct values in
/// first-occurrence order. Values are not deduplicated against the sentinel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OptionLists(BTreeMap<FilterField, Vec<String>>);

impl OptionLists {
    pub fn from_readings(readings: &[SensorReading]) -> Self {
        OptionLists(
            FilterField::ALL_FIELDS
                .iter()
                .map(|&field| (field, options_for(readings, field)))
                .collect(),
        )
    }

    pub fn get(&self, field: FilterField) -> &[String] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn options_for(readings: &[SensorReading], field: FilterField) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut options = vec![ALL.to_string()];
    for reading in readings {
        let value = field.value_of(reading);
        if seen.insert(value.clone()) {
            options.push(value);
        }
    }
    options
}

// ---------------------------------------------------------------------------
// SensorDataset – the complete dataset
// ---------------------------------------------------------------------------

/// Ordered readings plus their pre-computed option lists.
#[derive(Debug, Clone)]
pub struct SensorDataset {
    pub readings: Vec<SensorReading>,
    pub options: OptionLists,
}

impl SensorDataset {
    /// Build option lists from the loaded readings.
    pub fn from_readings(readings: Vec<SensorReading>) -> Self {
        let options = OptionLists::from_readings(&readings);
        SensorDataset { readings, options }
    }

    /// The hardcoded readings shipped with the application.
    pub fn builtin() -> Self {
        Self::from_readings(vec![
            SensorReading::new(1, "TEMP_001", "MK1", "Oval", 95.5, 2022),
            SensorReading::new(2, "PRES_002", "EV1", "Street", 2.1, 2024),
            SensorReading::new(3, "TEMP_002", "MK4", "Oval", 98.2, 2022),
            SensorReading::new(4, "SPEED_003", "MK3", "Road", 180.5, 2023),
            SensorReading::new(5, "PRES_002", "MK2", "Street", 2.3, 2022),
        ])
    }

    pub fn options(&self, field: FilterField) -> &[String] {
        self.options.get(field)
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}
