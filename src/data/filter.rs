use super::model::{SensorDataset, SensorReading, ALL};

// ---------------------------------------------------------------------------
// Filter state: the user's current selections
// ---------------------------------------------------------------------------

/// Snapshot of every filter control. The UI replaces it wholesale on change.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub search: String,
    pub sensor_id: String,
    pub vehicle_id: String,
    pub track_layout: String,
    /// Inclusive lower bound on `sensor_value`.
    pub min_sensor_value: f64,
    pub year: String,
}

/// Range offered by the threshold slider.
pub const SENSOR_VALUE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=200.0;

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            sensor_id: ALL.to_string(),
            vehicle_id: ALL.to_string(),
            track_layout: ALL.to_string(),
            min_sensor_value: 0.0,
            year: ALL.to_string(),
        }
    }
}

impl FilterState {
    /// Whether a reading passes all six predicates.
    pub fn matches(&self, reading: &SensorReading) -> bool {
        self.matches_search(reading)
            && matches_exact(&self.sensor_id, &reading.sensor_id)
            && matches_exact(&self.vehicle_id, &reading.vehicle_id)
            && matches_exact(&self.track_layout, &reading.track_layout)
            && reading.sensor_value >= self.min_sensor_value
            && self.matches_year(reading)
    }

    fn matches_search(&self, reading: &SensorReading) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        reading
            .field_strings()
            .iter()
            .any(|value| value.to_lowercase().contains(&needle))
    }

    fn matches_year(&self, reading: &SensorReading) -> bool {
        if self.year == ALL {
            return true;
        }
        match parse_year(&self.year) {
            Some(year) => year == reading.year as f64,
            None => false,
        }
    }

    /// True when no control narrows the result.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

fn matches_exact(selected: &str, value: &str) -> bool {
    selected == ALL || selected == value
}

/// Numeric reading of a year selector value. Blank text counts as 0; anything
/// unparseable yields `None` and matches no reading.
fn parse_year(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok()
}

/// Return indices of readings that pass the filter, in dataset order.
pub fn filtered_indices(dataset: &SensorDataset, filters: &FilterState) -> Vec<usize> {
    dataset
        .readings
        .iter()
        .enumerate()
        .filter(|(_, reading)| filters.matches(reading))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::FilterField;

    fn filter_readings<'a>(
        dataset: &'a SensorDataset,
        filters: &FilterState,
    ) -> Vec<&'a SensorReading> {
        filtered_indices(dataset, filters)
            .into_iter()
            .map(|i| &dataset.readings[i])
            .collect()
    }

    fn ids(dataset: &SensorDataset, filters: &FilterState) -> Vec<i64> {
        filter_readings(dataset, filters).iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_default_filter_returns_everything_in_order() {
        let ds = SensorDataset::builtin();
        let filters = FilterState::default();
        assert!(filters.is_default());
        assert_eq!(filtered_indices(&ds, &filters), vec![0, 1, 2, 3, 4]);
        assert_eq!(ids(&ds, &filters), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let ds = SensorDataset::builtin();
        for reading in &ds.readings {
            let at = FilterState {
                min_sensor_value: reading.sensor_value,
                ..FilterState::default()
            };
            assert!(at.matches(reading), "id {}", reading.id);

            let above = FilterState {
                min_sensor_value: reading.sensor_value + 0.01,
                ..FilterState::default()
            };
            assert!(!above.matches(reading), "id {}", reading.id);
        }
    }

    #[test]
    fn test_categorical_selection_returns_exact_subset() {
        let ds = SensorDataset::builtin();
        for field in FilterField::ALL_FIELDS {
            for value in &ds.options(field)[1..] {
                let mut filters = FilterState::default();
                match field {
                    FilterField::SensorId => filters.sensor_id = value.clone(),
                    FilterField::VehicleId => filters.vehicle_id = value.clone(),
                    FilterField::TrackLayout => filters.track_layout = value.clone(),
                    FilterField::Year => filters.year = value.clone(),
                }
                let expected: Vec<i64> = ds
                    .readings
                    .iter()
                    .filter(|r| field.value_of(r) == *value)
                    .map(|r| r.id)
                    .collect();
                assert_eq!(ids(&ds, &filters), expected, "{field} = {value}");
            }
        }
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let ds = SensorDataset::builtin();
        let filters = FilterState {
            search: "oval".to_string(),
            ..FilterState::default()
        };
        assert_eq!(ids(&ds, &filters), vec![1, 3]);

        let filters = FilterState {
            search: "98.2".to_string(),
            ..FilterState::default()
        };
        assert_eq!(ids(&ds, &filters), vec![3]);

        let filters = FilterState {
            search: "mk".to_string(),
            ..FilterState::default()
        };
        assert_eq!(ids(&ds, &filters), vec![1, 3, 4, 5]);
    }

    #[test]
    fn test_search_matches_id_and_year_fields() {
        let ds = SensorDataset::builtin();
        let filters = FilterState {
            search: "2024".to_string(),
            ..FilterState::default()
        };
        assert_eq!(ids(&ds, &filters), vec![2]);

        // "5" hits id 5 and the "95.5" / "180.5" values
        let filters = FilterState {
            search: "5".to_string(),
            ..FilterState::default()
        };
        assert_eq!(ids(&ds, &filters), vec![1, 4, 5]);
    }

    #[test]
    fn test_conjunction_is_intersection() {
        let ds = SensorDataset::builtin();
        let street = FilterState {
            track_layout: "Street".to_string(),
            ..FilterState::default()
        };
        let y2022 = FilterState {
            year: "2022".to_string(),
            ..FilterState::default()
        };
        let both = FilterState {
            track_layout: "Street".to_string(),
            year: "2022".to_string(),
            ..FilterState::default()
        };

        let a = ids(&ds, &street);
        let b = ids(&ds, &y2022);
        let intersection: Vec<i64> = a.iter().copied().filter(|id| b.contains(id)).collect();
        assert_eq!(ids(&ds, &both), intersection);

        let hits = filter_readings(&ds, &both);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].sensor_id, "PRES_002");
        assert_eq!(hits[0].vehicle_id, "MK2");
        assert_eq!(hits[0].year, 2022);
    }

    #[test]
    fn test_oval_fixture() {
        let ds = SensorDataset::builtin();
        let filters = FilterState {
            track_layout: "Oval".to_string(),
            ..FilterState::default()
        };
        let readings = filter_readings(&ds, &filters);
        let hits: Vec<(&str, &str, i64)> = readings
            .iter()
            .map(|r| (r.sensor_id.as_str(), r.vehicle_id.as_str(), r.year))
            .collect();
        assert_eq!(hits, vec![("TEMP_001", "MK1", 2022), ("TEMP_002", "MK4", 2022)]);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let ds = SensorDataset::builtin();
        let filters = FilterState {
            search: "no such sensor".to_string(),
            ..FilterState::default()
        };
        assert!(filtered_indices(&ds, &filters).is_empty());
    }

    #[test]
    fn test_year_parsing() {
        let ds = SensorDataset::builtin();
        let filters = FilterState {
            year: " 2023 ".to_string(),
            ..FilterState::default()
        };
        assert_eq!(ids(&ds, &filters), vec![4]);

        let filters = FilterState {
            year: "twenty".to_string(),
            ..FilterState::default()
        };
        assert!(ids(&ds, &filters).is_empty());
    }

    #[test]
    fn test_all_sentinel_overrides_literal_value() {
        let ds = SensorDataset::from_readings(vec![
            SensorReading::new(1, "all", "MK1", "Oval", 1.0, 2022),
            SensorReading::new(2, "TEMP_001", "MK1", "Oval", 1.0, 2022),
        ]);
        let filters = FilterState {
            sensor_id: ALL.to_string(),
            ..FilterState::default()
        };
        assert_eq!(ids(&ds, &filters), vec![1, 2]);
    }
}
