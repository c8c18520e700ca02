use crate::color::ColorMap;
use crate::config::{Config, ViewMode};
use crate::data::filter::{FilterState, filtered_indices};
use crate::data::model::{FilterField, SensorDataset, SensorReading};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Readings currently shown (built-in fixture unless a file was loaded).
    pub dataset: SensorDataset,

    /// Current filter selections. Replaced wholesale, see [`AppState::apply_filters`].
    pub filters: FilterState,

    /// Indices of readings passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Colours per track layout.
    pub color_map: ColorMap,

    pub view_mode: ViewMode,

    pub config: Config,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SensorDataset::builtin(), Config::default())
    }
}

impl AppState {
    pub fn new(dataset: SensorDataset, config: Config) -> Self {
        let color_map = ColorMap::new(&dataset, FilterField::TrackLayout);
        let visible_indices = (0..dataset.len()).collect();
        Self {
            dataset,
            filters: FilterState::default(),
            visible_indices,
            color_map,
            view_mode: config.default_view,
            config,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset, reset filters and colours.
    pub fn set_dataset(&mut self, dataset: SensorDataset) {
        self.color_map = ColorMap::new(&dataset, FilterField::TrackLayout);
        self.dataset = dataset;
        self.filters = FilterState::default();
        self.refilter();
        self.status_message = None;
    }

    /// Replace the filter snapshot. Re-derives only when something changed.
    pub fn apply_filters(&mut self, filters: FilterState) {
        if filters == self.filters {
            return;
        }
        log::debug!("Filters changed: {filters:?}");
        self.filters = filters;
        self.refilter();
    }

    pub fn reset_filters(&mut self) {
        self.apply_filters(FilterState::default());
    }

    /// Recompute `visible_indices` after filter change.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.dataset, &self.filters);
        log::debug!(
            "{} of {} readings visible",
            self.visible_indices.len(),
            self.dataset.len()
        );
    }

    /// The visible readings in dataset order.
    pub fn visible_readings(&self) -> impl Iterator<Item = &SensorReading> {
        self.visible_indices
            .iter()
            .map(|&idx| &self.dataset.readings[idx])
    }
}
