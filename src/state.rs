use std::path::Path;

use crate::color::GaugeColors;
use crate::coordinator::{Coordinator, SelectionEvent};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Pipeline over the loaded dataset (None until a file is loaded).
    pub coordinator: Option<Coordinator>,

    /// Stable colour per gauge, rebuilt on load.
    pub gauge_colors: Option<GaugeColors>,

    /// Slider values for the year range, committed as one event. Kept
    /// separate from the selection so a rejected range leaves the
    /// selection's own bounds intact.
    pub draft_year_start: i32,
    pub draft_year_end: i32,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            coordinator: None,
            gauge_colors: None,
            draft_year_start: 0,
            draft_year_end: 0,
            status_message: None,
        }
    }
}

impl AppState {
    /// Load a dataset file and stand up the pipeline over it. A load or
    /// validation failure keeps whatever was shown before and surfaces the
    /// error in the status line.
    pub fn load_path(&mut self, path: &Path) {
        match crate::data::loader::load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} readings from {} gauges ({}-{})",
                    dataset.len(),
                    dataset.gauges().len(),
                    dataset.min_year(),
                    dataset.max_year()
                );
                self.gauge_colors = Some(GaugeColors::new(dataset.gauges()));
                self.draft_year_start = dataset.min_year();
                self.draft_year_end = dataset.max_year();
                self.coordinator = Some(Coordinator::new(dataset));
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Forward a selection event to the coordinator; a rejected event
    /// becomes a status message and the previous state stays visible.
    pub fn dispatch(&mut self, event: SelectionEvent) {
        let Some(coordinator) = &mut self.coordinator else {
            return;
        };
        match coordinator.apply(event) {
            Ok(_) => self.status_message = None,
            Err(e) => {
                // Snap the drafts back to the last accepted range.
                self.draft_year_start = coordinator.selection().year_start();
                self.draft_year_end = coordinator.selection().year_end();
                self.status_message = Some(e.to_string());
            }
        }
    }
}
