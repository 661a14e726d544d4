use std::collections::BTreeSet;

use thiserror::Error;

use super::model::Dataset;

// ---------------------------------------------------------------------------
// Toggle phase
// ---------------------------------------------------------------------------

/// Remembered outcome of the last select/deselect-all action.
///
/// The toggle button decides its next effect from this phase alone, never
/// from the current contents of the gauge set. Manually unchecking a gauge
/// after "select all" does not change the phase, so the next click still
/// deselects everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TogglePhase {
    AllSelected,
    NoneSelected,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Rejected year-range mutation. The selection keeps its previous value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("year range start {start} is after end {end}")]
    Inverted { start: i32, end: i32 },
    #[error("year {year} is outside the dataset span {min}-{max}")]
    OutOfBounds { year: i32, min: i32, max: i32 },
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Current user selection: a year range, a gauge subset, and the toggle
/// phase. Each mutation replaces one field atomically; a rejected mutation
/// leaves every field untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    year_start: i32,
    year_end: i32,
    gauges: BTreeSet<String>,
    toggle_phase: TogglePhase,
    // Dataset year bounds, copied once so range checks need no dataset.
    min_year: i32,
    max_year: i32,
}

impl Selection {
    /// Initial selection over a loaded dataset: the full year range with no
    /// gauges selected. Dataset construction already guarantees
    /// `min_year <= max_year` and a non-empty gauge list.
    pub fn new(dataset: &Dataset) -> Self {
        Selection {
            year_start: dataset.min_year(),
            year_end: dataset.max_year(),
            gauges: BTreeSet::new(),
            toggle_phase: TogglePhase::NoneSelected,
            min_year: dataset.min_year(),
            max_year: dataset.max_year(),
        }
    }

    pub fn year_start(&self) -> i32 {
        self.year_start
    }

    pub fn year_end(&self) -> i32 {
        self.year_end
    }

    pub fn gauges(&self) -> &BTreeSet<String> {
        &self.gauges
    }

    pub fn toggle_phase(&self) -> TogglePhase {
        self.toggle_phase
    }

    /// Replace both range bounds, rejecting crossed handles and years
    /// outside the dataset span.
    pub fn set_year_range(&mut self, start: i32, end: i32) -> Result<(), RangeError> {
        if start > end {
            return Err(RangeError::Inverted { start, end });
        }
        for year in [start, end] {
            if year < self.min_year || year > self.max_year {
                return Err(RangeError::OutOfBounds {
                    year,
                    min: self.min_year,
                    max: self.max_year,
                });
            }
        }
        self.year_start = start;
        self.year_end = end;
        Ok(())
    }

    /// Replace the gauge subset verbatim. Unknown identifiers are kept:
    /// they filter to nothing rather than erroring, so filtering stays
    /// total.
    pub fn set_gauges(&mut self, gauges: BTreeSet<String>) {
        self.gauges = gauges;
    }

    /// Select or deselect every gauge, driven by the phase of the last
    /// toggle rather than by what the set currently holds.
    pub fn toggle_all(&mut self, all_gauges: &[String]) {
        match self.toggle_phase {
            TogglePhase::NoneSelected => {
                self.gauges = all_gauges.iter().cloned().collect();
                self.toggle_phase = TogglePhase::AllSelected;
            }
            TogglePhase::AllSelected => {
                self.gauges.clear();
                self.toggle_phase = TogglePhase::NoneSelected;
            }
        }
    }
}
