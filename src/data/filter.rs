use chrono::Datelike;

use super::model::{Dataset, Reading};
use super::selection::Selection;

// ---------------------------------------------------------------------------
// FilteredView – a borrowed projection of the dataset
// ---------------------------------------------------------------------------

/// The subsequence of readings matching a selection, as indices into the
/// dataset. Recomputed on demand after every selection change; never cached
/// across changes.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// Iterate the matching readings in source order.
    pub fn readings(&self) -> impl Iterator<Item = &'a Reading> + '_ {
        self.indices.iter().map(|&i| &self.dataset.readings()[i])
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Apply a selection to the dataset.
///
/// Pure and total: any selection (empty gauge set, unknown gauges, a
/// single-year range) yields a possibly-empty view, never an error. The
/// year bound is inclusive and tested on the year component only, so every
/// reading of a boundary year is included regardless of day or time.
/// Linear scan; source order is preserved.
pub fn filter<'a>(dataset: &'a Dataset, selection: &Selection) -> FilteredView<'a> {
    let indices = dataset
        .readings()
        .iter()
        .enumerate()
        .filter(|(_, r)| {
            let year = r.timestamp.year();
            year >= selection.year_start()
                && year <= selection.year_end()
                && selection.gauges().contains(&r.gauge)
        })
        .map(|(i, _)| i)
        .collect();

    FilteredView { dataset, indices }
}
