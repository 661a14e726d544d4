use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime};

use crate::data::aggregate::{
    bucketed_totals, series_by_gauge, share_by_gauge, sum_by_gauge, Bucket, Share,
};
use crate::data::filter::{filter, FilteredView};
use crate::data::model::{Dataset, Field};
use crate::data::selection::{RangeError, Selection};

// ---------------------------------------------------------------------------
// Events – the three mutations the UI can deliver
// ---------------------------------------------------------------------------

/// A discrete selection change coming from the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    /// Both year-range bounds, replaced together.
    YearRange(i32, i32),
    /// The gauge checklist contents, replaced wholesale.
    Gauges(BTreeSet<String>),
    /// Select/deselect-all button click. No payload; the effect is decided
    /// by the selection's toggle phase.
    ToggleAll,
}

/// Selection fields a chart can depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateField {
    YearRange,
    GaugeSet,
}

impl SelectionEvent {
    /// Which selection field this event mutates.
    fn touches(&self) -> StateField {
        match self {
            SelectionEvent::YearRange(..) => StateField::YearRange,
            SelectionEvent::Gauges(_) | SelectionEvent::ToggleAll => StateField::GaugeSet,
        }
    }
}

// ---------------------------------------------------------------------------
// Charts – the registry of derived outputs
// ---------------------------------------------------------------------------

/// The dashboard's charts, each backed by one aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChartKind {
    /// Summed rainfall per gauge over the selected range (bar chart).
    RainfallTotals,
    /// Each gauge's percentage of the summed rainfall (bar chart).
    GaugeShares,
    /// Rainfall-total time series per gauge (line chart).
    RainfallSeries,
    /// Daily-accumulation time series per gauge (line chart).
    AccumulationSeries,
    /// Rainfall summed per gauge per calendar day (histogram).
    DailyTotals,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::RainfallTotals,
        ChartKind::GaugeShares,
        ChartKind::RainfallSeries,
        ChartKind::AccumulationSeries,
        ChartKind::DailyTotals,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::RainfallTotals => "Total rainfall per gauge",
            ChartKind::GaugeShares => "Share of rainfall per gauge",
            ChartKind::RainfallSeries => "Rainfall Total",
            ChartKind::AccumulationSeries => "Daily Accumulation",
            ChartKind::DailyTotals => "Rainfall per day",
        }
    }

    /// Declared dependency on a selection field. Every chart here reads the
    /// filtered view, which both fields shape; the declaration stays
    /// explicit so the coordinator can skip charts a future field does not
    /// reach.
    pub fn depends_on(self, field: StateField) -> bool {
        match (self, field) {
            (_, StateField::YearRange) => true,
            (_, StateField::GaugeSet) => true,
        }
    }

    fn compute(self, view: &FilteredView<'_>) -> ChartOutput {
        match self {
            ChartKind::RainfallTotals => {
                ChartOutput::Sums(sum_by_gauge(view, Field::RainfallTotal))
            }
            ChartKind::GaugeShares => {
                ChartOutput::Shares(share_by_gauge(view, Field::RainfallTotal))
            }
            ChartKind::RainfallSeries => {
                ChartOutput::Series(series_by_gauge(view, Field::RainfallTotal))
            }
            ChartKind::AccumulationSeries => {
                ChartOutput::Series(series_by_gauge(view, Field::DailyAccumulation))
            }
            ChartKind::DailyTotals => ChartOutput::BucketedTotals(bucketed_totals(
                view,
                Field::RainfallTotal,
                Bucket::Day,
            )),
        }
    }
}

/// Chart-ready data handed to the rendering layer, one shape per
/// aggregation family.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutput {
    Sums(BTreeMap<String, f64>),
    Shares(BTreeMap<String, Share>),
    Series(BTreeMap<String, Vec<(NaiveDateTime, f64)>>),
    BucketedTotals(BTreeMap<String, BTreeMap<NaiveDate, f64>>),
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

/// Owns the dataset and selection, and keeps the last-good output of every
/// chart. Each applied event mutates the selection atomically and
/// recomputes each dependent chart exactly once; a rejected event leaves
/// both the selection and all outputs untouched.
pub struct Coordinator {
    dataset: Dataset,
    selection: Selection,
    charts: BTreeMap<ChartKind, ChartOutput>,
}

impl Coordinator {
    /// Build over a loaded dataset with the initial selection (full year
    /// range, no gauges) and all charts computed from it.
    pub fn new(dataset: Dataset) -> Self {
        let selection = Selection::new(&dataset);
        let mut coordinator = Coordinator {
            dataset,
            selection,
            charts: BTreeMap::new(),
        };
        let view = filter(&coordinator.dataset, &coordinator.selection);
        for kind in ChartKind::ALL {
            coordinator.charts.insert(kind, kind.compute(&view));
        }
        coordinator
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The last-good output of a chart. Present for every kind from
    /// construction onward.
    pub fn chart(&self, kind: ChartKind) -> &ChartOutput {
        &self.charts[&kind]
    }

    /// Apply one selection event: mutate, recompute dependents, report
    /// which charts changed. An invalid year range is rejected with the
    /// previous state kept.
    pub fn apply(&mut self, event: SelectionEvent) -> Result<Vec<ChartKind>, RangeError> {
        let touched = event.touches();
        match event {
            SelectionEvent::YearRange(start, end) => {
                self.selection.set_year_range(start, end)?;
            }
            SelectionEvent::Gauges(gauges) => self.selection.set_gauges(gauges),
            SelectionEvent::ToggleAll => {
                self.selection.toggle_all(self.dataset.gauges());
            }
        }

        let view = filter(&self.dataset, &self.selection);
        let mut changed = Vec::new();
        for kind in ChartKind::ALL {
            if kind.depends_on(touched) {
                self.charts.insert(kind, kind.compute(&view));
                changed.push(kind);
            }
        }
        log::debug!(
            "selection change touched {touched:?}; recomputed {} charts over {} readings",
            changed.len(),
            view.len()
        );
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Reading;
    use chrono::NaiveDate;

    fn reading(gauge: &str, year: i32, total: f64) -> Reading {
        Reading {
            gauge: gauge.to_string(),
            timestamp: NaiveDate::from_ymd_opt(year, 5, 1)
                .unwrap()
                .and_hms_opt(6, 0, 0)
                .unwrap(),
            rainfall_total: total,
            daily_accumulation: total,
        }
    }

    fn coordinator() -> Coordinator {
        let dataset = Dataset::from_readings(vec![
            reading("A", 2019, 10.0),
            reading("B", 2019, 0.0),
            reading("A", 2020, 30.0),
            reading("B", 2020, 0.0),
        ])
        .unwrap();
        Coordinator::new(dataset)
    }

    #[test]
    fn starts_with_an_output_for_every_chart() {
        let c = coordinator();
        for kind in ChartKind::ALL {
            match (kind, c.chart(kind)) {
                (ChartKind::RainfallTotals, ChartOutput::Sums(sums)) => assert!(sums.is_empty()),
                (ChartKind::GaugeShares, ChartOutput::Shares(s)) => assert!(s.is_empty()),
                (ChartKind::RainfallSeries | ChartKind::AccumulationSeries, ChartOutput::Series(s)) => {
                    assert!(s.is_empty())
                }
                (ChartKind::DailyTotals, ChartOutput::BucketedTotals(t)) => assert!(t.is_empty()),
                (kind, other) => panic!("{kind:?} produced unexpected output {other:?}"),
            }
        }
    }

    #[test]
    fn toggle_event_recomputes_every_dependent_chart() {
        let mut c = coordinator();
        let changed = c.apply(SelectionEvent::ToggleAll).unwrap();
        assert_eq!(changed, ChartKind::ALL.to_vec());

        match c.chart(ChartKind::RainfallTotals) {
            ChartOutput::Sums(sums) => {
                assert_eq!(sums.get("A"), Some(&40.0));
                assert_eq!(sums.get("B"), Some(&0.0));
            }
            other => panic!("unexpected output {other:?}"),
        }
        match c.chart(ChartKind::GaugeShares) {
            ChartOutput::Shares(shares) => {
                assert_eq!(shares["A"].as_f64(), Some(100.0));
                assert_eq!(shares["B"].as_f64(), Some(0.0));
            }
            other => panic!("unexpected output {other:?}"),
        }
    }

    #[test]
    fn year_range_event_narrows_the_outputs() {
        let mut c = coordinator();
        c.apply(SelectionEvent::ToggleAll).unwrap();
        c.apply(SelectionEvent::YearRange(2019, 2019)).unwrap();

        match c.chart(ChartKind::RainfallTotals) {
            ChartOutput::Sums(sums) => assert_eq!(sums.get("A"), Some(&10.0)),
            other => panic!("unexpected output {other:?}"),
        }
    }

    #[test]
    fn rejected_range_keeps_selection_and_outputs() {
        let mut c = coordinator();
        c.apply(SelectionEvent::ToggleAll).unwrap();
        let selection_before = c.selection().clone();
        let sums_before = c.chart(ChartKind::RainfallTotals).clone();

        let err = c.apply(SelectionEvent::YearRange(2021, 2019));
        assert!(err.is_err());
        assert_eq!(c.selection(), &selection_before);
        assert_eq!(c.chart(ChartKind::RainfallTotals), &sums_before);
    }

    #[test]
    fn gauge_event_replaces_the_checklist() {
        let mut c = coordinator();
        c.apply(SelectionEvent::Gauges(BTreeSet::from(["B".to_string()])))
            .unwrap();

        match c.chart(ChartKind::GaugeShares) {
            // B alone sums to zero, so its share is undefined, not a fault.
            ChartOutput::Shares(shares) => {
                assert_eq!(shares.len(), 1);
                assert!(shares["B"].is_undefined());
            }
            other => panic!("unexpected output {other:?}"),
        }
    }

    #[test]
    fn every_chart_declares_both_dependencies() {
        for kind in ChartKind::ALL {
            assert!(kind.depends_on(StateField::YearRange));
            assert!(kind.depends_on(StateField::GaugeSet));
        }
    }
}
