use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use super::filter::FilteredView;
use super::model::Field;

// ---------------------------------------------------------------------------
// Share – percentage contribution as data, not as a fault
// ---------------------------------------------------------------------------

/// One gauge's percentage contribution to the group total.
///
/// `Undefined` stands in for the division-by-zero case (empty view or
/// all-zero readings): an empty selection is a normal dashboard state, so
/// the condition travels as data and the charts render empty instead of
/// the app faulting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Share {
    Value(f64),
    Undefined,
}

impl Share {
    pub fn as_f64(self) -> Option<f64> {
        match self {
            Share::Value(v) => Some(v),
            Share::Undefined => None,
        }
    }

    pub fn is_undefined(self) -> bool {
        matches!(self, Share::Undefined)
    }
}

// ---------------------------------------------------------------------------
// Bucket – calendar grain for histogram totals
// ---------------------------------------------------------------------------

/// Calendar bucket for grouped totals. The dashboard buckets by day;
/// month is the same operation at coarser grain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Day,
    Month,
}

impl Bucket {
    fn truncate(self, ts: NaiveDateTime) -> NaiveDate {
        match self {
            Bucket::Day => ts.date(),
            Bucket::Month => NaiveDate::from_ymd_opt(ts.year(), ts.month(), 1)
                .unwrap_or_else(|| ts.date()),
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregations – pure functions of a filtered view
// ---------------------------------------------------------------------------

/// Sum the chosen measure per gauge. An empty view yields an empty map.
pub fn sum_by_gauge(view: &FilteredView<'_>, field: Field) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, f64> = BTreeMap::new();
    for r in view.readings() {
        *sums.entry(r.gauge.clone()).or_insert(0.0) += field.value(r);
    }
    sums
}

/// Each gauge's percentage of the group total for the chosen measure.
///
/// A zero grand total (empty view or all-zero readings) makes every
/// entry [`Share::Undefined`]; otherwise all entries are finite and sum
/// to 100 within floating tolerance.
pub fn share_by_gauge(view: &FilteredView<'_>, field: Field) -> BTreeMap<String, Share> {
    let sums = sum_by_gauge(view, field);
    let grand_total: f64 = sums.values().sum();

    sums.into_iter()
        .map(|(gauge, sum)| {
            let share = if grand_total == 0.0 {
                Share::Undefined
            } else {
                Share::Value(sum / grand_total * 100.0)
            };
            (gauge, share)
        })
        .collect()
}

/// Per-gauge (timestamp, value) series, ascending by timestamp.
///
/// Relies on the dataset invariant that timestamps never go backwards
/// within a gauge's source order, which filtering preserves.
pub fn series_by_gauge(
    view: &FilteredView<'_>,
    field: Field,
) -> BTreeMap<String, Vec<(NaiveDateTime, f64)>> {
    let mut series: BTreeMap<String, Vec<(NaiveDateTime, f64)>> = BTreeMap::new();
    for r in view.readings() {
        series
            .entry(r.gauge.clone())
            .or_default()
            .push((r.timestamp, field.value(r)));
    }
    series
}

/// Per-gauge totals of the chosen measure grouped into calendar buckets.
/// One derived table serves both the per-day line and the histogram; the
/// chart layer picks the visual encoding.
pub fn bucketed_totals(
    view: &FilteredView<'_>,
    field: Field,
    bucket: Bucket,
) -> BTreeMap<String, BTreeMap<NaiveDate, f64>> {
    let mut totals: BTreeMap<String, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
    for r in view.readings() {
        *totals
            .entry(r.gauge.clone())
            .or_default()
            .entry(bucket.truncate(r.timestamp))
            .or_insert(0.0) += field.value(r);
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::filter;
    use crate::data::model::{Dataset, Reading};
    use crate::data::selection::Selection;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn reading(gauge: &str, timestamp: NaiveDateTime, total: f64) -> Reading {
        Reading {
            gauge: gauge.to_string(),
            timestamp,
            rainfall_total: total,
            daily_accumulation: total * 2.0,
        }
    }

    /// Two gauges over 2019-2020: A reads 10 then 30, B reads zero twice.
    fn two_gauge_dataset() -> Dataset {
        Dataset::from_readings(vec![
            reading("A", ts(2019, 5, 1, 6), 10.0),
            reading("B", ts(2019, 5, 1, 6), 0.0),
            reading("A", ts(2020, 5, 1, 6), 30.0),
            reading("B", ts(2020, 5, 1, 6), 0.0),
        ])
        .unwrap()
    }

    fn select_all(ds: &Dataset) -> Selection {
        let mut sel = Selection::new(ds);
        sel.toggle_all(ds.gauges());
        sel
    }

    #[test]
    fn sums_per_gauge_over_the_full_range() {
        let ds = two_gauge_dataset();
        let sel = select_all(&ds);
        let sums = sum_by_gauge(&filter(&ds, &sel), Field::RainfallTotal);

        assert_eq!(sums.get("A"), Some(&40.0));
        assert_eq!(sums.get("B"), Some(&0.0));
    }

    #[test]
    fn empty_view_sums_to_an_empty_map() {
        let ds = two_gauge_dataset();
        let sel = Selection::new(&ds); // nothing selected
        assert!(sum_by_gauge(&filter(&ds, &sel), Field::RainfallTotal).is_empty());
    }

    #[test]
    fn shares_split_the_grand_total() {
        let ds = two_gauge_dataset();
        let sel = select_all(&ds);
        let shares = share_by_gauge(&filter(&ds, &sel), Field::RainfallTotal);

        assert_eq!(shares.get("A"), Some(&Share::Value(100.0)));
        assert_eq!(shares.get("B"), Some(&Share::Value(0.0)));

        let total: f64 = shares.values().filter_map(|s| s.as_f64()).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_grand_total_makes_every_share_undefined() {
        let ds = two_gauge_dataset();
        let mut sel = Selection::new(&ds);
        sel.set_gauges(std::collections::BTreeSet::from(["B".to_string()]));

        let view = filter(&ds, &sel);
        assert_eq!(view.len(), 2); // both zero readings are present

        let shares = share_by_gauge(&view, Field::RainfallTotal);
        assert_eq!(shares.len(), 1);
        assert!(shares["B"].is_undefined());
    }

    #[test]
    fn empty_view_shares_are_empty_not_a_fault() {
        let ds = two_gauge_dataset();
        let sel = Selection::new(&ds);
        assert!(share_by_gauge(&filter(&ds, &sel), Field::RainfallTotal).is_empty());
    }

    #[test]
    fn series_are_grouped_and_ascending() {
        let ds = two_gauge_dataset();
        let sel = select_all(&ds);
        let series = series_by_gauge(&filter(&ds, &sel), Field::RainfallTotal);

        let a = &series["A"];
        assert_eq!(a.len(), 2);
        assert!(a[0].0 < a[1].0);
        assert_eq!(a[0].1, 10.0);
        assert_eq!(a[1].1, 30.0);
    }

    #[test]
    fn series_respect_the_field_argument() {
        let ds = two_gauge_dataset();
        let sel = select_all(&ds);
        let series = series_by_gauge(&filter(&ds, &sel), Field::DailyAccumulation);
        assert_eq!(series["A"][0].1, 20.0);
    }

    #[test]
    fn day_buckets_sum_readings_of_the_same_day() {
        let ds = Dataset::from_readings(vec![
            reading("A", ts(2020, 5, 1, 6), 1.0),
            reading("A", ts(2020, 5, 1, 18), 2.0),
            reading("A", ts(2020, 5, 2, 6), 4.0),
        ])
        .unwrap();
        let sel = select_all(&ds);
        let totals = bucketed_totals(&filter(&ds, &sel), Field::RainfallTotal, Bucket::Day);

        let days = &totals["A"];
        assert_eq!(days.len(), 2);
        assert_eq!(days[&NaiveDate::from_ymd_opt(2020, 5, 1).unwrap()], 3.0);
        assert_eq!(days[&NaiveDate::from_ymd_opt(2020, 5, 2).unwrap()], 4.0);
    }

    #[test]
    fn month_buckets_collapse_to_the_first_of_month() {
        let ds = Dataset::from_readings(vec![
            reading("A", ts(2020, 5, 1, 6), 1.0),
            reading("A", ts(2020, 5, 20, 6), 2.0),
            reading("A", ts(2020, 6, 2, 6), 4.0),
        ])
        .unwrap();
        let sel = select_all(&ds);
        let totals = bucketed_totals(&filter(&ds, &sel), Field::RainfallTotal, Bucket::Month);

        let months = &totals["A"];
        assert_eq!(months[&NaiveDate::from_ymd_opt(2020, 5, 1).unwrap()], 3.0);
        assert_eq!(months[&NaiveDate::from_ymd_opt(2020, 6, 1).unwrap()], 4.0);
    }
}
