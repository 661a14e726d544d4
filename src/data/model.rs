use chrono::{Datelike, NaiveDateTime};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Reading – one row of the source table
// ---------------------------------------------------------------------------

/// A single precipitation reading (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// Identifier of the measurement gauge.
    pub gauge: String,
    /// When the reading was taken (minute or hour granularity).
    pub timestamp: NaiveDateTime,
    /// Rainfall accumulated in the reading period, mm.
    pub rainfall_total: f64,
    /// Rainfall accumulated over the reading's day so far, mm.
    pub daily_accumulation: f64,
}

// ---------------------------------------------------------------------------
// Field – which measure an aggregation reads
// ---------------------------------------------------------------------------

/// Selects one of the two measures carried by every [`Reading`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    RainfallTotal,
    DailyAccumulation,
}

impl Field {
    /// The selected measure of a reading.
    pub fn value(self, reading: &Reading) -> f64 {
        match self {
            Field::RainfallTotal => reading.rainfall_total,
            Field::DailyAccumulation => reading.daily_accumulation,
        }
    }

    /// Human-readable label, matching the source column names.
    pub fn label(self) -> &'static str {
        match self {
            Field::RainfallTotal => "Rainfall Total",
            Field::DailyAccumulation => "Daily Accumulation",
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// Validation failures raised once while building a [`Dataset`].
/// All of these are fatal: the dashboard never starts over a bad table.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset contains no readings")]
    Empty,
    #[error("row {row}: {field} is {value}, expected a finite value >= 0")]
    InvalidMeasure {
        row: usize,
        field: &'static str,
        value: f64,
    },
    #[error("row {row}: timestamp {current} precedes {previous} for gauge '{gauge}'")]
    OutOfOrder {
        row: usize,
        gauge: String,
        previous: NaiveDateTime,
        current: NaiveDateTime,
    },
}

/// The full loaded table with scalars derived once at load time.
///
/// Immutable after construction: every filtered view and aggregate is
/// re-derived from it rather than mutating it.
#[derive(Debug, Clone)]
pub struct Dataset {
    readings: Vec<Reading>,
    min_year: i32,
    max_year: i32,
    /// Distinct gauge identifiers in first-seen order.
    gauges: Vec<String>,
}

impl Dataset {
    /// Validate the rows and derive the cached scalars.
    ///
    /// Fails on an empty table, a negative or non-finite measure, or
    /// timestamps that go backwards within a gauge's source order.
    pub fn from_readings(readings: Vec<Reading>) -> Result<Self, DatasetError> {
        if readings.is_empty() {
            return Err(DatasetError::Empty);
        }

        let mut min_year = i32::MAX;
        let mut max_year = i32::MIN;
        let mut gauges: Vec<String> = Vec::new();
        let mut last_seen: std::collections::BTreeMap<String, NaiveDateTime> =
            std::collections::BTreeMap::new();

        for (row, r) in readings.iter().enumerate() {
            for (field, value) in [
                ("rainfall total", r.rainfall_total),
                ("daily accumulation", r.daily_accumulation),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(DatasetError::InvalidMeasure { row, field, value });
                }
            }

            if let Some(&previous) = last_seen.get(&r.gauge) {
                if r.timestamp < previous {
                    return Err(DatasetError::OutOfOrder {
                        row,
                        gauge: r.gauge.clone(),
                        previous,
                        current: r.timestamp,
                    });
                }
            }
            last_seen.insert(r.gauge.clone(), r.timestamp);

            if !gauges.iter().any(|g| g == &r.gauge) {
                gauges.push(r.gauge.clone());
            }

            let year = r.timestamp.year();
            min_year = min_year.min(year);
            max_year = max_year.max(year);
        }

        Ok(Dataset {
            readings,
            min_year,
            max_year,
            gauges,
        })
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// Earliest year appearing in any timestamp.
    pub fn min_year(&self) -> i32 {
        self.min_year
    }

    /// Latest year appearing in any timestamp.
    pub fn max_year(&self) -> i32 {
        self.max_year
    }

    /// Distinct gauge identifiers, first-seen order. Never empty.
    pub fn gauges(&self) -> &[String] {
        &self.gauges
    }

    /// Number of readings.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap()
    }

    fn reading(gauge: &str, timestamp: NaiveDateTime, total: f64) -> Reading {
        Reading {
            gauge: gauge.to_string(),
            timestamp,
            rainfall_total: total,
            daily_accumulation: total,
        }
    }

    #[test]
    fn derives_year_bounds_and_gauge_order() {
        let ds = Dataset::from_readings(vec![
            reading("East", ts(2019, 4, 1), 1.0),
            reading("West", ts(2019, 4, 1), 0.0),
            reading("East", ts(2021, 7, 2), 2.5),
        ])
        .unwrap();

        assert_eq!(ds.min_year(), 2019);
        assert_eq!(ds.max_year(), 2021);
        assert_eq!(ds.gauges(), ["East".to_string(), "West".to_string()]);
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn rejects_empty_table() {
        assert!(matches!(
            Dataset::from_readings(Vec::new()),
            Err(DatasetError::Empty)
        ));
    }

    #[test]
    fn rejects_negative_and_nan_measures() {
        let err = Dataset::from_readings(vec![reading("East", ts(2020, 1, 1), -0.5)]);
        assert!(matches!(err, Err(DatasetError::InvalidMeasure { row: 0, .. })));

        let mut bad = reading("East", ts(2020, 1, 1), 1.0);
        bad.daily_accumulation = f64::NAN;
        assert!(matches!(
            Dataset::from_readings(vec![bad]),
            Err(DatasetError::InvalidMeasure { .. })
        ));
    }

    #[test]
    fn rejects_backwards_timestamps_within_a_gauge() {
        let err = Dataset::from_readings(vec![
            reading("East", ts(2020, 5, 2), 1.0),
            reading("East", ts(2020, 5, 1), 1.0),
        ]);
        assert!(matches!(err, Err(DatasetError::OutOfOrder { row: 1, .. })));
    }

    #[test]
    fn gauges_may_interleave_in_time() {
        // Order only has to hold per gauge, not across gauges.
        let ds = Dataset::from_readings(vec![
            reading("East", ts(2020, 5, 2), 1.0),
            reading("West", ts(2020, 5, 1), 1.0),
        ]);
        assert!(ds.is_ok());
    }

    #[test]
    fn field_selects_the_right_measure() {
        let r = Reading {
            gauge: "East".into(),
            timestamp: ts(2020, 1, 1),
            rainfall_total: 1.5,
            daily_accumulation: 4.0,
        };
        assert_eq!(Field::RainfallTotal.value(&r), 1.5);
        assert_eq!(Field::DailyAccumulation.value(&r), 4.0);
    }
}
