use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use serde::Deserialize;

use super::model::{Dataset, Reading};

/// Timestamp formats accepted in the `DateTime` column, tried in order.
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// One row as it appears in the source export (Windsor open-data layout).
#[derive(Debug, Deserialize)]
struct RawReading {
    #[serde(rename = "Gauge")]
    gauge: String,
    #[serde(rename = "DateTime")]
    datetime: String,
    #[serde(rename = "Rainfall Total")]
    rainfall_total: RawMeasure,
    #[serde(rename = "Daily Accumulation")]
    daily_accumulation: RawMeasure,
}

/// A measure cell: a number in JSON, text in CSV. The source export leaves
/// cells empty on dry periods; empty reads as "no rain". The columns
/// themselves are required.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMeasure {
    Number(f64),
    Text(String),
}

impl RawMeasure {
    fn to_f64(&self, column: &str) -> Result<f64> {
        match self {
            RawMeasure::Number(v) => Ok(*v),
            RawMeasure::Text(s) if s.trim().is_empty() => Ok(0.0),
            RawMeasure::Text(s) => s
                .trim()
                .parse::<f64>()
                .with_context(|| format!("'{s}' is not a number in '{column}'")),
        }
    }
}

impl RawReading {
    fn into_reading(self, row: usize) -> Result<Reading> {
        let timestamp = parse_datetime(self.datetime.trim())
            .with_context(|| format!("row {row}: '{}'", self.datetime))?;
        let rainfall_total = self
            .rainfall_total
            .to_f64("Rainfall Total")
            .with_context(|| format!("row {row}"))?;
        let daily_accumulation = self
            .daily_accumulation
            .to_f64("Daily Accumulation")
            .with_context(|| format!("row {row}"))?;
        Ok(Reading {
            gauge: self.gauge.trim().to_string(),
            timestamp,
            rainfall_total,
            daily_accumulation,
        })
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a precipitation dataset from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row `Gauge,DateTime,Rainfall Total,Daily Accumulation`
/// * `.json` – `[{ "Gauge": ..., "DateTime": ..., ... }, ...]`
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV file")?;
            load_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            load_json(&text)
        }
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse the CSV layout: a header row naming the four columns, then one
/// reading per row. Column order does not matter; extra columns are
/// ignored.
pub fn load_csv<R: Read>(input: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut readings = Vec::new();
    for (row_no, result) in reader.deserialize::<RawReading>().enumerate() {
        let raw = result.with_context(|| format!("CSV row {row_no}"))?;
        readings.push(raw.into_reading(row_no)?);
    }

    Dataset::from_readings(readings).context("validating dataset")
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Gauge": "East",
///     "DateTime": "2019-04-01 06:00:00",
///     "Rainfall Total": 0.4,
///     "Daily Accumulation": 1.2
///   },
///   ...
/// ]
/// ```
pub fn load_json(text: &str) -> Result<Dataset> {
    let records: Vec<RawReading> = serde_json::from_str(text).context("parsing JSON")?;

    let readings = records
        .into_iter()
        .enumerate()
        .map(|(row, raw)| raw.into_reading(row))
        .collect::<Result<Vec<_>>>()?;

    Dataset::from_readings(readings).context("validating dataset")
}

// ---------------------------------------------------------------------------
// Timestamp parsing
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    for fmt in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ts);
        }
    }
    // Date-only cells get midnight.
    if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(ts) = date.and_hms_opt(0, 0, 0) {
            return Ok(ts);
        }
    }
    bail!("unrecognised timestamp format")
}
