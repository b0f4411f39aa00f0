use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::error::AnalysisError;
use crate::models::{Dataset, Record};
use crate::trends;

pub const REQUIRED_COLUMNS: [&str; 5] = ["date", "campaign_name", "roas", "spend", "ctr"];

// Two-digit years go before four-digit ones, and ISO goes last so that
// "05-01-24" is read day-first.
const DATE_FORMATS: [&str; 10] = [
    "%d/%m/%y",
    "%d/%m/%Y",
    "%d-%m-%y",
    "%d-%m-%Y",
    "%d.%m.%y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
];

const TIME_SUFFIXES: [&str; 3] = [" %H:%M:%S", " %H:%M", "T%H:%M:%S"];

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    campaign_name: String,
    roas: String,
    spend: String,
    ctr: String,
    #[serde(default)]
    creative_message: Option<String>,
    #[serde(default)]
    audience_type: Option<String>,
}

impl CsvRow {
    fn into_record(self, date: NaiveDate) -> Result<Record, String> {
        Ok(Record {
            date,
            roas: parse_metric("roas", &self.roas)?,
            spend: parse_metric("spend", &self.spend)?,
            ctr: parse_metric("ctr", &self.ctr)?,
            campaign_name: self.campaign_name,
            creative_message: self.creative_message.filter(|text| !text.trim().is_empty()),
            audience_type: self.audience_type.filter(|text| !text.trim().is_empty()),
        })
    }
}

fn parse_metric(column: &str, raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{column} value {raw:?} is not a number"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{column} value {raw:?} must be finite and non-negative"));
    }
    Ok(value)
}

/// Parses a date day-first. Returns `None` for anything unrecognised and for
/// dates too close to the end of the calendar to fall in a whole week.
pub fn parse_day_first(raw: &str) -> Option<NaiveDate> {
    parse_any(raw.trim()).filter(|date| trends::week_ending(*date).is_some())
}

fn parse_any(value: &str) -> Option<NaiveDate> {
    if value.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    for format in DATE_FORMATS {
        for suffix in TIME_SUFFIXES {
            let pattern = format!("{format}{suffix}");
            if let Ok(moment) = NaiveDateTime::parse_from_str(value, &pattern) {
                return Some(moment.date());
            }
        }
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|moment| moment.date_naive())
}

/// Reads a delimited file into a date-sorted dataset. Rows whose date cannot
/// be parsed are dropped and counted; every other defect is fatal.
pub fn load(path: &Path, delimiter: u8) -> Result<Dataset, AnalysisError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|err| AnalysisError::data_unavailable(path, err.to_string()))?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(|err| AnalysisError::data_unavailable(path, err.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|required| !columns.iter().any(|column| column == required))
        .collect();
    if !missing.is_empty() {
        return Err(AnalysisError::data_unavailable(
            path,
            format!("missing required column(s): {}", missing.join(", ")),
        ));
    }

    let mut rows_read = 0usize;
    let mut records = Vec::new();

    for result in reader.deserialize::<CsvRow>() {
        let row = result.map_err(|err| AnalysisError::data_unavailable(path, err.to_string()))?;
        rows_read += 1;

        let Some(date) = parse_day_first(&row.date) else {
            continue;
        };
        let record = row.into_record(date).map_err(|reason| {
            AnalysisError::data_unavailable(path, format!("row {rows_read}: {reason}"))
        })?;
        records.push(record);
    }

    if records.is_empty() {
        return Err(AnalysisError::data_unavailable(
            path,
            format!("none of {rows_read} rows has a parseable date"),
        ));
    }

    let rows_dropped = rows_read - records.len();
    let mut dataset = Dataset::from_records(path.to_path_buf(), columns, records);
    dataset.rows_read = rows_read;
    dataset.rows_dropped = rows_dropped;
    Ok(dataset)
}
