use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Days, NaiveDate};

use crate::error::{ensure_records, AnalysisError, Stage};
use crate::models::{Record, TrendSummary, WeeklyBucket};
use crate::stats;

/// Week-over-week roas change below which a bucket counts as a decline.
pub const DECLINE_THRESHOLD: f64 = -0.20;

/// Sunday closing the Monday..Sunday week that contains `date`, or `None`
/// when that Sunday is past the last representable date.
pub fn week_ending(date: NaiveDate) -> Option<NaiveDate> {
    let days_to_sunday = 6 - u64::from(date.weekday().num_days_from_monday());
    date.checked_add_days(Days::new(days_to_sunday))
}

pub fn roas_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    let change = (current - previous) / previous;
    change.is_finite().then_some(change)
}

/// One bucket per calendar week present in the data, in chronological order.
pub fn weekly_buckets(records: &[Record]) -> Result<Vec<WeeklyBucket>, AnalysisError> {
    let mut weeks: BTreeMap<NaiveDate, (usize, f64, f64, f64)> = BTreeMap::new();

    for record in records {
        let week = week_ending(record.date).ok_or_else(|| {
            AnalysisError::stage(
                Stage::TrendAnalysis,
                format!("{} cannot be placed in a calendar week", record.date),
            )
        })?;
        let entry = weeks.entry(week).or_insert((0, 0.0, 0.0, 0.0));
        entry.0 += 1;
        entry.1 += record.roas;
        entry.2 += record.spend;
        entry.3 += record.ctr;
    }

    let mut buckets: Vec<WeeklyBucket> = Vec::with_capacity(weeks.len());
    for (week_ending, (count, roas, spend, ctr)) in weeks {
        let roas = roas / count as f64;
        let change = buckets
            .last()
            .and_then(|previous| roas_change(previous.roas, roas));
        buckets.push(WeeklyBucket {
            week_ending,
            record_count: count,
            roas,
            spend,
            ctr: ctr / count as f64,
            roas_change: change,
            significant_decline: change.is_some_and(|value| value < DECLINE_THRESHOLD),
        });
    }

    Ok(buckets)
}

pub fn decline_periods(buckets: &[WeeklyBucket]) -> usize {
    buckets
        .iter()
        .filter(|bucket| bucket.significant_decline)
        .count()
}

pub fn analyze(records: &[Record]) -> Result<TrendSummary, AnalysisError> {
    ensure_records(Stage::TrendAnalysis, records)?;

    let roas: Vec<f64> = records.iter().map(|record| record.roas).collect();
    let ctr: Vec<f64> = records.iter().map(|record| record.ctr).collect();
    let campaigns: BTreeSet<&str> = records
        .iter()
        .map(|record| record.campaign_name.as_str())
        .collect();
    let weekly = weekly_buckets(records)?;

    let (first, last) = match (records.first(), records.last()) {
        (Some(first), Some(last)) => (first.date, last.date),
        _ => return Err(AnalysisError::stage(Stage::TrendAnalysis, "no records to analyze")),
    };

    Ok(TrendSummary {
        campaign_count: campaigns.len(),
        average_roas: stats::mean(&roas).unwrap_or_default(),
        average_ctr: stats::mean(&ctr).unwrap_or_default(),
        decline_periods: decline_periods(&weekly),
        first_date: first,
        last_date: last,
        weekly,
    })
}
