use std::path::PathBuf;

use chrono::NaiveDate;

use crate::models::{Dataset, Record};

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("fixture date")
}

pub fn record(day: &str, campaign: &str, roas: f64, spend: f64, ctr: f64) -> Record {
    Record {
        date: date(day),
        campaign_name: campaign.to_string(),
        roas,
        spend,
        ctr,
        creative_message: None,
        audience_type: None,
    }
}

pub fn dataset(records: Vec<Record>) -> Dataset {
    let mut columns: Vec<String> = ["date", "campaign_name", "roas", "spend", "ctr"]
        .iter()
        .map(|column| column.to_string())
        .collect();
    if records.iter().any(|r| r.audience_type.is_some()) {
        columns.push("audience_type".to_string());
    }
    if records.iter().any(|r| r.creative_message.is_some()) {
        columns.push("creative_message".to_string());
    }
    Dataset::from_records(PathBuf::from("fixture.csv"), columns, records)
}

/// Three campaigns over four weeks; "Alpha" spends the most while its roas
/// falls 20 -> 15 -> 10 -> 5.
pub fn fatigue_scenario() -> Dataset {
    let weeks = ["2024-01-03", "2024-01-10", "2024-01-17", "2024-01-24"];
    let alpha_roas = [20.0, 15.0, 10.0, 5.0];
    let mut records = Vec::new();

    for (week, day) in weeks.iter().enumerate() {
        records.push(record(day, "Alpha", alpha_roas[week], 200.0, 1.2));
        records.push(record(day, "Bravo", 15.0, 100.0, 2.4));
        records.push(record(day, "Charlie", 14.0, 50.0, 1.8));
    }

    dataset(records)
}
