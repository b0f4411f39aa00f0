use std::collections::BTreeMap;

use crate::models::Record;

#[derive(Debug, Clone, PartialEq)]
pub struct CampaignAggregate {
    pub campaign_name: String,
    pub mean_roas: f64,
    pub total_spend: f64,
    pub mean_ctr: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudienceAggregate {
    pub audience_type: String,
    pub mean_roas: f64,
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard median; an even count averages the two middle values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Per-campaign aggregates ordered by campaign name.
pub fn by_campaign(records: &[Record]) -> Vec<CampaignAggregate> {
    let mut groups: BTreeMap<&str, (usize, f64, f64, f64)> = BTreeMap::new();

    for record in records {
        let entry = groups
            .entry(record.campaign_name.as_str())
            .or_insert((0, 0.0, 0.0, 0.0));
        entry.0 += 1;
        entry.1 += record.roas;
        entry.2 += record.spend;
        entry.3 += record.ctr;
    }

    groups
        .into_iter()
        .map(|(name, (count, roas, spend, ctr))| CampaignAggregate {
            campaign_name: name.to_string(),
            mean_roas: roas / count as f64,
            total_spend: spend,
            mean_ctr: ctr / count as f64,
        })
        .collect()
}

/// Mean roas per audience type ordered by audience; records without an
/// audience are left out.
pub fn by_audience(records: &[Record]) -> Vec<AudienceAggregate> {
    let mut groups: BTreeMap<&str, (usize, f64)> = BTreeMap::new();

    for record in records {
        if let Some(audience) = record.audience_type.as_deref() {
            let entry = groups.entry(audience).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += record.roas;
        }
    }

    groups
        .into_iter()
        .map(|(audience, (count, roas))| AudienceAggregate {
            audience_type: audience.to_string(),
            mean_roas: roas / count as f64,
        })
        .collect()
}

/// The `n` campaigns with the lowest mean ctr, ascending. Ties keep name order.
pub fn lowest_ctr(aggregates: &[CampaignAggregate], n: usize) -> Vec<CampaignAggregate> {
    let mut sorted = aggregates.to_vec();
    sorted.sort_by(|a, b| a.mean_ctr.total_cmp(&b.mean_ctr));
    sorted.truncate(n);
    sorted
}
