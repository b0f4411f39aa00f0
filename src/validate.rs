use crate::error::{ensure_records, AnalysisError, Stage};
use crate::models::{Evidence, Hypothesis, Record, ValidatedHypothesis};

pub const ACCEPTANCE_THRESHOLD: f64 = 0.6;
/// First-to-last roas change below which a campaign is confirmed declining.
pub const DECLINE_CONFIRMATION: f64 = -0.10;

const FATIGUE_CAMPAIGNS_EXAMINED: usize = 2;
const FATIGUE_BASE: f64 = 0.5;
const FATIGUE_WEIGHT: f64 = 0.3;
const FATIGUE_NO_EVIDENCE: f64 = 0.3;
const DEFAULT_POSTERIOR: f64 = 0.6;

/// Fractional change from a campaign's first to its last chronological roas.
/// Relies on `records` being date-sorted.
pub fn first_to_last_change(records: &[Record], campaign: &str) -> Option<f64> {
    let mut series = records
        .iter()
        .filter(|record| record.campaign_name == campaign)
        .map(|record| record.roas);
    let first = series.next()?;
    let last = series.last()?;
    if first == 0.0 {
        return None;
    }
    Some((last - first) / first)
}

fn fatigue_posterior(records: &[Record], campaigns: &[String]) -> f64 {
    let examined: Vec<&String> = campaigns.iter().take(FATIGUE_CAMPAIGNS_EXAMINED).collect();
    if examined.is_empty() {
        return FATIGUE_NO_EVIDENCE;
    }

    let confirmed = examined
        .iter()
        .filter(|campaign| {
            first_to_last_change(records, campaign)
                .is_some_and(|change| change < DECLINE_CONFIRMATION)
        })
        .count();

    FATIGUE_BASE + (confirmed as f64 / examined.len() as f64) * FATIGUE_WEIGHT
}

pub fn posterior(records: &[Record], hypothesis: &Hypothesis) -> f64 {
    match &hypothesis.evidence {
        Evidence::AdFatigue {
            problem_campaigns, ..
        } => fatigue_posterior(records, problem_campaigns),
        // Other kinds get a fixed posterior until they have dedicated checks.
        Evidence::AudienceBurnout { .. } | Evidence::PoorEngagement { .. } => DEFAULT_POSTERIOR,
    }
}

pub fn validate(
    records: &[Record],
    hypotheses: &[Hypothesis],
) -> Result<Vec<ValidatedHypothesis>, AnalysisError> {
    ensure_records(Stage::HypothesisValidation, records)?;

    Ok(hypotheses
        .iter()
        .map(|hypothesis| {
            let posterior_confidence = posterior(records, hypothesis);
            ValidatedHypothesis {
                hypothesis: hypothesis.clone(),
                posterior_confidence,
                accepted: posterior_confidence >= ACCEPTANCE_THRESHOLD,
            }
        })
        .collect())
}
