use crate::error::{ensure_records, AnalysisError, Stage};
use crate::models::{Dataset, Evidence, Hypothesis, HypothesisKind};
use crate::stats;

/// A heuristic that inspects the dataset and may propose one hypothesis.
pub trait HypothesisRule {
    fn kind(&self) -> HypothesisKind;
    fn evaluate(&self, dataset: &Dataset) -> Option<Hypothesis>;
}

/// High-spend campaigns whose returns sit below the cross-campaign median.
pub struct AdFatigueRule;

impl HypothesisRule for AdFatigueRule {
    fn kind(&self) -> HypothesisKind {
        HypothesisKind::AdFatigue
    }

    fn evaluate(&self, dataset: &Dataset) -> Option<Hypothesis> {
        let campaigns = stats::by_campaign(&dataset.records);
        let spends: Vec<f64> = campaigns.iter().map(|c| c.total_spend).collect();
        let returns: Vec<f64> = campaigns.iter().map(|c| c.mean_roas).collect();
        let spend_median = stats::median(&spends)?;
        let roas_median = stats::median(&returns)?;

        let flagged: Vec<_> = campaigns
            .iter()
            .filter(|c| c.total_spend > spend_median && c.mean_roas < roas_median)
            .collect();
        if flagged.is_empty() {
            return None;
        }

        let flagged_roas: Vec<f64> = flagged.iter().map(|c| c.mean_roas).collect();
        Some(Hypothesis {
            kind: self.kind(),
            name: "Creative Fatigue in High-Spend Campaigns".to_string(),
            explanation: "Campaigns spending above the median are returning below-median ROAS"
                .to_string(),
            prior_confidence: 0.75,
            evidence: Evidence::AdFatigue {
                problem_campaigns: flagged
                    .iter()
                    .take(3)
                    .map(|c| c.campaign_name.clone())
                    .collect(),
                average_roas: stats::mean(&flagged_roas).unwrap_or_default(),
                total_spend: flagged.iter().map(|c| c.total_spend).sum(),
            },
        })
    }
}

/// Audience segments whose mean roas falls below the median segment.
/// Only applies when the data carries an `audience_type` column.
pub struct AudienceBurnoutRule;

impl HypothesisRule for AudienceBurnoutRule {
    fn kind(&self) -> HypothesisKind {
        HypothesisKind::AudienceBurnout
    }

    fn evaluate(&self, dataset: &Dataset) -> Option<Hypothesis> {
        if !dataset.has_column("audience_type") {
            return None;
        }

        let audiences = stats::by_audience(&dataset.records);
        let returns: Vec<f64> = audiences.iter().map(|a| a.mean_roas).collect();
        let roas_median = stats::median(&returns)?;

        let underperforming: Vec<String> = audiences
            .iter()
            .filter(|a| a.mean_roas < roas_median)
            .map(|a| a.audience_type.clone())
            .collect();
        if underperforming.is_empty() {
            return None;
        }

        let highest = returns.iter().copied().fold(f64::MIN, f64::max);
        let lowest = returns.iter().copied().fold(f64::MAX, f64::min);
        Some(Hypothesis {
            kind: self.kind(),
            name: "Audience Burnout".to_string(),
            explanation: "Some audience segments are no longer responding to the ads".to_string(),
            prior_confidence: 0.65,
            evidence: Evidence::AudienceBurnout {
                underperforming_audiences: underperforming,
                roas_spread: highest - lowest,
            },
        })
    }
}

/// The three campaigns with the weakest click-through.
pub struct PoorEngagementRule;

impl HypothesisRule for PoorEngagementRule {
    fn kind(&self) -> HypothesisKind {
        HypothesisKind::PoorEngagement
    }

    fn evaluate(&self, dataset: &Dataset) -> Option<Hypothesis> {
        let lowest = stats::lowest_ctr(&stats::by_campaign(&dataset.records), 3);
        if lowest.is_empty() {
            return None;
        }

        let ctrs: Vec<f64> = lowest.iter().map(|c| c.mean_ctr).collect();
        Some(Hypothesis {
            kind: self.kind(),
            name: "Low Click-Through Campaigns".to_string(),
            explanation: "Campaigns where people are not clicking on the ads".to_string(),
            prior_confidence: 0.60,
            evidence: Evidence::PoorEngagement {
                low_ctr_campaigns: lowest.into_iter().map(|c| c.campaign_name).collect(),
                average_ctr: stats::mean(&ctrs).unwrap_or_default(),
            },
        })
    }
}

pub fn default_rules() -> Vec<Box<dyn HypothesisRule>> {
    vec![
        Box::new(AdFatigueRule),
        Box::new(AudienceBurnoutRule),
        Box::new(PoorEngagementRule),
    ]
}

/// Runs every rule independently and keeps each one that fires.
pub fn generate(
    dataset: &Dataset,
    rules: &[Box<dyn HypothesisRule>],
) -> Result<Vec<Hypothesis>, AnalysisError> {
    ensure_records(Stage::HypothesisGeneration, &dataset.records)?;
    Ok(rules.iter().filter_map(|rule| rule.evaluate(dataset)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{dataset, fatigue_scenario, record};

    fn kinds(hypotheses: &[Hypothesis]) -> Vec<HypothesisKind> {
        hypotheses.iter().map(|h| h.kind).collect()
    }

    #[test]
    fn fatigue_flags_high_spend_low_return_campaign() {
        let hypotheses = generate(&fatigue_scenario(), &default_rules()).unwrap();

        let fatigue: Vec<&Hypothesis> = hypotheses
            .iter()
            .filter(|h| h.kind == HypothesisKind::AdFatigue)
            .collect();
        assert_eq!(fatigue.len(), 1);
        assert_eq!(fatigue[0].prior_confidence, 0.75);
        match &fatigue[0].evidence {
            Evidence::AdFatigue {
                problem_campaigns,
                average_roas,
                total_spend,
            } => {
                assert_eq!(problem_campaigns, &vec!["Alpha".to_string()]);
                assert!((average_roas - 12.5).abs() < 1e-9);
                assert!((total_spend - 800.0).abs() < 1e-9);
            }
            other => panic!("unexpected evidence {other:?}"),
        }
    }

    #[test]
    fn identical_campaigns_produce_no_fatigue() {
        let data = dataset(vec![
            record("2024-01-01", "A", 2.0, 100.0, 1.0),
            record("2024-01-01", "B", 2.0, 100.0, 1.0),
            record("2024-01-01", "C", 2.0, 100.0, 1.0),
        ]);

        let fatigue = AdFatigueRule.evaluate(&data);
        assert!(fatigue.is_none());
    }

    #[test]
    fn fatigue_evidence_is_capped_at_three_campaigns() {
        let mut records = Vec::new();
        for (name, roas, spend) in [
            ("A", 1.0, 900.0),
            ("B", 1.0, 900.0),
            ("C", 1.0, 900.0),
            ("D", 1.0, 900.0),
            ("E", 9.0, 10.0),
            ("F", 9.0, 10.0),
            ("G", 9.0, 10.0),
            ("H", 9.0, 10.0),
            ("I", 5.0, 500.0),
        ] {
            records.push(record("2024-01-01", name, roas, spend, 1.0));
        }

        let hypothesis = AdFatigueRule.evaluate(&dataset(records)).unwrap();
        match hypothesis.evidence {
            Evidence::AdFatigue {
                problem_campaigns,
                total_spend,
                ..
            } => {
                assert_eq!(problem_campaigns, vec!["A", "B", "C"]);
                assert!((total_spend - 3600.0).abs() < 1e-9);
            }
            other => panic!("unexpected evidence {other:?}"),
        }
    }

    #[test]
    fn burnout_requires_audience_column() {
        let hypotheses = generate(&fatigue_scenario(), &default_rules()).unwrap();
        assert!(!kinds(&hypotheses).contains(&HypothesisKind::AudienceBurnout));
    }

    #[test]
    fn burnout_lists_audiences_below_median() {
        let mut records = Vec::new();
        for (audience, roas) in [("Broad", 1.0), ("Lookalike", 3.0), ("Retargeting", 6.0)] {
            let mut row = record("2024-01-01", "A", roas, 10.0, 1.0);
            row.audience_type = Some(audience.to_string());
            records.push(row);
        }

        let hypothesis = AudienceBurnoutRule.evaluate(&dataset(records)).unwrap();
        assert_eq!(hypothesis.prior_confidence, 0.65);
        match hypothesis.evidence {
            Evidence::AudienceBurnout {
                underperforming_audiences,
                roas_spread,
            } => {
                assert_eq!(underperforming_audiences, vec!["Broad"]);
                assert!((roas_spread - 5.0).abs() < 1e-9);
            }
            other => panic!("unexpected evidence {other:?}"),
        }
    }

    #[test]
    fn engagement_picks_three_lowest_ctr() {
        let hypothesis = PoorEngagementRule.evaluate(&fatigue_scenario()).unwrap();
        assert_eq!(hypothesis.prior_confidence, 0.60);
        match hypothesis.evidence {
            Evidence::PoorEngagement {
                low_ctr_campaigns,
                average_ctr,
            } => {
                assert_eq!(low_ctr_campaigns, vec!["Alpha", "Charlie", "Bravo"]);
                assert!((average_ctr - 1.8).abs() < 1e-9);
            }
            other => panic!("unexpected evidence {other:?}"),
        }
    }

    #[test]
    fn rules_fire_independently() {
        let hypotheses = generate(&fatigue_scenario(), &default_rules()).unwrap();
        assert_eq!(
            kinds(&hypotheses),
            vec![HypothesisKind::AdFatigue, HypothesisKind::PoorEngagement]
        );
    }

    #[test]
    fn empty_dataset_is_a_stage_error() {
        let err = generate(&dataset(Vec::new()), &default_rules()).unwrap_err();
        assert!(matches!(err, AnalysisError::StageComputation { .. }));
    }
}
