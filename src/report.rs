use std::fmt::Write;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;

use crate::models::{AnalysisResult, CampaignSuggestion, Evidence, HypothesisKind, WeeklyBucket};

#[derive(Debug, Serialize)]
pub struct OverallNumbers {
    pub campaigns_reviewed: usize,
    pub average_roas: f64,
    pub average_ctr: f64,
    pub decline_periods: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct HypothesisEntry<'a> {
    pub kind: HypothesisKind,
    pub name: &'a str,
    pub explanation: &'a str,
    pub prior_confidence: f64,
    pub confidence: f64,
    pub accepted: bool,
    pub evidence: &'a Evidence,
}

#[derive(Debug, Serialize)]
pub struct InsightsDocument<'a> {
    pub generated_at: String,
    pub request: &'a str,
    pub overall: OverallNumbers,
    pub weekly_trend: &'a [WeeklyBucket],
    pub hypotheses: Vec<HypothesisEntry<'a>>,
}

#[derive(Debug, Serialize)]
pub struct LearnedPatterns<'a> {
    pub effective_ctas: &'a [String],
    pub popular_themes: &'a [String],
}

#[derive(Debug, Serialize)]
pub struct CreativesDocument<'a> {
    pub learned_from_top_performers: LearnedPatterns<'a>,
    pub responds_to: &'a [String],
    pub campaign_suggestions: &'a [CampaignSuggestion],
    pub testing_ideas: &'a [String],
}

fn timestamp(generated_at: DateTime<Utc>) -> String {
    generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn insights<'a>(
    result: &'a AnalysisResult,
    request: &'a str,
    generated_at: DateTime<Utc>,
) -> InsightsDocument<'a> {
    let summary = &result.summary;
    InsightsDocument {
        generated_at: timestamp(generated_at),
        request,
        overall: OverallNumbers {
            campaigns_reviewed: summary.campaign_count,
            average_roas: summary.average_roas,
            average_ctr: summary.average_ctr,
            decline_periods: summary.decline_periods,
            first_date: summary.first_date,
            last_date: summary.last_date,
        },
        weekly_trend: &summary.weekly,
        hypotheses: result
            .hypotheses
            .iter()
            .map(|validated| HypothesisEntry {
                kind: validated.hypothesis.kind,
                name: &validated.hypothesis.name,
                explanation: &validated.hypothesis.explanation,
                prior_confidence: validated.hypothesis.prior_confidence,
                confidence: validated.posterior_confidence,
                accepted: validated.accepted,
                evidence: &validated.hypothesis.evidence,
            })
            .collect(),
    }
}

pub fn creatives(result: &AnalysisResult) -> CreativesDocument<'_> {
    let creatives = &result.creatives;
    CreativesDocument {
        learned_from_top_performers: LearnedPatterns {
            effective_ctas: &creatives.effective_ctas,
            popular_themes: &creatives.popular_themes,
        },
        responds_to: &creatives.responds_to,
        campaign_suggestions: &creatives.suggestions,
        testing_ideas: &creatives.testing_ideas,
    }
}

/// Pretty JSON with a trailing newline.
pub fn to_json<T: Serialize>(document: &T) -> serde_json::Result<String> {
    let mut body = serde_json::to_string_pretty(document)?;
    body.push('\n');
    Ok(body)
}

fn joined_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none found".to_string()
    } else {
        values.join(", ")
    }
}

pub fn build_report(
    result: &AnalysisResult,
    request: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let summary = &result.summary;
    let accepted: Vec<_> = result.hypotheses.iter().filter(|h| h.accepted).collect();

    let mut output = String::new();

    let _ = writeln!(output, "# Ads Performance Analysis");
    let _ = writeln!(
        output,
        "Generated for \"{}\" (data from {} to {})",
        request, summary.first_date, summary.last_date
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## What We Found");
    let _ = writeln!(
        output,
        "We looked at {} campaigns and found {} main issues affecting performance.",
        summary.campaign_count,
        accepted.len()
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Key Metrics");
    let _ = writeln!(output, "- **Campaigns Reviewed**: {}", summary.campaign_count);
    let _ = writeln!(output, "- **Average ROAS**: {:.2}", summary.average_roas);
    let _ = writeln!(output, "- **Average CTR**: {:.3}%", summary.average_ctr);
    let _ = writeln!(output, "- **Decline Periods**: {}", summary.decline_periods);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Weekly ROAS Trend");
    for bucket in &summary.weekly {
        let change = match bucket.roas_change {
            Some(change) => format!("{:+.1}%", change * 100.0),
            None => "n/a".to_string(),
        };
        let flag = if bucket.significant_decline {
            " **decline**"
        } else {
            ""
        };
        let _ = writeln!(
            output,
            "- Week ending {}: ROAS {:.2}, spend {:.2}, CTR {:.3}% (change {}){}",
            bucket.week_ending, bucket.roas, bucket.spend, bucket.ctr, change, flag
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Our Conclusions");
    if accepted.is_empty() {
        let _ = writeln!(output, "No hypothesis held up against the data.");
    }
    for validated in &accepted {
        let hypothesis = &validated.hypothesis;
        let evidence = serde_json::to_string_pretty(&hypothesis.evidence).unwrap_or_default();
        let _ = writeln!(output, "### {}", hypothesis.name);
        let _ = writeln!(
            output,
            "- **Confidence**: {:.2}",
            validated.posterior_confidence
        );
        let _ = writeln!(output, "- **What This Means**: {}", hypothesis.explanation);
        let _ = writeln!(output, "- **Why We Think This**:");
        let _ = writeln!(output);
        let _ = writeln!(output, "```json");
        let _ = writeln!(output, "{evidence}");
        let _ = writeln!(output, "```");
        let _ = writeln!(output);
    }

    let creatives = &result.creatives;
    let _ = writeln!(output, "## Suggested Ad Improvements");
    let _ = writeln!(output);
    let _ = writeln!(output, "### What's Working Well");
    let _ = writeln!(
        output,
        "- **Good CTAs**: {}",
        joined_or_none(&creatives.effective_ctas)
    );
    let _ = writeln!(
        output,
        "- **Popular Themes**: {}",
        joined_or_none(&creatives.popular_themes)
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "### Campaign-Specific Suggestions");
    for suggestion in &creatives.suggestions {
        let _ = writeln!(
            output,
            "#### {} (Current CTR: {:.3}%)",
            suggestion.campaign_name, suggestion.current_ctr
        );
        for idea in &suggestion.ad_options {
            let _ = writeln!(output, "- {idea}");
        }
        let _ = writeln!(output);
    }

    let _ = writeln!(output, "### Testing Ideas");
    for idea in &creatives.testing_ideas {
        let _ = writeln!(output, "- {idea}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "---");
    let _ = writeln!(
        output,
        "*Created on {}*",
        generated_at.format("%Y-%m-%d %H:%M")
    );

    output
}
