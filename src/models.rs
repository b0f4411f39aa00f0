use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;

/// One campaign-day observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    pub campaign_name: String,
    pub roas: f64,
    pub spend: f64,
    pub ctr: f64,
    pub creative_message: Option<String>,
    pub audience_type: Option<String>,
}

/// Date-sorted records plus what the loader learned about the source file.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub source: PathBuf,
    pub columns: Vec<String>,
    pub rows_read: usize,
    pub rows_dropped: usize,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn from_records(source: PathBuf, columns: Vec<String>, mut records: Vec<Record>) -> Self {
        records.sort_by_key(|record| record.date);
        Self {
            source,
            columns,
            rows_read: records.len(),
            rows_dropped: 0,
            records,
        }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        Some((first.date, last.date))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyBucket {
    pub week_ending: NaiveDate,
    pub record_count: usize,
    pub roas: f64,
    pub spend: f64,
    pub ctr: f64,
    /// Fractional change against the previous bucket. `None` for the first
    /// bucket or when the previous mean roas is zero.
    pub roas_change: Option<f64>,
    pub significant_decline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSummary {
    pub campaign_count: usize,
    pub average_roas: f64,
    pub average_ctr: f64,
    pub decline_periods: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub weekly: Vec<WeeklyBucket>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HypothesisKind {
    AdFatigue,
    AudienceBurnout,
    PoorEngagement,
}

impl fmt::Display for HypothesisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdFatigue => write!(f, "ad_fatigue"),
            Self::AudienceBurnout => write!(f, "audience_burnout"),
            Self::PoorEngagement => write!(f, "poor_engagement"),
        }
    }
}

/// Kind-specific payload backing a hypothesis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Evidence {
    AdFatigue {
        problem_campaigns: Vec<String>,
        average_roas: f64,
        total_spend: f64,
    },
    AudienceBurnout {
        underperforming_audiences: Vec<String>,
        roas_spread: f64,
    },
    PoorEngagement {
        low_ctr_campaigns: Vec<String>,
        average_ctr: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hypothesis {
    pub kind: HypothesisKind,
    pub name: String,
    pub explanation: String,
    pub prior_confidence: f64,
    pub evidence: Evidence,
}

/// A hypothesis after it has been checked against the raw records.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedHypothesis {
    pub hypothesis: Hypothesis,
    pub posterior_confidence: f64,
    pub accepted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignSuggestion {
    pub campaign_name: String,
    pub current_ctr: f64,
    pub ad_options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreativeInsights {
    pub effective_ctas: Vec<String>,
    pub popular_themes: Vec<String>,
    pub suggestions: Vec<CampaignSuggestion>,
    pub testing_ideas: Vec<String>,
    pub responds_to: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub summary: TrendSummary,
    pub hypotheses: Vec<ValidatedHypothesis>,
    pub creatives: CreativeInsights,
}
