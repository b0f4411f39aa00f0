use tracing::{info, warn};

use crate::models::{
    AnalysisResult, CreativeInsights, Dataset, Hypothesis, TrendSummary, ValidatedHypothesis,
};

/// Progress callbacks the runner can attach to the pipeline. Every method
/// defaults to doing nothing.
pub trait PipelineObserver {
    fn on_plan(&self, _request: &str, _steps: &[&str]) {}
    fn on_loaded(&self, _dataset: &Dataset) {}
    fn on_trends(&self, _summary: &TrendSummary) {}
    fn on_hypotheses(&self, _hypotheses: &[Hypothesis]) {}
    fn on_validated(&self, _validated: &[ValidatedHypothesis]) {}
    fn on_creatives(&self, _creatives: &CreativeInsights) {}
    fn on_finished(&self, _result: &AnalysisResult) {}
}

pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Narrates the run through `tracing` events.
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_plan(&self, request: &str, steps: &[&str]) {
        info!(request, "planning analysis");
        for step in steps {
            info!("ready for: {step}");
        }
    }

    fn on_loaded(&self, dataset: &Dataset) {
        info!(
            rows = dataset.rows_read,
            columns = dataset.columns.len(),
            source = %dataset.source.display(),
            "loaded dataset"
        );
        if dataset.rows_dropped > 0 {
            warn!(
                dropped = dataset.rows_dropped,
                "dropped rows with unparseable dates"
            );
        }
        if let Some((first, last)) = dataset.date_range() {
            info!("data covers {first} to {last}");
        }
    }

    fn on_trends(&self, summary: &TrendSummary) {
        info!(
            weeks = summary.weekly.len(),
            declines = summary.decline_periods,
            "found {} periods where ROAS dropped significantly",
            summary.decline_periods
        );
    }

    fn on_hypotheses(&self, hypotheses: &[Hypothesis]) {
        for hypothesis in hypotheses {
            info!(
                kind = %hypothesis.kind,
                prior = hypothesis.prior_confidence,
                "hypothesis: {}",
                hypothesis.name
            );
        }
    }

    fn on_validated(&self, validated: &[ValidatedHypothesis]) {
        for entry in validated {
            let verdict = if entry.accepted { "holds up" } else { "rejected" };
            info!(
                kind = %entry.hypothesis.kind,
                confidence = %format!("{:.2}", entry.posterior_confidence),
                "{verdict}: {}",
                entry.hypothesis.name
            );
        }
    }

    fn on_creatives(&self, creatives: &CreativeInsights) {
        for suggestion in &creatives.suggestions {
            info!(
                "made {} new ideas for {}",
                suggestion.ad_options.len(),
                suggestion.campaign_name
            );
        }
    }

    fn on_finished(&self, result: &AnalysisResult) {
        let accepted = result.hypotheses.iter().filter(|h| h.accepted).count();
        info!(
            campaigns = result.summary.campaign_count,
            accepted_hypotheses = accepted,
            suggestion_sets = result.creatives.suggestions.len(),
            "analysis finished"
        );
    }
}
