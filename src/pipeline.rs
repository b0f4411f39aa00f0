use std::path::Path;

use crate::creative;
use crate::error::AnalysisError;
use crate::hypothesis::{self, HypothesisRule};
use crate::loader;
use crate::models::{AnalysisResult, Dataset};
use crate::observer::PipelineObserver;
use crate::trends;
use crate::validate;

pub const PLAN: [&str; 5] = [
    "Load the ads performance data",
    "Look for ROAS patterns and drops",
    "Propose hypotheses for what is going wrong",
    "Check those hypotheses against the numbers",
    "Draft better ad copy for struggling campaigns",
];

pub struct Pipeline<'a> {
    rules: Vec<Box<dyn HypothesisRule>>,
    observer: &'a dyn PipelineObserver,
}

impl<'a> Pipeline<'a> {
    pub fn new(rules: Vec<Box<dyn HypothesisRule>>, observer: &'a dyn PipelineObserver) -> Self {
        Self { rules, observer }
    }

    /// Loads `path` and runs every stage. Nothing after the loader runs if the
    /// data is unavailable.
    pub fn run(
        &self,
        request: &str,
        path: &Path,
        delimiter: u8,
    ) -> Result<AnalysisResult, AnalysisError> {
        self.observer.on_plan(request, &PLAN);
        let dataset = loader::load(path, delimiter)?;
        self.observer.on_loaded(&dataset);
        self.analyze(&dataset)
    }

    pub fn analyze(&self, dataset: &Dataset) -> Result<AnalysisResult, AnalysisError> {
        let summary = trends::analyze(&dataset.records)?;
        self.observer.on_trends(&summary);

        let proposed = hypothesis::generate(dataset, &self.rules)?;
        self.observer.on_hypotheses(&proposed);

        let hypotheses = validate::validate(&dataset.records, &proposed)?;
        self.observer.on_validated(&hypotheses);

        let creatives = creative::synthesize(&dataset.records, &hypotheses)?;
        self.observer.on_creatives(&creatives);

        let result = AnalysisResult {
            summary,
            hypotheses,
            creatives,
        };
        self.observer.on_finished(&result);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::models::{Hypothesis, HypothesisKind};
    use crate::observer::NoopObserver;
    use crate::test_support::{dataset, fatigue_scenario};

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<String>>,
    }

    impl PipelineObserver for Recorder {
        fn on_plan(&self, request: &str, steps: &[&str]) {
            self.events
                .borrow_mut()
                .push(format!("plan:{request}:{}", steps.len()));
        }

        fn on_loaded(&self, _dataset: &Dataset) {
            self.events.borrow_mut().push("loaded".to_string());
        }

        fn on_hypotheses(&self, hypotheses: &[Hypothesis]) {
            self.events
                .borrow_mut()
                .push(format!("hypotheses:{}", hypotheses.len()));
        }

        fn on_finished(&self, _result: &AnalysisResult) {
            self.events.borrow_mut().push("finished".to_string());
        }
    }

    #[test]
    fn declining_high_spender_is_confirmed_fatigue() {
        let result = Pipeline::new(hypothesis::default_rules(), &NoopObserver)
            .analyze(&fatigue_scenario())
            .unwrap();

        assert_eq!(result.summary.campaign_count, 3);
        let fatigue: Vec<_> = result
            .hypotheses
            .iter()
            .filter(|h| h.hypothesis.kind == HypothesisKind::AdFatigue)
            .collect();
        assert_eq!(fatigue.len(), 1);
        assert!(fatigue[0].posterior_confidence >= 0.6);
        assert!(fatigue[0].accepted);
        assert!(result
            .creatives
            .responds_to
            .contains(&fatigue[0].hypothesis.name));
    }

    #[test]
    fn observer_sees_each_stage() {
        let recorder = Recorder::default();
        Pipeline::new(hypothesis::default_rules(), &recorder)
            .analyze(&fatigue_scenario())
            .unwrap();

        assert_eq!(
            recorder.events.into_inner(),
            vec!["hypotheses:2".to_string(), "finished".to_string()]
        );
    }

    #[test]
    fn missing_data_stops_before_analysis() {
        let recorder = Recorder::default();
        let err = Pipeline::new(hypothesis::default_rules(), &recorder)
            .run("why did ROAS drop?", Path::new("/nonexistent/ads.csv"), b',')
            .unwrap_err();

        assert!(matches!(err, AnalysisError::DataUnavailable { .. }));
        assert_eq!(
            recorder.events.into_inner(),
            vec!["plan:why did ROAS drop?:5".to_string()]
        );
    }

    #[test]
    fn custom_rule_list_replaces_defaults() {
        let rules: Vec<Box<dyn HypothesisRule>> = vec![Box::new(hypothesis::PoorEngagementRule)];
        let result = Pipeline::new(rules, &NoopObserver)
            .analyze(&fatigue_scenario())
            .unwrap();

        assert_eq!(result.hypotheses.len(), 1);
        assert_eq!(
            result.hypotheses[0].hypothesis.kind,
            HypothesisKind::PoorEngagement
        );
    }

    #[test]
    fn empty_dataset_fails_in_trend_analysis() {
        let err = Pipeline::new(hypothesis::default_rules(), &NoopObserver)
            .analyze(&dataset(Vec::new()))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::StageComputation { .. }));
    }
}
