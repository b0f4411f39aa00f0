use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::AnalysisError;
use crate::models::AnalysisResult;
use crate::report;

pub const INSIGHTS_FILE: &str = "insights.json";
pub const CREATIVES_FILE: &str = "creatives.json";
pub const REPORT_FILE: &str = "report.md";

/// One artifact produced by a run.
#[derive(Debug)]
pub struct Artifact {
    pub name: &'static str,
    pub body: Result<String, io::Error>,
}

pub fn render(
    result: &AnalysisResult,
    request: &str,
    generated_at: DateTime<Utc>,
) -> Vec<Artifact> {
    vec![
        Artifact {
            name: INSIGHTS_FILE,
            body: report::to_json(&report::insights(result, request, generated_at))
                .map_err(io::Error::from),
        },
        Artifact {
            name: CREATIVES_FILE,
            body: report::to_json(&report::creatives(result)).map_err(io::Error::from),
        },
        Artifact {
            name: REPORT_FILE,
            body: Ok(report::build_report(result, request, generated_at)),
        },
    ]
}

/// Writes each artifact on its own; a failure does not stop the rest.
/// Returns one outcome per artifact, in order.
pub fn write_all(
    out_dir: &Path,
    artifacts: Vec<Artifact>,
) -> Vec<Result<PathBuf, AnalysisError>> {
    let prepared = fs::create_dir_all(out_dir);

    artifacts
        .into_iter()
        .map(|artifact| {
            let path = out_dir.join(artifact.name);
            let written = match (&prepared, artifact.body) {
                (Err(err), _) => Err(io::Error::new(err.kind(), err.to_string())),
                (Ok(()), Err(err)) => Err(err),
                (Ok(()), Ok(body)) => fs::write(&path, body),
            };
            written
                .map(|()| path.clone())
                .map_err(|source| AnalysisError::OutputWrite {
                    artifact: artifact.name,
                    path,
                    source,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::hypothesis;
    use crate::observer::NoopObserver;
    use crate::pipeline::Pipeline;
    use crate::test_support::fatigue_scenario;

    fn rendered() -> Vec<Artifact> {
        let result = Pipeline::new(hypothesis::default_rules(), &NoopObserver)
            .analyze(&fatigue_scenario())
            .unwrap();
        let generated_at = Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap();
        render(&result, "roas", generated_at)
    }

    #[test]
    fn writes_all_three_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("out");

        let outcomes = write_all(&out_dir, rendered());
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|outcome| outcome.is_ok()));
        for name in [INSIGHTS_FILE, CREATIVES_FILE, REPORT_FILE] {
            assert!(out_dir.join(name).is_file(), "{name} missing");
        }
    }

    #[test]
    fn one_failed_write_does_not_block_the_others() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the insights file should go makes that write fail.
        fs::create_dir(dir.path().join(INSIGHTS_FILE)).unwrap();

        let outcomes = write_all(dir.path(), rendered());
        assert!(matches!(
            outcomes[0],
            Err(AnalysisError::OutputWrite {
                artifact: INSIGHTS_FILE,
                ..
            })
        ));
        assert!(outcomes[1].is_ok());
        assert!(outcomes[2].is_ok());
        assert!(dir.path().join(REPORT_FILE).is_file());
    }
}
