use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    TrendAnalysis,
    HypothesisGeneration,
    HypothesisValidation,
    CreativeSynthesis,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TrendAnalysis => write!(f, "trend analysis"),
            Self::HypothesisGeneration => write!(f, "hypothesis generation"),
            Self::HypothesisValidation => write!(f, "hypothesis validation"),
            Self::CreativeSynthesis => write!(f, "creative synthesis"),
        }
    }
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("data unavailable from {}: {reason}", .path.display())]
    DataUnavailable { path: PathBuf, reason: String },

    #[error("{stage} failed: {reason}")]
    StageComputation { stage: Stage, reason: String },

    #[error("failed to write {artifact} to {}: {source}", .path.display())]
    OutputWrite {
        artifact: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnalysisError {
    pub fn data_unavailable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn stage(stage: Stage, reason: impl Into<String>) -> Self {
        Self::StageComputation {
            stage,
            reason: reason.into(),
        }
    }
}

/// Rejects an empty record slice before a stage runs.
pub fn ensure_records<T>(stage: Stage, records: &[T]) -> Result<(), AnalysisError> {
    if records.is_empty() {
        return Err(AnalysisError::stage(stage, "no records to analyze"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_error_names_the_stage() {
        let err = AnalysisError::stage(Stage::TrendAnalysis, "no records to analyze");
        assert_eq!(err.to_string(), "trend analysis failed: no records to analyze");
    }

    #[test]
    fn data_unavailable_includes_path() {
        let err = AnalysisError::data_unavailable("ads.csv", "file not found");
        assert_eq!(err.to_string(), "data unavailable from ads.csv: file not found");
    }

    #[test]
    fn empty_slice_is_rejected() {
        let empty: [u8; 0] = [];
        assert!(ensure_records(Stage::CreativeSynthesis, &empty).is_err());
        assert!(ensure_records(Stage::CreativeSynthesis, &[1u8]).is_ok());
    }
}
