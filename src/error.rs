//! Error taxonomy shared by every analysis operation.

use serde::{Serialize, Serializer};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Unknown structure, chain, position or accession.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed mutation string, unknown amino-acid code, unreadable input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Remote service timed out, answered with a non-success status or a malformed payload.
    #[error("Upstream service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// A sub-algorithm failed; the surrounding request can still return partial results.
    #[error("Computation degraded: {0}")]
    ComputationDegraded(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Table error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) if status == reqwest::StatusCode::NOT_FOUND => {
                AnalysisError::NotFound(err.to_string())
            }
            _ => AnalysisError::UpstreamUnavailable(err.to_string()),
        }
    }
}

/// Machine-readable category of an [`AnalysisError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    UpstreamUnavailable,
    ComputationDegraded,
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::NotFound(_) => ErrorKind::NotFound,
            AnalysisError::InvalidInput(_) | AnalysisError::Json(_) => ErrorKind::InvalidInput,
            AnalysisError::UpstreamUnavailable(_) => ErrorKind::UpstreamUnavailable,
            AnalysisError::ComputationDegraded(_)
            | AnalysisError::Io(_)
            | AnalysisError::Polars(_) => ErrorKind::ComputationDegraded,
        }
    }
}

/// Result of a single response field.
///
/// Successful values serialize transparently; failures become
/// `{"error": "...", "kind": "..."}` so the field is never dropped.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Outcome<T> {
    Ok(T),
    Failed { error: String, kind: ErrorKind },
}

impl<T> Outcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    pub fn ok(&self) -> Option<&T> {
        match self {
            Outcome::Ok(v) => Some(v),
            Outcome::Failed { .. } => None,
        }
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(res: Result<T>) -> Self {
        match res {
            Ok(v) => Outcome::Ok(v),
            Err(e) => Outcome::Failed {
                error: e.to_string(),
                kind: e.kind(),
            },
        }
    }
}

/// A value that may not be derivable; serializes as `"N/A"` when missing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metric<T>(pub Option<T>);

impl<T> Metric<T> {
    pub fn na() -> Self {
        Metric(None)
    }

    pub fn value(&self) -> Option<&T> {
        self.0.as_ref()
    }
}

impl<T> From<T> for Metric<T> {
    fn from(v: T) -> Self {
        Metric(Some(v))
    }
}

impl<T: Serialize> Serialize for Metric<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match &self.0 {
            Some(v) => v.serialize(serializer),
            None => serializer.serialize_str("N/A"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_outcome_keeps_error_key() {
        let res: Result<u32> = Err(AnalysisError::ComputationDegraded("no radius".into()));
        let outcome: Outcome<u32> = res.into();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["kind"], "computation_degraded");
        assert!(json["error"].as_str().unwrap().contains("no radius"));
    }

    #[test]
    fn missing_metric_is_na() {
        let present: Metric<f64> = 12.5.into();
        assert_eq!(serde_json::to_string(&present).unwrap(), "12.5");
        assert_eq!(
            serde_json::to_string(&Metric::<f64>::na()).unwrap(),
            "\"N/A\""
        );
    }
}
