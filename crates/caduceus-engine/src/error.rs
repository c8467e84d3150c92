use caduceus_scenarios::error::ScenarioError;
use thiserror::Error;

use crate::guard::SafetyViolation;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown scenario: {0}")]
    NotFound(String),

    #[error("scenario registry error: {0}")]
    Scenario(#[from] ScenarioError),

    #[error("encounter is for scenario '{found}', expected '{expected}'")]
    ScenarioMismatch { expected: String, found: String },

    #[error("invalid banned phrase pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("report rejected by safety guard ({} violation(s))", .0.len())]
    SafetyViolation(Vec<SafetyViolation>),
}
