use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("unknown scenario: {0}")]
    NotFound(String),

    #[error("schema violation in scenario '{scenario}': {reason}")]
    SchemaViolation { scenario: String, reason: String },

    #[error("registry version {proposed} is not newer than active version {current}")]
    StaleVersion { current: u64, proposed: u64 },

    #[error("failed to parse scenario definition '{origin}': {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScenarioError {
    pub(crate) fn schema(scenario: &str, reason: impl Into<String>) -> Self {
        ScenarioError::SchemaViolation {
            scenario: scenario.to_string(),
            reason: reason.into(),
        }
    }
}
