use std::time::Duration;

use caduceus_core::language::Language;
use caduceus_core::models::scenario::Severity;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Patterns banned in every report regardless of scenario.
pub const DEFAULT_BANNED_PHRASES: &[&str] = &[
    r"(?i)\bthe diagnosis is\b",
    r"(?i)\bdiagnosis (is )?confirmed\b",
    r"(?i)\bconfirms? the diagnosis\b",
    r"(?i)\bdefinitely (has|is)\b",
    r"(?i)\byou (have|are suffering from)\b",
    r"(?i)\bno need (to see|for) a (doctor|physician)\b",
    r"(?i)\binstead of (seeing )?a (doctor|physician)\b",
];

/// Runtime settings for an [`Engine`](crate::Engine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Version of the report style guide, echoed in every report.
    pub style_guide_version: u32,
    pub language: Language,
    /// Regular expressions applied on top of each scenario's own list.
    pub banned_phrases: Vec<String>,
    /// Minimum tag relevance for an excerpt to count as a citation.
    pub relevance_threshold: f32,
    pub max_citations_per_claim: usize,
    pub source_timeout_ms: u64,
    pub weights: RankingWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            style_guide_version: 1,
            language: Language::En,
            banned_phrases: DEFAULT_BANNED_PHRASES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            relevance_threshold: 0.5,
            max_citations_per_claim: 3,
            source_timeout_ms: 2_000,
            weights: RankingWeights::default(),
        }
    }
}

impl EngineConfig {
    pub fn source_timeout(&self) -> Duration {
        Duration::from_millis(self.source_timeout_ms)
    }

    /// Check numeric settings. Banned patterns are compiled by the guard.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.relevance_threshold.is_finite() || !(0.0..=1.0).contains(&self.relevance_threshold)
        {
            return Err(EngineError::InvalidConfig(format!(
                "relevance_threshold {} is outside [0, 1]",
                self.relevance_threshold
            )));
        }
        if self.max_citations_per_claim == 0 {
            return Err(EngineError::InvalidConfig(
                "max_citations_per_claim must be at least 1".to_string(),
            ));
        }
        if self.source_timeout_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "source_timeout_ms must be positive".to_string(),
            ));
        }
        self.weights.validate()
    }
}

/// Differential scoring weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
    pub high: f64,
    pub moderate: f64,
    pub low: f64,
    /// Prevalence multiplier when every associated flag is explicitly absent.
    pub demotion: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            high: 1.0,
            moderate: 0.5,
            low: 0.25,
            demotion: 0.5,
        }
    }
}

impl RankingWeights {
    pub fn boost(&self, severity: Severity) -> f64 {
        match severity {
            Severity::High => self.high,
            Severity::Moderate => self.moderate,
            Severity::Low => self.low,
        }
    }

    fn validate(&self) -> Result<(), EngineError> {
        for (name, value) in [
            ("high", self.high),
            ("moderate", self.moderate),
            ("low", self.low),
            ("demotion", self.demotion),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "ranking weight '{name}' must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}
