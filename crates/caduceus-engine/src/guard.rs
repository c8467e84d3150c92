//! Final validation gate.
//!
//! The guard never rewrites a report. It either wraps it in an
//! [`ApprovedReport`] or returns every violation it found.

use caduceus_core::models::flag::FlagResult;
use caduceus_core::models::report::{Report, SectionKind};
use caduceus_core::models::scenario::Scenario;
use caduceus_scenarios::phrases::PhrasePolicy;
use serde::Serialize;
use thiserror::Error;

use crate::error::EngineError;

/// One reason a report may not be released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SafetyViolation {
    #[error("sections are out of order: {found:?}")]
    SectionOrder { found: Vec<SectionKind> },

    #[error("section {section:?} line has no citation or exemption: {text}")]
    UncitedLine { section: SectionKind, text: String },

    #[error("section {section:?} line matches banned pattern '{pattern}' ('{matched}'): {text}")]
    BannedPhrase {
        section: SectionKind,
        text: String,
        pattern: String,
        matched: String,
    },

    #[error("red flag '{label}' is missing from section B")]
    MissingRedFlag { rule_id: String, label: String },
}

/// A report that passed the safety guard. Read-only by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ApprovedReport(Report);

impl ApprovedReport {
    pub fn report(&self) -> &Report {
        &self.0
    }
}

impl std::ops::Deref for ApprovedReport {
    type Target = Report;

    fn deref(&self) -> &Report {
        &self.0
    }
}

#[derive(Debug)]
pub enum Verdict {
    Approved(ApprovedReport),
    Rejected(Vec<SafetyViolation>),
}

impl Verdict {
    pub fn is_approved(&self) -> bool {
        matches!(self, Verdict::Approved(_))
    }
}

/// Check that every pattern compiles, reporting the first that does not.
pub fn compile_patterns(patterns: &[String]) -> Result<(), EngineError> {
    PhrasePolicy::compile(patterns, std::iter::empty::<&str>())
        .map(|_| ())
        .map_err(|(pattern, source)| EngineError::InvalidPattern { pattern, source })
}

pub struct SafetyGuard {
    phrases: PhrasePolicy,
}

impl SafetyGuard {
    /// Guard for one scenario: engine-wide banned patterns plus the
    /// scenario's own, masked by the scenario's allowed hedge phrases.
    pub fn for_scenario(banned: &[String], scenario: &Scenario) -> Result<Self, EngineError> {
        let phrases = PhrasePolicy::compile(
            banned.iter().chain(&scenario.banned_phrases),
            &scenario.allowed_phrases,
        )
        .map_err(|(pattern, source)| EngineError::InvalidPattern { pattern, source })?;
        Ok(Self { phrases })
    }

    pub fn validate(&self, report: Report, flags: &[FlagResult]) -> Verdict {
        let mut violations = Vec::new();

        let found: Vec<SectionKind> = report.sections.iter().map(|s| s.kind).collect();
        if found != SectionKind::ORDER {
            violations.push(SafetyViolation::SectionOrder { found });
        }

        for (section, line) in report.lines() {
            if section.requires_citations() && !line.is_cited() && line.exemption.is_none() {
                violations.push(SafetyViolation::UncitedLine {
                    section,
                    text: line.text.clone(),
                });
            }
            for hit in self.phrases.find_banned(&line.text) {
                violations.push(SafetyViolation::BannedPhrase {
                    section,
                    text: line.text.clone(),
                    pattern: hit.pattern,
                    matched: hit.matched,
                });
            }
        }

        let red_flags = report.texts(SectionKind::RedFlags);
        for flag in flags.iter().filter(|f| f.requires_escalation()) {
            let prefix = format!("{} (", flag.label);
            if !red_flags.iter().any(|text| text.starts_with(&prefix)) {
                violations.push(SafetyViolation::MissingRedFlag {
                    rule_id: flag.rule_id.clone(),
                    label: flag.label.clone(),
                });
            }
        }

        if violations.is_empty() {
            Verdict::Approved(ApprovedReport(report))
        } else {
            Verdict::Rejected(violations)
        }
    }
}
