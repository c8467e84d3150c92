use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::scenario::Severity;

/// Outcome of evaluating one red flag rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FlagState {
    Triggered,
    NotTriggered,
    /// A field the rule needs was unknown.
    Indeterminate,
}

impl FlagState {
    pub fn negate(self) -> Self {
        match self {
            FlagState::Triggered => FlagState::NotTriggered,
            FlagState::NotTriggered => FlagState::Triggered,
            FlagState::Indeterminate => FlagState::Indeterminate,
        }
    }
}

impl From<bool> for FlagState {
    fn from(value: bool) -> Self {
        if value {
            FlagState::Triggered
        } else {
            FlagState::NotTriggered
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FlagResult {
    pub rule_id: String,
    pub label: String,
    pub severity: Severity,
    pub state: FlagState,
    pub escalation: String,
    pub topic_tags: Vec<String>,
}

impl FlagResult {
    pub fn is_triggered(&self) -> bool {
        self.state == FlagState::Triggered
    }

    /// Triggered at any severity, or high severity and not excluded.
    pub fn requires_escalation(&self) -> bool {
        match self.state {
            FlagState::Triggered => true,
            FlagState::Indeterminate => self.severity == Severity::High,
            FlagState::NotTriggered => false,
        }
    }
}
