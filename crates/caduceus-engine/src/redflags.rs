//! Red flag evaluation with three-valued logic.
//!
//! A leaf that reads an unknown field is indeterminate. Compound conditions
//! follow Kleene logic: `all` is false if any child is false, `any` is true
//! if any child is true, and otherwise an indeterminate child makes the
//! whole condition indeterminate.

use caduceus_core::models::encounter::{FieldValue, NormalizedEncounter};
use caduceus_core::models::flag::{FlagResult, FlagState};
use caduceus_core::models::scenario::{Condition, Scenario};
use tracing::debug;

/// Evaluate every rule of the scenario, in declaration order.
pub fn evaluate(scenario: &Scenario, encounter: &NormalizedEncounter) -> Vec<FlagResult> {
    let results: Vec<FlagResult> = scenario
        .red_flags
        .iter()
        .map(|rule| FlagResult {
            rule_id: rule.id.clone(),
            label: rule.label.clone(),
            severity: rule.severity,
            state: evaluate_condition(&rule.condition, encounter),
            escalation: rule.escalation.clone(),
            topic_tags: rule.topic_tags.clone(),
        })
        .collect();

    debug!(
        scenario = %scenario.id,
        triggered = results.iter().filter(|r| r.is_triggered()).count(),
        indeterminate = results
            .iter()
            .filter(|r| r.state == FlagState::Indeterminate)
            .count(),
        "red flags evaluated"
    );
    results
}

pub fn evaluate_condition(condition: &Condition, encounter: &NormalizedEncounter) -> FlagState {
    match condition {
        Condition::Threshold { field, op, value } => match encounter.value(field) {
            FieldValue::Numeric(v) => op.apply(*v, *value).into(),
            _ => FlagState::Indeterminate,
        },
        Condition::Range { field, min, max } => match encounter.value(field) {
            FieldValue::Numeric(v) => (*min <= *v && *v <= *max).into(),
            _ => FlagState::Indeterminate,
        },
        Condition::OneOf { field, values } => match encounter.value(field).as_str() {
            Some(actual) => values
                .iter()
                .any(|v| v.trim().eq_ignore_ascii_case(actual.trim()))
                .into(),
            None => FlagState::Indeterminate,
        },
        Condition::Flag { field, expected } => match encounter.value(field) {
            FieldValue::Boolean(b) => (*b == *expected).into(),
            _ => FlagState::Indeterminate,
        },
        Condition::All { conditions } => {
            all(conditions.iter().map(|c| evaluate_condition(c, encounter)))
        }
        Condition::Any { conditions } => {
            any(conditions.iter().map(|c| evaluate_condition(c, encounter)))
        }
        Condition::Not { condition } => evaluate_condition(condition, encounter).negate(),
    }
}

fn all(states: impl Iterator<Item = FlagState>) -> FlagState {
    let mut result = FlagState::Triggered;
    for state in states {
        match state {
            FlagState::NotTriggered => return FlagState::NotTriggered,
            FlagState::Indeterminate => result = FlagState::Indeterminate,
            FlagState::Triggered => {}
        }
    }
    result
}

fn any(states: impl Iterator<Item = FlagState>) -> FlagState {
    let mut result = FlagState::NotTriggered;
    for state in states {
        match state {
            FlagState::Triggered => return FlagState::Triggered,
            FlagState::Indeterminate => result = FlagState::Indeterminate,
            FlagState::NotTriggered => {}
        }
    }
    result
}
