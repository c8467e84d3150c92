//! Structural validation of scenario definitions.
//!
//! A scenario that fails here never reaches a registry snapshot.

use std::collections::HashSet;

use caduceus_core::models::scenario::{Condition, FieldKind, Scenario};

use crate::error::ScenarioError;
use crate::phrases::PhrasePolicy;

/// Validate a scenario's internal consistency.
pub fn validate_scenario(scenario: &Scenario) -> Result<(), ScenarioError> {
    let id = scenario.id.as_str();

    if id.trim().is_empty() {
        return Err(ScenarioError::schema("<unnamed>", "scenario id is empty"));
    }
    if scenario.version.trim().is_empty() {
        return Err(ScenarioError::schema(id, "scenario version is empty"));
    }
    if scenario.title.trim().is_empty() {
        return Err(ScenarioError::schema(id, "scenario title is empty"));
    }

    validate_inputs(scenario)?;
    validate_red_flags(scenario)?;
    validate_differentials(scenario)?;

    unique_ids(id, "workup item", scenario.workup.iter().map(|w| w.id.as_str()))?;
    unique_ids(
        id,
        "management item",
        scenario.management.iter().map(|m| m.id.as_str()),
    )?;

    validate_phrases(scenario)
}

fn validate_inputs(scenario: &Scenario) -> Result<(), ScenarioError> {
    let id = scenario.id.as_str();
    unique_ids(id, "input field", scenario.inputs.iter().map(|f| f.name.as_str()))?;

    for input in &scenario.inputs {
        match &input.kind {
            FieldKind::Numeric { min, max, .. } => {
                if !min.is_finite() || !max.is_finite() || min > max {
                    return Err(ScenarioError::schema(
                        id,
                        format!("input '{}' has invalid range [{min}, {max}]", input.name),
                    ));
                }
            }
            FieldKind::Enumeration { options } => {
                if options.is_empty() {
                    return Err(ScenarioError::schema(
                        id,
                        format!("enumeration input '{}' declares no options", input.name),
                    ));
                }
                let mut seen = HashSet::new();
                for option in options {
                    if !seen.insert(option.trim().to_lowercase()) {
                        return Err(ScenarioError::schema(
                            id,
                            format!("input '{}' repeats option '{option}'", input.name),
                        ));
                    }
                }
            }
            FieldKind::FreeText { max_len } if *max_len == 0 => {
                return Err(ScenarioError::schema(
                    id,
                    format!("free-text input '{}' has zero max_len", input.name),
                ));
            }
            FieldKind::Boolean | FieldKind::FreeText { .. } => {}
        }
    }
    Ok(())
}

fn validate_red_flags(scenario: &Scenario) -> Result<(), ScenarioError> {
    let id = scenario.id.as_str();
    unique_ids(id, "red flag", scenario.red_flags.iter().map(|r| r.id.as_str()))?;

    for rule in &scenario.red_flags {
        if rule.label.trim().is_empty() {
            return Err(ScenarioError::schema(
                id,
                format!("red flag '{}' has an empty label", rule.id),
            ));
        }
        validate_condition(scenario, &rule.id, &rule.condition)?;
    }
    Ok(())
}

fn validate_condition(
    scenario: &Scenario,
    rule_id: &str,
    condition: &Condition,
) -> Result<(), ScenarioError> {
    let id = scenario.id.as_str();
    let field_kind = |field: &str| {
        scenario.input(field).map(|f| &f.kind).ok_or_else(|| {
            ScenarioError::schema(
                id,
                format!("red flag '{rule_id}' references undeclared field '{field}'"),
            )
        })
    };
    let mismatch = |field: &str, expected: &str| {
        ScenarioError::schema(
            id,
            format!("red flag '{rule_id}' expects {expected} field '{field}'"),
        )
    };

    match condition {
        Condition::Threshold { field, value, .. } => {
            if !matches!(field_kind(field.as_str())?, FieldKind::Numeric { .. }) {
                return Err(mismatch(field.as_str(), "numeric"));
            }
            if !value.is_finite() {
                return Err(ScenarioError::schema(
                    id,
                    format!("red flag '{rule_id}' has a non-finite threshold"),
                ));
            }
        }
        Condition::Range { field, min, max } => {
            if !matches!(field_kind(field.as_str())?, FieldKind::Numeric { .. }) {
                return Err(mismatch(field.as_str(), "numeric"));
            }
            if !min.is_finite() || !max.is_finite() || min > max {
                return Err(ScenarioError::schema(
                    id,
                    format!("red flag '{rule_id}' has invalid range [{min}, {max}]"),
                ));
            }
        }
        Condition::OneOf { field, values } => {
            if values.is_empty() {
                return Err(ScenarioError::schema(
                    id,
                    format!("red flag '{rule_id}' has an empty value set"),
                ));
            }
            match field_kind(field.as_str())? {
                FieldKind::Enumeration { options } => {
                    for value in values {
                        if !options.iter().any(|o| o.eq_ignore_ascii_case(value)) {
                            return Err(ScenarioError::schema(
                                id,
                                format!(
                                    "red flag '{rule_id}' uses value '{value}' not declared for '{field}'"
                                ),
                            ));
                        }
                    }
                }
                FieldKind::FreeText { .. } => {}
                _ => return Err(mismatch(field.as_str(), "enumeration or free-text")),
            }
        }
        Condition::Flag { field, .. } => {
            if !matches!(field_kind(field.as_str())?, FieldKind::Boolean) {
                return Err(mismatch(field.as_str(), "boolean"));
            }
        }
        Condition::All { conditions } | Condition::Any { conditions } => {
            if conditions.is_empty() {
                return Err(ScenarioError::schema(
                    id,
                    format!("red flag '{rule_id}' has an empty compound condition"),
                ));
            }
            for c in conditions {
                validate_condition(scenario, rule_id, c)?;
            }
        }
        Condition::Not { condition } => validate_condition(scenario, rule_id, condition)?,
    }
    Ok(())
}

fn validate_differentials(scenario: &Scenario) -> Result<(), ScenarioError> {
    let id = scenario.id.as_str();
    unique_ids(
        id,
        "differential",
        scenario.differentials.iter().map(|d| d.id.as_str()),
    )?;

    for entry in &scenario.differentials {
        if !entry.prevalence.is_finite() || !(0.0..=1.0).contains(&entry.prevalence) {
            return Err(ScenarioError::schema(
                id,
                format!(
                    "differential '{}' prevalence {} is outside [0, 1]",
                    entry.id, entry.prevalence
                ),
            ));
        }
        for flag in &entry.flags {
            if scenario.red_flag(flag).is_none() {
                return Err(ScenarioError::schema(
                    id,
                    format!(
                        "differential '{}' references undeclared red flag '{flag}'",
                        entry.id
                    ),
                ));
            }
        }
    }
    Ok(())
}

fn validate_phrases(scenario: &Scenario) -> Result<(), ScenarioError> {
    let id = scenario.id.as_str();
    let policy = PhrasePolicy::compile(&scenario.banned_phrases, &scenario.allowed_phrases)
        .map_err(|(pattern, e)| {
            ScenarioError::schema(id, format!("invalid phrase pattern '{pattern}': {e}"))
        })?;

    for text in scenario.report_texts() {
        if let Some(hit) = policy.find_banned(text).into_iter().next() {
            return Err(ScenarioError::schema(
                id,
                format!(
                    "scenario text '{text}' matches its own banned pattern '{}'",
                    hit.pattern
                ),
            ));
        }
    }
    Ok(())
}

fn unique_ids<'a>(
    scenario: &str,
    what: &str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ScenarioError> {
    let mut seen = HashSet::new();
    for item in ids {
        if item.trim().is_empty() {
            return Err(ScenarioError::schema(scenario, format!("{what} id is empty")));
        }
        if !seen.insert(item) {
            return Err(ScenarioError::schema(
                scenario,
                format!("duplicate {what} id '{item}'"),
            ));
        }
    }
    Ok(())
}
