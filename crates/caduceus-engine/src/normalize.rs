//! Coercion of raw encounter values against a scenario's input schema.
//!
//! Normalization never fails. A value that cannot be coerced is recorded
//! as an [`InvalidInput`] and the field is treated as unknown.

use std::collections::BTreeMap;

use caduceus_core::models::encounter::{FieldValue, InvalidInput, NormalizedEncounter, RawEncounter};
use caduceus_core::models::scenario::{FieldKind, InputField, Scenario};
use serde_json::Value;
use tracing::debug;

pub fn normalize(scenario: &Scenario, raw: &RawEncounter) -> NormalizedEncounter {
    let mut values = BTreeMap::new();
    let mut rejected = Vec::new();

    for input in &scenario.inputs {
        let value = match raw.fields.get(&input.name) {
            None => FieldValue::Unknown,
            Some(value) if is_explicit_unknown(value) => FieldValue::Unknown,
            Some(value) => match coerce(input, value) {
                Ok(value) => value,
                Err(reason) => {
                    rejected.push(InvalidInput {
                        field: input.name.clone(),
                        reason,
                    });
                    FieldValue::Unknown
                }
            },
        };
        values.insert(input.name.clone(), value);
    }

    let ignored: Vec<String> = raw
        .fields
        .keys()
        .filter(|name| scenario.input(name).is_none())
        .cloned()
        .collect();

    let encounter = NormalizedEncounter {
        scenario_id: scenario.id.clone(),
        scenario_version: scenario.version.clone(),
        values,
        rejected,
        ignored,
        recorded_at: raw.recorded_at,
    };

    debug!(
        scenario = %scenario.id,
        known = encounter.known_count(),
        unknown = encounter.unknown_count(),
        rejected = encounter.rejected.len(),
        ignored = encounter.ignored.len(),
        "encounter normalized"
    );
    encounter
}

fn is_explicit_unknown(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().eq_ignore_ascii_case("unknown"),
        _ => false,
    }
}

fn coerce(input: &InputField, value: &Value) -> Result<FieldValue, String> {
    match &input.kind {
        FieldKind::Numeric { min, max, unit } => {
            let number = parse_number(value, unit.as_deref())?;
            if number < *min || number > *max {
                return Err(format!("value {number} is outside [{min}, {max}]"));
            }
            Ok(FieldValue::Numeric(number))
        }
        FieldKind::Enumeration { options } => {
            let Value::String(s) = value else {
                return Err(format!("expected one of {}", options.join(", ")));
            };
            let wanted = fold(s);
            options
                .iter()
                .find(|option| fold(option) == wanted)
                .map(|option| FieldValue::Enumeration(option.clone()))
                .ok_or_else(|| {
                    format!("'{}' is not one of {}", s.trim(), options.join(", "))
                })
        }
        FieldKind::Boolean => match value {
            Value::Bool(b) => Ok(FieldValue::Boolean(*b)),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "yes" | "y" | "true" => Ok(FieldValue::Boolean(true)),
                "no" | "n" | "false" => Ok(FieldValue::Boolean(false)),
                other => Err(format!("'{other}' is not a yes/no value")),
            },
            _ => Err("expected a boolean".to_string()),
        },
        FieldKind::FreeText { max_len } => {
            let Value::String(s) = value else {
                return Err("expected text".to_string());
            };
            let text = s.trim();
            if text.is_empty() {
                return Ok(FieldValue::Unknown);
            }
            let len = text.chars().count();
            if len > *max_len {
                return Err(format!("text is {len} characters, limit is {max_len}"));
            }
            Ok(FieldValue::Text(text.to_string()))
        }
    }
}

fn parse_number(value: &Value, unit: Option<&str>) -> Result<f64, String> {
    let number = match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| format!("'{n}' is not representable"))?,
        Value::String(s) => {
            let mut text = s.trim();
            if let Some(unit) = unit.map(str::trim).filter(|u| !u.is_empty()) {
                if text.len() >= unit.len()
                    && text.is_char_boundary(text.len() - unit.len())
                    && text[text.len() - unit.len()..].eq_ignore_ascii_case(unit)
                {
                    text = text[..text.len() - unit.len()].trim_end();
                }
            }
            text.parse::<f64>()
                .map_err(|_| format!("'{}' is not a number", s.trim()))?
        }
        _ => return Err("expected a number".to_string()),
    };

    if !number.is_finite() {
        return Err(format!("'{number}' is not a finite number"));
    }
    Ok(number)
}

/// Case- and separator-insensitive key for matching enumeration options.
fn fold(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}
