use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Encounter data as supplied by the caller, before normalization.
///
/// Values are arbitrary JSON; the normalizer coerces them against the
/// scenario's input schema. `null` or the string `"unknown"` mark a value
/// as explicitly unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEncounter {
    #[serde(default)]
    pub scenario_id: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, serde_json::Value>,
    pub recorded_at: jiff::Timestamp,
}

impl RawEncounter {
    pub fn new(recorded_at: jiff::Timestamp) -> Self {
        Self {
            scenario_id: None,
            fields: BTreeMap::new(),
            recorded_at,
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A typed encounter value. `Unknown` is a valid state, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
#[ts(export)]
pub enum FieldValue {
    Numeric(f64),
    Enumeration(String),
    Boolean(bool),
    Text(String),
    Unknown,
}

static UNKNOWN: FieldValue = FieldValue::Unknown;

impl FieldValue {
    pub fn is_unknown(&self) -> bool {
        matches!(self, FieldValue::Unknown)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// String content of enumeration and free-text values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Enumeration(s) | FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A field value rejected by the normalizer. The field is treated as unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvalidInput {
    pub field: String,
    pub reason: String,
}

impl std::fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Encounter values coerced against one scenario's input schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEncounter {
    pub scenario_id: String,
    pub scenario_version: String,
    /// One entry per declared field, in schema order by name.
    pub values: BTreeMap<String, FieldValue>,
    pub rejected: Vec<InvalidInput>,
    /// Raw fields the scenario does not declare.
    pub ignored: Vec<String>,
    pub recorded_at: jiff::Timestamp,
}

impl NormalizedEncounter {
    /// Value of `field`, or `Unknown` when the field is absent.
    pub fn value(&self, field: &str) -> &FieldValue {
        self.values.get(field).unwrap_or(&UNKNOWN)
    }

    pub fn known_count(&self) -> usize {
        self.values.values().filter(|v| !v.is_unknown()).count()
    }

    pub fn unknown_count(&self) -> usize {
        self.values.values().filter(|v| v.is_unknown()).count()
    }
}
