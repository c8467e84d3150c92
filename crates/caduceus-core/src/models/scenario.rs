use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A versioned, declarative definition of one presenting complaint.
///
/// Scenarios are authored as JSON documents and validated by the registry
/// before activation. Everything the engine reasons over comes from here:
/// the input schema, the red flag rules, the candidate differentials and
/// the workup / management / disposition items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub version: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub inputs: Vec<InputField>,
    pub red_flags: Vec<RedFlagRule>,
    pub differentials: Vec<DifferentialEntry>,
    #[serde(default)]
    pub workup: Vec<PlanItem>,
    #[serde(default)]
    pub management: Vec<PlanItem>,
    pub disposition: DispositionGuidance,
    /// Hedge phrases that may legitimately contain a banned pattern
    /// (e.g. "cannot be ruled out").
    #[serde(default)]
    pub allowed_phrases: Vec<String>,
    /// Regular expressions that must never appear in an emitted report.
    #[serde(default)]
    pub banned_phrases: Vec<String>,
}

impl Scenario {
    pub fn input(&self, name: &str) -> Option<&InputField> {
        self.inputs.iter().find(|f| f.name == name)
    }

    pub fn red_flag(&self, id: &str) -> Option<&RedFlagRule> {
        self.red_flags.iter().find(|r| r.id == id)
    }

    /// Every fixed, author-supplied text of the scenario that can end up in
    /// a report line.
    pub fn report_texts(&self) -> impl Iterator<Item = &str> {
        let flags = self
            .red_flags
            .iter()
            .flat_map(|r| [r.label.as_str(), r.escalation.as_str()]);
        let differentials = self
            .differentials
            .iter()
            .flat_map(|d| [d.name.as_str(), d.reasoning.as_str()]);
        let plan = self
            .workup
            .iter()
            .chain(&self.management)
            .map(|item| item.text.as_str());
        let disposition = [
            self.disposition.escalation.as_str(),
            self.disposition.routine.as_str(),
        ];

        flags
            .chain(differentials)
            .chain(plan)
            .chain(disposition)
            .chain(std::iter::once(self.title.as_str()))
    }
}

/// One expected encounter field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
}

/// The declared type of an encounter field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Numeric {
        min: f64,
        max: f64,
        #[serde(default)]
        unit: Option<String>,
    },
    Enumeration {
        options: Vec<String>,
    },
    Boolean,
    FreeText {
        #[serde(default = "default_text_len")]
        max_len: usize,
    },
}

fn default_text_len() -> usize {
    2000
}

/// Severity tier of a red flag rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Severity {
    High,
    Moderate,
    Low,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Moderate => "moderate",
            Severity::Low => "low",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declarative predicate over encounter fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedFlagRule {
    pub id: String,
    /// Shown verbatim in the red flag section.
    pub label: String,
    pub condition: Condition,
    pub severity: Severity,
    pub escalation: String,
    #[serde(default)]
    pub topic_tags: Vec<String>,
}

/// Tagged condition variants evaluated with three-valued logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    /// `field <op> value` on a numeric field.
    Threshold {
        field: String,
        op: Comparison,
        value: f64,
    },
    /// Inclusive `min <= field <= max` on a numeric field.
    Range { field: String, min: f64, max: f64 },
    /// Enumeration (or free text) membership, case-insensitive.
    OneOf { field: String, values: Vec<String> },
    /// Boolean field equals `expected`.
    Flag { field: String, expected: bool },
    All { conditions: Vec<Condition> },
    Any { conditions: Vec<Condition> },
    Not { condition: Box<Condition> },
}

impl Condition {
    /// Names of every field this condition reads, in traversal order.
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Condition::Threshold { field, .. }
            | Condition::Range { field, .. }
            | Condition::OneOf { field, .. }
            | Condition::Flag { field, .. } => out.push(field),
            Condition::All { conditions } | Condition::Any { conditions } => {
                for c in conditions {
                    c.collect_fields(out);
                }
            }
            Condition::Not { condition } => condition.collect_fields(out),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

impl Comparison {
    pub fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparison::Lt => lhs < rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Gt => lhs > rhs,
            Comparison::Ge => lhs >= rhs,
            Comparison::Eq => (lhs - rhs).abs() < 1e-9,
        }
    }
}

/// A candidate explanation for the presenting complaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferentialEntry {
    pub id: String,
    pub name: String,
    /// Baseline prevalence weight in `[0, 1]`.
    pub prevalence: f64,
    /// Red flag ids whose triggering raises this differential.
    #[serde(default)]
    pub flags: Vec<String>,
    /// Reasoning template. `{flags}` expands to the triggered flag labels.
    pub reasoning: String,
    #[serde(default)]
    pub topic_tags: Vec<String>,
}

/// A workup or management item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanItem {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub topic_tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispositionGuidance {
    /// Used whenever a high-severity flag is triggered or cannot be excluded.
    pub escalation: String,
    /// Used otherwise; must be supported by a citation.
    pub routine: String,
    #[serde(default)]
    pub topic_tags: Vec<String>,
}
