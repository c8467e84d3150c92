use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::citation::Citation;
use crate::language::Language;

/// The seven report sections, A through G.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SectionKind {
    Summary,
    RedFlags,
    Differentials,
    Workup,
    Management,
    Disposition,
    References,
}

impl SectionKind {
    /// The only valid section order.
    pub const ORDER: [SectionKind; 7] = [
        SectionKind::Summary,
        SectionKind::RedFlags,
        SectionKind::Differentials,
        SectionKind::Workup,
        SectionKind::Management,
        SectionKind::Disposition,
        SectionKind::References,
    ];

    pub fn letter(self) -> char {
        match self {
            SectionKind::Summary => 'A',
            SectionKind::RedFlags => 'B',
            SectionKind::Differentials => 'C',
            SectionKind::Workup => 'D',
            SectionKind::Management => 'E',
            SectionKind::Disposition => 'F',
            SectionKind::References => 'G',
        }
    }

    /// Sections C–F: every line needs a citation or an exemption.
    pub fn requires_citations(self) -> bool {
        matches!(
            self,
            SectionKind::Differentials
                | SectionKind::Workup
                | SectionKind::Management
                | SectionKind::Disposition
        )
    }
}

/// Why a line is allowed to carry no citation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Exemption {
    SafetyNotice,
    Escalation,
    Disclosure,
    Provenance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub text: String,
    pub citations: Vec<Citation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exemption: Option<Exemption>,
}

impl LineItem {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            citations: Vec::new(),
            exemption: None,
        }
    }

    pub fn cited(text: impl Into<String>, citations: Vec<Citation>) -> Self {
        Self {
            text: text.into(),
            citations,
            exemption: None,
        }
    }

    pub fn exempt(text: impl Into<String>, exemption: Exemption) -> Self {
        Self {
            text: text.into(),
            citations: Vec::new(),
            exemption: Some(exemption),
        }
    }

    pub fn is_cited(&self) -> bool {
        !self.citations.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Section {
    pub kind: SectionKind,
    pub lines: Vec<LineItem>,
}

impl Section {
    pub fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            lines: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReportMetadata {
    pub scenario_id: String,
    pub scenario_version: String,
    pub scenario_title: String,
    pub registry_version: u64,
    pub style_guide_version: u32,
    pub language: Language,
    pub recorded_at: jiff::Timestamp,
}

/// A decision-support report for one encounter evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub sections: Vec<Section>,
}

impl Report {
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Line texts of one section, empty when the section is missing.
    pub fn texts(&self, kind: SectionKind) -> Vec<&str> {
        self.section(kind)
            .map(|s| s.lines.iter().map(|l| l.text.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn lines(&self) -> impl Iterator<Item = (SectionKind, &LineItem)> {
        self.sections
            .iter()
            .flat_map(|s| s.lines.iter().map(move |l| (s.kind, l)))
    }
}
