//! Report assembly.
//!
//! Composition is pure: the same inputs always produce the same report.
//! A claim in sections C–F without citations is never written into the
//! body. It moves to section G as a disclosure line instead.

use std::collections::{BTreeMap, HashSet};

use caduceus_core::language::{Language, Phrases};
use caduceus_core::models::citation::{Citation, CitationStatus, Resolution};
use caduceus_core::models::encounter::NormalizedEncounter;
use caduceus_core::models::flag::{FlagResult, FlagState};
use caduceus_core::models::report::{
    Exemption, LineItem, Report, ReportMetadata, Section, SectionKind,
};
use caduceus_core::models::scenario::{Scenario, Severity};

use crate::citations::ClaimRequest;
use crate::ranker::RankedDifferential;

/// Identifies which report line a claim belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClaimKey {
    RedFlag(String),
    Differential(String),
    Workup(String),
    Management(String),
    Disposition,
}

/// Resolved citations keyed by claim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evidence {
    resolutions: BTreeMap<ClaimKey, Resolution>,
}

impl Evidence {
    pub fn new(keys: Vec<ClaimKey>, resolutions: Vec<Resolution>) -> Self {
        Self {
            resolutions: keys.into_iter().zip(resolutions).collect(),
        }
    }

    pub fn get(&self, key: &ClaimKey) -> Option<&Resolution> {
        self.resolutions.get(key)
    }
}

/// Flags shown in section B: every triggered flag, then every high flag
/// that could not be excluded.
pub fn reported_flags(flags: &[FlagResult]) -> impl Iterator<Item = &FlagResult> {
    let triggered = flags.iter().filter(|f| f.is_triggered());
    let indeterminate = flags
        .iter()
        .filter(|f| f.severity == Severity::High && f.state == FlagState::Indeterminate);
    triggered.chain(indeterminate)
}

pub fn requires_escalation(flags: &[FlagResult]) -> bool {
    flags.iter().any(FlagResult::requires_escalation)
}

/// Every claim the report will make, in line order.
pub fn claims(
    scenario: &Scenario,
    flags: &[FlagResult],
    differentials: &[RankedDifferential],
) -> Vec<(ClaimKey, ClaimRequest)> {
    let mut out = Vec::new();

    for flag in reported_flags(flags) {
        out.push((
            ClaimKey::RedFlag(flag.rule_id.clone()),
            ClaimRequest::new(&flag.label, &flag.topic_tags),
        ));
    }
    for differential in differentials {
        out.push((
            ClaimKey::Differential(differential.id.clone()),
            ClaimRequest::new(&differential.name, &differential.topic_tags),
        ));
    }
    for item in &scenario.workup {
        out.push((
            ClaimKey::Workup(item.id.clone()),
            ClaimRequest::new(&item.text, &item.topic_tags),
        ));
    }
    for item in &scenario.management {
        out.push((
            ClaimKey::Management(item.id.clone()),
            ClaimRequest::new(&item.text, &item.topic_tags),
        ));
    }
    if !requires_escalation(flags) {
        out.push((
            ClaimKey::Disposition,
            ClaimRequest::new(
                &scenario.disposition.routine,
                &scenario.disposition.topic_tags,
            ),
        ));
    }
    out
}

pub struct ComposeInputs<'a> {
    pub scenario: &'a Scenario,
    pub encounter: &'a NormalizedEncounter,
    pub flags: &'a [FlagResult],
    pub differentials: &'a [RankedDifferential],
    pub evidence: &'a Evidence,
    pub registry_version: u64,
    pub style_guide_version: u32,
    pub language: Language,
}

pub fn compose(inputs: &ComposeInputs<'_>) -> Report {
    let mut composer = Composer {
        inputs,
        phrases: inputs.language.phrases(),
        disclosures: Vec::new(),
    };

    let summary = composer.summary();
    let red_flags = composer.red_flags();
    let differentials = composer.differentials();
    let workup = composer.plan(SectionKind::Workup);
    let management = composer.plan(SectionKind::Management);
    let disposition = composer.disposition();

    let mut sections = vec![
        summary,
        red_flags,
        differentials,
        workup,
        management,
        disposition,
    ];
    let references = composer.references(&sections);
    sections.push(references);

    Report {
        metadata: ReportMetadata {
            scenario_id: inputs.scenario.id.clone(),
            scenario_version: inputs.scenario.version.clone(),
            scenario_title: inputs.scenario.title.clone(),
            registry_version: inputs.registry_version,
            style_guide_version: inputs.style_guide_version,
            language: inputs.language,
            recorded_at: inputs.encounter.recorded_at,
        },
        sections,
    }
}

struct Composer<'a> {
    inputs: &'a ComposeInputs<'a>,
    phrases: &'static Phrases,
    disclosures: Vec<LineItem>,
}

impl<'a> Composer<'a> {
    fn summary(&self) -> Section {
        let scenario = self.inputs.scenario;
        let encounter = self.inputs.encounter;
        let phrases = self.phrases;
        let mut section = Section::new(SectionKind::Summary);

        section.lines.push(LineItem::exempt(
            phrases.safety_notice,
            Exemption::SafetyNotice,
        ));
        section.lines.push(LineItem::plain(format!(
            "{}: {} ({} v{})",
            phrases.scenario, scenario.title, scenario.id, scenario.version
        )));
        section.lines.push(LineItem::plain(format!(
            "{}: {}; {}: {}.",
            phrases.fields_supplied,
            encounter.known_count(),
            phrases.fields_unknown,
            encounter.unknown_count()
        )));
        for invalid in &encounter.rejected {
            section.lines.push(LineItem::plain(format!(
                "{} {invalid}",
                phrases.rejected_input
            )));
        }
        for field in &encounter.ignored {
            section.lines.push(LineItem::plain(format!(
                "{}: {field}",
                phrases.ignored_field
            )));
        }
        section
    }

    fn red_flags(&self) -> Section {
        let mut section = Section::new(SectionKind::RedFlags);

        for flag in reported_flags(self.inputs.flags) {
            let severity = self.phrases.severity(flag.severity);
            let text = if flag.is_triggered() {
                format!("{} ({severity}): {}", flag.label, flag.escalation)
            } else {
                format!(
                    "{} ({severity}): {}.",
                    flag.label, self.phrases.insufficient_data
                )
            };
            let citations = self
                .inputs
                .evidence
                .get(&ClaimKey::RedFlag(flag.rule_id.clone()))
                .map(|r| r.citations.clone())
                .unwrap_or_default();
            section.lines.push(LineItem::cited(text, citations));
        }

        if section.lines.is_empty() {
            section.lines.push(LineItem::exempt(
                self.phrases.no_red_flags,
                Exemption::SafetyNotice,
            ));
        }
        section
    }

    fn differentials(&mut self) -> Section {
        let differentials: &'a [RankedDifferential] = self.inputs.differentials;
        let mut section = Section::new(SectionKind::Differentials);
        for differential in differentials {
            let text = format!(
                "{} ({} {:.2}): {}",
                differential.name,
                self.phrases.score,
                differential.score,
                differential.reasoning(self.phrases)
            );
            let key = ClaimKey::Differential(differential.id.clone());
            self.place(&mut section, key, &differential.name, text);
        }
        section
    }

    fn plan(&mut self, kind: SectionKind) -> Section {
        let scenario: &'a Scenario = self.inputs.scenario;
        let (items, key): (_, fn(String) -> ClaimKey) = match kind {
            SectionKind::Workup => (&scenario.workup, ClaimKey::Workup),
            _ => (&scenario.management, ClaimKey::Management),
        };

        let mut section = Section::new(kind);
        for item in items {
            self.place(&mut section, key(item.id.clone()), &item.text, item.text.clone());
        }
        section
    }

    fn disposition(&mut self) -> Section {
        let scenario: &'a Scenario = self.inputs.scenario;
        let guidance = &scenario.disposition;
        let mut section = Section::new(SectionKind::Disposition);

        if requires_escalation(self.inputs.flags) {
            section.lines.push(LineItem::exempt(
                guidance.escalation.clone(),
                Exemption::Escalation,
            ));
        } else {
            self.place(
                &mut section,
                ClaimKey::Disposition,
                &guidance.routine,
                guidance.routine.clone(),
            );
        }
        section
    }

    /// Each cited excerpt once, in first-use order, then the disclosures,
    /// then the provenance line.
    fn references(&mut self, body: &[Section]) -> Section {
        let mut section = Section::new(SectionKind::References);

        let mut seen = HashSet::new();
        let cited: Vec<&Citation> = body
            .iter()
            .flat_map(|s| &s.lines)
            .flat_map(|l| &l.citations)
            .filter(|c| seen.insert(c.excerpt_id.as_str()))
            .collect();
        for citation in cited {
            section.lines.push(LineItem::cited(
                format!("{} {}", citation.label(), citation.snippet),
                vec![citation.clone()],
            ));
        }

        section.lines.append(&mut self.disclosures);

        let scenario: &'a Scenario = self.inputs.scenario;
        let phrases = self.phrases;
        section.lines.push(LineItem::exempt(
            format!(
                "{} {} {} {}; {} {}; {} {}.",
                phrases.scenario,
                scenario.id,
                phrases.version,
                scenario.version,
                phrases.registry_version,
                self.inputs.registry_version,
                phrases.style_guide_version,
                self.inputs.style_guide_version
            ),
            Exemption::Provenance,
        ));
        section
    }

    /// Write a cited line into the body, or disclose the claim in G.
    fn place(&mut self, section: &mut Section, key: ClaimKey, claim: &str, text: String) {
        let evidence: &'a Evidence = self.inputs.evidence;
        match evidence.get(&key) {
            Some(resolution) if resolution.is_supported() => {
                section
                    .lines
                    .push(LineItem::cited(text, resolution.citations.clone()));
            }
            resolution => {
                let status = resolution.map_or(CitationStatus::NotFound, |r| r.status);
                let line = self.disclosure(claim, status);
                self.disclosures.push(line);
            }
        }
    }

    fn disclosure(&self, claim: &str, status: CitationStatus) -> LineItem {
        let suffix = match status {
            CitationStatus::TimedOut => format!(" ({})", self.phrases.lookup_timed_out),
            CitationStatus::Unavailable => format!(" ({})", self.phrases.lookup_unavailable),
            CitationStatus::Found | CitationStatus::NotFound => String::new(),
        };
        LineItem::exempt(
            format!("{}: {claim}{suffix}", self.phrases.not_found),
            Exemption::Disclosure,
        )
    }
}
