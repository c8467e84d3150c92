use caduceus_core::language::Phrases;
use caduceus_core::models::flag::{FlagResult, FlagState};
use caduceus_core::models::scenario::{DifferentialEntry, Scenario};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RankingWeights;

/// A scored candidate explanation. Ranked, never asserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedDifferential {
    pub id: String,
    pub name: String,
    pub score: f64,
    /// 1-based position in the ranking.
    pub rank: usize,
    /// Labels of the associated flags that triggered.
    pub triggered_flags: Vec<String>,
    /// Whether prevalence was demoted because every associated flag was
    /// explicitly absent.
    pub demoted: bool,
    /// Scenario reasoning with `{flags}` still unexpanded.
    pub reasoning_template: String,
    pub topic_tags: Vec<String>,
}

impl RankedDifferential {
    /// Reasoning with `{flags}` replaced by the triggered flag labels.
    pub fn reasoning(&self, phrases: &Phrases) -> String {
        let findings = if self.triggered_flags.is_empty() {
            phrases.no_findings.to_string()
        } else {
            self.triggered_flags.join(", ")
        };
        self.reasoning_template.replace("{flags}", &findings)
    }
}

/// Score and order every differential of the scenario.
///
/// `score = prevalence * demotion + sum(boost(severity))` over triggered
/// associated flags. The sort is stable, so equal scores keep declaration
/// order.
pub fn rank(
    scenario: &Scenario,
    flags: &[FlagResult],
    weights: &RankingWeights,
) -> Vec<RankedDifferential> {
    let mut ranked: Vec<RankedDifferential> = scenario
        .differentials
        .iter()
        .map(|entry| score(entry, flags, weights))
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    for (i, differential) in ranked.iter_mut().enumerate() {
        differential.rank = i + 1;
    }

    debug!(
        scenario = %scenario.id,
        top = ranked.first().map(|d| d.id.as_str()).unwrap_or_default(),
        candidates = ranked.len(),
        "differentials ranked"
    );
    ranked
}

fn score(
    entry: &DifferentialEntry,
    flags: &[FlagResult],
    weights: &RankingWeights,
) -> RankedDifferential {
    let associated: Vec<&FlagResult> = entry
        .flags
        .iter()
        .filter_map(|id| flags.iter().find(|f| &f.rule_id == id))
        .collect();

    let triggered: Vec<&FlagResult> = associated
        .iter()
        .copied()
        .filter(|f| f.is_triggered())
        .collect();

    let demoted = !entry.flags.is_empty()
        && associated.len() == entry.flags.len()
        && associated
            .iter()
            .all(|f| f.state == FlagState::NotTriggered);

    let base = if demoted {
        entry.prevalence * weights.demotion
    } else {
        entry.prevalence
    };
    let boost: f64 = triggered.iter().map(|f| weights.boost(f.severity)).sum();

    RankedDifferential {
        id: entry.id.clone(),
        name: entry.name.clone(),
        score: base + boost,
        rank: 0,
        reasoning_template: entry.reasoning.clone(),
        triggered_flags: triggered.iter().map(|f| f.label.clone()).collect(),
        demoted,
        topic_tags: entry.topic_tags.clone(),
    }
}
