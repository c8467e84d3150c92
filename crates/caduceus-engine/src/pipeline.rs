use std::sync::{Arc, RwLock};

use caduceus_core::models::encounter::RawEncounter;
use caduceus_scenarios::error::ScenarioError;
use caduceus_scenarios::registry::ScenarioRegistry;
use caduceus_sources::SourceIndex;
use tracing::{debug, info, warn};

use crate::citations::{CitationResolver, ClaimRequest};
use crate::compose::{self, ComposeInputs, Evidence};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::guard::{self, ApprovedReport, SafetyGuard, Verdict};
use crate::{normalize, ranker, redflags};

/// Evaluates encounters against the active registry snapshot and source
/// index.
///
/// Both shared resources are held behind `Arc` and cloned at the start of
/// an evaluation, so a concurrent reload or source replacement never
/// changes what an in-flight evaluation sees.
pub struct Engine<S> {
    registry: Arc<ScenarioRegistry>,
    sources: RwLock<Arc<S>>,
    config: EngineConfig,
}

impl<S: SourceIndex> Engine<S> {
    pub fn new(
        registry: Arc<ScenarioRegistry>,
        sources: S,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        guard::compile_patterns(&config.banned_phrases)?;

        info!(
            registry_version = registry.version(),
            excerpts = sources.len(),
            language = config.language.tag(),
            "engine ready"
        );
        Ok(Self {
            registry,
            sources: RwLock::new(Arc::new(sources)),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ScenarioRegistry> {
        &self.registry
    }

    pub fn sources(&self) -> Arc<S> {
        let guard = self
            .sources
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Swap in a new source index. Evaluations already running keep the
    /// index they started with.
    pub fn replace_sources(&self, sources: S) {
        let excerpts = sources.len();
        let mut guard = self
            .sources
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(sources);
        info!(excerpts, "source index replaced");
    }

    /// Produce an approved report for one encounter, or the reason none can
    /// be released.
    pub async fn evaluate(
        &self,
        scenario_id: &str,
        raw: &RawEncounter,
    ) -> Result<ApprovedReport, EngineError> {
        if let Some(found) = raw.scenario_id.as_deref().filter(|found| *found != scenario_id) {
            return Err(EngineError::ScenarioMismatch {
                expected: scenario_id.to_string(),
                found: found.to_string(),
            });
        }

        let snapshot = self.registry.snapshot();
        let sources = self.sources();

        let scenario = snapshot.lookup(scenario_id).map_err(|e| match e {
            ScenarioError::NotFound(id) => EngineError::NotFound(id),
            other => EngineError::Scenario(other),
        })?;
        debug!(scenario = %scenario.id, version = %scenario.version, "scenario resolved");

        let encounter = normalize::normalize(&scenario, raw);
        let flags = redflags::evaluate(&scenario, &encounter);
        let differentials = ranker::rank(&scenario, &flags, &self.config.weights);

        let (keys, requests): (Vec<_>, Vec<ClaimRequest>) =
            compose::claims(&scenario, &flags, &differentials)
                .into_iter()
                .unzip();
        let resolver = CitationResolver::new(sources.as_ref(), &self.config);
        let resolutions = resolver.resolve_all(&requests).await;
        let evidence = Evidence::new(keys, resolutions);

        let report = compose::compose(&ComposeInputs {
            scenario: &scenario,
            encounter: &encounter,
            flags: &flags,
            differentials: &differentials,
            evidence: &evidence,
            registry_version: snapshot.version(),
            style_guide_version: self.config.style_guide_version,
            language: self.config.language,
        });
        debug!(scenario = %scenario.id, lines = report.lines().count(), "report composed");

        let guard = SafetyGuard::for_scenario(&self.config.banned_phrases, &scenario)?;
        match guard.validate(report, &flags) {
            Verdict::Approved(report) => {
                debug!(scenario = %scenario.id, "report approved");
                Ok(report)
            }
            Verdict::Rejected(violations) => {
                warn!(
                    scenario = %scenario.id,
                    violations = violations.len(),
                    "report rejected by safety guard"
                );
                Err(EngineError::SafetyViolation(violations))
            }
        }
    }
}
