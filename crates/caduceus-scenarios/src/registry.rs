//! Versioned scenario registry.
//!
//! A [`RegistrySnapshot`] is immutable once built. The live
//! [`ScenarioRegistry`] holds the active snapshot behind an `Arc` and
//! replaces it wholesale on reload, so an evaluation that already holds a
//! snapshot never observes a partially updated scenario set.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use caduceus_core::models::scenario::Scenario;
use tracing::info;

use crate::error::ScenarioError;
use crate::validate::validate_scenario;

/// An immutable, validated set of scenarios at one registry version.
#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
    version: u64,
    scenarios: BTreeMap<String, Arc<Scenario>>,
}

impl RegistrySnapshot {
    pub fn builder(version: u64) -> RegistryBuilder {
        RegistryBuilder {
            version,
            scenarios: BTreeMap::new(),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn lookup(&self, scenario_id: &str) -> Result<Arc<Scenario>, ScenarioError> {
        self.scenarios
            .get(scenario_id)
            .cloned()
            .ok_or_else(|| ScenarioError::NotFound(scenario_id.to_string()))
    }

    /// Registered scenarios ordered by id.
    pub fn scenarios(&self) -> impl Iterator<Item = &Arc<Scenario>> {
        self.scenarios.values()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

/// Collects scenarios for a new snapshot, validating each on registration.
#[derive(Debug)]
pub struct RegistryBuilder {
    version: u64,
    scenarios: BTreeMap<String, Arc<Scenario>>,
}

impl RegistryBuilder {
    /// Validate and add a scenario. Fails with `SchemaViolation` on a
    /// duplicate id or any referential integrity problem.
    pub fn register(mut self, scenario: Scenario) -> Result<Self, ScenarioError> {
        validate_scenario(&scenario)?;

        if self.scenarios.contains_key(&scenario.id) {
            return Err(ScenarioError::SchemaViolation {
                scenario: scenario.id.clone(),
                reason: "scenario id is already registered".to_string(),
            });
        }

        self.scenarios
            .insert(scenario.id.clone(), Arc::new(scenario));
        Ok(self)
    }

    pub fn register_all(
        self,
        scenarios: impl IntoIterator<Item = Scenario>,
    ) -> Result<Self, ScenarioError> {
        scenarios
            .into_iter()
            .try_fold(self, |builder, scenario| builder.register(scenario))
    }

    pub fn build(self) -> RegistrySnapshot {
        RegistrySnapshot {
            version: self.version,
            scenarios: self.scenarios,
        }
    }
}

/// Process-wide registry serving the active snapshot.
#[derive(Debug)]
pub struct ScenarioRegistry {
    current: RwLock<Arc<RegistrySnapshot>>,
}

impl ScenarioRegistry {
    pub fn new(snapshot: RegistrySnapshot) -> Self {
        info!(
            version = snapshot.version(),
            scenarios = snapshot.len(),
            "scenario registry activated"
        );
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// The active snapshot. Callers keep it for the whole evaluation.
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        let guard = self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    pub fn lookup(&self, scenario_id: &str) -> Result<Arc<Scenario>, ScenarioError> {
        self.snapshot().lookup(scenario_id)
    }

    pub fn version(&self) -> u64 {
        self.snapshot().version()
    }

    /// Swap in a new snapshot. The version must be strictly greater than
    /// the active one. Returns the replaced version.
    pub fn reload(&self, snapshot: RegistrySnapshot) -> Result<u64, ScenarioError> {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let current = guard.version();
        if snapshot.version() <= current {
            return Err(ScenarioError::StaleVersion {
                current,
                proposed: snapshot.version(),
            });
        }

        info!(
            from = current,
            to = snapshot.version(),
            scenarios = snapshot.len(),
            "scenario registry reloaded"
        );
        *guard = Arc::new(snapshot);
        Ok(current)
    }
}
