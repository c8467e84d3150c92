//! Scenario definitions shipped with the crate.

use caduceus_core::models::scenario::Scenario;

use crate::error::ScenarioError;
use crate::load::parse_definition;
use crate::registry::RegistrySnapshot;

pub const CHEST_PAIN: &str = "chest_pain";
pub const SHORTNESS_OF_BREATH: &str = "shortness_of_breath";

const DEFINITIONS: &[(&str, &str)] = &[
    (CHEST_PAIN, include_str!("../definitions/chest_pain.json")),
    (
        SHORTNESS_OF_BREATH,
        include_str!("../definitions/shortness_of_breath.json"),
    ),
];

/// Return all built-in scenario definitions.
pub fn all_scenarios() -> Result<Vec<Scenario>, ScenarioError> {
    DEFINITIONS
        .iter()
        .map(|(id, json)| parse_definition(id, json))
        .collect()
}

/// Look up a built-in scenario by ID.
pub fn get_scenario(id: &str) -> Result<Scenario, ScenarioError> {
    let (origin, json) = DEFINITIONS
        .iter()
        .find(|(builtin, _)| *builtin == id)
        .ok_or_else(|| ScenarioError::NotFound(id.to_string()))?;
    parse_definition(origin, json)
}

/// A validated snapshot holding every built-in scenario.
pub fn builtin_snapshot(version: u64) -> Result<RegistrySnapshot, ScenarioError> {
    Ok(RegistrySnapshot::builder(version)
        .register_all(all_scenarios()?)?
        .build())
}
