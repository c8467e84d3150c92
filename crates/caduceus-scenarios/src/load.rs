use std::path::Path;

use caduceus_core::models::scenario::Scenario;
use tracing::{debug, info};

use crate::error::ScenarioError;

/// Parse one JSON scenario definition. `origin` names the document in
/// error messages (a file name or built-in id).
pub fn parse_definition(origin: &str, json: &str) -> Result<Scenario, ScenarioError> {
    serde_json::from_str(json).map_err(|source| ScenarioError::Parse {
        origin: origin.to_string(),
        source,
    })
}

/// Load every `*.json` scenario definition in a directory, sorted by file
/// name. Definitions are parsed, not validated; validation happens on
/// registration.
pub fn load_dir(dir: &Path) -> Result<Vec<Scenario>, ScenarioError> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut scenarios = Vec::with_capacity(paths.len());
    for path in &paths {
        let json = std::fs::read_to_string(path)?;
        let scenario = parse_definition(&path.display().to_string(), &json)?;
        debug!(scenario = %scenario.id, path = %path.display(), "scenario definition loaded");
        scenarios.push(scenario);
    }

    info!(dir = %dir.display(), count = scenarios.len(), "loaded scenario definitions");
    Ok(scenarios)
}
