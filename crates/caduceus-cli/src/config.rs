use std::path::{Path, PathBuf};

use caduceus_core::language::Language;
use caduceus_engine::EngineConfig;
use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

/// Engine settings that pre-versioned configs kept at the top level.
const FLAT_ENGINE_KEYS: &[&str] = &[
    "style_guide_version",
    "banned_phrases",
    "relevance_threshold",
    "max_citations_per_claim",
    "source_timeout_ms",
    "weights",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaduceusConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    /// Version stamped on the scenario registry snapshot.
    #[serde(default = "default_registry_version")]
    pub registry_version: u64,
    /// Extra scenario definitions loaded alongside the built-ins.
    #[serde(default)]
    pub scenarios_dir: Option<PathBuf>,
    #[serde(default)]
    pub created_at: Option<jiff::Timestamp>,
    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_registry_version() -> u64 {
    1
}

impl Default for CaduceusConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            registry_version: default_registry_version(),
            scenarios_dir: None,
            created_at: None,
            engine: EngineConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> eyre::Result<CaduceusConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;
    parse_config(&contents)
}

fn parse_config(contents: &str) -> eyre::Result<CaduceusConfig> {
    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: CaduceusConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update caduceus."
        ));
    }

    // v0 → v1: nest engine settings under "engine"; "lang" becomes "language"
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;

        let mut engine = match obj.remove("engine") {
            Some(serde_json::Value::Object(map)) => map,
            Some(_) => return Err(eyre::eyre!("config field 'engine' is not an object")),
            None => serde_json::Map::new(),
        };
        for key in FLAT_ENGINE_KEYS {
            if let Some(value) = obj.remove(*key) {
                engine.entry(*key).or_insert(value);
            }
        }
        if let Some(lang) = obj.remove("lang") {
            let language = lang
                .as_str()
                .map(Language::from_tag)
                .unwrap_or_default();
            engine
                .entry("language")
                .or_insert(serde_json::Value::String(language.tag().to_string()));
        }

        obj.insert("engine".to_string(), serde_json::Value::Object(engine));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (nested engine settings)");
    }

    // Future migrations go here:
    // if from_version < 2 { ... }

    Ok(json)
}
