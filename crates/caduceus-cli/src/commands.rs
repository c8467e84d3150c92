use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use caduceus_core::language::Language;
use caduceus_core::models::encounter::RawEncounter;
use caduceus_engine::error::EngineError;
use caduceus_engine::guard::SafetyViolation;
use caduceus_engine::Engine;
use caduceus_export::render::{render_json, render_markdown};
use caduceus_scenarios::builtin;
use caduceus_scenarios::load::load_dir;
use caduceus_scenarios::registry::{RegistrySnapshot, ScenarioRegistry};
use caduceus_sources::fulltext::TantivySourceIndex;
use caduceus_sources::load::load_excerpts;
use tracing::{info, warn};

use crate::cli::{EvaluateArgs, Format, ScenariosArgs};
use crate::config::CaduceusConfig;

/// What `evaluate` produced: a rendered report, or the guard's reasons for
/// withholding one.
#[derive(Debug)]
pub enum Outcome {
    Report(String),
    Rejected(String),
}

pub async fn evaluate(args: &EvaluateArgs, mut config: CaduceusConfig) -> eyre::Result<Outcome> {
    if let Some(tag) = &args.lang {
        let language = Language::from_tag(tag);
        if language.tag() != tag.to_ascii_lowercase() {
            info!(requested = %tag, using = language.tag(), "language tag mapped");
        }
        config.engine.language = language;
    }
    let language = config.engine.language;

    let snapshot = registry_snapshot(args.scenarios_dir.as_deref(), &config)?;
    let excerpts = load_excerpts(&args.sources)?;
    let index = TantivySourceIndex::build(&excerpts)?;
    let engine = Engine::new(
        Arc::new(ScenarioRegistry::new(snapshot)),
        index,
        config.engine,
    )?;

    let raw = read_encounter(&args.encounter)?;
    match engine.evaluate(&args.scenario, &raw).await {
        Ok(report) => {
            let rendered = match args.format {
                Format::Markdown => render_markdown(&report, language)?,
                Format::Json => render_json(&report)?,
            };
            Ok(Outcome::Report(rendered))
        }
        Err(EngineError::SafetyViolation(violations)) => {
            warn!(
                scenario = %args.scenario,
                violations = violations.len(),
                "report withheld"
            );
            Ok(Outcome::Rejected(describe_violations(&violations, args.format)?))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn list_scenarios(args: &ScenariosArgs, config: &CaduceusConfig) -> eyre::Result<String> {
    let snapshot = registry_snapshot(args.scenarios_dir.as_deref(), config)?;
    let mut out = format!("registry version {}\n", snapshot.version());
    for scenario in snapshot.scenarios() {
        writeln!(
            out,
            "{}\tv{}\t{}",
            scenario.id, scenario.version, scenario.title
        )?;
    }
    Ok(out)
}

/// Built-in scenarios plus any definitions from the command-line or
/// configured directory.
fn registry_snapshot(
    dir: Option<&Path>,
    config: &CaduceusConfig,
) -> eyre::Result<RegistrySnapshot> {
    let mut builder = RegistrySnapshot::builder(config.registry_version)
        .register_all(builtin::all_scenarios()?)?;
    if let Some(dir) = dir.or(config.scenarios_dir.as_deref()) {
        builder = builder.register_all(load_dir(dir)?)?;
    }
    Ok(builder.build())
}

/// Read an encounter file. A missing `recorded_at` is stamped with the
/// current time.
fn read_encounter(path: &Path) -> eyre::Result<RawEncounter> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read encounter at {}: {e}", path.display()))?;
    let mut json: serde_json::Value = serde_json::from_str(&contents)?;
    let obj = json
        .as_object_mut()
        .ok_or_else(|| eyre::eyre!("encounter is not a JSON object"))?;
    obj.entry("recorded_at")
        .or_insert_with(|| serde_json::Value::String(jiff::Timestamp::now().to_string()));

    Ok(RawEncounter::from_json(&json.to_string())?)
}

fn describe_violations(violations: &[SafetyViolation], format: Format) -> eyre::Result<String> {
    match format {
        Format::Json => Ok(format!(
            "{}\n",
            serde_json::to_string_pretty(&serde_json::json!({ "rejected": violations }))?
        )),
        Format::Markdown => {
            let mut out = String::from("Report withheld by the safety guard:\n");
            for violation in violations {
                writeln!(out, "- {violation}")?;
            }
            Ok(out)
        }
    }
}
