use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "caduceus",
    about = "Citation-grounded clinical decision support reports",
    version
)]
pub struct Cli {
    /// Versioned JSON configuration file.
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate one encounter and print the approved report.
    Evaluate(EvaluateArgs),
    /// List registered scenarios.
    Scenarios(ScenariosArgs),
}

#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    #[arg(long, value_name = "ID")]
    pub scenario: String,

    /// Encounter JSON: `{ "fields": { ... }, "recorded_at": "..." }`.
    #[arg(long, value_name = "FILE")]
    pub encounter: PathBuf,

    /// JSON array of approved source excerpts.
    #[arg(long, value_name = "FILE")]
    pub sources: PathBuf,

    /// Extra scenario definitions, registered after the built-ins.
    #[arg(long = "scenarios-dir", value_name = "DIR")]
    pub scenarios_dir: Option<PathBuf>,

    /// Output language tag (en or ar). Others fall back to en.
    #[arg(long = "lang", value_name = "TAG")]
    pub lang: Option<String>,

    #[arg(long, value_enum, default_value_t = Format::Markdown)]
    pub format: Format,
}

#[derive(Args, Debug, Clone)]
pub struct ScenariosArgs {
    #[arg(long = "scenarios-dir", value_name = "DIR")]
    pub scenarios_dir: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Markdown,
    Json,
}
