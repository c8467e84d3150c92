use std::process::ExitCode;

use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;

use cli::{Cli, Command};
use commands::Outcome;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    // Structured JSON logs on stderr; stdout carries the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::CaduceusConfig::default(),
    };

    match cli.command {
        Command::Evaluate(args) => match commands::evaluate(&args, config).await? {
            Outcome::Report(rendered) => {
                print!("{rendered}");
                Ok(ExitCode::SUCCESS)
            }
            Outcome::Rejected(violations) => {
                print!("{violations}");
                Ok(ExitCode::from(2))
            }
        },
        Command::Scenarios(args) => {
            print!("{}", commands::list_scenarios(&args, &config)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
