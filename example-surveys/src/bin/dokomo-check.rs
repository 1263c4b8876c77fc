//! Validate a submission file against a survey definition.
//!
//! Prints the accepted answers as JSON on stdout. A rejected submission is
//! reported on stderr and exits with status 1; unreadable input exits with
//! status 2.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use dokomo::{SubmittedAnswer, Survey, SurveyDefinition, ValidationOptions, Validator};
use serde::de::DeserializeOwned;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dokomo-check",
    about = "Validate a survey submission against its survey",
    version
)]
struct Cli {
    /// Survey definition (JSON)
    survey: PathBuf,

    /// Submitted answers (JSON array)
    submission: PathBuf,

    /// Validation options (JSON); defaults apply when omitted
    #[arg(short, long)]
    options: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether the submission was accepted.
fn run(cli: Cli) -> Result<bool> {
    let definition: SurveyDefinition = load(&cli.survey)?;
    let survey = Survey::try_from(definition)
        .with_context(|| format!("survey {} is malformed", cli.survey.display()))?;
    let answers: Vec<SubmittedAnswer> = load(&cli.submission)?;
    let options = match &cli.options {
        Some(path) => load(path)?,
        None => ValidationOptions::default(),
    };

    let validator = Validator::new(&survey).with_options(options);

    info!(
        survey_nodes = survey.node_count(),
        answers = answers.len(),
        unreachable_answers = ?validator.options().unreachable_answers,
        rounds_from_integer_answer = validator.options().rounds_from_integer_answer,
        "validating submission"
    );

    match validator.validate(&answers) {
        Ok(accepted) => {
            info!(accepted = accepted.len(), "submission accepted");
            println!("{}", serde_json::to_string_pretty(&accepted)?);
            Ok(true)
        }
        Err(rejection) => {
            warn!(survey_node_id = %rejection.survey_node_id(), "submission rejected");
            eprintln!("rejected: {rejection}");
            Ok(false)
        }
    }
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}
