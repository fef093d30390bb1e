use std::process::ExitCode;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use sundash_core::{Config, Dashboard, LocatorId, LookupError, SunDashboard, SunReport};
use tracing::debug;

use crate::interactive;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "sundash", version, about = "Sunrise and sunset for today and tomorrow")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show sun data for the current location.
    Here {
        /// Locator to use, "ip" or "home"; defaults to the configured one.
        #[arg(long)]
        locator: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show sun data for a searched location.
    Search {
        /// Address or location name.
        location: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Prompt for locations until you quit.
    Interactive,

    /// Configure geocoding key, home location and default locator.
    Configure,
}

#[derive(Debug, clap::Args)]
pub struct OutputArgs {
    /// Date to treat as "today" (YYYY-MM-DD); defaults to the local date.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Here { locator, output } => {
                let locator = locator.as_deref().map(LocatorId::try_from).transpose()?;
                let config = Config::load()?;
                let dashboard = SunDashboard::from_config(&config, locator)?;

                let outcome = dashboard.run_current_location(today(output.date)).await;
                show(outcome, output.json)
            }
            Command::Search { location, output } => {
                let config = Config::load()?;
                let dashboard = SunDashboard::from_config(&config, None)?;

                let outcome = dashboard.run_search(&location, today(output.date)).await;
                show(outcome, output.json)
            }
            Command::Interactive => {
                let config = Config::load()?;
                interactive::run_loop(&config).await?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Configure => {
                interactive::configure().await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

pub fn today(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

fn show(outcome: Result<SunReport, LookupError>, json: bool) -> anyhow::Result<ExitCode> {
    if let Err(err) = &outcome {
        debug!(error = %err, "run failed");
    }

    if json {
        println!("{}", json_output(&outcome)?);
        return Ok(exit_code(&outcome));
    }

    let board = Dashboard::new();
    let run = board.begin();
    if let Some(alert) = board.present_outcome(run, &outcome) {
        eprintln!("{alert}");
    }
    print!("{}", board.screen().text());

    Ok(exit_code(&outcome))
}

fn exit_code(outcome: &Result<SunReport, LookupError>) -> ExitCode {
    if outcome.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

/// JSON document for `--json`: the report, or `{"error": ...}` with the user-facing message.
fn json_output(outcome: &Result<SunReport, LookupError>) -> anyhow::Result<String> {
    let value = match outcome {
        Ok(report) => serde_json::to_value(report).context("Failed to serialize report")?,
        Err(err) => serde_json::json!({ "error": err.user_message() }),
    };
    serde_json::to_string_pretty(&value).context("Failed to serialize output")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_accepts_date_and_json() {
        let cli =
            Cli::try_parse_from(["sundash", "search", "Paris", "--date", "2024-01-01", "--json"])
                .expect("valid arguments");

        match cli.command {
            Command::Search { location, output } => {
                assert_eq!(location, "Paris");
                assert_eq!(output.date, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert!(output.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn malformed_date_is_rejected() {
        assert!(Cli::try_parse_from(["sundash", "here", "--date", "01/01/2024"]).is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["sundash", "here", "--locator", "home", "-v"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn explicit_date_overrides_local_today() {
        let date = NaiveDate::from_ymd_opt(2030, 6, 21).unwrap();
        assert_eq!(today(Some(date)), date);
    }

    #[test]
    fn json_error_is_an_object_with_the_user_message() {
        let outcome: Result<SunReport, LookupError> =
            Err(LookupError::NoMatchFound("Atlantis".into()));

        let text = json_output(&outcome).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["error"], "Please enter a valid location");
    }
}
