//! Command-line export of a Strava segment's elevation profile to CSV.

use anyhow::Context;
use clap::{Parser, ValueHint};
use std::path::{Path, PathBuf};
use strava_client::config::{ACCESS_TOKEN_VAR, Config};
use strava_client::csv_writer::write_elevation_csv;
use strava_client::http_client::ReqwestStravaClient;
use strava_client::{Resolution, StravaError, fetch_elevation_profile};

pub const DEFAULT_SEGMENT_ID: &str = "30408380";
pub const DEFAULT_OUTPUT: &str = "elevation_profile.csv";
pub const LOG_LEVEL_VAR: &str = "STRAVA_ELEVATION_LOG_LEVEL";

const QUIET_TARGETS: &str = "hyper=warn,hyper_util=warn,reqwest=warn";

#[derive(Parser, Debug)]
#[command(author, version, about = "Export a Strava segment's elevation profile to CSV", long_about = None)]
pub struct Cli {
    /// Segment to export
    #[arg(default_value = DEFAULT_SEGMENT_ID)]
    pub segment_id: String,

    /// Output CSV path
    #[arg(short, long, default_value = DEFAULT_OUTPUT, value_hint = ValueHint::FilePath)]
    pub output: PathBuf,

    /// Stream sampling density (low, medium, high)
    #[arg(long, default_value = "medium")]
    pub resolution: Resolution,

    /// Load environment from this file instead of discovering `.env`
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub env_file: Option<PathBuf>,
}

/// Result of a run that did not hit a local error. Both variants exit zero.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Written { path: PathBuf, rows: usize },
    FetchFailed,
}

/// Log filter from `STRAVA_ELEVATION_LOG_LEVEL`, then `RUST_LOG`, default `info`.
pub fn log_directive() -> String {
    std::env::var(LOG_LEVEL_VAR)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string())
}

pub fn env_filter(directive: &str) -> tracing_subscriber::EnvFilter {
    let combined = format!("{directive},{QUIET_TARGETS}");
    tracing_subscriber::EnvFilter::try_new(combined)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("info,{QUIET_TARGETS}")))
}

pub fn init_tracing() {
    let directive = log_directive();
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter(&directive))
        .init();
    tracing::debug!("strava_elevation: log filter: {}", directive);
}

/// Populate the process environment from `path`, or from a discovered
/// `.env` when no path is given. A missing discovered file is not an error.
pub fn load_env(path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            dotenvy::from_path(p).with_context(|| format!("loading env file {}", p.display()))?;
            tracing::debug!("loaded environment from {}", p.display());
        }
        None => match dotenvy::dotenv() {
            Ok(found) => tracing::debug!("loaded environment from {}", found.display()),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("ignoring unreadable .env file: {}", e),
        },
    }
    Ok(())
}

pub fn missing_token_message() -> String {
    format!("Please set the {ACCESS_TOKEN_VAR} environment variable.")
}

fn report_fetch_error(err: &StravaError) {
    match (err.status(), err.body()) {
        (Some(status), Some(body)) => println!("Error fetching data: {status}\n{body}"),
        _ => println!("Error fetching data: {err}"),
    }
}

/// Fetch the segment's profile and write it to `cli.output`.
///
/// Fetch failures and missing or empty streams yield [`Outcome::FetchFailed`]
/// without touching the output path; only local write errors are returned as `Err`.
pub async fn run(cli: &Cli, config: Config) -> anyhow::Result<Outcome> {
    let client = ReqwestStravaClient::new(&config.base_url, config.access_token);
    tracing::info!(
        "fetching {} resolution streams for segment {}",
        cli.resolution,
        cli.segment_id
    );

    let profile = match fetch_elevation_profile(&client, &cli.segment_id, cli.resolution).await {
        Ok(p) => p,
        Err(e) => {
            report_fetch_error(&e);
            println!("Failed to retrieve elevation data.");
            return Ok(Outcome::FetchFailed);
        }
    };

    // Missing streams and length mismatches are already logged by the library.
    let Some((distance, altitude)) = profile.into_complete() else {
        println!("Failed to retrieve elevation data.");
        return Ok(Outcome::FetchFailed);
    };

    let rows = write_elevation_csv(&distance, &altitude, &cli.segment_id, &cli.output)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    println!(
        "Elevation profile for segment {} saved to {}",
        cli.segment_id,
        cli.output.display()
    );

    Ok(Outcome::Written {
        path: cli.output.clone(),
        rows,
    })
}
