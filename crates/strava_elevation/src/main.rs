use clap::Parser;
use std::process::ExitCode;
use strava_client::config::Config;
use strava_elevation::{Cli, Outcome, init_tracing, load_env, missing_token_message, run};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = load_env(cli.env_file.as_deref()) {
        eprintln!("error: {e:#}");
        return ExitCode::FAILURE;
    }

    // The token is read once here and handed to the client explicitly.
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!("config error: {}", e);
            println!("{}", missing_token_message());
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, config).await {
        Ok(Outcome::Written { path, rows }) => {
            tracing::debug!("wrote {} rows to {}", rows, path.display());
            ExitCode::SUCCESS
        }
        Ok(Outcome::FetchFailed) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
