use clap::{Parser, Subcommand};
use entity_match::config::{LoggingSettings, Settings};
use entity_match::{presets, MatchClient, MatchRequest};
use std::path::PathBuf;
use std::process::ExitCode;
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Screen people and companies against an entity match API
#[derive(Debug, Parser)]
#[command(name = "entity-match", version, about)]
struct Cli {
    /// Ranking algorithm passed to the service (e.g. regression-v1)
    #[arg(long, global = true)]
    algorithm: Option<String>,

    /// Matching profile, the path segment after /match/
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Settings file to use instead of config/default.toml and config/local.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Match a person by name
    Name,
    /// Match a person by name, address and country
    NameAddress,
    /// Match a person by name and birth date
    NameBirthDate,
    /// Match a person and a company in one request
    Multiple,
    /// Send the queries from a JSON file shaped like {"queries": {...}}
    File { path: PathBuf },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid query file {path}: {source}")]
    QueryFile {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Match(#[from] entity_match::MatchError),

    #[error("Failed to encode results: {0}")]
    Output(#[source] serde_json::Error),
}

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    // Results go to stdout, so logs stay on stderr
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn build_request(command: &Command) -> Result<MatchRequest, CliError> {
    Ok(match command {
        Command::Name => presets::name(),
        Command::NameAddress => presets::name_address(),
        Command::NameBirthDate => presets::name_birth_date(),
        Command::Multiple => presets::multiple(),
        Command::File { path } => {
            let body = std::fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.clone(),
                source,
            })?;
            MatchRequest::from_json(&body).map_err(|source| CliError::QueryFile {
                path: path.clone(),
                source,
            })?
        }
    })
}

async fn run(cli: Cli, mut settings: Settings) -> Result<(), CliError> {
    if let Some(profile) = cli.profile {
        settings.api.profile = profile;
    }

    let mut request = build_request(&cli.command)?;

    // Command line wins over the preset, the preset wins over config
    if let Some(algorithm) = cli.algorithm {
        request.algorithm = Some(algorithm);
    } else if request.algorithm.is_none() {
        request.algorithm = settings.api.algorithm.clone();
    }

    let client = MatchClient::from_settings(&settings.api)?;

    info!(
        "Matching {} queries against profile {}",
        request.queries.len(),
        settings.api.profile
    );

    let response = client.match_entities(&request).await?;

    let output =
        serde_json::to_string_pretty(&response.results_by_query).map_err(CliError::Output)?;
    println!("{}", output);

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };

    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&settings.logging);

    match run(cli, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&mut std::io::stderr(), &e);
            ExitCode::FAILURE
        }
    }
}

/// Single diagnostic line for a failed run; the log filter must not be able to hide it
fn report_error<W: Write>(out: &mut W, err: &CliError) {
    let _ = writeln!(out, "Error: {}", err);
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity_match::MatchError;

    #[test]
    fn test_error_reported_once() {
        let err = CliError::Match(MatchError::HttpStatus {
            status: 401,
            reason: "Unauthorized".to_string(),
            body: "invalid key".to_string(),
        });
        let mut out = Vec::new();

        report_error(&mut out, &err);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "Error: HTTP error 401 Unauthorized: invalid key\n");
    }
}
