mod logging;
mod output;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tethercalc_core::provider::Query;
use tethercalc_core::{
    AppConfig, FightSelector, LogClient, TetherError, analyze, resolve_last_fight,
};
use tracing::{error, warn};

#[derive(Parser)]
#[command(version, about = "Dragon Sight tether analysis for FFLogs reports")]
struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also append logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank every tether of a fight
    Analyze {
        report: String,
        /// Fight id, or "last"
        #[arg(short, long)]
        fight: Option<FightSelector>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the id of the last fight in a report
    LastFight { report: String },
    /// Raw report API call (fights, events/summary, tables/damage-done).
    /// events/summary needs --start and --end.
    Fetch {
        call: String,
        report: String,
        #[arg(long, requires = "end")]
        start: Option<i64>,
        #[arg(long, requires = "start")]
        end: Option<i64>,
        #[arg(long, requires = "start")]
        filter: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let log_file = cli.log_file.clone().or_else(|| config.logging.file.clone());
    let _log_guard = logging::init(log_file.as_deref());

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn report_error(err: TetherError) -> String {
    if err.is_user_actionable() {
        warn!(error = %err, "analysis not possible");
    } else {
        error!(error = ?err, "analysis failed");
    }
    match std::error::Error::source(&err) {
        Some(source) => format!("{err}: {source}"),
        None => err.to_string(),
    }
}

fn print(text: &str) -> Result<(), String> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}").map_err(|e| e.to_string())?;
    stdout.flush().map_err(|e| e.to_string())
}

async fn run(command: Commands, config: &AppConfig) -> Result<(), String> {
    if config.provider.api_key.is_empty() {
        warn!("no API key configured, requests will likely be rejected");
    }
    let client = LogClient::new(config.provider.clone()).map_err(report_error)?;

    match command {
        Commands::Analyze {
            report,
            fight,
            json,
        } => {
            let analysis = analyze(&client, &report, fight, &config.analysis)
                .await
                .map_err(report_error)?;
            if json {
                let text = serde_json::to_string_pretty(&analysis).map_err(|e| e.to_string())?;
                print(&text)
            } else {
                print(&output::render(&analysis))
            }
        }
        Commands::LastFight { report } => {
            let id = resolve_last_fight(&client, &report)
                .await
                .map_err(report_error)?;
            print(&id.to_string())
        }
        Commands::Fetch {
            call,
            report,
            start,
            end,
            filter,
        } => {
            let query = match (start, end) {
                (Some(start), Some(end)) => {
                    let query = Query::new(start, end);
                    Some(match filter {
                        Some(filter) => query.with_filter(filter),
                        None => query,
                    })
                }
                _ => None,
            };
            let value = client
                .fetch(&call, &report, query.as_ref())
                .await
                .map_err(report_error)?;
            let text = serde_json::to_string_pretty(&value).map_err(|e| e.to_string())?;
            print(&text)
        }
    }
}
