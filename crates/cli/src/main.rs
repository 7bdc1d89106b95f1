use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
};

use anyhow::Result;
use cdrefresh_core::{
    config::{self, AppConfig},
    live::LiveClient,
    source::HttpClient,
    FetchEvent, RefreshPipeline, RefreshStatus,
};
use clap::{Parser, Subcommand};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{info, warn};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(version, about = "Refresh the champion cooldown dataset", long_about = None)]
struct Args {
    /// Override the configured data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override the configured number of parallel lookups
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the dataset for the latest version and update the manifest
    Refresh {
        /// Rebuild even if the dataset for this version already exists
        #[arg(long)]
        force: bool,
    },
    /// Print cooldowns for the champions in the current live game as JSON
    Live,
    /// Print the latest provider version
    Version,
    /// Print the known champion closest to NAME
    Match {
        /// Name to look up
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(matches!(args.command, Some(Commands::Live)))?;

    config::ensure_default_config()?;
    let mut config = AppConfig::load()?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(concurrency) = args.concurrency {
        config.max_concurrency = concurrency;
    }

    let pipeline = RefreshPipeline::from_config(&config)?;

    match args.command.unwrap_or(Commands::Refresh { force: false }) {
        Commands::Refresh { force } => {
            let (tx, reporter) = spawn_progress_reporter();
            let outcome = pipeline.run(force, Some(tx)).await;
            let _ = reporter.await;
            let outcome = outcome?;
            match outcome.status {
                RefreshStatus::Built { champions, gaps } => {
                    info!(
                        "wrote {} champions to {}",
                        champions,
                        outcome.dataset_path.display()
                    );
                    if !gaps.is_empty() {
                        warn!("no data for: {}", gaps.join(", "));
                    }
                }
                RefreshStatus::Skipped => {
                    info!("dataset for {} is up to date", outcome.version);
                }
            }
        }
        Commands::Live => {
            let http = HttpClient::insecure_local(config.request_timeout())?;
            let client = LiveClient::new(http, config.live_client_url.as_str());
            let roster = client.fetch_roster().await?;
            info!(
                "live game: {} blue, {} red",
                roster.blue.len(),
                roster.red.len()
            );

            let (tx, reporter) = spawn_progress_reporter();
            let cooldowns = pipeline.resolve_roster(&roster, Some(tx)).await;
            let _ = reporter.await;
            println!("{}", serde_json::to_string_pretty(&cooldowns?)?);
        }
        Commands::Version => {
            let version = pipeline.latest_version().await?;
            println!("{version}");
        }
        Commands::Match { name } => {
            let version = pipeline.latest_version().await?;
            match pipeline.closest_champion(&name, &version).await {
                Some(found) => println!("{found}"),
                None => anyhow::bail!("no champion listing available to match {name:?}"),
            }
        }
    }

    Ok(())
}

fn spawn_progress_reporter() -> (mpsc::Sender<FetchEvent>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel(64);
    let handle = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                FetchEvent::Started { total } => info!("fetching cooldowns for {total} champions"),
                FetchEvent::Resolved {
                    champion,
                    side,
                    found,
                    completed,
                    total,
                } => {
                    let mark = if found { "ok" } else { "missing" };
                    info!("[{completed}/{total}] {champion} ({side}) {mark}");
                }
                FetchEvent::Finished { gaps } => info!("fetch complete, {gaps} without data"),
            }
        }
    });
    (tx, handle)
}

/// Console output goes to stdout, except for `live`, whose JSON owns stdout.
fn init_logging(console_to_stderr: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("cdrefresh.log");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_writer = if console_to_stderr {
        BoxMakeWriter::new(std::io::stderr)
    } else {
        BoxMakeWriter::new(std::io::stdout)
    };
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(console_writer);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
