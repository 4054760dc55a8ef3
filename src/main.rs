use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use statuswatch::commands::{self, Command};
use statuswatch::{app, Settings};

#[derive(Parser, Debug)]
#[command(name = "statuswatch")]
#[command(version, about = "Watch service status pages and get notified when they change")]
struct Args {
    /// Path to the configuration file (default: ./statuswatch.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Mode>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Poll all enabled services and read commands from stdin (default)
    Run,

    /// Check one service now and print the result
    Check {
        /// Service id, e.g. "github"
        id: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load the configuration and list accepted and rejected services
    Validate,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let settings = Settings::load(args.config.as_deref()).context("invalid configuration")?;

    match args.command.unwrap_or(Mode::Run) {
        Mode::Validate => {
            println!("{}", commands::format_settings_report(&settings));
            settings.require_services()?;
            Ok(())
        }
        Mode::Check { id, json } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(check_once(settings, &id, json))
        }
        Mode::Run => {
            settings.require_services()?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run(settings))
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("statuswatch=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run a single forced check.
async fn check_once(settings: Settings, id: &str, json: bool) -> Result<()> {
    let monitor = app::build_monitor(&settings)?;
    let result = monitor.force_check(id).await;

    if json {
        match &result {
            Ok(view) => println!("{}", serde_json::to_string_pretty(view)?),
            Err(e) => println!("{}", serde_json::json!({ "service_id": id, "error": e.to_string() })),
        }
    } else {
        let configured: Vec<&str> = monitor.services().map(|s| s.descriptor.id.as_str()).collect();
        println!("{}", commands::format_check_result(id, &result, &configured));
    }

    if let Err(e) = result {
        bail!("check of '{}' failed: {}", id, e);
    }
    Ok(())
}

/// Poll until interrupted, answering commands from stdin.
async fn run(settings: Settings) -> Result<()> {
    let monitor = Arc::new(app::build_monitor(&settings)?);
    let handle = app::build_scheduler(&settings, monitor.clone())?.start();

    info!(
        services = handle.service_ids().count(),
        interval_secs = settings.interval.as_secs(),
        notifier = %settings.notifier,
        targets = settings.targets.len(),
        "statuswatch started"
    );
    if settings.targets.is_empty() {
        warn!("no notify_targets configured; transitions will only be logged");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for Ctrl-C")?;
                info!("interrupt received, shutting down");
                break;
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match commands::parse(&line) {
                    None => {}
                    Some(Ok(Command::Quit)) => break,
                    Some(Ok(command)) => println!("{}", commands::execute(&monitor, &command).await),
                    Some(Err(e)) => println!("{}", e),
                },
                Ok(None) => {
                    // No interactive input; keep polling until interrupted.
                    stdin_open = false;
                }
                Err(e) => {
                    warn!(error = %e, "failed to read stdin; commands disabled");
                    stdin_open = false;
                }
            },
        }
    }

    handle.shutdown().await;
    Ok(())
}
