mod display;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use lexwatch_core::{ChangeTypeMode, MonitorConfig};
use lexwatch_host::{HistoryService, Monitor};
use lexwatch_sync::{FeedClient, LogNotifier, Notifier, WebhookNotifier};

#[derive(Parser)]
#[command(name = "lexwatch", version, about = "Historical change detection for regulatory documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one detection pass over a snapshot file and print the change records.
    Detect {
        #[arg(long, env = "LEXWATCH_SNAPSHOTS")]
        snapshots: PathBuf,
        /// Categorise change types instead of reporting every change as `modified`.
        #[arg(long)]
        categorized: bool,
        /// Print records as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List snapshots, newest first, optionally filtered by source and date range.
    History {
        #[arg(long, env = "LEXWATCH_SNAPSHOTS")]
        snapshots: PathBuf,
        #[arg(long)]
        source: Option<String>,
        /// Inclusive lower bound on original date (RFC 3339).
        #[arg(long)]
        from: Option<DateTime<Utc>>,
        /// Inclusive upper bound on original date (RFC 3339).
        #[arg(long)]
        to: Option<DateTime<Utc>>,
    },
    /// Detect, then list the change ledger newest first.
    Changes {
        #[arg(long, env = "LEXWATCH_SNAPSHOTS")]
        snapshots: PathBuf,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Detect, then print the aggregate report for one source.
    Report {
        #[arg(long, env = "LEXWATCH_SNAPSHOTS")]
        snapshots: PathBuf,
        #[arg(long)]
        source: String,
        #[arg(long)]
        json: bool,
    },
    /// Poll every enabled source on its interval until interrupted.
    Watch {
        #[arg(long, env = "LEXWATCH_CONFIG")]
        config: PathBuf,
        /// Run a single pass over all sources and exit.
        #[arg(long)]
        once: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("lexwatch v{}", env!("CARGO_PKG_VERSION"));

    match Cli::parse().command {
        Command::Detect {
            snapshots,
            categorized,
            json,
        } => {
            let mode = if categorized {
                ChangeTypeMode::Categorized
            } else {
                ChangeTypeMode::Fixed
            };
            let service = load_service(&snapshots, mode).await?;
            let changes = service.detect_changes().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&changes)?);
            } else {
                if changes.is_empty() {
                    println!("No changes detected.");
                }
                for change in &changes {
                    display::print_change_card(change);
                }
            }
        }
        Command::History {
            snapshots,
            source,
            from,
            to,
        } => {
            let service = load_service(&snapshots, ChangeTypeMode::Fixed).await?;
            let rows = service
                .get_historical_data(source.as_deref(), from, to)
                .await;
            println!("{} snapshot(s)", rows.len());
            for row in &rows {
                display::print_snapshot_row(row);
            }
        }
        Command::Changes {
            snapshots,
            source,
            limit,
        } => {
            let service = load_service(&snapshots, ChangeTypeMode::Fixed).await?;
            service.detect_changes().await;
            let changes = match source.as_deref() {
                Some(id) => service.get_source_change_history(id, limit).await,
                None => service.get_change_history(limit).await,
            };
            println!("{} change(s)", changes.len());
            for change in &changes {
                display::print_change_row(change);
            }
        }
        Command::Report {
            snapshots,
            source,
            json,
        } => {
            let service = load_service(&snapshots, ChangeTypeMode::Fixed).await?;
            service.detect_changes().await;
            let report = service.generate_comprehensive_report(&source).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                display::print_report(&report);
            }
        }
        Command::Watch { config, once } => watch(&config, once).await?,
    }

    Ok(())
}

async fn load_service(path: &Path, mode: ChangeTypeMode) -> anyhow::Result<HistoryService> {
    let snapshots = lexwatch_store::load_snapshots(path)
        .with_context(|| format!("loading snapshots from {}", path.display()))?;
    let service = HistoryService::in_memory(mode);
    service.ingest(snapshots).await;
    Ok(service)
}

async fn watch(config_path: &Path, once: bool) -> anyhow::Result<()> {
    let config = MonitorConfig::load(config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    let notifier: Arc<dyn Notifier> = match &config.webhook_url {
        Some(url) => Arc::new(WebhookNotifier::new(url.clone())),
        None => Arc::new(LogNotifier),
    };
    let service = Arc::new(HistoryService::in_memory(config.change_type_mode));
    let monitor = Arc::new(Monitor::new(
        service,
        Arc::new(FeedClient::new()),
        notifier,
        &config,
    ));

    if once {
        for report in monitor.tick_all(Utc::now()).await {
            println!(
                "{:<12} fetched {:>4}  new {:>4}  changes {:>3}  alerts {:>3}",
                report.source_id,
                report.fetched,
                report.ingested,
                report.changes.len(),
                report.alerts().count()
            );
        }
        return Ok(());
    }

    let handle = monitor.start();
    eprintln!(
        "Watching {} source(s). Press Ctrl-C to stop.",
        handle.task_count()
    );
    tokio::signal::ctrl_c()
        .await
        .context("waiting for Ctrl-C")?;
    eprintln!("Stopping...");
    handle.stop().await;
    Ok(())
}
