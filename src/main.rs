use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::time::sleep;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use audithud::config::{load_config, HudConfig};
use audithud::hud::{render_report, ConsoleSurface, HudController};
use audithud::paint::{PaintBatch, PaintObserver, PaintSignal, TelemetryBus};
use audithud::{AuditEngine, InMemoryTelemetry, PageSnapshot};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Enable debug mode
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one audit pass over a page snapshot and print the report
    Audit(AuditArgs),

    /// Interactive HUD session with a keyboard toggle
    Hud(HudArgs),
}

#[derive(Args)]
struct AuditArgs {
    /// Page snapshot file (JSON)
    #[arg(short, long, value_name = "FILE")]
    snapshot: PathBuf,
}

#[derive(Args)]
struct HudArgs {
    /// Page snapshot file (JSON)
    #[arg(short, long, value_name = "FILE")]
    snapshot: PathBuf,

    /// Run the audit immediately on startup
    #[arg(long)]
    audit: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.debug)?;
    debug!(
        build = env!("BUILD_DATE"),
        commit = env!("GIT_HASH"),
        "starting audithud"
    );

    let config = load_config(cli.config.as_ref()).await?;

    let result = match cli.command {
        Commands::Audit(args) => cmd_audit(args, &config).await,
        Commands::Hud(args) => cmd_hud(args, &config).await,
    };

    match result {
        Ok(()) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(level: &str, debug: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(())
}

async fn cmd_audit(args: AuditArgs, config: &HudConfig) -> Result<()> {
    let (engine, page) = boot_engine(&args.snapshot, config).await?;
    let report = engine.run(&page);
    print!("{}", render_report(&report, engine.policy()));
    Ok(())
}

async fn cmd_hud(args: HudArgs, config: &HudConfig) -> Result<()> {
    let (engine, page) = boot_engine(&args.snapshot, config).await?;
    let toggle_key = engine.policy().toggle_key;
    let mut controller = HudController::new(Arc::new(ConsoleSurface));

    if args.audit {
        controller.show(&engine, &page);
    }

    info!(
        "Interactive HUD session. Type '{}' then Enter to toggle, Ctrl+C to exit.",
        toggle_key
    );
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(input) => {
                        if input.trim().eq_ignore_ascii_case(&toggle_key.to_string()) {
                            controller.toggle(&engine, &page);
                        }
                    }
                    None => break,
                }
            }
            _ = signal::ctrl_c() => break,
        }
    }
    info!("Shutting down HUD session");
    Ok(())
}

async fn boot_engine(snapshot_path: &PathBuf, config: &HudConfig) -> Result<(AuditEngine, PageSnapshot)> {
    let page = PageSnapshot::load(snapshot_path)
        .await
        .context("Failed to load page snapshot")?;
    let paint = replay_paint_timeline(&page).await?;
    Ok((AuditEngine::new(config.audit.clone(), paint), page))
}

/// Feed the snapshot's recorded paint batches through the telemetry bus so
/// the observer sees them the way the host would deliver them.
async fn replay_paint_timeline(page: &PageSnapshot) -> Result<PaintSignal> {
    if page.paint_timeline.is_empty() {
        return Ok(PaintObserver::subscribe(None));
    }

    let telemetry = InMemoryTelemetry::new(16);
    let signal = PaintObserver::subscribe(Some(telemetry.as_ref()));
    for candidates in &page.paint_timeline {
        telemetry
            .publish(PaintBatch {
                candidates: candidates.clone(),
            })
            .await
            .context("Failed to replay paint telemetry")?;
    }
    // Let the observer task drain the buffered batches. The engine reads
    // whatever is latest at run time; this wait only keeps a one-shot run
    // from racing its own replay.
    for _ in 0..50 {
        if signal.latest().is_some() {
            break;
        }
        sleep(Duration::from_millis(5)).await;
    }
    sleep(Duration::from_millis(20)).await;
    Ok(signal)
}
