//! ping-watchdog - heartbeat liveness watchdog
//!
//! Camera reporters POST to `/ping`; if no ping arrives within
//! `PING_TIMEOUT` seconds an alert is sent to Telegram, at most once per
//! debounce window.
//!
//! # Usage
//!
//! ```bash
//! PORT=8000 LAST_PING_FILE=./data/last_ping.txt LAST_ALERT_FILE=./data/last_alert.txt \
//! PING_TIMEOUT=300 PING_INTERVAL=60 ALERT_TIMEOUT=3600 \
//! TELEGRAM_TOKEN=... TELEGRAM_CHAT_ID=... cargo run --release
//! ```
//!
//! # Environment Variables
//!
//! - `LAST_PING_FILE`, `LAST_ALERT_FILE`: durable record paths (required)
//! - `PING_TIMEOUT`, `PING_INTERVAL`, `ALERT_TIMEOUT`: seconds (required)
//! - `TELEGRAM_TOKEN`, `TELEGRAM_CHAT_ID`: bot credentials (alerts are not delivered without them)
//! - `ALERT_DEBOUNCE_WINDOW`: `ping_timeout` (default) or `alert_timeout`
//! - `PORT`, `BIND_HOST`: listen address
//! - `RUST_LOG`: Logging level (default: info)

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use ping_watchdog::config::{defaults, WatchdogConfig};
use ping_watchdog::liveness::SystemClock;
use ping_watchdog::monitor::StalenessMonitor;
use ping_watchdog::notify::TelegramNotifier;
use ping_watchdog::service::WatchdogService;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "ping-watchdog")]
#[command(about = "Heartbeat watchdog with Telegram alerting")]
#[command(version)]
struct CliArgs {
    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    port: u16,

    /// Host/interface to bind
    #[arg(long, env = "BIND_HOST", default_value = defaults::DEFAULT_BIND_HOST)]
    host: String,
}

// ============================================================================
// Task Names for Supervisor Logging
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum TaskName {
    HttpServer,
    StalenessMonitor,
}

impl std::fmt::Display for TaskName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskName::HttpServer => write!(f, "HttpServer"),
            TaskName::StalenessMonitor => write!(f, "StalenessMonitor"),
        }
    }
}

/// Spawn the HTTP server task into the JoinSet.
fn spawn_http_server(
    task_set: &mut JoinSet<Result<TaskName>>,
    listener: tokio::net::TcpListener,
    app: Router,
    cancel_token: CancellationToken,
) {
    task_set.spawn(async move {
        info!("[HttpServer] Task starting");

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                cancel_token.cancelled().await;
                info!("[HttpServer] Received shutdown signal");
            })
            .await;

        match result {
            Ok(()) => {
                info!("[HttpServer] Graceful shutdown complete");
                Ok(TaskName::HttpServer)
            }
            Err(e) => {
                error!("[HttpServer] Server error: {}", e);
                Err(anyhow::anyhow!("HTTP server error: {}", e))
            }
        }
    });
}

/// Spawn the staleness monitor task into the JoinSet.
fn spawn_monitor(
    task_set: &mut JoinSet<Result<TaskName>>,
    monitor: StalenessMonitor,
    cancel_token: CancellationToken,
) {
    task_set.spawn(async move {
        info!("[StalenessMonitor] Task starting");
        let ticks = monitor.run(cancel_token).await;
        info!("[StalenessMonitor] Stopped after {} ticks", ticks);
        Ok(TaskName::StalenessMonitor)
    });
}

/// Run the supervisor loop: monitor tasks, cancel on failure.
async fn run_supervisor(
    task_set: &mut JoinSet<Result<TaskName>>,
    cancel_token: CancellationToken,
) -> Result<()> {
    info!("Supervisor: all tasks spawned, monitoring...");

    loop {
        tokio::select! {
            () = cancel_token.cancelled() => {
                info!("Supervisor: shutdown signal received");
                break;
            }
            result = task_set.join_next() => {
                match result {
                    Some(Ok(Ok(task_name))) => {
                        info!("Supervisor: task {} completed normally", task_name);
                    }
                    Some(Ok(Err(e))) => {
                        error!("Supervisor: task failed with error: {}", e);
                        cancel_token.cancel();
                        return Err(e);
                    }
                    Some(Err(e)) => {
                        error!("Supervisor: task panicked: {}", e);
                        cancel_token.cancel();
                        return Err(anyhow::anyhow!("Task panicked: {}", e));
                    }
                    None => {
                        info!("Supervisor: all tasks completed");
                        break;
                    }
                }
            }
        }
    }

    // Let the server drain and the monitor observe cancellation.
    while let Some(result) = task_set.join_next().await {
        match result {
            Ok(Ok(task_name)) => info!("Supervisor: task {} stopped", task_name),
            Ok(Err(e)) => error!("Supervisor: task failed during shutdown: {}", e),
            Err(e) => error!("Supervisor: task panicked during shutdown: {}", e),
        }
    }

    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let config = WatchdogConfig::from_env().context("Invalid watchdog configuration")?;

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  ping-watchdog - heartbeat liveness watchdog");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  Last ping file:  {}", config.last_ping_file.display());
    info!("  Last alert file: {}", config.last_alert_file.display());
    info!(
        "  Timeout: {}s | Interval: {}s | Alert timeout: {}s",
        config.ping_timeout_secs, config.ping_interval_secs, config.alert_timeout_secs
    );
    info!("  Telegram: {:?}", config.telegram);

    let notifier = TelegramNotifier::new(&config.telegram)
        .context("Failed to build Telegram HTTP client")?;
    let service = WatchdogService::init(&config, Arc::new(SystemClock), Arc::new(notifier)).await;

    let server_addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", server_addr))?;
    info!("✓ HTTP server listening on {}", server_addr);

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    let mut task_set: JoinSet<Result<TaskName>> = JoinSet::new();
    spawn_http_server(&mut task_set, listener, service.app, cancel_token.clone());
    spawn_monitor(&mut task_set, service.monitor, cancel_token.clone());

    run_supervisor(&mut task_set, cancel_token).await?;

    info!("✓ ping-watchdog shutdown complete");
    Ok(())
}
