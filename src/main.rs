//! refetch entry point.
//!
//! Wires the download queue and worker, the scheduler service, and the HTTP
//! API together, then serves until a shutdown signal arrives.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use refetch_api::{ApiConfig, ApiServer, AppState};
use refetch_downloader::{DownloadQueue, DownloadWorker};
use refetch_scheduler::{SchedulerConfig, SchedulerService};

/// refetch CLI.
#[derive(Parser)]
#[command(name = "refetch")]
#[command(about = "Recurring download scheduler with a cron-driven HTTP API")]
#[command(version)]
struct Cli {
    /// Server host
    #[arg(long, default_value = "127.0.0.1", env = "REFETCH_HOST")]
    host: String,

    /// Server port
    #[arg(long, default_value_t = 8081, env = "REFETCH_PORT")]
    port: u16,

    /// Directory downloads are written into (default: the platform
    /// download directory, else ./downloads)
    #[arg(long, env = "REFETCH_DOWNLOAD_DIR")]
    download_dir: Option<PathBuf>,

    /// Download queue capacity
    #[arg(long, default_value_t = 64)]
    queue_capacity: usize,

    /// Seconds a single dispatch may take before it counts as a failed fire
    #[arg(long, default_value_t = 30)]
    dispatch_timeout: u64,

    /// Directory for rolling log files (console-only when unset)
    #[arg(long, env = "REFETCH_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

/// Initialize tracing with console output and, when a log directory is
/// given, a daily-rotated file layer.
fn init_tracing(log_dir: Option<&PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("refetch")
                .filename_suffix("log")
                .max_log_files(30)
                .build(dir)?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Keep the writer guard alive for the program duration.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(file_layer)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_dir.as_ref())?;

    info!("Starting refetch v{}", env!("CARGO_PKG_VERSION"));

    let download_dir = cli
        .download_dir
        .or_else(dirs::download_dir)
        .unwrap_or_else(|| PathBuf::from("downloads"));
    info!("Download directory: {}", download_dir.display());

    // Download pipeline: bounded queue feeding one worker task.
    let (queue, rx) = DownloadQueue::new(cli.queue_capacity);
    let worker_token = CancellationToken::new();
    let worker_task = tokio::spawn(DownloadWorker::new(&download_dir).run(rx, worker_token.clone()));

    // The queue is the scheduler's action sink.
    let scheduler = Arc::new(SchedulerService::new(
        Arc::new(queue),
        SchedulerConfig {
            dispatch_timeout_secs: cli.dispatch_timeout,
        },
    ));

    let state = Arc::new(AppState::new(scheduler.clone()));
    let server = ApiServer::new(ApiConfig::new(cli.host, cli.port), state);

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutdown signal received"),
    }

    scheduler.shutdown().await;
    worker_token.cancel();
    let _ = worker_task.await;

    info!("refetch stopped");
    Ok(())
}
