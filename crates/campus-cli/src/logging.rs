//! Tracing setup: stderr plus a daily rolling file under `<config>/logs/`.

use campus_infrastructure::PortalPaths;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const LOG_FILE_PREFIX: &str = "campus.log";

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Installs the global subscriber. Keep the returned guard alive until exit
/// or buffered file output is lost.
pub fn init(paths: &PortalPaths, default_level: &str, verbose: bool) -> Option<WorkerGuard> {
    let stderr_filter = if verbose {
        filter(default_level)
    } else {
        EnvFilter::new("warn")
    };
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(stderr_filter);

    let logs_dir = paths
        .logs_dir()
        .ok()
        .filter(|dir| std::fs::create_dir_all(dir).is_ok());

    match logs_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter(default_level));
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(file_layer)
                .init();
            tracing::debug!("[Cli] Logging to {}", dir.display());
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(stderr_layer).init();
            tracing::warn!("[Cli] Log directory unavailable, logging to stderr only");
            None
        }
    }
}
