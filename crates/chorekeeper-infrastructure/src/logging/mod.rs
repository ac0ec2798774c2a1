//! Logging bootstrap
//!
//! One-line JSON logs to a daily-rotated file; human-readable colored
//! output on stdout in debug builds. `log` macros from other crates are
//! bridged into `tracing` so everything lands in the same sinks.

use log::LevelFilter;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_log::LogTracer;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

static LOG_DIR: OnceLock<PathBuf> = OnceLock::new();
static LOGGER_READY: OnceLock<()> = OnceLock::new();
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize the logging system. Safe to call more than once; only the
/// first call has any effect.
pub fn init_logger(log_dir: PathBuf) -> anyhow::Result<()> {
    if LOGGER_READY.get().is_some() {
        return Ok(());
    }

    std::fs::create_dir_all(&log_dir)?;
    let _ = LOG_DIR.set(log_dir.clone());

    // Forward log-crate records to tracing
    let _ = LogTracer::builder()
        .with_max_level(LevelFilter::Trace)
        .init();

    let file_appender = rolling::daily(&log_dir, "chorekeeper.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = FILE_GUARD.set(guard);

    let json_layer = fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_current_span(false)
        .with_span_list(false)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_timer(fmt::time::ChronoLocal::new(
            "%Y-%m-%dT%H:%M:%S%.3f%:z".to_string(),
        ))
        .with_filter(env_filter());

    let subscriber = Registry::default().with(json_layer);

    if cfg!(debug_assertions) {
        let stdout_layer = fmt::layer()
            .with_ansi(true)
            .with_target(true)
            .with_filter(env_filter());
        tracing::subscriber::set_global_default(subscriber.with(stdout_layer))?;
    } else {
        tracing::subscriber::set_global_default(subscriber)?;
    }

    let _ = LOGGER_READY.set(());
    Ok(())
}

/// Directory log files are written to, once initialized
pub fn log_dir() -> Option<&'static PathBuf> {
    LOG_DIR.get()
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
