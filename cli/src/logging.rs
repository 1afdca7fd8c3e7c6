use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Initializes logging for the application.
///
/// Warnings and errors go to stderr so they do not mix with the review
/// prompt. Everything allowed by the filter is written as JSON to a daily
/// rotated file in the application data directory.
///
/// The default filter can be overridden with RUST_LOG:
/// - RUST_LOG=debug photo-cleaner
/// - RUST_LOG=service=trace,database=debug photo-cleaner
///
/// Returns a guard that must be kept alive for the duration of the program.
/// Dropping this guard will cause file logging to stop.
pub fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact()
        .with_filter(LevelFilter::WARN);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,service=debug,database=info"));

    let log_dir: Option<PathBuf> = match file_system::get_log_dir() {
        Ok(dir) => Some(dir),
        Err(e) => {
            eprintln!("Warning: Failed to create log directory: {}", e);
            eprintln!("Logs will only be written to console.");
            None
        }
    };

    let Some(log_dir) = log_dir else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .init();
        return None;
    };

    // File output (JSON for bug reports, daily rotation)
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "photo-cleaner.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    tracing::info!("Writing logs to {}", log_dir.display());
    Some(guard)
}
