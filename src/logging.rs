use std::fs;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::paths::log_dir_path;

fn env_filter(verbose: bool) -> EnvFilter {
    let default = if verbose { "aiopl=debug" } else { "aiopl=info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Plain stderr logging for one-shot commands.
pub fn init_stderr(verbose: bool) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(env_filter(verbose))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install log subscriber")
}

/// Daily rotating log file, so the alternate screen is never written to.
/// Keep the guard alive for the whole session to flush buffered lines.
pub fn init_file(verbose: bool) -> Result<WorkerGuard> {
    let log_dir = log_dir_path()?;
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "aiopl.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(env_filter(verbose))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install log subscriber")?;
    Ok(guard)
}
