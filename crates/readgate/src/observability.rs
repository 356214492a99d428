//! Logging setup: human-readable stderr plus an optional JSONL file.

use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const LOG_PATH_ENV: &str = "READGATE_LOG_PATH";
const LOG_DIR_ENV: &str = "READGATE_LOG_DIR";
const LOG_FILE_NAME: &str = "readgate.jsonl";

/// Where, if anywhere, structured logs are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// JSONL log file. `None` keeps logging on stderr only.
    pub log_file: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Resolve the log file from the environment, falling back to the
    /// configured log directory.
    pub fn from_env_with_overrides(log_dir: Option<PathBuf>) -> Self {
        Self {
            log_file: resolve_log_file(
                std::env::var_os(LOG_PATH_ENV),
                std::env::var_os(LOG_DIR_ENV),
                log_dir,
            ),
        }
    }
}

/// `READGATE_LOG_PATH` wins, then `READGATE_LOG_DIR`, then the config.
fn resolve_log_file(
    path: Option<OsString>,
    dir: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    let non_empty = |value: OsString| (!value.is_empty()).then(|| PathBuf::from(value));
    path.and_then(non_empty)
        .or_else(|| dir.and_then(non_empty).map(|d| d.join(LOG_FILE_NAME)))
        .or_else(|| config_dir.map(|d| d.join(LOG_FILE_NAME)))
}

/// Console filter: `RUST_LOG` if set, otherwise derived from `-q` / `-v`.
pub fn env_filter(quiet: bool, verbose: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(console_level(quiet, verbose)))
}

const fn console_level(quiet: bool, verbose: u8) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must live until
/// the program exits.
pub fn init_observability(
    config: &ObservabilityConfig,
    console_filter: EnvFilter,
    file_level: &str,
) -> anyhow::Result<Option<WorkerGuard>> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_filter(console_filter);

    let (file, guard) = match config.log_file.as_deref() {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(EnvFilter::new(file_level));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .context("a global tracing subscriber is already installed")?;
    Ok(guard)
}

fn file_writer(
    path: &Path,
) -> anyhow::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .with_context(|| format!("log path has no file name: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    Ok(tracing_appender::non_blocking(
        tracing_appender::rolling::never(dir, name),
    ))
}
