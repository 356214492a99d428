//! Error types for readgate-core.

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while reading a single document.
///
/// These are recorded per file and never abort a batch.
#[derive(Error, Debug)]
pub enum InputError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The file that failed.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file exceeds the configured size limit.
    #[error("input too large: {path} is {size} bytes (limit: {limit} bytes)")]
    TooLarge {
        /// The oversized file.
        path: Utf8PathBuf,
        /// Actual size in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// The analysis task for this file panicked or was cancelled.
    #[error("analysis task for {path} did not complete: {reason}")]
    Task {
        /// The file whose task failed.
        path: Utf8PathBuf,
        /// Description from the join error.
        reason: String,
    },
}

impl InputError {
    /// The file this error is about.
    pub fn path(&self) -> &Utf8Path {
        match self {
            Self::Read { path, .. } | Self::TooLarge { path, .. } | Self::Task { path, .. } => path,
        }
    }
}

/// Result type alias using [`InputError`].
pub type InputResult<T> = Result<T, InputError>;

/// Errors that make the whole run impossible.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The target path does not exist or cannot be inspected.
    #[error("cannot access {path}: {source}")]
    Inaccessible {
        /// The requested target.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Directory traversal failed.
    #[error("failed to walk {path}: {source}")]
    Walk {
        /// The directory being walked.
        path: Utf8PathBuf,
        /// The walker error.
        source: ignore::Error,
    },

    /// An exclusion glob could not be compiled.
    #[error("invalid exclude pattern {pattern:?}: {source}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// The glob compilation error.
        source: globset::Error,
    },
}

/// Result type alias using [`DiscoveryError`].
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;
