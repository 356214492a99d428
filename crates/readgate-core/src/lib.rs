//! Core library for readgate.
//!
//! Turns Markdown documents into readability and structure metrics and
//! checks them against configured thresholds.
//!
//! # Modules
//!
//! - [`markdown`] - Markdown to plain prose
//! - [`text`] - Sentence and word segmentation
//! - [`syllables`] - Syllable estimation
//! - [`structure`] - Line counts, headings, composition
//! - [`readability`] - Readability formulas
//! - [`thresholds`] - Pass/fail evaluation
//! - [`rules`] - Per-path threshold overrides
//! - [`analyzer`] - Per-document pipeline and parallel batches
//! - [`discovery`] - Finding Markdown files
//! - [`report`] - Aggregated results
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use readgate_core::{Analyzer, ConfigLoader, Document};
//!
//! let (config, _sources) = ConfigLoader::new()
//!     .with_user_config(true)
//!     .load()
//!     .expect("Failed to load configuration");
//!
//! let analyzer = Analyzer::from_config(&config);
//! let result = analyzer.analyze(&Document::new("README.md", "The cat sat on the mat."));
//! println!("{}: {}", result.path, result.status);
//! ```
#![deny(unsafe_code)]

pub mod analyzer;
pub mod config;
pub mod dictionaries;
pub mod discovery;
pub mod document;
pub mod error;
pub mod lines;
pub mod markdown;
pub mod readability;
pub mod report;
pub mod rules;
pub mod structure;
pub mod syllables;
pub mod text;
pub mod thresholds;

/// Default maximum input size: 5 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;

pub use analyzer::Analyzer;
pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use discovery::Discovery;
pub use document::Document;
pub use error::{ConfigError, ConfigResult, DiscoveryError, InputError};
pub use markdown::{NormalizeOptions, TablePolicy};
pub use readability::Metrics;
pub use report::{DocumentResult, Report};
pub use thresholds::{Status, ThresholdName, Thresholds};
