//! Configuration loading and discovery.
//!
//! This module provides configuration file discovery by:
//! 1. Walking up from the current directory to find project config
//! 2. Loading user config from XDG config directory
//! 3. Merging with built-in defaults
//!
//! # Supported formats
//!
//! - TOML (`.toml`)
//! - YAML (`.yaml`, `.yml`)
//! - JSON (`.json`)
//!
//! # Config file locations (in order of precedence, highest first):
//! - `readgate.<ext>` in current directory or any parent
//! - `.readgate.<ext>` in current directory or any parent
//! - `~/.config/readgate/config.<ext>` (user config)
//!
//! When multiple files exist in the same directory, all are merged via figment.
//! Later extensions override earlier: toml < yaml < yml < json.
//!
//! Environment variables prefixed with `READGATE_` override every file.
//! Nested keys use a double underscore: `READGATE_THRESHOLDS__MAX_LINES=500`.
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use readgate_core::config::ConfigLoader;
//!
//! let cwd = std::env::current_dir().unwrap();
//! let cwd = Utf8PathBuf::try_from(cwd).expect("current directory is not valid UTF-8");
//! let (config, _sources) = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! println!("max lines: {:?}", config.thresholds.max_lines);
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::DEFAULT_MAX_INPUT_BYTES;
use crate::error::{ConfigError, ConfigResult};
use crate::markdown::{NormalizeOptions, TablePolicy};
use crate::thresholds::ThresholdName;

/// Files excluded from directory scans unless `exclude` is configured.
pub const DEFAULT_EXCLUDES: &[&str] = &["**/CHANGELOG.md", "**/CONTRIBUTING.md"];

/// Threshold overrides.
///
/// Every field is optional: an absent value keeps whatever the layer below
/// set. Zero or a negative number disables that threshold.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Maximum Flesch-Kincaid grade level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_flesch_kincaid_grade: Option<f64>,
    /// Maximum Automated Readability Index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ari: Option<f64>,
    /// Maximum Coleman-Liau index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_coleman_liau: Option<f64>,
    /// Maximum Gunning Fog index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_gunning_fog: Option<f64>,
    /// Maximum SMOG grade.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_smog: Option<f64>,
    /// Maximum raw line count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_lines: Option<f64>,
    /// Minimum Flesch Reading Ease.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_flesch_reading_ease: Option<f64>,
}

impl ThresholdConfig {
    /// The configured value for `name`, if any.
    pub const fn get(&self, name: ThresholdName) -> Option<f64> {
        match name {
            ThresholdName::MaxFleschKincaidGrade => self.max_flesch_kincaid_grade,
            ThresholdName::MaxAri => self.max_ari,
            ThresholdName::MaxColemanLiau => self.max_coleman_liau,
            ThresholdName::MaxGunningFog => self.max_gunning_fog,
            ThresholdName::MaxSmog => self.max_smog,
            ThresholdName::MaxLines => self.max_lines,
            ThresholdName::MinFleschReadingEase => self.min_flesch_reading_ease,
        }
    }

    /// Set or clear the value for `name`.
    pub fn set(&mut self, name: ThresholdName, value: Option<f64>) {
        let slot = match name {
            ThresholdName::MaxFleschKincaidGrade => &mut self.max_flesch_kincaid_grade,
            ThresholdName::MaxAri => &mut self.max_ari,
            ThresholdName::MaxColemanLiau => &mut self.max_coleman_liau,
            ThresholdName::MaxGunningFog => &mut self.max_gunning_fog,
            ThresholdName::MaxSmog => &mut self.max_smog,
            ThresholdName::MaxLines => &mut self.max_lines,
            ThresholdName::MinFleschReadingEase => &mut self.min_flesch_reading_ease,
        };
        *slot = value;
    }

    /// Returns `true` if no threshold is configured.
    pub fn is_empty(&self) -> bool {
        ThresholdName::ALL.iter().all(|&name| self.get(name).is_none())
    }
}

/// A path-based threshold rule.
///
/// Glob patterns in `paths` are relative to the analyzed root.
/// All matching rules accumulate; when two rules set the same threshold,
/// the more specific pattern wins.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Rule {
    /// Glob patterns to match file paths against.
    pub paths: Vec<String>,
    /// Thresholds for matched files.
    #[serde(default)]
    pub thresholds: ThresholdConfig,
}

/// The configuration for readgate.
///
/// Deserialized from config files found during discovery (TOML, YAML, or
/// JSON) and `READGATE_*` environment variables.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for the JSONL log file. No file log is written when unset.
    pub log_dir: Option<Utf8PathBuf>,
    /// Threshold overrides applied on top of the built-in defaults.
    pub thresholds: ThresholdConfig,
    /// How tables contribute to prose.
    pub tables: TablePolicy,
    /// Keep inline code spans that hold a single plain word.
    pub keep_word_like_code: bool,
    /// Glob patterns excluded from directory scans.
    ///
    /// Omit to use [`DEFAULT_EXCLUDES`]. An empty list excludes nothing.
    pub exclude: Option<Vec<String>>,
    /// Path-based threshold rules.
    pub rules: Option<Vec<Rule>>,
    /// Maximum input size in bytes (default: 5 MiB).
    ///
    /// Omit to use the default. Use `disable_input_limit` to remove the
    /// limit entirely.
    pub max_input_bytes: Option<usize>,
    /// Disable the input size limit entirely.
    ///
    /// When `true`, `max_input_bytes` is ignored and no size check is performed.
    pub disable_input_limit: bool,
}

impl Config {
    /// The effective input size limit, or `None` when disabled.
    pub fn input_limit(&self) -> Option<usize> {
        if self.disable_input_limit {
            None
        } else {
            Some(self.max_input_bytes.unwrap_or(DEFAULT_MAX_INPUT_BYTES))
        }
    }

    /// The effective exclude patterns.
    pub fn exclude_patterns(&self) -> Vec<String> {
        self.exclude.clone().unwrap_or_else(|| {
            DEFAULT_EXCLUDES
                .iter()
                .map(|pattern| (*pattern).to_string())
                .collect()
        })
    }

    /// Normalization options derived from this config.
    pub const fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            tables: self.tables,
            keep_word_like_code: self.keep_word_like_code,
        }
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Metadata about which configuration sources were loaded.
///
/// Returned alongside [`Config`] from [`ConfigLoader::load()`] so commands
/// can report the actual config files without re-discovering them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Project config files found by walking up, ordered low→high precedence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// User config file from XDG config directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Explicit config files loaded (e.g., from `--config` flag).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// Returns the highest-precedence config file that was loaded.
    ///
    /// Precedence: explicit files > project files > user file.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .map(Utf8PathBuf::as_path)
            .or_else(|| self.project_files.last().map(Utf8PathBuf::as_path))
            .or(self.user_file.as_deref())
    }
}

/// Supported configuration file extensions (in order of preference).
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Application name for XDG directory lookup and config file names.
const APP_NAME: &str = "readgate";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "READGATE_";

/// Builder for loading configuration from multiple sources.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Starting directory for project config search.
    project_search_root: Option<Utf8PathBuf>,
    /// Whether to include user config from XDG directory.
    include_user_config: bool,
    /// Stop searching when we hit a directory containing this file/dir.
    boundary_marker: Option<String>,
    /// Explicit config files to load (for testing or programmatic use).
    explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default settings.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Set the starting directory for project config search.
    ///
    /// The loader will walk up from this directory looking for config files.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set whether to include user config from `~/.config/readgate/`.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Set a boundary marker to stop directory traversal.
    ///
    /// When walking up directories, stop if we find a directory containing
    /// this file or directory name. Default is `.git`.
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.boundary_marker = Some(marker.into());
        self
    }

    /// Disable boundary marker (search all the way to filesystem root).
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary_marker = None;
        self
    }

    /// Add an explicit config file to load.
    ///
    /// Files are loaded in order, with later files taking precedence.
    /// Explicit files are loaded after discovered files.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration, merging all discovered sources.
    ///
    /// Precedence (highest to lowest):
    /// 1. `READGATE_*` environment variables
    /// 2. Explicit files (in order added via `with_file`)
    /// 3. Project config (closest to search root)
    /// 4. User config (`~/.config/readgate/config.<ext>`)
    /// 5. Default values
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        tracing::debug!("loading configuration");
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let mut sources = ConfigSources::default();

        if self.include_user_config
            && let Some(user_config) = self.find_user_config()
        {
            figment = Self::merge_file(figment, &user_config);
            sources.user_file = Some(user_config);
        }

        if let Some(ref root) = self.project_search_root {
            let project_configs = self.find_project_configs(root);
            for pc in &project_configs {
                figment = Self::merge_file(figment, pc);
            }
            sources.project_files = project_configs;
        }

        for file in &self.explicit_files {
            figment = Self::merge_file(figment, file);
        }
        sources.explicit_files = self.explicit_files;

        // READGATE_TABLES=exclude, READGATE_THRESHOLDS__MAX_ARI=12, etc.
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::info!(
            log_level = config.log_level.as_str(),
            tables = config.tables.as_str(),
            rules = config.rules.as_ref().map_or(0, Vec::len),
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Find project config files by walking up from the given directory.
    ///
    /// Returns all matching config files from the closest directory that has
    /// any match, dotfiles before regular files (low to high precedence).
    fn find_project_configs(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            let mut found: Vec<Utf8PathBuf> = CONFIG_EXTENSIONS
                .iter()
                .map(|ext| dir.join(format!(".{APP_NAME}.{ext}")))
                .chain(
                    CONFIG_EXTENSIONS
                        .iter()
                        .map(|ext| dir.join(format!("{APP_NAME}.{ext}"))),
                )
                .collect();
            found.retain(|candidate| candidate.is_file());

            if !found.is_empty() {
                return found;
            }

            // Checked after the config files so a config next to the marker is found.
            if let Some(ref marker) = self.boundary_marker
                && dir.join(marker).exists()
                && dir != start
            {
                break;
            }

            current = dir.parent().map(Utf8Path::to_path_buf);
        }

        Vec::new()
    }

    /// Find user config in XDG config directory.
    fn find_user_config(&self) -> Option<Utf8PathBuf> {
        let config_dir = user_config_dir()?;
        CONFIG_EXTENSIONS
            .iter()
            .map(|ext| config_dir.join(format!("config.{ext}")))
            .find(|path| path.is_file())
    }

    /// Merge a config file into the figment, detecting format from extension.
    fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
        match path.extension() {
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
            Some("json") => figment.merge(Json::file_exact(path.as_str())),
            _ => figment.merge(Toml::file_exact(path.as_str())),
        }
    }
}

/// Get the project directories for XDG-compliant path resolution.
///
/// Returns `None` if the home directory cannot be determined.
fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

/// Get the user config directory path.
///
/// Returns `~/.config/readgate/` on Linux, `~/Library/Application Support/readgate/`
/// on macOS, and equivalent on other platforms.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = project_dirs()?;
    Utf8PathBuf::from_path_buf(proj_dirs.config_dir().to_path_buf()).ok()
}
