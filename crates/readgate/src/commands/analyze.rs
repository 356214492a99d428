//! Analyze command: readability and structure gates over Markdown files.

use std::sync::Arc;

use anyhow::{Context, bail};
use camino::Utf8PathBuf;
use clap::{Args, ValueEnum};
use tracing::{debug, instrument};

use readgate_core::config::Config;
use readgate_core::markdown::TablePolicy;
use readgate_core::thresholds::ThresholdName;
use readgate_core::{Analyzer, Discovery, Report};

use crate::output;
use crate::progress::Progress;

/// Human-readable output layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table.
    #[default]
    Table,
    /// GitHub-flavored Markdown report.
    Markdown,
    /// Aggregate Markdown summary.
    Summary,
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// File or directory to analyze.
    #[arg(default_value = ".")]
    pub path: Utf8PathBuf,

    /// Exit with an error if any document fails or cannot be read.
    #[arg(long)]
    pub check: bool,

    /// Maximum Flesch-Kincaid grade level (0 disables).
    #[arg(long)]
    pub max_grade: Option<f64>,

    /// Maximum Automated Readability Index (0 disables).
    #[arg(long)]
    pub max_ari: Option<f64>,

    /// Maximum lines per file (0 disables).
    #[arg(long)]
    pub max_lines: Option<u64>,

    /// Output layout (ignored with --json).
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Show every metric in the table.
    #[arg(long)]
    pub all_metrics: bool,

    /// How Markdown tables count toward prose.
    #[arg(long, value_enum)]
    pub tables: Option<TablePolicy>,
}

impl AnalyzeArgs {
    /// Threshold flags that were given, by name.
    fn threshold_flags(&self) -> Vec<(ThresholdName, f64)> {
        [
            (ThresholdName::MaxFleschKincaidGrade, self.max_grade),
            (ThresholdName::MaxAri, self.max_ari),
            (ThresholdName::MaxLines, self.max_lines.map(|n| n as f64)),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }

    /// Apply command-line overrides to a copy of the loaded config.
    ///
    /// A flag beats both the global threshold and any path rule for it.
    fn effective_config(&self, config: &Config) -> Config {
        let mut config = config.clone();
        for (name, value) in self.threshold_flags() {
            config.thresholds.set(name, Some(value));
            for rule in config.rules.iter_mut().flatten() {
                rule.thresholds.set(name, None);
            }
        }
        if let Some(tables) = self.tables {
            config.tables = tables;
        }
        config
    }
}

/// Analyze every Markdown document under a path.
#[instrument(name = "cmd_analyze", skip_all, fields(path = %args.path))]
pub async fn cmd_analyze(args: AnalyzeArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!(path = %args.path, check = args.check, format = ?args.format, "executing analyze command");

    let config = args.effective_config(config);
    let discovery = Discovery::new(&config.exclude_patterns())
        .context("invalid exclude patterns in configuration")?;
    let files = discovery
        .discover(&args.path)
        .with_context(|| format!("failed to list documents in {}", args.path))?;

    if files.is_empty() {
        eprintln!("No markdown files found in {}", args.path);
        if global_json {
            println!("{}", serde_json::to_string_pretty(&Report::default())?);
        }
        return Ok(());
    }

    let analyzer = Arc::new(Analyzer::from_config(&config));
    let progress = Progress::new(!global_json && args.format == OutputFormat::Table, files.len());
    let report = analyzer
        .analyze_paths_with(files, |done, _total| progress.update(done))
        .await;
    progress.finish();

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let rendered = match args.format {
            OutputFormat::Table => output::table(&report, args.all_metrics),
            OutputFormat::Markdown => output::markdown(&report),
            OutputFormat::Summary => output::summary(&report),
        };
        print!("{rendered}");
    }

    if args.check && !report.check_passed() {
        let s = &report.summary;
        if s.failed > 0 {
            bail!("{} file(s) failed readability checks", s.failed);
        }
        bail!("{} file(s) could not be analyzed", s.errored);
    }

    Ok(())
}
