//! The per-document pipeline and the batch fan-out.
//!
//! Each document goes through structure scan, normalization, segmentation,
//! metric computation and threshold evaluation. Documents share nothing but
//! the read-only [`Analyzer`], so a batch runs one blocking task per file.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use tokio::task::JoinSet;

use crate::config::Config;
use crate::document::Document;
use crate::error::{InputError, InputResult};
use crate::markdown::{NormalizeOptions, normalize};
use crate::readability;
use crate::report::{DocumentResult, Report};
use crate::rules::RuleSet;
use crate::structure;
use crate::text::segment;
use crate::thresholds::{Thresholds, evaluate};

/// Immutable analysis settings shared by every document in a run.
#[derive(Debug, Clone)]
pub struct Analyzer {
    thresholds: Thresholds,
    rules: RuleSet,
    options: NormalizeOptions,
    max_input_bytes: Option<usize>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}

impl Analyzer {
    /// Analyzer with the given thresholds, default options, no rules and
    /// the default input limit.
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            rules: RuleSet::default(),
            options: NormalizeOptions::default(),
            max_input_bytes: Some(crate::DEFAULT_MAX_INPUT_BYTES),
        }
    }

    /// Build everything a run needs from a loaded [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self::new(Thresholds::from_config(&config.thresholds))
            .with_rules(RuleSet::compile(config.rules.as_deref().unwrap_or_default()))
            .with_options(config.normalize_options())
            .with_input_limit(config.input_limit())
    }

    /// Replace the path rules.
    #[must_use]
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Replace the normalization options.
    #[must_use]
    pub const fn with_options(mut self, options: NormalizeOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the input size limit. `None` disables it.
    #[must_use]
    pub const fn with_input_limit(mut self, max_input_bytes: Option<usize>) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }

    /// The global thresholds.
    pub const fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Thresholds for one path: the global ones with matching rules applied.
    pub fn thresholds_for(&self, path: &Utf8Path) -> Thresholds {
        if self.rules.is_empty() {
            return self.thresholds;
        }
        self.thresholds
            .with_overrides(&self.rules.resolve(path.as_str()))
    }

    /// Run the full pipeline on one document.
    ///
    /// Never fails: malformed Markdown degrades to best-effort prose.
    #[tracing::instrument(skip_all, fields(path = %doc.path()))]
    pub fn analyze(&self, doc: &Document) -> DocumentResult {
        let structure = structure::scan(doc.source());
        let prose = normalize(doc.source(), &self.options);
        let counts = segment(prose.as_str());
        let metrics = readability::compute(&counts, &structure);
        let evaluation = evaluate(&metrics, &self.thresholds_for(doc.path()));

        tracing::debug!(
            status = %evaluation.status,
            violations = evaluation.violations.len(),
            "document analyzed"
        );

        DocumentResult {
            path: doc.path().to_path_buf(),
            metrics,
            status: evaluation.status,
            violations: evaluation.violations,
        }
    }

    /// Read and analyze one file.
    pub fn analyze_file(&self, path: &Utf8Path) -> InputResult<DocumentResult> {
        let doc = Document::read(path, self.max_input_bytes)?;
        Ok(self.analyze(&doc))
    }

    /// Analyze many files in parallel.
    pub async fn analyze_paths(self: Arc<Self>, paths: Vec<Utf8PathBuf>) -> Report {
        self.analyze_paths_with(paths, |_, _| {}).await
    }

    /// Analyze many files in parallel, calling `progress(done, total)` as
    /// each one finishes.
    ///
    /// Results come back in the order of `paths`, whatever order the tasks
    /// finish in. A task that panics is reported as an error for its file.
    #[tracing::instrument(skip_all, fields(files = paths.len()))]
    pub async fn analyze_paths_with<F>(self: Arc<Self>, paths: Vec<Utf8PathBuf>, mut progress: F) -> Report
    where
        F: FnMut(usize, usize),
    {
        let total = paths.len();
        let mut slots: Vec<Option<InputResult<DocumentResult>>> =
            std::iter::repeat_with(|| None).take(total).collect();

        let mut tasks = JoinSet::new();
        for (index, path) in paths.iter().cloned().enumerate() {
            let analyzer = Arc::clone(&self);
            tasks.spawn_blocking(move || (index, analyzer.analyze_file(&path)));
        }

        let mut done = 0;
        while let Some(joined) = tasks.join_next().await {
            done += 1;
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(e) => tracing::error!(error = %e, "analysis task failed"),
            }
            progress(done, total);
        }

        let outcomes = slots.into_iter().zip(paths).map(|(slot, path)| {
            slot.unwrap_or_else(|| {
                Err(InputError::Task {
                    path,
                    reason: "task panicked or was cancelled".to_string(),
                })
            })
        });
        let report = Report::from_outcomes(outcomes);
        tracing::info!(
            files = report.summary.files,
            failed = report.summary.failed,
            errored = report.summary.errored,
            "batch complete"
        );
        report
    }
}
