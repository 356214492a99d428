//! Result aggregation.
//!
//! Collects per-document outcomes into a [`Report`] without reordering
//! them, and derives the totals and distributions used by renderers.

use std::fmt;

use camino::Utf8PathBuf;
use schemars::JsonSchema;
use serde::Serialize;

use crate::error::InputError;
use crate::readability::Metrics;
use crate::thresholds::{Status, ThresholdName};

/// Analysis outcome for one document.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct DocumentResult {
    /// Path of the analyzed document.
    #[schemars(with = "String")]
    pub path: Utf8PathBuf,
    /// Every computed metric.
    pub metrics: Metrics,
    /// Pass or fail.
    pub status: Status,
    /// Names of the violated thresholds.
    pub violations: Vec<ThresholdName>,
}

impl DocumentResult {
    /// Returns `true` if the document failed any threshold.
    pub fn failed(&self) -> bool {
        self.status == Status::Fail
    }

    /// Human descriptions of the violations, in order.
    pub fn issues(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.violations.iter().map(|v| v.issue())
    }
}

/// A document that could not be analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct FileError {
    /// Path of the document.
    #[schemars(with = "String")]
    pub path: Utf8PathBuf,
    /// What went wrong.
    pub error: String,
}

impl From<InputError> for FileError {
    fn from(err: InputError) -> Self {
        Self {
            path: err.path().to_path_buf(),
            error: err.to_string(),
        }
    }
}

/// Totals over a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, JsonSchema)]
pub struct Summary {
    /// Documents analyzed, errors excluded.
    pub files: usize,
    /// Documents that passed.
    pub passed: usize,
    /// Documents that failed at least one threshold.
    pub failed: usize,
    /// Documents that could not be read.
    pub errored: usize,
    /// Words across all analyzed documents.
    pub total_words: usize,
    /// Raw lines across all analyzed documents.
    pub total_lines: usize,
    /// Reading time across all analyzed documents, in minutes.
    pub reading_time_minutes: usize,
    /// Mean Flesch-Kincaid grade over documents with prose.
    pub average_grade: f64,
}

/// Flesch Reading Ease bands, easiest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum EaseBand {
    /// 90 and above.
    VeryEasy,
    /// 80 to 89.
    Easy,
    /// 70 to 79.
    FairlyEasy,
    /// 60 to 69.
    Standard,
    /// 50 to 59.
    FairlyDifficult,
    /// 30 to 49.
    Difficult,
    /// Below 30.
    VeryDifficult,
}

impl EaseBand {
    /// Every band, easiest first.
    pub const ALL: [Self; 7] = [
        Self::VeryEasy,
        Self::Easy,
        Self::FairlyEasy,
        Self::Standard,
        Self::FairlyDifficult,
        Self::Difficult,
        Self::VeryDifficult,
    ];

    /// The band a Flesch Reading Ease score falls into.
    pub fn of(score: f64) -> Self {
        match score {
            s if s >= 90.0 => Self::VeryEasy,
            s if s >= 80.0 => Self::Easy,
            s if s >= 70.0 => Self::FairlyEasy,
            s if s >= 60.0 => Self::Standard,
            s if s >= 50.0 => Self::FairlyDifficult,
            s if s >= 30.0 => Self::Difficult,
            _ => Self::VeryDifficult,
        }
    }

    /// Display label with the score range.
    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryEasy => "Very Easy (90+)",
            Self::Easy => "Easy (80-89)",
            Self::FairlyEasy => "Fairly Easy (70-79)",
            Self::Standard => "Standard (60-69)",
            Self::FairlyDifficult => "Fairly Difficult (50-59)",
            Self::Difficult => "Difficult (30-49)",
            Self::VeryDifficult => "Very Difficult (<30)",
        }
    }
}

impl fmt::Display for EaseBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything one run produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
pub struct Report {
    /// Analyzed documents, in input order.
    pub results: Vec<DocumentResult>,
    /// Documents that could not be read, in input order.
    pub errors: Vec<FileError>,
    /// Totals.
    pub summary: Summary,
}

impl Report {
    /// Build a report from per-document outcomes, keeping their order.
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = Result<DocumentResult, InputError>>,
    {
        let mut results = Vec::new();
        let mut errors = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(result) => results.push(result),
                Err(err) => {
                    tracing::warn!(error = %err, "document skipped");
                    errors.push(FileError::from(err));
                }
            }
        }
        Self::new(results, errors)
    }

    /// Build a report and compute its summary.
    pub fn new(results: Vec<DocumentResult>, errors: Vec<FileError>) -> Self {
        let summary = summarize(&results, errors.len());
        Self {
            results,
            errors,
            summary,
        }
    }

    /// Results that failed a threshold.
    pub fn failures(&self) -> impl Iterator<Item = &DocumentResult> {
        self.results.iter().filter(|r| r.failed())
    }

    /// `true` when nothing failed and every document could be read.
    pub fn check_passed(&self) -> bool {
        self.summary.failed == 0 && self.errors.is_empty()
    }

    /// Results ordered for human review: failures first, then by path.
    pub fn sorted_for_review(&self) -> Vec<&DocumentResult> {
        let mut sorted: Vec<&DocumentResult> = self.results.iter().collect();
        sorted.sort_by(|a, b| b.failed().cmp(&a.failed()).then_with(|| a.path.cmp(&b.path)));
        sorted
    }

    /// Document counts per reading-ease band, easiest first.
    ///
    /// Documents without prose have no meaningful score and are left out.
    pub fn ease_distribution(&self) -> [(EaseBand, usize); 7] {
        let mut counts = EaseBand::ALL.map(|band| (band, 0));
        for result in self.results.iter().filter(|r| r.metrics.has_prose()) {
            let band = EaseBand::of(result.metrics.readability.flesch_reading_ease);
            if let Some((_, count)) = counts.iter_mut().find(|(b, _)| *b == band) {
                *count += 1;
            }
        }
        counts
    }
}

fn summarize(results: &[DocumentResult], errored: usize) -> Summary {
    let mut summary = Summary {
        files: results.len(),
        errored,
        ..Summary::default()
    };
    let mut grade_total = 0.0;
    let mut with_prose = 0usize;

    for result in results {
        if result.failed() {
            summary.failed += 1;
        } else {
            summary.passed += 1;
        }
        let structure = &result.metrics.structure;
        summary.total_words += structure.words;
        summary.total_lines += structure.lines;
        summary.reading_time_minutes += structure.reading_time_minutes;
        if result.metrics.has_prose() {
            grade_total += result.metrics.readability.flesch_kincaid_grade;
            with_prose += 1;
        }
    }

    if with_prose > 0 {
        summary.average_grade = grade_total / with_prose as f64;
    }
    summary
}
