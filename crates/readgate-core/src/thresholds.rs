//! Threshold evaluation.
//!
//! A document starts as [`Status::Pass`] and moves to [`Status::Fail`] on
//! the first violated threshold. Evaluation does not stop there: every
//! violation is collected so one run reports every problem.
//!
//! A threshold is enabled only when its limit is a positive, finite number.
//! Maximum thresholds fail when the metric is strictly greater than the
//! limit, so a value equal to the limit passes. The one minimum threshold,
//! [`ThresholdName::MinFleschReadingEase`], fails when the score is strictly
//! below the limit and is skipped for documents without prose.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::ThresholdConfig;
use crate::readability::Metrics;

/// Default maximum Flesch-Kincaid grade.
pub const DEFAULT_MAX_GRADE: f64 = 14.0;
/// Default maximum Automated Readability Index.
pub const DEFAULT_MAX_ARI: f64 = 14.0;
/// Default maximum line count.
pub const DEFAULT_MAX_LINES: f64 = 375.0;

/// Stable names of the thresholds, as reported in `violations`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum ThresholdName {
    /// Flesch-Kincaid grade ceiling.
    MaxFleschKincaidGrade,
    /// Automated Readability Index ceiling.
    #[serde(rename = "MaxARI")]
    MaxAri,
    /// Coleman-Liau ceiling.
    MaxColemanLiau,
    /// Gunning Fog ceiling.
    MaxGunningFog,
    /// SMOG ceiling.
    #[serde(rename = "MaxSMOG")]
    MaxSmog,
    /// Raw line count ceiling.
    MaxLines,
    /// Flesch Reading Ease floor.
    MinFleschReadingEase,
}

impl ThresholdName {
    /// Every threshold, in evaluation and reporting order.
    pub const ALL: [Self; 7] = [
        Self::MaxFleschKincaidGrade,
        Self::MaxAri,
        Self::MaxColemanLiau,
        Self::MaxGunningFog,
        Self::MaxSmog,
        Self::MaxLines,
        Self::MinFleschReadingEase,
    ];

    /// The name as it appears in reports.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MaxFleschKincaidGrade => "MaxFleschKincaidGrade",
            Self::MaxAri => "MaxARI",
            Self::MaxColemanLiau => "MaxColemanLiau",
            Self::MaxGunningFog => "MaxGunningFog",
            Self::MaxSmog => "MaxSMOG",
            Self::MaxLines => "MaxLines",
            Self::MinFleschReadingEase => "MinFleschReadingEase",
        }
    }

    /// The matching key in configuration files.
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::MaxFleschKincaidGrade => "max_flesch_kincaid_grade",
            Self::MaxAri => "max_ari",
            Self::MaxColemanLiau => "max_coleman_liau",
            Self::MaxGunningFog => "max_gunning_fog",
            Self::MaxSmog => "max_smog",
            Self::MaxLines => "max_lines",
            Self::MinFleschReadingEase => "min_flesch_reading_ease",
        }
    }

    /// Short human description of a violation.
    pub const fn issue(self) -> &'static str {
        match self {
            Self::MaxFleschKincaidGrade => "Grade level too high",
            Self::MaxAri => "ARI too high",
            Self::MaxColemanLiau => "Coleman-Liau too high",
            Self::MaxGunningFog => "Gunning Fog too high",
            Self::MaxSmog => "SMOG too high",
            Self::MaxLines => "Too many lines",
            Self::MinFleschReadingEase => "Reading ease too low",
        }
    }

    /// `true` for floors, `false` for ceilings.
    pub const fn is_minimum(self) -> bool {
        matches!(self, Self::MinFleschReadingEase)
    }

    /// The metric this threshold limits.
    pub fn value(self, metrics: &Metrics) -> f64 {
        let r = &metrics.readability;
        match self {
            Self::MaxFleschKincaidGrade => r.flesch_kincaid_grade,
            Self::MaxAri => r.ari,
            Self::MaxColemanLiau => r.coleman_liau,
            Self::MaxGunningFog => r.gunning_fog,
            Self::MaxSmog => r.smog,
            Self::MaxLines => metrics.structure.lines as f64,
            Self::MinFleschReadingEase => r.flesch_reading_ease,
        }
    }
}

impl fmt::Display for ThresholdName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configured limit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Threshold {
    /// The limit value.
    pub limit: f64,
    /// Whether the limit is checked at all.
    pub enabled: bool,
}

impl Threshold {
    /// A threshold enabled iff `limit` is positive and finite.
    pub fn from_limit(limit: f64) -> Self {
        Self {
            limit,
            enabled: limit.is_finite() && limit > 0.0,
        }
    }

    /// A threshold that never fails.
    pub const fn disabled() -> Self {
        Self {
            limit: 0.0,
            enabled: false,
        }
    }
}

/// The full set of limits for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    /// Maximum Flesch-Kincaid grade.
    pub max_flesch_kincaid_grade: Threshold,
    /// Maximum Automated Readability Index.
    pub max_ari: Threshold,
    /// Maximum Coleman-Liau index.
    pub max_coleman_liau: Threshold,
    /// Maximum Gunning Fog index.
    pub max_gunning_fog: Threshold,
    /// Maximum SMOG grade.
    pub max_smog: Threshold,
    /// Maximum raw line count.
    pub max_lines: Threshold,
    /// Minimum Flesch Reading Ease.
    pub min_flesch_reading_ease: Threshold,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_flesch_kincaid_grade: Threshold::from_limit(DEFAULT_MAX_GRADE),
            max_ari: Threshold::from_limit(DEFAULT_MAX_ARI),
            max_coleman_liau: Threshold::disabled(),
            max_gunning_fog: Threshold::disabled(),
            max_smog: Threshold::disabled(),
            max_lines: Threshold::from_limit(DEFAULT_MAX_LINES),
            min_flesch_reading_ease: Threshold::disabled(),
        }
    }
}

impl Thresholds {
    /// Defaults with the configured values applied on top.
    pub fn from_config(config: &ThresholdConfig) -> Self {
        Self::default().with_overrides(config)
    }

    /// Apply every value present in `overrides`.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &ThresholdConfig) -> Self {
        for name in ThresholdName::ALL {
            if let Some(limit) = overrides.get(name) {
                self.set(name, limit);
            }
        }
        self
    }

    /// Look up one threshold.
    pub const fn get(&self, name: ThresholdName) -> Threshold {
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

    /// Set a limit. Zero or negative values disable the threshold.
    pub fn set(&mut self, name: ThresholdName, limit: f64) {
        if limit < 0.0 {
            tracing::warn!(threshold = %name, limit, "negative threshold treated as disabled");
        }
        let slot = match name {
            ThresholdName::MaxFleschKincaidGrade => &mut self.max_flesch_kincaid_grade,
            ThresholdName::MaxAri => &mut self.max_ari,
            ThresholdName::MaxColemanLiau => &mut self.max_coleman_liau,
            ThresholdName::MaxGunningFog => &mut self.max_gunning_fog,
            ThresholdName::MaxSmog => &mut self.max_smog,
            ThresholdName::MaxLines => &mut self.max_lines,
            ThresholdName::MinFleschReadingEase => &mut self.min_flesch_reading_ease,
        };
        *slot = Threshold::from_limit(limit);
    }

    /// Iterate over all thresholds in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (ThresholdName, Threshold)> + '_ {
        ThresholdName::ALL.into_iter().map(|name| (name, self.get(name)))
    }
}

/// Pass/fail outcome for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// No enabled threshold was violated.
    #[default]
    Pass,
    /// At least one enabled threshold was violated.
    Fail,
}

impl Status {
    /// Returns the status as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of checking one document against its thresholds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Final status.
    pub status: Status,
    /// Every violated threshold, in [`ThresholdName::ALL`] order.
    pub violations: Vec<ThresholdName>,
}

/// Check `metrics` against `thresholds`.
pub fn evaluate(metrics: &Metrics, thresholds: &Thresholds) -> Evaluation {
    let mut evaluation = Evaluation::default();

    for (name, threshold) in thresholds.iter() {
        if !threshold.enabled {
            continue;
        }
        let value = name.value(metrics);
        let violated = if name.is_minimum() {
            metrics.has_prose() && value < threshold.limit
        } else {
            value > threshold.limit
        };
        if violated {
            tracing::debug!(threshold = %name, value, limit = threshold.limit, "threshold violated");
            evaluation.status = Status::Fail;
            evaluation.violations.push(name);
        }
    }

    evaluation
}
