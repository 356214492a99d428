//! Path rule resolution.
//!
//! Matches file paths against configured glob rules and accumulates
//! threshold overrides. When multiple rules match, all contribute.
//! Conflicts (the same threshold set by several rules) are resolved by
//! specificity: the pattern with more literal (non-wildcard) path segments
//! wins. Ties go to the earlier rule.

use globset::{Glob, GlobMatcher};

use crate::config::{Rule, ThresholdConfig};
use crate::thresholds::ThresholdName;

/// Compiled rule set for efficient matching.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    compiled: Vec<CompiledRule>,
}

/// A single rule with pre-compiled glob matchers.
#[derive(Debug, Clone)]
struct CompiledRule {
    matchers: Vec<(GlobMatcher, usize)>, // (matcher, specificity)
    thresholds: ThresholdConfig,
}

/// Count literal (non-wildcard) path segments in a glob pattern.
///
/// `docs/decisions/*.md` → 2 (`docs`, `decisions`)
/// `docs/**/*.md` → 1 (`docs`)
/// `**/*.md` → 0
fn specificity(pattern: &str) -> usize {
    pattern
        .split('/')
        .filter(|seg| !seg.contains(['*', '?', '[', '{']))
        .count()
}

impl RuleSet {
    /// Compile a list of rules into a `RuleSet`.
    ///
    /// Invalid glob patterns are skipped with a tracing warning.
    pub fn compile(rules: &[Rule]) -> Self {
        let compiled = rules
            .iter()
            .filter_map(|rule| {
                let matchers: Vec<(GlobMatcher, usize)> = rule
                    .paths
                    .iter()
                    .filter_map(|pattern| match Glob::new(pattern) {
                        Ok(glob) => Some((glob.compile_matcher(), specificity(pattern))),
                        Err(e) => {
                            tracing::warn!(pattern, error = %e, "skipping invalid glob pattern");
                            None
                        }
                    })
                    .collect();
                (!matchers.is_empty()).then(|| CompiledRule {
                    matchers,
                    thresholds: rule.thresholds,
                })
            })
            .collect();
        Self { compiled }
    }

    /// Returns `true` if no usable rule was compiled.
    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    /// Resolve the threshold overrides that apply to a file path.
    ///
    /// A leading `./` is ignored so `docs/*.md` matches `./docs/guide.md`.
    pub fn resolve(&self, file_path: &str) -> ThresholdConfig {
        let file_path = file_path.strip_prefix("./").unwrap_or(file_path);
        let mut result = ThresholdConfig::default();
        let mut best: [Option<usize>; ThresholdName::ALL.len()] =
            [None; ThresholdName::ALL.len()];

        for rule in &self.compiled {
            let Some(score) = rule
                .matchers
                .iter()
                .filter(|(m, _)| m.is_match(file_path))
                .map(|(_, s)| *s)
                .max()
            else {
                continue;
            };

            for (slot, name) in best.iter_mut().zip(ThresholdName::ALL) {
                if let Some(value) = rule.thresholds.get(name)
                    && slot.is_none_or(|prev| score > prev)
                {
                    result.set(name, Some(value));
                    *slot = Some(score);
                }
            }
        }

        result
    }
}
