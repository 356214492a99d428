//! Readability metrics.
//!
//! Every score is computed from one [`SegmentationCounts`] value, so the
//! formulas can never disagree about what a word or a sentence is.
//!
//! | Score | Formula |
//! |---|---|
//! | Flesch-Kincaid Grade | `0.39 * W/S + 11.8 * Y/W - 15.59` |
//! | Flesch Reading Ease | `206.835 - 1.015 * W/S - 84.6 * Y/W` |
//! | ARI | `4.71 * C/W + 0.5 * W/S - 21.43` |
//! | Coleman-Liau | `0.0588 * L - 0.296 * S100 - 15.8` |
//! | Gunning Fog | `0.4 * (W/S + 100 * P/W)` |
//! | SMOG | `1.043 * sqrt(P * 30 / S) + 3.1291` |
//!
//! W = words, S = sentences, Y = syllables, C = letters, P = words with 3+
//! syllables, L = letters per 100 words, S100 = sentences per 100 words.
//!
//! Grade levels below zero are clamped to 0. Reading ease is clamped to
//! `0..=100`. A document with no words scores 0 everywhere.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::structure::{Composition, HeadingCounts, Structure};
use crate::text::SegmentationCounts;

/// Words read per minute, for reading-time estimates of technical prose.
pub const WORDS_PER_MINUTE: usize = 200;

/// Readability scores for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReadabilityScores {
    /// Flesch-Kincaid Grade Level.
    pub flesch_kincaid_grade: f64,
    /// Flesch Reading Ease (0--100, higher is easier).
    pub flesch_reading_ease: f64,
    /// Automated Readability Index.
    pub ari: f64,
    /// Coleman-Liau Index.
    pub coleman_liau: f64,
    /// Gunning Fog Index.
    pub gunning_fog: f64,
    /// SMOG grade.
    pub smog: f64,
}

impl ReadabilityScores {
    /// Compute every score from one set of counts.
    pub fn from_counts(counts: &SegmentationCounts) -> Self {
        if !counts.has_prose() {
            return Self::default();
        }

        let words = counts.words as f64;
        let sentences = counts.sentences as f64;
        let syllables = counts.syllables as f64;
        let letters = counts.letters as f64;
        let polysyllables = counts.polysyllables as f64;

        let words_per_sentence = words / sentences;
        let syllables_per_word = syllables / words;
        let letters_per_100 = letters / words * 100.0;
        let sentences_per_100 = sentences / words * 100.0;

        let flesch_kincaid_grade =
            0.39f64.mul_add(words_per_sentence, 11.8 * syllables_per_word) - 15.59;
        let flesch_reading_ease =
            1.015f64.mul_add(-words_per_sentence, 84.6f64.mul_add(-syllables_per_word, 206.835));
        let ari = 4.71f64.mul_add(letters / words, 0.5 * words_per_sentence) - 21.43;
        let coleman_liau =
            0.0588f64.mul_add(letters_per_100, -0.296 * sentences_per_100) - 15.8;
        let gunning_fog = 0.4 * (words_per_sentence + 100.0 * polysyllables / words);
        let smog = if counts.polysyllables == 0 {
            0.0
        } else {
            1.043f64.mul_add((polysyllables * 30.0 / sentences).sqrt(), 3.1291)
        };

        Self {
            flesch_kincaid_grade: grade(flesch_kincaid_grade),
            flesch_reading_ease: flesch_reading_ease.clamp(0.0, 100.0),
            ari: grade(ari),
            coleman_liau: grade(coleman_liau),
            gunning_fog: grade(gunning_fog),
            smog: grade(smog),
        }
    }
}

/// Clamp a grade level at zero.
fn grade(value: f64) -> f64 {
    value.max(0.0)
}

/// Structural metrics for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StructureMetrics {
    /// Raw line count of the source document.
    pub lines: usize,
    /// Words in the normalized prose.
    pub words: usize,
    /// Sentences in the normalized prose.
    pub sentences: usize,
    /// Estimated syllables.
    pub syllables: usize,
    /// Letters inside counted words.
    pub characters: usize,
    /// Words with three or more syllables.
    pub polysyllables: usize,
    /// Estimated reading time in minutes.
    pub reading_time_minutes: usize,
    /// Heading histogram.
    pub headings: HeadingCounts,
}

/// All metrics for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Metrics {
    /// Readability scores.
    pub readability: ReadabilityScores,
    /// Counts and headings.
    pub structure: StructureMetrics,
    /// Line composition.
    pub composition: Composition,
}

impl Metrics {
    /// Returns `true` if the document had any analyzable words.
    pub const fn has_prose(&self) -> bool {
        self.structure.characters > 0
    }
}

/// Combine segmentation counts and structure into [`Metrics`].
#[tracing::instrument(skip_all, fields(words = counts.words, sentences = counts.sentences))]
pub fn compute(counts: &SegmentationCounts, structure: &Structure) -> Metrics {
    // Coerced counts only exist to keep the formulas finite.
    let reported = if counts.has_prose() {
        *counts
    } else {
        SegmentationCounts::default()
    };

    Metrics {
        readability: ReadabilityScores::from_counts(counts),
        structure: StructureMetrics {
            lines: structure.lines,
            words: reported.words,
            sentences: reported.sentences,
            syllables: reported.syllables,
            characters: reported.letters,
            polysyllables: reported.polysyllables,
            reading_time_minutes: reading_time(reported.words),
            headings: structure.headings,
        },
        composition: structure.composition,
    }
}

/// Minutes to read `words`, rounded down, at least 1 for any words.
pub const fn reading_time(words: usize) -> usize {
    let minutes = words / WORDS_PER_MINUTE;
    if minutes == 0 && words > 0 { 1 } else { minutes }
}
