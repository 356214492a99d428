//! Text segmentation.
//!
//! Splits normalized prose into sentences and words and produces the
//! [`SegmentationCounts`] that every readability formula reads from.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::dictionaries::abbreviations::is_abbreviation;
use crate::syllables::{POLYSYLLABLE_MIN, count_syllables};

/// Blank line: a hard sentence boundary.
static BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n").expect("valid regex"));

/// Regex for initials (J., J.K., U.S.A.).
static INITIALS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z](?:\.[A-Z])*$").expect("valid regex"));

/// Counts produced by one segmentation pass.
///
/// Every readability formula is computed from a single value of this type,
/// so all scores share one tokenization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationCounts {
    /// Number of sentences. At least 1.
    pub sentences: usize,
    /// Number of words. At least 1 unless the text is empty.
    pub words: usize,
    /// Total estimated syllables.
    pub syllables: usize,
    /// Alphabetic characters inside counted words.
    pub letters: usize,
    /// Words with three or more syllables.
    pub polysyllables: usize,
}

impl SegmentationCounts {
    /// Returns `true` if at least one real word was found.
    pub const fn has_prose(&self) -> bool {
        self.letters > 0
    }
}

/// Segment text and count sentences, words, syllables, and letters.
///
/// Empty or whitespace-only text yields one sentence and zero words. Any
/// other text yields at least one sentence and one word, so the formulas
/// never divide by zero.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn segment(text: &str) -> SegmentationCounts {
    if text.trim().is_empty() {
        return SegmentationCounts {
            sentences: 1,
            ..SegmentationCounts::default()
        };
    }

    let mut counts = SegmentationCounts {
        sentences: split_sentences(text).len(),
        ..SegmentationCounts::default()
    };

    for word in words(text) {
        let syllables = count_syllables(word);
        counts.words += 1;
        counts.syllables += syllables;
        counts.letters += word.chars().filter(|c| c.is_alphabetic()).count();
        if syllables >= POLYSYLLABLE_MIN {
            counts.polysyllables += 1;
        }
    }

    counts.sentences = counts.sentences.max(1);
    counts.words = counts.words.max(1);
    tracing::trace!(?counts, "segmented");
    counts
}

/// Split text into sentences.
///
/// Blank lines always end a sentence. Inside a block, `.`, `!` or `?`
/// (runs like `?!` or `...` count once, closing quotes and brackets may
/// follow) ends a sentence when whitespace and then an uppercase letter or
/// the end of text come next. A single `.` after a known abbreviation or an
/// initial does not end a sentence.
///
/// Fragments with no letters or digits are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    BLANK_LINE
        .split(text)
        .flat_map(split_block)
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .collect()
}

fn split_block(block: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = block.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        if !is_sentence_terminator(chars[i].1) {
            i += 1;
            continue;
        }

        let mut end = i;
        while end + 1 < chars.len() && is_sentence_terminator(chars[end + 1].1) {
            end += 1;
        }
        let single_period = end == i && chars[i].1 == '.';
        while end + 1 < chars.len() && is_closing(chars[end + 1].1) {
            end += 1;
        }

        let after = end + 1;
        if after < chars.len() && !chars[after].1.is_whitespace() {
            // "3.14", "file.md", "e.g.x"
            i = after;
            continue;
        }

        let mut next = after;
        while next < chars.len() && chars[next].1.is_whitespace() {
            next += 1;
        }

        let boundary = next == chars.len()
            || (starts_uppercase(&chars[next..])
                && !(single_period && ends_with_abbreviation(&chars[..i])));

        if boundary {
            let stop = chars.get(after).map_or(block.len(), |&(pos, _)| pos);
            sentences.push(block[chars[start].0..stop].trim());
            start = next;
        }
        i = next.max(end + 1);
    }

    if start < chars.len() {
        sentences.push(block[chars[start].0..].trim());
    }

    sentences
}

const fn is_sentence_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

const fn is_closing(ch: char) -> bool {
    matches!(ch, '"' | '\'' | ')' | ']' | '”' | '’')
}

const fn is_opening(ch: char) -> bool {
    matches!(ch, '"' | '\'' | '(' | '[' | '“' | '‘')
}

/// Next visible character, past opening quotes, is uppercase.
fn starts_uppercase(rest: &[(usize, char)]) -> bool {
    rest.iter()
        .map(|&(_, c)| c)
        .find(|&c| !is_opening(c))
        .is_some_and(char::is_uppercase)
}

/// The token before the period is an abbreviation or an initial.
fn ends_with_abbreviation(before: &[(usize, char)]) -> bool {
    let token: String = before
        .iter()
        .rev()
        .map(|&(_, c)| c)
        .take_while(|&c| c.is_alphanumeric() || c == '.')
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    let token = token.trim_start_matches('.');

    !token.is_empty() && (is_abbreviation(token) || INITIALS_PATTERN.is_match(token))
}

/// Iterate over the words in `text`.
///
/// A word is a run of letters and digits; `'`, `’` and `-` join two such
/// runs ("don't", "well-known"). Tokens without a letter (pure numbers)
/// are skipped; identifiers with digits count once.
pub fn words(text: &str) -> Words<'_> {
    Words { text, pos: 0 }
}

/// Iterator returned by [`words`].
#[derive(Debug, Clone)]
pub struct Words<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Words<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            let start = self.pos + self.text[self.pos..].find(char::is_alphanumeric)?;
            let mut end = start;
            let mut chars = self.text[start..].char_indices().peekable();

            while let Some((offset, ch)) = chars.next() {
                if ch.is_alphanumeric() {
                    end = start + offset + ch.len_utf8();
                } else if !(is_joiner(ch)
                    && chars.peek().is_some_and(|&(_, next)| next.is_alphanumeric()))
                {
                    break;
                }
            }

            self.pos = end;
            let token = &self.text[start..end];
            if token.chars().any(char::is_alphabetic) {
                return Some(token);
            }
        }
    }
}

const fn is_joiner(ch: char) -> bool {
    matches!(ch, '\'' | '’' | '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_sentences() {
        let sentences = split_sentences("This is a sentence. This is another sentence.");
        assert_eq!(sentences, vec!["This is a sentence.", "This is another sentence."]);
    }

    #[test]
    fn abbreviations_not_split() {
        assert_eq!(split_sentences("Dr. Smith arrived.").len(), 1);
        let sentences = split_sentences("Dr. Smith went to the store. He bought milk.");
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].contains("Dr. Smith"));
    }

    #[test]
    fn latin_abbreviations_not_split() {
        let sentences =
            split_sentences("Use a formatter, e.g. Prettier. Other tools work, i.e. Biome too.");
        assert_eq!(sentences.len(), 2);
        assert_eq!(split_sentences("Cats vs. Dogs is a classic.").len(), 1);
    }

    #[test]
    fn initials_not_split() {
        assert_eq!(split_sentences("J. R. R. Tolkien wrote books.").len(), 1);
        assert_eq!(split_sentences("The U.S.A. Team won.").len(), 1);
    }

    #[test]
    fn ordinary_words_before_period_split() {
        assert_eq!(split_sentences("Log in. Then continue.").len(), 2);
    }

    #[test]
    fn lowercase_after_period_does_not_split() {
        assert_eq!(split_sentences("The value is approx. three.").len(), 1);
        assert_eq!(split_sentences("It ended. then it started.").len(), 1);
    }

    #[test]
    fn decimals_and_filenames_not_split() {
        let sentences = split_sentences("The price is 3.14 dollars. Edit config.toml now.");
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].contains("3.14"));
    }

    #[test]
    fn question_and_exclamation() {
        let sentences = split_sentences("Are you serious? I can't believe it! This is amazing.");
        assert_eq!(sentences.len(), 3);
    }

    #[test]
    fn terminator_runs_count_once() {
        let sentences = split_sentences("Wait... What happened?! Nothing.");
        assert_eq!(sentences, vec!["Wait...", "What happened?!", "Nothing."]);
    }

    #[test]
    fn closing_quotes_stay_with_sentence() {
        let sentences = split_sentences("He said \"stop.\" Then he left.");
        assert_eq!(sentences, vec!["He said \"stop.\"", "Then he left."]);
    }

    #[test]
    fn opening_quote_before_capital_splits() {
        assert_eq!(split_sentences("It ended. \"Fine,\" she said.").len(), 2);
    }

    #[test]
    fn blank_lines_are_boundaries() {
        let sentences = split_sentences("Getting started\n\ninstall the tool\n\nRun it.");
        assert_eq!(sentences, vec!["Getting started", "install the tool", "Run it."]);
    }

    #[test]
    fn empty_input() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   ").is_empty());
        assert!(split_sentences("...").is_empty());
    }

    #[test]
    fn words_basic() {
        let list: Vec<&str> = words("Hello, world! This is a test.").collect();
        assert_eq!(list, vec!["Hello", "world", "This", "is", "a", "test"]);
    }

    #[test]
    fn words_keep_internal_joiners() {
        let list: Vec<&str> = words("Don't use well-known 'quoted' -dash- a--b").collect();
        assert_eq!(
            list,
            vec!["Don't", "use", "well-known", "quoted", "dash", "a", "b"]
        );
    }

    #[test]
    fn words_skip_numbers_but_keep_identifiers() {
        let list: Vec<&str> = words("Version 2 uses utf8 and 3.14 x86").collect();
        assert_eq!(list, vec!["Version", "uses", "utf8", "and", "x86"]);
    }

    #[test]
    fn stranded_terminator_still_splits() {
        let sentences = split_sentences("Read the guide at . Then install the tool.");
        assert_eq!(sentences, vec!["Read the guide at .", "Then install the tool."]);
    }

    #[test]
    fn segment_plain_sentence() {
        let counts = segment("The cat sat on the mat.");
        assert_eq!(counts.sentences, 1);
        assert_eq!(counts.words, 6);
        assert_eq!(counts.syllables, 6);
        assert_eq!(counts.letters, 17);
        assert_eq!(counts.polysyllables, 0);
    }

    #[test]
    fn segment_counts_polysyllables() {
        let counts = segment("Documentation improves readability.");
        assert_eq!(counts.words, 3);
        assert_eq!(counts.polysyllables, 3);
    }

    #[test]
    fn segment_empty_is_one_sentence_zero_words() {
        let counts = segment("");
        assert_eq!(counts.sentences, 1);
        assert_eq!(counts.words, 0);
        assert!(!counts.has_prose());
        assert_eq!(segment(" \n\n ").words, 0);
    }

    #[test]
    fn segment_coerces_degenerate_text() {
        let counts = segment("42 -- 7");
        assert_eq!(counts.sentences, 1);
        assert_eq!(counts.words, 1);
        assert_eq!(counts.syllables, 0);
        assert!(!counts.has_prose());
    }
}
