//! Markdown normalization.
//!
//! Uses pulldown-cmark for proper CommonMark parsing rather than regex-based
//! stripping. This handles edge cases (nested code blocks, HTML entities,
//! reference links) that regex approaches miss. Front matter and unterminated
//! fences are settled on raw lines first (see [`crate::lines`]).

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use pulldown_cmark::{Event, LinkType, Options, Parser, Tag, TagEnd};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::lines::{LineKind, classify_lines};

/// Separator between blocks of normalized prose.
///
/// The segmenter treats a blank line as a hard sentence boundary.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Regex for bare URLs left in text.
///
/// Trailing punctuation and closers stay outside the match so a sentence
/// ending in a URL keeps its terminator.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:https?://|www\.)\S*[^\s.,;:!?)\]"'’”]"#).expect("valid regex")
});

/// How tables contribute to prose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum TablePolicy {
    /// Every cell is a short, independent sentence fragment.
    #[default]
    Fragments,
    /// Tables are dropped from prose entirely.
    Exclude,
}

impl TablePolicy {
    /// Returns the policy name as used in configuration.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fragments => "fragments",
            Self::Exclude => "exclude",
        }
    }
}

/// Options controlling what counts as prose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Table handling.
    pub tables: TablePolicy,
    /// Keep inline code spans whose content is a plain word (`` `cargo` ``).
    pub keep_word_like_code: bool,
}

/// Plain prose extracted from a Markdown document.
///
/// Blocks are joined by [`BLOCK_SEPARATOR`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText(String);

impl NormalizedText {
    /// The prose as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if no prose survived normalization.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the prose blocks.
    pub fn blocks(&self) -> impl Iterator<Item = &str> {
        self.0.split(BLOCK_SEPARATOR).filter(|b| !b.is_empty())
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip Markdown syntax, returning analyzable prose.
///
/// Removes:
/// - YAML front matter
/// - Code blocks (fenced and indented) and inline code
/// - HTML blocks, inline HTML and comments
/// - Images, autolinks, bare URLs and footnote references
/// - Tables, when [`TablePolicy::Exclude`] is set
///
/// Preserves, each as its own block:
/// - Paragraphs, headings, list items, block quote text
/// - Table cells (default policy)
///
/// Link text and emphasis text are kept without their markers. This never
/// fails: malformed input degrades to best-effort prose.
#[tracing::instrument(skip_all, fields(input_len = text.len()))]
pub fn normalize(text: &str, options: &NormalizeOptions) -> NormalizedText {
    let source = prepare(text);

    let parser = Parser::new_ext(
        &source,
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES,
    );

    let mut collector = BlockCollector::default();
    let mut skip_depth: usize = 0;
    let mut autolinks: Vec<bool> = Vec::new();

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(_) | Tag::Image { .. } | Tag::HtmlBlock) => {
                skip_depth += 1;
            }
            Event::End(TagEnd::CodeBlock | TagEnd::Image | TagEnd::HtmlBlock) => {
                skip_depth = skip_depth.saturating_sub(1);
            }

            Event::Start(Tag::Table(_)) if options.tables == TablePolicy::Exclude => {
                skip_depth += 1;
            }
            Event::End(TagEnd::Table) if options.tables == TablePolicy::Exclude => {
                skip_depth = skip_depth.saturating_sub(1);
            }

            Event::Start(Tag::Link { link_type, .. }) => {
                let auto = matches!(link_type, LinkType::Autolink | LinkType::Email);
                if auto {
                    skip_depth += 1;
                }
                autolinks.push(auto);
            }
            Event::End(TagEnd::Link) => {
                if autolinks.pop().unwrap_or(false) {
                    skip_depth = skip_depth.saturating_sub(1);
                }
            }

            Event::Text(t) if skip_depth == 0 => {
                collector.push_text(&URL_PATTERN.replace_all(&t, " "));
            }
            Event::Code(t) if skip_depth == 0 => {
                if options.keep_word_like_code && is_word_like(&t) {
                    collector.push_text(&t);
                } else {
                    collector.push_text(" ");
                }
            }
            Event::SoftBreak | Event::HardBreak if skip_depth == 0 => {
                collector.push_text(" ");
            }

            // Block boundaries
            Event::Start(Tag::Item | Tag::List(_))
            | Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::TableCell
                | TagEnd::BlockQuote(_)
                | TagEnd::FootnoteDefinition,
            )
            | Event::Rule
                if skip_depth == 0 =>
            {
                collector.flush();
            }

            _ => {}
        }
    }

    collector.finish()
}

/// Drop front matter and unterminated fence lines before parsing.
fn prepare(text: &str) -> Cow<'_, str> {
    let kinds = classify_lines(text);
    let dropped = |k: &LineKind| matches!(k, LineKind::FrontMatter | LineKind::DanglingFence);
    if !kinds.iter().any(dropped) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    for (line, kind) in text.lines().zip(&kinds) {
        if !dropped(kind) {
            out.push_str(line);
        }
        out.push('\n');
    }
    Cow::Owned(out)
}

/// Inline code that reads as an ordinary word (letters, internal `-` or `'`).
fn is_word_like(code: &str) -> bool {
    let starts_and_ends_alpha = code.chars().next().is_some_and(char::is_alphabetic)
        && code.chars().next_back().is_some_and(char::is_alphabetic);
    starts_and_ends_alpha
        && code
            .chars()
            .all(|c| c.is_alphabetic() || matches!(c, '-' | '\''))
}

#[derive(Default)]
struct BlockCollector {
    blocks: Vec<String>,
    current: String,
}

impl BlockCollector {
    fn push_text(&mut self, text: &str) {
        self.current.push_str(text);
    }

    fn flush(&mut self) {
        let block = self.current.split_whitespace().collect::<Vec<_>>().join(" ");
        if block.chars().any(char::is_alphanumeric) {
            self.blocks.push(block);
        }
        self.current.clear();
    }

    fn finish(mut self) -> NormalizedText {
        self.flush();
        NormalizedText(self.blocks.join(BLOCK_SEPARATOR))
    }
}
