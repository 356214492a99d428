//! Structural metrics from raw Markdown lines.
//!
//! Computed independently of prose normalization: line counts come from
//! the original text and headings are found by their markers before the
//! normalizer strips them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::lines::{LineKind, classify_lines};

/// Heading counts by level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HeadingCounts {
    /// All headings.
    pub total: usize,
    /// Level 1 headings.
    pub h1: usize,
    /// Level 2 headings.
    pub h2: usize,
    /// Level 3 headings.
    pub h3: usize,
    /// Level 4 headings.
    pub h4: usize,
    /// Level 5 headings.
    pub h5: usize,
    /// Level 6 headings.
    pub h6: usize,
}

impl HeadingCounts {
    fn record(&mut self, level: u8) {
        let slot = match level {
            1 => &mut self.h1,
            2 => &mut self.h2,
            3 => &mut self.h3,
            4 => &mut self.h4,
            5 => &mut self.h5,
            6 => &mut self.h6,
            _ => return,
        };
        *slot += 1;
        self.total += 1;
    }
}

/// How the raw lines of a document break down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Composition {
    /// All lines.
    pub total_lines: usize,
    /// Lines that are neither code, blank, nor front matter.
    pub prose_lines: usize,
    /// Fenced code lines, fences included.
    pub code_lines: usize,
    /// Blank lines outside code.
    pub empty_lines: usize,
    /// Front matter lines, delimiters included.
    pub frontmatter_lines: usize,
    /// `code_lines / total_lines`, or 0 for an empty document.
    pub code_block_ratio: f64,
}

/// Structural scan of one document.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Structure {
    /// Raw line count.
    pub lines: usize,
    /// Heading histogram.
    pub headings: HeadingCounts,
    /// Line composition.
    pub composition: Composition,
}

/// Scan raw document text for line counts and headings.
///
/// Headings inside front matter, fenced code or HTML comments are ignored.
#[tracing::instrument(skip_all, fields(input_len = text.len()))]
pub fn scan(text: &str) -> Structure {
    let kinds = classify_lines(text);
    let mut headings = HeadingCounts::default();
    let mut composition = Composition {
        total_lines: kinds.len(),
        ..Composition::default()
    };

    let mut previous: Option<&str> = None;
    for (line, &kind) in text.lines().zip(&kinds) {
        match kind {
            k if k.is_code() => composition.code_lines += 1,
            LineKind::Blank => composition.empty_lines += 1,
            LineKind::FrontMatter => composition.frontmatter_lines += 1,
            _ => {}
        }

        let level = if kind == LineKind::Text {
            atx_heading_level(line).or_else(|| previous.and_then(|p| setext_level(p, line)))
        } else {
            None
        };
        if let Some(level) = level {
            headings.record(level);
        }

        // A setext underline only applies to a plain paragraph line.
        previous = (kind == LineKind::Text && level.is_none() && !starts_block(line)).then_some(line);
    }

    composition.prose_lines = composition.total_lines
        - composition.code_lines
        - composition.empty_lines
        - composition.frontmatter_lines;
    composition.code_block_ratio = if composition.total_lines == 0 {
        0.0
    } else {
        composition.code_lines as f64 / composition.total_lines as f64
    };

    Structure {
        lines: composition.total_lines,
        headings,
        composition,
    }
}

/// Level of an ATX heading line (`## Title`), if it is one.
pub fn atx_heading_level(line: &str) -> Option<u8> {
    let rest = line.trim_start_matches(' ');
    if line.len() - rest.len() > 3 {
        return None;
    }
    let hashes = rest.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let after = &rest[hashes..];
    (after.is_empty() || after.starts_with([' ', '\t'])).then_some(hashes as u8)
}

/// Level of a setext underline (`===` or `---`) below a paragraph line.
fn setext_level(previous: &str, line: &str) -> Option<u8> {
    if previous.trim().is_empty() {
        return None;
    }
    let rest = line.trim_start_matches(' ');
    if line.len() - rest.len() > 3 {
        return None;
    }
    let underline = rest.trim_end();
    let marker = underline.chars().next()?;
    if !matches!(marker, '=' | '-') || !underline.chars().all(|c| c == marker) {
        return None;
    }
    Some(if marker == '=' { 1 } else { 2 })
}

/// Lines that open a list item, quote, or table row rather than a paragraph.
fn starts_block(line: &str) -> bool {
    let rest = line.trim_start();
    rest.starts_with(['>', '|', '-', '*', '+'])
        || rest
            .split_once(['.', ')'])
            .is_some_and(|(n, _)| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}
