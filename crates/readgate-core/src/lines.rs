//! Line-level Markdown classification.
//!
//! Front matter, fenced code and HTML comment blocks are recognised on raw
//! lines before any CommonMark parsing. The normalizer uses this to drop
//! front matter and to neutralise fences that never close; the structure
//! scanner uses it to count code lines and to ignore `#` lines that are not
//! rendered as headings.

/// What a raw source line is, as far as structure is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Part of a leading YAML front matter block, delimiters included.
    FrontMatter,
    /// An opening or closing code fence.
    Fence,
    /// A line inside a fenced code block.
    Code,
    /// An opening fence with no matching close. Everything after it is prose.
    DanglingFence,
    /// Part of an HTML comment block (`<!--` at line start through `-->`).
    Html,
    /// Whitespace only.
    Blank,
    /// Anything else.
    Text,
}

impl LineKind {
    fn plain(line: &str) -> Self {
        if line.trim().is_empty() {
            Self::Blank
        } else {
            Self::Text
        }
    }

    /// Returns `true` for fence delimiters and fenced content.
    pub const fn is_code(self) -> bool {
        matches!(self, Self::Fence | Self::Code)
    }
}

/// An opening code fence: marker character and run length.
#[derive(Debug, Clone, Copy)]
struct FenceMarker {
    marker: char,
    len: usize,
}

impl FenceMarker {
    fn opening(line: &str) -> Option<Self> {
        let rest = strip_indent(line)?;
        let marker = rest.chars().next().filter(|c| matches!(c, '`' | '~'))?;
        let len = rest.chars().take_while(|&c| c == marker).count();
        if len < 3 {
            return None;
        }
        // Backtick fences cannot carry backticks in their info string.
        if marker == '`' && rest[len..].contains('`') {
            return None;
        }
        Some(Self { marker, len })
    }

    fn closed_by(self, line: &str) -> bool {
        let Some(rest) = strip_indent(line) else {
            return false;
        };
        let len = rest.chars().take_while(|&c| c == self.marker).count();
        len >= self.len && rest[len..].trim().is_empty()
    }
}

/// Strip up to three leading spaces; `None` if the line is indented further.
fn strip_indent(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches(' ');
    (line.len() - rest.len() <= 3).then_some(rest)
}

/// Classify every line of `text`, aligned with [`str::lines`].
pub fn classify_lines(text: &str) -> Vec<LineKind> {
    let lines: Vec<&str> = text.lines().collect();
    let mut kinds: Vec<LineKind> = lines.iter().map(|l| LineKind::plain(l)).collect();

    let mut from = 0;
    if let Some((start, end)) = front_matter_span(&lines) {
        kinds[start..=end].fill(LineKind::FrontMatter);
        from = end + 1;
    }

    while let Some(dangling) = mark_fences(&lines, &mut kinds, from) {
        tracing::debug!(line = dangling + 1, "unterminated code fence; treating remainder as prose");
        kinds[dangling] = LineKind::DanglingFence;
        from = dangling + 1;
    }

    kinds
}

/// Locate a leading `---` ... `---` (or `...`) block.
///
/// Returns inclusive line indices of the two delimiters. An opening
/// delimiter without a close is not front matter.
fn front_matter_span(lines: &[&str]) -> Option<(usize, usize)> {
    let start = lines.iter().position(|l| !l.trim().is_empty())?;
    if lines[start].trim_end() != "---" {
        return None;
    }
    let offset = lines[start + 1..]
        .iter()
        .position(|l| matches!(l.trim_end(), "---" | "..."))?;
    Some((start, start + 1 + offset))
}

/// Mark fences, fenced content and HTML comment blocks from line `from`
/// onward.
///
/// A comment that never closes runs to the end of input, as in CommonMark.
/// Returns the index of an opening fence left open at end of input.
fn mark_fences(lines: &[&str], kinds: &mut [LineKind], from: usize) -> Option<usize> {
    let mut open: Option<(FenceMarker, usize)> = None;
    let mut in_comment = false;

    for (idx, line) in lines.iter().enumerate().skip(from) {
        match open {
            None if in_comment => {
                kinds[idx] = LineKind::Html;
                in_comment = !line.contains("-->");
            }
            None => {
                if let Some(fence) = FenceMarker::opening(line) {
                    kinds[idx] = LineKind::Fence;
                    open = Some((fence, idx));
                } else if let Some(rest) = strip_indent(line).and_then(|r| r.strip_prefix("<!--")) {
                    kinds[idx] = LineKind::Html;
                    in_comment = !rest.contains("-->");
                } else {
                    kinds[idx] = LineKind::plain(line);
                }
            }
            Some((fence, _)) => {
                if fence.closed_by(line) {
                    kinds[idx] = LineKind::Fence;
                    open = None;
                } else {
                    kinds[idx] = LineKind::Code;
                }
            }
        }
    }

    open.map(|(_, idx)| idx)
}
