//! Human-readable report rendering.
//!
//! Every renderer returns a `String` so commands decide where it goes and
//! tests can inspect it. JSON output is handled by the commands directly.

use std::fmt::Write as _;

use owo_colors::{OwoColorize, Stream};
use readgate_core::report::{DocumentResult, Report};

/// Plain-text table, one row per document in input order.
pub fn table(report: &Report, all_metrics: bool) -> String {
    let width = report
        .results
        .iter()
        .map(|r| r.path.as_str().chars().count())
        .chain(std::iter::once("FILE".len()))
        .max()
        .unwrap_or(4);

    let mut out = String::new();
    let mut header = format!(
        "{:<width$}  {:>6}  {:>6}  {:>6}  {:>6}  {:>6}",
        "FILE", "LINES", "WORDS", "GRADE", "ARI", "EASE"
    );
    if all_metrics {
        let _ = write!(
            header,
            "  {:>6}  {:>6}  {:>6}  {:>5}  {:>4}",
            "CL", "FOG", "SMOG", "HEADS", "MIN"
        );
    }
    let _ = writeln!(
        out,
        "{}  STATUS",
        header.if_supports_color(Stream::Stdout, |t| t.bold())
    );

    for result in &report.results {
        let m = &result.metrics;
        let _ = write!(
            out,
            "{:<width$}  {:>6}  {:>6}  {:>6.1}  {:>6.1}  {:>6.1}",
            result.path,
            m.structure.lines,
            m.structure.words,
            m.readability.flesch_kincaid_grade,
            m.readability.ari,
            m.readability.flesch_reading_ease,
        );
        if all_metrics {
            let _ = write!(
                out,
                "  {:>6.1}  {:>6.1}  {:>6.1}  {:>5}  {:>4}",
                m.readability.coleman_liau,
                m.readability.gunning_fog,
                m.readability.smog,
                m.structure.headings.total,
                m.structure.reading_time_minutes,
            );
        }
        let _ = writeln!(out, "  {}", status_label(result));
        if all_metrics && result.failed() {
            let issues: Vec<&str> = result.issues().collect();
            let _ = writeln!(
                out,
                "    {}",
                issues
                    .join("; ")
                    .if_supports_color(Stream::Stdout, |t| t.yellow())
            );
        }
    }

    for error in &report.errors {
        let _ = writeln!(
            out,
            "{:<width$}  {} {}",
            error.path,
            "ERROR".if_supports_color(Stream::Stdout, |t| t.red()),
            error.error
        );
    }

    let s = &report.summary;
    let _ = writeln!(
        out,
        "\n{} files: {} passed, {} failed{}",
        s.files,
        s.passed,
        s.failed,
        if s.errored > 0 {
            format!(", {} unreadable", s.errored)
        } else {
            String::new()
        }
    );
    out
}

fn status_label(result: &DocumentResult) -> String {
    if result.failed() {
        "FAIL"
            .if_supports_color(Stream::Stdout, |t| t.red())
            .to_string()
    } else {
        "PASS"
            .if_supports_color(Stream::Stdout, |t| t.green())
            .to_string()
    }
}

/// GitHub-flavored Markdown report: failures first, then by path.
pub fn markdown(report: &Report) -> String {
    let s = &report.summary;
    let mut out = String::from("## Documentation Readability Report\n\n");
    let _ = writeln!(
        out,
        "**{} files** analyzed | **{} passed** | **{} failed** | {} words | {} lines\n",
        s.files, s.passed, s.failed, s.total_words, s.total_lines
    );
    out.push_str("| File | Lines | Words | FK Grade | ARI | Flesch | Status |\n");
    out.push_str("|------|------:|------:|---------:|----:|-------:|:------:|\n");

    for result in report.sorted_for_review() {
        let m = &result.metrics;
        let _ = writeln!(
            out,
            "| `{}` | {} | {} | {:.1} | {:.1} | {:.1} | {} |",
            result.path,
            m.structure.lines,
            m.structure.words,
            m.readability.flesch_kincaid_grade,
            m.readability.ari,
            m.readability.flesch_reading_ease,
            if result.failed() { "❌" } else { "✅" }
        );
    }

    push_errors(&mut out, report);
    out
}

/// Aggregate-only Markdown summary.
pub fn summary(report: &Report) -> String {
    let s = &report.summary;
    let mut out = String::from("## Documentation Quality Summary\n\n");

    if s.failed == 0 {
        out.push_str("✅ **All documentation meets readability standards**\n\n");
    } else {
        let _ = writeln!(out, "❌ **{} file(s) failed readability checks**\n", s.failed);
    }

    out.push_str("| Metric | Value |\n|--------|------:|\n");
    let _ = writeln!(out, "| Files analyzed | {} |", s.files);
    let _ = writeln!(out, "| Passed | {} |", s.passed);
    let _ = writeln!(out, "| Failed | {} |", s.failed);
    let _ = writeln!(out, "| Total words | {} |", s.total_words);
    let _ = writeln!(out, "| Total lines | {} |", s.total_lines);
    let _ = writeln!(out, "| Average grade | {:.1} |", s.average_grade);
    let _ = writeln!(out, "| Reading time | {} min |", s.reading_time_minutes);

    if s.failed > 0 {
        out.push_str("\n### Files Requiring Attention\n\n");
        out.push_str("| File | FK Grade | Issue |\n|------|:--------:|-------|\n");
        for result in report.failures() {
            let _ = writeln!(
                out,
                "| `{}` | {:.1} | {} |",
                result.path,
                result.metrics.readability.flesch_kincaid_grade,
                result.issues().next().unwrap_or("Threshold exceeded")
            );
        }
    }

    let distribution = report.ease_distribution();
    let scored: usize = distribution.iter().map(|(_, count)| count).sum();
    if scored > 0 {
        out.push_str("\n### Readability Distribution\n\n");
        out.push_str("| Level | Count | Percentage |\n|-------|------:|-----------:|\n");
        for (band, count) in distribution.iter().filter(|(_, count)| *count > 0) {
            let percent = *count as f64 / scored as f64 * 100.0;
            let _ = writeln!(out, "| {band} | {count} | {percent:.0}% |");
        }
    }

    push_errors(&mut out, report);
    out
}

fn push_errors(out: &mut String, report: &Report) {
    if report.errors.is_empty() {
        return;
    }
    out.push_str("\n### Unreadable Files\n\n");
    for error in &report.errors {
        let _ = writeln!(out, "- `{}`: {}", error.path, error.error);
    }
}
