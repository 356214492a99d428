//! Abbreviation dictionary for sentence boundary detection.
//!
//! A period after one of these tokens does not end a sentence. Entries are
//! lowercase with internal periods kept and the final period removed.
//!
//! Short tokens that are also ordinary English words ("in", "no", "miss",
//! "sat") are left out: a sentence ending in "Log in." must still split.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Abbreviations that should not trigger sentence breaks.
pub static ABBREVIATIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    let mut set = HashSet::new();

    // Titles and honorifics
    set.extend([
        "mr", "mrs", "ms", "dr", "prof", "rev", "fr", "sr", "jr", "messrs", "mmes", "msgr", "hon",
        "esq", "capt", "col", "lt", "maj", "sgt", "cpl", "pvt", "adm", "cmdr", "gov", "sen", "st",
    ]);

    // Academic degrees
    set.extend([
        "b.a", "b.s", "m.a", "m.s", "m.b.a", "ph.d", "m.d", "j.d", "ll.b", "ll.m", "d.d.s",
        "ed.d", "psy.d",
    ]);

    // Latin and editorial
    set.extend([
        "etc", "vs", "e.g", "i.e", "al", "cf", "viz", "ibid", "n.b", "p.s", "approx", "ca",
    ]);

    // Time and dates
    set.extend([
        "a.m", "p.m", "b.c", "a.d", "c.e", "b.c.e", "jan", "feb", "apr", "jun", "jul", "aug",
        "sep", "sept", "oct", "nov", "dec", "tues", "thurs",
    ]);

    // Places and organizations
    set.extend([
        "ave", "blvd", "apt", "bldg", "dept", "u.s", "u.k", "u.s.a", "e.u", "inc", "corp", "ltd",
        "llc", "bros", "assn", "intl",
    ]);

    // Units and references
    set.extend([
        "oz", "lb", "lbs", "kg", "mg", "ml", "cm", "mm", "km", "ft", "yd", "mph", "vol", "nos",
        "pp", "fig", "figs", "eq", "ch", "sect", "refs",
    ]);

    set
});

/// Check if a word is a known abbreviation.
///
/// Case-insensitive; leading and trailing periods are ignored.
pub fn is_abbreviation(word: &str) -> bool {
    let word_lower = word.to_lowercase();
    let trimmed = word_lower.trim_matches('.');
    ABBREVIATIONS.contains(trimmed)
}
