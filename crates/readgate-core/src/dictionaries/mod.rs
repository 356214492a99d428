//! Dictionaries for text analysis.
//!
//! Curated word sets used by sentence splitting.

pub mod abbreviations;
