//! Dictionary-free English syllable estimation.
//!
//! The count is approximate. What matters is that it is stable: the same
//! word always gets the same count, and the table in the tests below pins
//! the current behavior. Changing a rule changes that table on purpose.
//!
//! Rules, applied to each hyphen-separated part of a word:
//!
//! 1. Count vowel groups (`a e i o u`, and `y` anywhere but the first letter).
//! 2. Subtract one for a trailing `e` after a consonant, for parts longer
//!    than three letters ("make", but not "the").
//! 3. Add one for a trailing `le` after a consonant ("sub-tle", "ta-ble").
//! 4. Every part with letters has at least one syllable.

/// Words with at least this many syllables are "polysyllabic".
///
/// Used by Gunning Fog and SMOG.
pub const POLYSYLLABLE_MIN: usize = 3;

/// Estimate the syllable count of a single word.
///
/// Non-letters are ignored; a token with no letters has zero syllables.
pub fn count_syllables(word: &str) -> usize {
    word.split('-').map(count_part).sum()
}

fn count_part(part: &str) -> usize {
    let letters: Vec<char> = part
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();
    if letters.is_empty() {
        return 0;
    }

    let vowel_at = |idx: usize| is_vowel(letters[idx], idx);
    let n = letters.len();

    let mut syllables = 0;
    let mut previous_was_vowel = false;
    for idx in 0..n {
        let vowel = vowel_at(idx);
        if vowel && !previous_was_vowel {
            syllables += 1;
        }
        previous_was_vowel = vowel;
    }

    // Silent trailing e
    if n > 3 && letters[n - 1] == 'e' && !vowel_at(n - 2) {
        syllables -= 1;
    }

    // Consonant + le
    if n >= 3 && letters[n - 2] == 'l' && letters[n - 1] == 'e' && !vowel_at(n - 3) {
        syllables += 1;
    }

    syllables.max(1)
}

const fn is_vowel(c: char, idx: usize) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u') || (c == 'y' && idx > 0)
}
