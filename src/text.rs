//! Text folding and collation used by matching and ranking.
//!
//! Folding is Unicode-aware lower-casing. Hangul has no case, so Korean terms pass
//! through unchanged while Latin-script terms fold as expected. Positions and lengths
//! are counted in `char`s so multi-byte scripts score the same as ASCII.

use std::cmp::Ordering;

/// Case-fold a term for substring matching.
pub fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

/// Case-fold and drop all whitespace, for fuzzy matching.
pub fn compact(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Number of characters in `value`.
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Character offset of the first occurrence of `needle` in `haystack`.
pub fn char_position(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .find(needle)
        .map(|byte_idx| haystack[..byte_idx].chars().count())
}

/// Dictionary-style comparison of two term names.
///
/// Compares case-folded forms first so "Headache" and "headache" sort together, then
/// the raw forms to keep the order total. Precomposed Hangul syllables are laid out
/// in the Unicode block in dictionary order, so code-point order on the folded form
/// is the Korean collation.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}
