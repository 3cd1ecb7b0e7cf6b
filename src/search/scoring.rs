//! Relevance scoring for exact and approximate matches.

use crate::config::{ApproximateScoring, ExactScoring};
use crate::text;
use rapidfuzz::distance::levenshtein;

/// Score a substring match of `folded_query` inside `folded_candidate`.
///
/// Earlier and closer-length matches score higher; inactive terms are penalized.
/// Returns `None` when the candidate does not contain the query.
///
/// - Base score: 100
/// - Penalty: -6 per character before the match, capped at 45
/// - Penalty: -2 per character of length difference, capped at 35
/// - Penalty: -20 for inactive terms
/// - Floor: 5
pub fn exact_score(
    folded_query: &str,
    folded_candidate: &str,
    active: bool,
    weights: &ExactScoring,
) -> Option<i32> {
    let position = text::char_position(folded_candidate, folded_query)? as i32;
    let length_diff =
        text::char_len(folded_candidate).abs_diff(text::char_len(folded_query)) as i32;

    let position_penalty = (position * weights.per_position).min(weights.position_cap);
    let length_penalty = (length_diff * weights.per_length_diff).min(weights.length_cap);
    let inactive_penalty = if active { 0 } else { weights.inactive_penalty };

    Some(
        (weights.base - position_penalty - length_penalty - inactive_penalty).max(weights.floor),
    )
}

/// Normalized edit-distance similarity in `[0, 1]`.
///
/// `1 - distance / max_len`, with identical strings at 1 and an empty side at 0.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let (len_a, len_b) = (text::char_len(a), text::char_len(b));
    if len_a == 0 || len_b == 0 {
        return 0.0;
    }
    let max_len = len_a.max(len_b);
    let distance = levenshtein::distance(a.chars(), b.chars());
    1.0 - distance as f64 / max_len as f64
}

/// Similarity of a compact query against one compact variant, with containment and
/// prefix bonuses applied.
pub fn variant_ratio(query: &str, variant: &str, weights: &ApproximateScoring) -> f64 {
    let mut ratio = similarity_ratio(query, variant);
    if variant.contains(query) {
        ratio += weights.contains_bonus;
    } else if variant.starts_with(query) || query.starts_with(variant) {
        ratio += weights.prefix_bonus;
    }
    ratio
}

/// Final approximate score from the best variant ratio.
pub fn approximate_score(ratio: f64, active: bool, weights: &ApproximateScoring) -> f64 {
    let bonus = if active { weights.active_bonus } else { 0.0 };
    (ratio * 100.0 + bonus).min(weights.max_score)
}

/// Round a score to two decimals for presentation stability.
pub fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}
