//! Edit-distance search with synonym hints, for queries worded differently from the
//! canonical term.

use super::exact::active_first;
use super::result::build_result;
use super::scoring::{approximate_score, round_score, variant_ratio};
use super::synonyms::SynonymHints;
use crate::config::ApproximateScoring;
use crate::text;
use crate::types::{SearchMode, SearchOptions, SearchOutcome};
use crate::vocabulary::{LowLevelTerm, PreferredTerm, Vocabulary};

/// Rank every eligible LLT by similarity to `query`.
///
/// The query and each candidate are compared with whitespace removed. A candidate is
/// compared through its own name and any synonym hints configured for that exact name;
/// the best variant counts. Candidates below `weights.min_ratio` are dropped.
/// Results are ordered by rounded score, then active first, then shorter names first.
pub fn search_approximate(
    vocab: &Vocabulary,
    query: &str,
    options: SearchOptions,
    weights: &ApproximateScoring,
    hints: &SynonymHints,
) -> SearchOutcome {
    let compact_query = text::compact(query);
    if compact_query.is_empty() {
        return SearchOutcome::empty(SearchMode::Approximate);
    }

    let mut scored: Vec<(f64, &LowLevelTerm, &PreferredTerm)> = vocab
        .llts()
        .iter()
        .filter(|llt| options.include_inactive || llt.active)
        .filter_map(|llt| {
            let pt = vocab.pt(&llt.parent_code)?;
            let ratio = best_ratio(&compact_query, llt, weights, hints)?;
            if ratio < weights.min_ratio {
                return None;
            }
            let score = round_score(approximate_score(ratio, llt.active, weights));
            Some((score, llt, pt))
        })
        .collect();

    scored.sort_by(|(score_a, llt_a, _), (score_b, llt_b, _)| {
        score_b
            .total_cmp(score_a)
            .then_with(|| active_first(llt_a, llt_b))
            .then_with(|| text::char_len(&llt_a.name).cmp(&text::char_len(&llt_b.name)))
    });

    tracing::debug!(
        "Approximate search '{}' kept {} candidates (limit {})",
        query,
        scored.len(),
        options.limit
    );

    let results = scored
        .into_iter()
        .take(options.limit)
        .map(|(score, llt, pt)| build_result(llt, pt, vocab.hierarchy(&pt.code), score))
        .collect();

    SearchOutcome {
        results,
        mode: SearchMode::Approximate,
        approximate_used: true,
    }
}

/// Best bonus-adjusted ratio over the term's name and its synonym hints.
///
/// `None` when the term has no non-empty variant to compare against.
fn best_ratio(
    query: &str,
    llt: &LowLevelTerm,
    weights: &ApproximateScoring,
    hints: &SynonymHints,
) -> Option<f64> {
    std::iter::once(llt.compact_name.as_str())
        .filter(|name| !name.is_empty())
        .chain(hints.for_name(&llt.name).iter().map(String::as_str))
        .map(|variant| variant_ratio(query, variant, weights))
        .max_by(f64::total_cmp)
}
