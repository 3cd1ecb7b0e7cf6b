//! Substring search over folded term names.

use super::result::build_result;
use super::scoring::exact_score;
use crate::config::ExactScoring;
use crate::text;
use crate::types::{SearchMode, SearchOptions, SearchOutcome};
use crate::vocabulary::{LowLevelTerm, PreferredTerm, Vocabulary};
use std::cmp::Ordering;

/// Find LLTs whose name contains `query`, case-insensitively.
///
/// Inactive LLTs are skipped unless `options.include_inactive`; LLTs whose PT is not
/// in the vocabulary never match. Results are ordered by score, then active before
/// inactive, then by name.
pub fn search_exact(
    vocab: &Vocabulary,
    query: &str,
    options: SearchOptions,
    weights: &ExactScoring,
) -> SearchOutcome {
    let folded_query = text::fold_case(query.trim());
    if folded_query.is_empty() {
        return SearchOutcome::empty(SearchMode::Exact);
    }

    let mut matches: Vec<(i32, &LowLevelTerm, &PreferredTerm)> = vocab
        .llts()
        .iter()
        .filter(|llt| options.include_inactive || llt.active)
        .filter_map(|llt| {
            let score = exact_score(&folded_query, &llt.folded_name, llt.active, weights)?;
            let pt = vocab.pt(&llt.parent_code)?;
            Some((score, llt, pt))
        })
        .collect();

    matches.sort_by(|(score_a, llt_a, _), (score_b, llt_b, _)| {
        score_b
            .cmp(score_a)
            .then_with(|| active_first(llt_a, llt_b))
            .then_with(|| text::locale_cmp(&llt_a.name, &llt_b.name))
    });

    tracing::debug!(
        "Exact search '{}' matched {} terms (limit {})",
        query,
        matches.len(),
        options.limit
    );

    let results = matches
        .into_iter()
        .take(options.limit)
        .map(|(score, llt, pt)| {
            build_result(llt, pt, vocab.hierarchy(&pt.code), f64::from(score))
        })
        .collect();

    SearchOutcome {
        results,
        mode: SearchMode::Exact,
        approximate_used: false,
    }
}

pub(crate) fn active_first(a: &LowLevelTerm, b: &LowLevelTerm) -> Ordering {
    b.active.cmp(&a.active)
}
