//! Joins a matched LLT with its PT and classification paths.

use super::scoring::round_score;
use crate::types::SearchResult;
use crate::vocabulary::{HierarchyEntry, LowLevelTerm, PreferredTerm};

/// Pick the path to display for a PT.
///
/// The first row flagged primary wins; otherwise the first row. `None` only for an
/// empty list.
pub fn select_primary(rows: &[HierarchyEntry]) -> Option<&HierarchyEntry> {
    rows.iter().find(|row| row.is_primary).or_else(|| rows.first())
}

/// Denormalize one match into a [`SearchResult`].
///
/// Without any hierarchy rows the SOC code falls back to the PT's own primary SOC and
/// every name is left empty.
pub fn build_result(
    llt: &LowLevelTerm,
    pt: &PreferredTerm,
    rows: &[HierarchyEntry],
    score: f64,
) -> SearchResult {
    let selected = select_primary(rows);
    let field =
        |get: fn(&HierarchyEntry) -> &str| selected.map(get).unwrap_or_default().to_string();

    SearchResult {
        llt_code: llt.code.clone(),
        llt_name: llt.name.clone(),
        pt_code: pt.code.clone(),
        pt_name: pt.name.clone(),
        active: llt.active,
        soc_code: selected
            .map_or_else(|| pt.primary_soc_code.clone(), |row| row.soc_code.clone()),
        soc_name: field(|row| row.soc_name.as_str()),
        soc_abbrev: field(|row| row.soc_abbrev.as_str()),
        hlgt_code: field(|row| row.hlgt_code.as_str()),
        hlgt_name: field(|row| row.hlgt_name.as_str()),
        hlt_code: field(|row| row.hlt_code.as_str()),
        hlt_name: field(|row| row.hlt_name.as_str()),
        primary_soc: selected.map(|row| row.is_primary),
        hierarchies: rows.to_vec(),
        score: round_score(score),
    }
}
