//! Everything known about a single Preferred Term.

use super::result::select_primary;
use crate::vocabulary::{HierarchyEntry, Vocabulary};
use serde::Serialize;

/// Most LLTs listed per PT.
const LLT_LIMIT: usize = 10;

/// Most sibling PTs listed per PT.
const RELATED_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermSummary {
    pub code: String,
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedTerm {
    pub code: String,
    pub name: String,
}

/// A PT with its classification paths, member LLTs and siblings under the same HLT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PtDetails {
    pub pt_code: String,
    pub pt_name: String,
    /// The path chosen by [`select_primary`]; `None` when the PT has no paths.
    pub primary: Option<HierarchyEntry>,
    /// Every other path, in file order.
    pub secondary: Vec<HierarchyEntry>,
    pub llts: Vec<TermSummary>,
    /// Other PTs whose primary path shares this PT's primary HLT.
    pub related: Vec<RelatedTerm>,
}

/// Look up a PT by code. `None` when the vocabulary has no such PT.
pub fn pt_details(vocab: &Vocabulary, pt_code: &str) -> Option<PtDetails> {
    let pt = vocab.pt(pt_code)?;
    let rows = vocab.hierarchy(pt_code);
    let primary = select_primary(rows);

    let secondary = rows
        .iter()
        .filter(|row| !primary.is_some_and(|selected| std::ptr::eq(*row, selected)))
        .cloned()
        .collect();

    let llts = vocab
        .llts_for_pt(pt_code)
        .take(LLT_LIMIT)
        .map(|llt| TermSummary {
            code: llt.code.clone(),
            name: llt.name.clone(),
            active: llt.active,
        })
        .collect();

    let related = primary
        .map(|row| vocab.pts_in_hlt(&row.hlt_code))
        .unwrap_or_default()
        .iter()
        .filter(|code| code.as_str() != pt_code)
        .filter_map(|code| vocab.pt(code))
        .take(RELATED_LIMIT)
        .map(|sibling| RelatedTerm {
            code: sibling.code.clone(),
            name: sibling.name.clone(),
        })
        .collect();

    Some(PtDetails {
        pt_code: pt.code.clone(),
        pt_name: pt.name.clone(),
        primary: primary.cloned(),
        secondary,
        llts,
        related,
    })
}
