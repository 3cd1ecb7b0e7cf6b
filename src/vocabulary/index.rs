//! Lookup structures over a parsed vocabulary.

use super::{HierarchyEntry, LowLevelTerm, PreferredTerm, parse};
use ahash::AHashMap;
use serde::Serialize;

/// An immutable, fully indexed vocabulary.
///
/// Built once per load and shared behind an `Arc`; a reload builds a new one and swaps
/// it in wholesale.
#[derive(Debug, Default)]
pub struct Vocabulary {
    llts: Vec<LowLevelTerm>,
    pts: AHashMap<String, PreferredTerm>,
    /// PT code → every classification path, in file order.
    hierarchy: AHashMap<String, Vec<HierarchyEntry>>,
    /// PT code → indices into `llts`.
    llts_by_pt: AHashMap<String, Vec<usize>>,
    /// SOC code → PT codes classified there on a primary path.
    pts_by_soc: AHashMap<String, Vec<String>>,
    /// HLT code → PT codes classified there on a primary path.
    pts_by_hlt: AHashMap<String, Vec<String>>,
    hierarchy_rows: usize,
}

/// Record counts for status display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VocabularyStats {
    pub llts: usize,
    pub active_llts: usize,
    pub pts: usize,
    pub hierarchy_rows: usize,
}

impl Vocabulary {
    /// Build the indices over already-parsed records.
    ///
    /// Duplicate PT codes keep the last row. Hierarchy rows are never deduplicated.
    pub fn build(
        llts: Vec<LowLevelTerm>,
        pts: Vec<PreferredTerm>,
        hierarchy_rows: Vec<HierarchyEntry>,
    ) -> Self {
        let pts: AHashMap<String, PreferredTerm> =
            pts.into_iter().map(|pt| (pt.code.clone(), pt)).collect();

        let mut llts_by_pt: AHashMap<String, Vec<usize>> = AHashMap::new();
        for (idx, llt) in llts.iter().enumerate() {
            llts_by_pt
                .entry(llt.parent_code.clone())
                .or_default()
                .push(idx);
        }

        let row_count = hierarchy_rows.len();
        let mut hierarchy: AHashMap<String, Vec<HierarchyEntry>> = AHashMap::new();
        let mut pts_by_soc: AHashMap<String, Vec<String>> = AHashMap::new();
        let mut pts_by_hlt: AHashMap<String, Vec<String>> = AHashMap::new();
        for entry in hierarchy_rows {
            if entry.is_primary {
                push_unique(&mut pts_by_soc, &entry.soc_code, &entry.pt_code);
                push_unique(&mut pts_by_hlt, &entry.hlt_code, &entry.pt_code);
            }
            hierarchy
                .entry(entry.pt_code.clone())
                .or_default()
                .push(entry);
        }

        Self {
            llts,
            pts,
            hierarchy,
            llts_by_pt,
            pts_by_soc,
            pts_by_hlt,
            hierarchy_rows: row_count,
        }
    }

    /// Parse the three raw files and build the indices.
    pub fn parse(llt_text: &str, pt_text: &str, hierarchy_text: &str) -> Self {
        Self::build(
            parse::parse_llts(llt_text),
            parse::parse_pts(pt_text),
            parse::parse_hierarchy(hierarchy_text),
        )
    }

    /// All LLTs in file order.
    pub fn llts(&self) -> &[LowLevelTerm] {
        &self.llts
    }

    pub fn pt(&self, code: &str) -> Option<&PreferredTerm> {
        self.pts.get(code)
    }

    /// Classification paths for a PT, in file order. Empty if the PT has none.
    pub fn hierarchy(&self, pt_code: &str) -> &[HierarchyEntry] {
        self.hierarchy.get(pt_code).map(Vec::as_slice).unwrap_or_default()
    }

    /// LLTs mapped to a PT, in file order.
    pub fn llts_for_pt<'a>(&'a self, pt_code: &str) -> impl Iterator<Item = &'a LowLevelTerm> {
        self.llts_by_pt
            .get(pt_code)
            .into_iter()
            .flatten()
            .map(|&idx| &self.llts[idx])
    }

    /// PT codes whose primary path lies in the given SOC.
    pub fn pts_in_soc(&self, soc_code: &str) -> &[String] {
        self.pts_by_soc.get(soc_code).map(Vec::as_slice).unwrap_or_default()
    }

    /// PT codes whose primary path lies under the given HLT.
    pub fn pts_in_hlt(&self, hlt_code: &str) -> &[String] {
        self.pts_by_hlt.get(hlt_code).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.llts.is_empty() && self.pts.is_empty() && self.hierarchy_rows == 0
    }

    pub fn stats(&self) -> VocabularyStats {
        VocabularyStats {
            llts: self.llts.len(),
            active_llts: self.llts.iter().filter(|llt| llt.active).count(),
            pts: self.pts.len(),
            hierarchy_rows: self.hierarchy_rows,
        }
    }
}

fn push_unique(map: &mut AHashMap<String, Vec<String>>, key: &str, value: &str) {
    let values = map.entry(key.to_string()).or_default();
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    fn hier(pt: &str, hlt: &str, soc: &str, primary: bool) -> HierarchyEntry {
        HierarchyEntry {
            pt_code: pt.to_string(),
            hlt_code: hlt.to_string(),
            soc_code: soc.to_string(),
            is_primary: primary,
            ..HierarchyEntry::default()
        }
    }

    fn sample() -> Vocabulary {
        Vocabulary::build(
            vec![
                LowLevelTerm::new("L1", "headache", "P1", true),
                LowLevelTerm::new("L2", "head pain", "P1", false),
                LowLevelTerm::new("L3", "nausea", "P2", true),
            ],
            vec![
                PreferredTerm::new("P1", "Headache", "S1"),
                PreferredTerm::new("P2", "Nausea", "S2"),
            ],
            vec![
                hier("P1", "H1", "S1", true),
                hier("P1", "H9", "S9", false),
                hier("P2", "H1", "S2", true),
                hier("P2", "H1", "S2", true),
            ],
        )
    }

    #[test]
    fn test_hierarchy_rows_kept_in_order_without_dedup() {
        let vocab = sample();
        let rows = vocab.hierarchy("P1");
        check!(rows.len() == 2);
        check!(rows[0].soc_code == "S1");
        check!(rows[1].soc_code == "S9");
        check!(vocab.hierarchy("P2").len() == 2);
        check!(vocab.hierarchy("P404").is_empty());
    }

    #[test]
    fn test_llts_for_pt() {
        let vocab = sample();
        let codes: Vec<&str> = vocab.llts_for_pt("P1").map(|l| l.code.as_str()).collect();
        check!(codes == vec!["L1", "L2"]);
        check!(vocab.llts_for_pt("P404").count() == 0);
    }

    #[test]
    fn test_primary_groupings() {
        let vocab = sample();
        check!(vocab.pts_in_hlt("H1") == ["P1".to_string(), "P2".to_string()]);
        check!(vocab.pts_in_soc("S9").is_empty());
        check!(vocab.pts_in_soc("S2") == ["P2".to_string()]);
    }

    #[test]
    fn test_stats() {
        let stats = sample().stats();
        check!(
            stats
                == VocabularyStats {
                    llts: 3,
                    active_llts: 2,
                    pts: 2,
                    hierarchy_rows: 4,
                }
        );
        check!(Vocabulary::default().is_empty());
    }
}
