//! In-memory MedDRA vocabulary: record types, `$`-delimited parsing, lookup indices,
//! and the sources the raw text is fetched from.

pub(crate) mod index;
pub(crate) mod parse;
pub(crate) mod source;

pub use index::{Vocabulary, VocabularyStats};
pub use parse::{
    HIERARCHY_FIELD_COUNT, LLT_FIELD_COUNT, PT_FIELD_COUNT, pad_fields, parse_hierarchy,
    parse_llts, parse_pts,
};
pub use source::{DirectorySource, StaticSource, VocabularyFile, VocabularySource};

use crate::text;
use serde::Serialize;

/// A Lowest-Level Term: the most granular coded term a reported symptom maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowLevelTerm {
    pub code: String,
    pub name: String,
    /// Code of the Preferred Term this LLT maps to.
    pub parent_code: String,
    pub active: bool,
    /// Case-folded name, matched against by exact search.
    #[serde(skip)]
    pub folded_name: String,
    /// Case-folded, whitespace-free name, compared against by approximate search.
    #[serde(skip)]
    pub compact_name: String,
}

impl LowLevelTerm {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        parent_code: impl Into<String>,
        active: bool,
    ) -> Self {
        let name = name.into();
        Self {
            code: code.into(),
            folded_name: text::fold_case(&name),
            compact_name: text::compact(&name),
            name,
            parent_code: parent_code.into(),
            active,
        }
    }
}

/// A Preferred Term grouping one or more LLTs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreferredTerm {
    pub code: String,
    pub name: String,
    /// SOC used when the PT has no hierarchy rows at all.
    pub primary_soc_code: String,
}

impl PreferredTerm {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        primary_soc_code: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            primary_soc_code: primary_soc_code.into(),
        }
    }
}

/// One PT → HLT → HLGT → SOC classification path.
///
/// A PT may sit under several SOCs; exactly one path is normally flagged primary,
/// though raw data can flag none or several.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HierarchyEntry {
    pub pt_code: String,
    pub pt_name: String,
    pub hlt_code: String,
    pub hlt_name: String,
    pub hlgt_code: String,
    pub hlgt_name: String,
    pub soc_code: String,
    pub soc_name: String,
    pub soc_abbrev: String,
    #[serde(rename = "primary")]
    pub is_primary: bool,
}
