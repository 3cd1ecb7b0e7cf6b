use crate::vocabulary::HierarchyEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One matched LLT joined with its PT and classification paths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub llt_code: String,
    pub llt_name: String,
    pub pt_code: String,
    pub pt_name: String,
    pub active: bool,
    pub soc_code: String,
    pub soc_name: String,
    pub soc_abbrev: String,
    pub hlgt_code: String,
    pub hlgt_name: String,
    pub hlt_code: String,
    pub hlt_name: String,
    /// Whether the selected path is flagged primary; `None` when the PT has no paths.
    pub primary_soc: Option<bool>,
    /// Every classification path of the PT, primary and secondary.
    pub hierarchies: Vec<HierarchyEntry>,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Substring match on folded term names.
    #[default]
    Exact,
    /// Edit-distance match with synonym hints.
    Approximate,
    /// Exact first, approximate when exact finds nothing.
    Auto,
}

impl SearchMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Approximate => "approximate",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "approximate" | "approx" | "fuzzy" => Ok(Self::Approximate),
            "auto" => Ok(Self::Auto),
            other => Err(format!("unknown search mode '{}'", other)),
        }
    }
}

/// Per-query knobs. `limit` is expected to be clamped already.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub limit: usize,
    pub include_inactive: bool,
}

impl SearchOptions {
    pub const fn new(limit: usize, include_inactive: bool) -> Self {
        Self {
            limit,
            include_inactive,
        }
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::new(10, false)
    }
}

/// Ranked results plus how they were produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    /// The mode that produced `results` (never `Auto`).
    pub mode: SearchMode,
    pub approximate_used: bool,
}

impl SearchOutcome {
    pub const fn empty(mode: SearchMode) -> Self {
        Self {
            results: Vec::new(),
            mode,
            approximate_used: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }
}
