//! Parsing of the `$`-delimited MedDRA ASCII distribution files.
//!
//! Every line is split on `$` and right-padded to a fixed field count, so short or
//! truncated rows read as empty strings rather than failing. Rows missing a key field
//! are skipped.

use super::{HierarchyEntry, LowLevelTerm, PreferredTerm};

/// Field delimiter used by all three files.
const DELIMITER: char = '$';

/// Fields per `llt.asc` row.
pub const LLT_FIELD_COUNT: usize = 12;
/// Fields per `pt.asc` row.
pub const PT_FIELD_COUNT: usize = 12;
/// Fields per `mdhier.asc` row.
pub const HIERARCHY_FIELD_COUNT: usize = 13;

// llt.asc
const LLT_CODE: usize = 0;
const LLT_NAME: usize = 1;
const LLT_PT_CODE: usize = 2;
const LLT_CURRENCY: usize = 9;

// pt.asc
const PT_CODE: usize = 0;
const PT_NAME: usize = 1;
const PT_SOC_CODE: usize = 3;

// mdhier.asc
const HIER_PT_CODE: usize = 0;
const HIER_HLT_CODE: usize = 1;
const HIER_HLGT_CODE: usize = 2;
const HIER_SOC_CODE: usize = 3;
const HIER_PT_NAME: usize = 4;
const HIER_HLT_NAME: usize = 5;
const HIER_HLGT_NAME: usize = 6;
const HIER_SOC_NAME: usize = 7;
const HIER_SOC_ABBREV: usize = 8;
const HIER_PRIMARY_FLAG: usize = 11;

/// Split a line on `$` and pad it with empty fields up to `expected`.
///
/// Rows longer than `expected` keep their extra fields.
pub fn pad_fields(line: &str, expected: usize) -> Vec<&str> {
    let mut fields: Vec<&str> = line.split(DELIMITER).collect();
    if fields.len() < expected {
        fields.resize(expected, "");
    }
    fields
}

fn is_yes(flag: &str) -> bool {
    flag.trim().eq_ignore_ascii_case("y")
}

/// Non-empty lines of `text`, with their padded fields.
fn rows(text: &str, expected: usize) -> impl Iterator<Item = Vec<&str>> {
    text.lines()
        .filter(|line| !line.is_empty())
        .map(move |line| pad_fields(line, expected))
}

/// Parse `llt.asc`. Rows without a code, name or PT code are dropped.
pub fn parse_llts(text: &str) -> Vec<LowLevelTerm> {
    let mut skipped = 0usize;
    let llts: Vec<LowLevelTerm> = rows(text, LLT_FIELD_COUNT)
        .filter_map(|row| {
            let (code, name, pt_code) = (row[LLT_CODE], row[LLT_NAME], row[LLT_PT_CODE]);
            if code.is_empty() || name.is_empty() || pt_code.is_empty() {
                skipped += 1;
                return None;
            }
            Some(LowLevelTerm::new(
                code,
                name,
                pt_code,
                is_yes(row[LLT_CURRENCY]),
            ))
        })
        .collect();

    if skipped > 0 {
        tracing::debug!("Skipped {} malformed LLT rows", skipped);
    }
    llts
}

/// Parse `pt.asc`. Rows without a code or name are dropped.
pub fn parse_pts(text: &str) -> Vec<PreferredTerm> {
    let mut skipped = 0usize;
    let pts: Vec<PreferredTerm> = rows(text, PT_FIELD_COUNT)
        .filter_map(|row| {
            let (code, name) = (row[PT_CODE], row[PT_NAME]);
            if code.is_empty() || name.is_empty() {
                skipped += 1;
                return None;
            }
            Some(PreferredTerm::new(code, name, row[PT_SOC_CODE]))
        })
        .collect();

    if skipped > 0 {
        tracing::debug!("Skipped {} malformed PT rows", skipped);
    }
    pts
}

/// Parse `mdhier.asc`. Rows without a PT code are dropped; order is preserved.
pub fn parse_hierarchy(text: &str) -> Vec<HierarchyEntry> {
    let mut skipped = 0usize;
    let entries: Vec<HierarchyEntry> = rows(text, HIERARCHY_FIELD_COUNT)
        .filter_map(|row| {
            if row[HIER_PT_CODE].is_empty() {
                skipped += 1;
                return None;
            }
            Some(HierarchyEntry {
                pt_code: row[HIER_PT_CODE].to_string(),
                pt_name: row[HIER_PT_NAME].to_string(),
                hlt_code: row[HIER_HLT_CODE].to_string(),
                hlt_name: row[HIER_HLT_NAME].to_string(),
                hlgt_code: row[HIER_HLGT_CODE].to_string(),
                hlgt_name: row[HIER_HLGT_NAME].to_string(),
                soc_code: row[HIER_SOC_CODE].to_string(),
                soc_name: row[HIER_SOC_NAME].to_string(),
                soc_abbrev: row[HIER_SOC_ABBREV].to_string(),
                is_primary: is_yes(row[HIER_PRIMARY_FLAG]),
            })
        })
        .collect();

    if skipped > 0 {
        tracing::debug!("Skipped {} malformed hierarchy rows", skipped);
    }
    entries
}
