//! Plain-text rendering of search results, PT details and batch progress.

use crate::autosearch::{AutoSearchEvent, AutoSearchSummary};
use crate::search::PtDetails;
use crate::types::{SearchOutcome, SearchResult};
use crate::vocabulary::{HierarchyEntry, VocabularyStats};
use std::fmt::Write as _;

/// Render ranked results as a numbered list, one block per result.
pub fn format_outcome(query: &str, outcome: &SearchOutcome) -> String {
    if outcome.is_empty() {
        return format!("No results found for '{}'.\n", query);
    }

    let mut output = format!("Results for '{}' ({} search", query, outcome.mode);
    if outcome.approximate_used {
        output.push_str(", approximate");
    }
    output.push_str("):\n\n");

    for (idx, result) in outcome.results.iter().enumerate() {
        let _ = writeln!(output, "[{}] {}", idx + 1, format_result(result));
    }
    output
}

/// One result as an indented block.
pub fn format_result(result: &SearchResult) -> String {
    let mut output = format!(
        "{} ({}) - score {:.2}",
        result.llt_name, result.llt_code, result.score
    );
    if !result.active {
        output.push_str(" [inactive]");
    }
    let _ = write!(output, "\n    PT:   {} ({})", result.pt_name, result.pt_code);
    if !result.hlt_code.is_empty() {
        let _ = write!(output, "\n    HLT:  {} ({})", result.hlt_name, result.hlt_code);
        let _ = write!(output, "\n    HLGT: {} ({})", result.hlgt_name, result.hlgt_code);
    }
    let soc = soc_label(&result.soc_name, &result.soc_abbrev, &result.soc_code);
    let _ = write!(output, "\n    SOC:  {}", soc);
    if result.primary_soc == Some(false) {
        output.push_str(" [no primary path]");
    }
    // every path except the one shown above
    let secondary = result.hierarchies.len().saturating_sub(1);
    if secondary > 0 {
        let _ = write!(output, "\n    + {} secondary path(s)", secondary);
    }
    output.push('\n');
    output
}

pub fn format_details(details: &PtDetails) -> String {
    let mut output = format!("{} ({})\n", details.pt_name, details.pt_code);

    match &details.primary {
        Some(primary) => {
            output.push_str("\nPrimary path:\n");
            output.push_str(&format_path(primary));
        }
        None => output.push_str("\nNo classification paths.\n"),
    }

    if !details.secondary.is_empty() {
        output.push_str("\nSecondary paths:\n");
        for (idx, row) in details.secondary.iter().enumerate() {
            let _ = writeln!(
                output,
                "  [{}] {} > {}",
                idx + 1,
                soc_label(&row.soc_name, &row.soc_abbrev, &row.soc_code),
                row.hlt_name
            );
        }
    }

    if !details.llts.is_empty() {
        let _ = writeln!(output, "\nLLTs ({}):", details.llts.len());
        for llt in &details.llts {
            let marker = if llt.active { "" } else { " [inactive]" };
            let _ = writeln!(output, "  • {} ({}){}", llt.name, llt.code, marker);
        }
    }

    if !details.related.is_empty() {
        let _ = writeln!(output, "\nRelated PTs, same HLT ({}):", details.related.len());
        for related in &details.related {
            let _ = writeln!(output, "  • {} ({})", related.name, related.code);
        }
    }

    output
}

fn format_path(row: &HierarchyEntry) -> String {
    format!(
        "  SOC:  {}\n  HLGT: {} ({})\n  HLT:  {} ({})\n  PT:   {} ({})\n",
        soc_label(&row.soc_name, &row.soc_abbrev, &row.soc_code),
        row.hlgt_name,
        row.hlgt_code,
        row.hlt_name,
        row.hlt_code,
        row.pt_name,
        row.pt_code
    )
}

fn soc_label(name: &str, abbrev: &str, code: &str) -> String {
    match (name.is_empty(), abbrev.is_empty()) {
        (true, _) => code.to_string(),
        (false, true) => format!("{} ({})", name, code),
        (false, false) => format!("{} ({}, {})", name, abbrev, code),
    }
}

/// A batch progress line.
pub fn format_event(event: &AutoSearchEvent) -> String {
    match event {
        AutoSearchEvent::Status {
            index,
            term,
            status,
            result_count,
            ..
        } => format!("[{}] {}: {} ({} results)", index + 1, term, status, result_count),
        AutoSearchEvent::Finished { summary, .. } => format_summary(summary),
    }
}

pub fn format_summary(summary: &AutoSearchSummary) -> String {
    format!(
        "Batch finished: {} terms processed, {} failed, {} results",
        summary.terms_processed, summary.terms_failed, summary.total_results
    )
}

pub fn format_stats(stats: &VocabularyStats) -> String {
    format!(
        "{} LLTs ({} active), {} PTs, {} hierarchy rows",
        stats.llts, stats.active_llts, stats.pts, stats.hierarchy_rows
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autosearch::TermStatus;
    use crate::search::{build_result, fixtures::vocabulary, pt_details, search_exact};
    use crate::types::{SearchMode, SearchOptions};
    use crate::vocabulary::{LowLevelTerm, PreferredTerm};
    use assert2::check;

    #[test]
    fn test_format_outcome() {
        let outcome = search_exact(
            &vocabulary(),
            "headache",
            SearchOptions::new(1, false),
            &crate::config::ExactScoring::default(),
        );
        let text = format_outcome("headache", &outcome);
        check!(text.starts_with("Results for 'headache' (exact search):"));
        check!(text.contains("[1] headache (L1) - score 100.00"));
        check!(text.contains("SOC:  Nervous system disorders (Nerv, S1)"));
        check!(text.contains("+ 1 secondary path(s)"));
    }

    #[test]
    fn test_format_result_without_flagged_primary() {
        let llt = LowLevelTerm::new("L1", "headache", "P1", true);
        let pt = PreferredTerm::new("P1", "Headache", "S0");
        let row = |soc: &str| HierarchyEntry {
            pt_code: "P1".to_string(),
            soc_code: soc.to_string(),
            ..HierarchyEntry::default()
        };

        let result = build_result(&llt, &pt, &[row("S1"), row("S2")], 100.0);
        let text = format_result(&result);
        check!(text.contains("SOC:  S1 [no primary path]"));
        check!(text.contains("+ 1 secondary path(s)"));
    }

    #[test]
    fn test_format_result_with_two_flagged_rows() {
        let llt = LowLevelTerm::new("L1", "headache", "P1", true);
        let pt = PreferredTerm::new("P1", "Headache", "S0");
        let row = |soc: &str| HierarchyEntry {
            pt_code: "P1".to_string(),
            soc_code: soc.to_string(),
            is_primary: true,
            ..HierarchyEntry::default()
        };

        let result = build_result(&llt, &pt, &[row("S1"), row("S2"), row("S3")], 100.0);
        check!(format_result(&result).contains("+ 2 secondary path(s)"));
    }

    #[test]
    fn test_format_empty_outcome() {
        let text = format_outcome("xyz", &SearchOutcome::empty(SearchMode::Exact));
        check!(text == "No results found for 'xyz'.\n");
    }

    #[test]
    fn test_format_details() {
        let details = pt_details(&vocabulary(), "P1").unwrap();
        let text = format_details(&details);
        check!(text.starts_with("Headache (P1)\n"));
        check!(text.contains("HLT:  Headaches NEC (H1)"));
        check!(text.contains("[1] General disorders (Genrl, S9) > Pain NEC"));
        check!(text.contains("• head pain (L2) [inactive]"));
        check!(text.contains("• 두통 (P3)"));
    }

    #[test]
    fn test_format_event() {
        let event = AutoSearchEvent::Status {
            run_id: 1,
            index: 0,
            term: "두통".to_string(),
            status: TermStatus::Completed,
            result_count: 3,
        };
        check!(format_event(&event) == "[1] 두통: completed (3 results)");
    }
}
