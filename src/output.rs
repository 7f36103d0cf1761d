//! CLI output formatting for the `check` and `list` commands.
//!
//! # Entity Display Contract
//!
//! Groups and reports follow the same two-level pattern:
//!
//! 1. **Header line**: positional index + name (+ report count for groups)
//! 2. **Context lines**: indented `URL:`, `Description:`, `Visible in:`
//!
//! # Output Format
//!
//! ## Registry tree
//!
//! ```text
//! 001 Finance (2 reports)
//!     URL: /groups/finance/
//!     001 Budget Dashboard [budget]
//!         URL: /groups/finance/budget/
//!         Description: Trends and analysis Budget
//!     002 ClearGov Budget Visualizations [cleargov]
//!         URL: /groups/finance/cleargov/
//! 002 Public Works (0 reports, disabled)
//!     URL: /groups/public_works/
//!
//! Registered 2 groups, 2 reports
//! ```
//!
//! ## Discovery summary
//!
//! ```text
//! Discovery: 24 registered, 7 skipped, 1 failed
//!     broken.: report id is empty
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::nav::ReportListing;
use crate::registry::Registry;
use crate::scan::DiscoverySummary;
use crate::types::{Group, Report};

const DESCRIPTION_WIDTH: usize = 60;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn group_header(index: usize, group: &Group) -> String {
    let mut detail = plural(group.reports.len(), "report");
    if !group.enabled {
        detail.push_str(", disabled");
    }
    format!("{} {} ({})", format_index(index), group.name, detail)
}

fn report_lines(index: usize, report: &Report, lines: &mut Vec<String>) {
    let disabled = if report.enabled { "" } else { " (disabled)" };
    lines.push(format!(
        "{}{} {} [{}]{}",
        indent(1),
        format_index(index),
        report.name,
        report.id,
        disabled
    ));
    lines.push(format!("{}URL: {}", indent(2), report.url));
    if report.description != format!("{} Report", report.name) {
        lines.push(format!(
            "{}Description: {}",
            indent(2),
            truncate_desc(&report.description, DESCRIPTION_WIDTH)
        ));
    }
    if !report.visible_in.is_empty() {
        lines.push(format!(
            "{}Visible in: {}",
            indent(2),
            report.visible_in.join(", ")
        ));
    }
}

/// Format the full group/report tree followed by a totals line.
pub fn format_registry_tree(registry: &Registry) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, group) in registry.groups().enumerate() {
        lines.push(group_header(i + 1, group));
        lines.push(format!("{}URL: {}", indent(1), group.url));
        for (j, report) in group.reports.iter().enumerate() {
            report_lines(j + 1, report, &mut lines);
        }
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Registered {}, {}",
        plural(registry.group_count(), "group"),
        plural(registry.report_count(), "report")
    ));
    lines
}

pub fn print_registry_tree(registry: &Registry) {
    for line in format_registry_tree(registry) {
        println!("{}", line);
    }
}

/// Format the counts of a discovery pass, then one line per failed module.
pub fn format_discovery_summary(summary: &DiscoverySummary) -> Vec<String> {
    let mut lines = vec![format!(
        "Discovery: {} registered, {} skipped, {} failed",
        summary.registered.len(),
        summary.skipped.len(),
        summary.failed.len()
    )];
    for (module, err) in &summary.failed {
        lines.push(format!("{}{}: {}", indent(1), module, err));
    }
    lines
}

pub fn print_discovery_summary(summary: &DiscoverySummary) {
    for line in format_discovery_summary(summary) {
        println!("{}", line);
    }
}

/// The `/api/reports` body, pretty-printed.
pub fn format_listing_json(registry: &Registry) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ReportListing::from_registry(registry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{RegistryBuilder, ReportSpec};
    use crate::scan::DiscoveryError;
    use crate::test_helpers::*;
    use crate::types::GroupSeed;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_single_digit() {
        assert_eq!(format_index(1), "001");
    }

    #[test]
    fn truncate_desc_short() {
        assert_eq!(truncate_desc("Short text", 40), "Short text");
    }

    #[test]
    fn truncate_desc_long() {
        let text = "a".repeat(50);
        let expected = format!("{}...", "a".repeat(40));
        assert_eq!(truncate_desc(&text, 40), expected);
    }

    #[test]
    fn truncate_desc_multibyte() {
        assert_eq!(truncate_desc("ééé", 2), "éé...");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "report"), "1 report");
        assert_eq!(plural(0, "report"), "0 reports");
    }

    // =========================================================================
    // Registry tree
    // =========================================================================

    #[test]
    fn tree_lists_groups_then_reports() {
        let lines = format_registry_tree(&sample_registry());
        assert_eq!(lines[0], "001 Finance (2 reports)");
        assert_eq!(lines[1], "    URL: /groups/finance/");
        assert_eq!(lines[2], "    001 Budget Dashboard [budget]");
        assert_eq!(lines[3], "        URL: /groups/finance/budget/");
        assert_eq!(lines.last().unwrap(), "Registered 3 groups, 4 reports");
    }

    #[test]
    fn default_description_is_not_repeated() {
        let lines = format_registry_tree(&sample_registry());
        assert!(!lines.iter().any(|l| l.contains("Description:")));
    }

    #[test]
    fn tree_shows_disabled_and_visibility() {
        let mut builder = RegistryBuilder::default();
        builder.register_group(
            GroupSeed::new("public_works", "Public Works", "/groups/public_works/").enabled(false),
        );
        builder.register_report(
            ReportSpec::new(
                "work_order_search",
                "Work Order Search",
                "/groups/public_works/work_orders/search",
                "public_works",
            )
            .description("Search for specific a work order")
            .enabled(false)
            .visible_in(["public_works", "finance"]),
        );
        let lines = format_registry_tree(&builder.finish());

        assert_eq!(lines[0], "001 Public Works (1 report, disabled)");
        assert_eq!(lines[2], "    001 Work Order Search [work_order_search] (disabled)");
        assert!(lines.contains(&"        Description: Search for specific a work order".to_string()));
        assert!(lines.contains(&"        Visible in: public_works, finance".to_string()));
    }

    #[test]
    fn empty_registry_only_has_totals() {
        let lines = format_registry_tree(&Registry::default());
        assert_eq!(lines, vec!["Registered 0 groups, 0 reports"]);
    }

    // =========================================================================
    // Discovery summary and listing
    // =========================================================================

    #[test]
    fn summary_lists_failures() {
        let summary = DiscoverySummary {
            registered: vec![("finance".to_string(), "budget".to_string())],
            skipped: vec!["finance".to_string()],
            failed: vec![("finance.".to_string(), DiscoveryError::EmptyReportId)],
        };
        let lines = format_discovery_summary(&summary);
        assert_eq!(lines[0], "Discovery: 1 registered, 1 skipped, 1 failed");
        assert_eq!(lines[1], "    finance.: report id is empty");
    }

    #[test]
    fn listing_json_matches_api_shape() {
        let registry = sample_registry();
        let json = format_listing_json(&registry).unwrap();
        let parsed: ReportListing = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.reports.len(), registry.report_count());
    }
}
