//! Shared test utilities for the report-registry test suite.
//!
//! Provides a small sample registry, lookup helpers that panic with the
//! available ids on a miss, and assertions over report order.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let registry = sample_registry();
//! let budget = find_report(&registry, "finance", "budget");
//! assert_eq!(budget.name, "Budget Dashboard");
//!
//! assert_report_ids(&registry, "finance", &["budget", "cleargov"]);
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::registry::{Registry, RegistryBuilder, ReportSpec};
use crate::types::{Group, GroupSeed, Report};

// =========================================================================
// Fixtures
// =========================================================================

/// Builder holding three groups: finance (budget, cleargov), warehouse
/// (stock_by_storeroom) and water_resources (hydrant_history).
pub fn sample_builder() -> RegistryBuilder {
    let mut builder = RegistryBuilder::default();
    builder.seed_groups([
        GroupSeed::new("finance", "Finance", "/groups/finance/").icon("fas fa-dollar-sign"),
        GroupSeed::new("warehouse", "Warehouse", "/groups/warehouse/").icon("fas fa-warehouse"),
        GroupSeed::new("water_resources", "Water Resources", "/groups/water_resources/")
            .icon("fas fa-water"),
    ]);
    builder.register_report(ReportSpec::new(
        "budget",
        "Budget Dashboard",
        "/groups/finance/budget/",
        "finance",
    ));
    builder.register_report(ReportSpec::new(
        "cleargov",
        "ClearGov Budget Visualizations",
        "/groups/finance/cleargov/",
        "finance",
    ));
    builder.register_report(ReportSpec::new(
        "stock_by_storeroom",
        "Stock By Storeroom",
        "/groups/warehouse/stock_by_storeroom/",
        "warehouse",
    ));
    builder.register_report(ReportSpec::new(
        "hydrant_history",
        "Hydrant History",
        "/groups/water_resources/hydrant_history/",
        "water_resources",
    ));
    builder
}

/// Sealed version of [`sample_builder`].
pub fn sample_registry() -> Registry {
    sample_builder().finish()
}

/// Write `contents` to `dashboard.toml` in a fresh temp directory.
///
/// Returns the directory (keep it alive for the duration of the test) and
/// the config path.
pub fn write_config(contents: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("dashboard.toml");
    std::fs::write(&path, contents).unwrap();
    (tmp, path)
}

/// Path that is guaranteed not to exist inside `dir`.
pub fn missing_config(dir: &Path) -> PathBuf {
    dir.join("does-not-exist.toml")
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find a group by id. Panics if not found.
pub fn find_group<'a>(registry: &'a Registry, id: &str) -> &'a Group {
    registry.group(id).unwrap_or_else(|| {
        let ids = group_ids(registry);
        panic!("group '{id}' not found. Available: {ids:?}")
    })
}

/// Find a report by id within the group that owns it. Panics if not found.
pub fn find_report<'a>(registry: &'a Registry, group_id: &str, report_id: &str) -> &'a Report {
    let group = find_group(registry, group_id);
    group
        .reports
        .iter()
        .find(|r| r.id == report_id)
        .unwrap_or_else(|| {
            let ids: Vec<&str> = group.reports.iter().map(|r| r.id.as_str()).collect();
            panic!("report '{report_id}' not found in group '{group_id}'. Available: {ids:?}")
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All group ids in registration order.
pub fn group_ids(registry: &Registry) -> Vec<&str> {
    registry.groups().map(|g| g.id.as_str()).collect()
}

/// Ids of the reports owned by `group_id`, in registration order.
pub fn report_ids<'a>(registry: &'a Registry, group_id: &str) -> Vec<&'a str> {
    registry
        .group_reports(group_id)
        .iter()
        .map(|r| r.id.as_str())
        .collect()
}

/// Assert the exact ids (and order) of the reports owned by `group_id`.
pub fn assert_report_ids(registry: &Registry, group_id: &str, expected: &[&str]) {
    assert_eq!(
        report_ids(registry, group_id),
        expected.to_vec(),
        "reports of group '{group_id}' mismatch"
    );
}
