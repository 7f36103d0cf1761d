//! Group/report store.
//!
//! The store has two shapes, one per startup phase:
//!
//! - [`RegistryBuilder`] is the *assembling* registry. It owns all mutation
//!   (`register_group`, `register_report`) and tracks which startup [`Phase`]
//!   has been reached.
//! - [`Registry`] is the sealed, immutable catalog produced by
//!   [`RegistryBuilder::finish`]. It is shared behind an `Arc` with every
//!   request handler and has no mutating methods, so registration after the
//!   server starts is impossible rather than merely discouraged.
//!
//! ## Healing
//!
//! Registering a report for a group that does not exist yet synthesizes a
//! placeholder group (title-cased id, `/groups/{id}/`) instead of failing. No
//! store operation can fail.
//!
//! ## Re-registration
//!
//! Re-registering a group updates its display fields and keeps its reports.
//! Re-registering a `(group_id, report_id)` pair follows the builder's
//! [`DuplicatePolicy`].

use crate::naming::{display_title, group_url};
use crate::types::{DEFAULT_GROUP_ICON, DEFAULT_REPORT_ICON, Group, GroupSeed, Report};
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// How a repeated `(group_id, report_id)` registration is stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Replace the existing report in place, keeping its position.
    #[default]
    Upsert,
    /// Store another copy after the existing one.
    Append,
}

/// Startup phases of the registry, in the order they are reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    #[default]
    Empty,
    GroupsSeeded,
    ModulesScanned,
    Ready,
}

/// Everything needed to register one report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSpec {
    pub id: String,
    pub name: String,
    pub url: String,
    pub group_id: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub enabled: bool,
    pub visible_in: Vec<String>,
}

impl ReportSpec {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
        group_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
            group_id: group_id.into(),
            description: None,
            icon: None,
            enabled: true,
            visible_in: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn visible_in<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.visible_in = groups.into_iter().map(Into::into).collect();
        self
    }

    fn into_report(self) -> Report {
        let description = self
            .description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format!("{} Report", self.name));
        let icon = self
            .icon
            .filter(|i| !i.is_empty())
            .unwrap_or_else(|| DEFAULT_REPORT_ICON.to_string());
        Report {
            id: self.id,
            name: self.name,
            url: self.url,
            description,
            group_id: self.group_id,
            icon,
            enabled: self.enabled,
            visible_in: self.visible_in,
        }
    }
}

impl GroupSeed {
    pub fn new(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
            description: None,
            icon: None,
            enabled: true,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Placeholder for a group referenced before it was registered.
    fn placeholder(group_id: &str) -> Self {
        Self::new(group_id, display_title(group_id), group_url(group_id))
    }

    fn into_group(self, reports: Vec<Report>) -> Group {
        let description = self
            .description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format!("{} Reports", self.name));
        let icon = self
            .icon
            .filter(|i| !i.is_empty())
            .unwrap_or_else(|| DEFAULT_GROUP_ICON.to_string());
        Group {
            id: self.id,
            name: self.name,
            url: self.url,
            description,
            icon,
            enabled: self.enabled,
            reports,
        }
    }
}

/// Sealed report catalog. Read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Registry {
    groups: IndexMap<String, Group>,
}

impl Registry {
    /// All groups, in registration order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.get(id)
    }

    /// Every report of every group, group by group.
    pub fn all_reports(&self) -> Vec<&Report> {
        self.groups.values().flat_map(|g| g.reports.iter()).collect()
    }

    /// Reports owned by `id`. Empty for unknown groups.
    pub fn group_reports(&self, id: &str) -> &[Report] {
        self.groups
            .get(id)
            .map(|g| g.reports.as_slice())
            .unwrap_or_default()
    }

    /// Reports to list on the dashboard of `id`, honouring `visible_in`.
    pub fn visible_reports(&self, id: &str) -> Vec<&Report> {
        self.groups
            .values()
            .flat_map(|g| g.reports.iter())
            .filter(|r| r.is_visible_in(id))
            .collect()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn report_count(&self) -> usize {
        self.groups.values().map(|g| g.reports.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Assembling registry: the only place reports and groups can be added.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: Registry,
    policy: DuplicatePolicy,
    phase: Phase,
}

impl RegistryBuilder {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            registry: Registry::default(),
            policy,
            phase: Phase::Empty,
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Read access while still assembling.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Insert a group, or update the display fields of an existing one.
    pub fn register_group(&mut self, seed: GroupSeed) -> &Group {
        match self.registry.groups.entry(seed.id.clone()) {
            Entry::Occupied(mut entry) => {
                let reports = std::mem::take(&mut entry.get_mut().reports);
                info!("Updated report group: {}", seed.id);
                entry.insert(seed.into_group(reports));
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                info!("Registered report group: {}", seed.id);
                entry.insert(seed.into_group(Vec::new()))
            }
        }
    }

    /// Register every seed, then mark the groups as seeded.
    pub fn seed_groups(&mut self, seeds: impl IntoIterator<Item = GroupSeed>) {
        for seed in seeds {
            self.register_group(seed);
        }
        self.advance(Phase::GroupsSeeded);
    }

    /// Add a report to its group, creating a placeholder group if needed.
    pub fn register_report(&mut self, spec: ReportSpec) -> &Report {
        let group = match self.registry.groups.entry(spec.group_id.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                warn!(
                    "Group {} not found for report {}, creating placeholder",
                    spec.group_id, spec.id
                );
                info!("Registered report group: {}", spec.group_id);
                entry.insert(GroupSeed::placeholder(&spec.group_id).into_group(Vec::new()))
            }
        };

        let report = spec.into_report();
        let existing = match self.policy {
            DuplicatePolicy::Upsert => group.reports.iter().position(|r| r.id == report.id),
            DuplicatePolicy::Append => None,
        };
        let slot = match existing {
            Some(idx) => {
                info!("Replaced report: {} in group {}", report.id, report.group_id);
                group.reports[idx] = report;
                idx
            }
            None => {
                info!("Registered report: {} in group {}", report.id, report.group_id);
                group.reports.push(report);
                group.reports.len() - 1
            }
        };
        &group.reports[slot]
    }

    /// Move forward to `phase`. Never moves backwards.
    pub(crate) fn advance(&mut self, phase: Phase) {
        if phase > self.phase {
            debug!("Registry phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// Seal the registry for serving.
    pub fn finish(mut self) -> Registry {
        self.advance(Phase::Ready);
        info!(
            "Report registry initialized with {} groups and {} reports",
            self.registry.group_count(),
            self.registry.report_count()
        );
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use serde_json::json;

    #[test]
    fn registered_groups_are_found_by_id() {
        let mut builder = RegistryBuilder::default();
        builder.register_group(GroupSeed::new("finance", "Finance", "/groups/finance/"));
        builder.register_group(GroupSeed::new("warehouse", "Warehouse", "/groups/warehouse/"));
        let registry = builder.finish();

        for id in ["finance", "warehouse"] {
            assert_eq!(find_group(&registry, id).id, id);
        }
    }

    #[test]
    fn groups_keep_registration_order() {
        let registry = sample_registry();
        let ids: Vec<&str> = registry.groups().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["finance", "warehouse", "water_resources"]);
    }

    #[test]
    fn group_defaults_applied() {
        let mut builder = RegistryBuilder::default();
        let group = builder.register_group(GroupSeed::new("finance", "Finance", "/groups/finance/"));
        assert_eq!(group.description, "Finance Reports");
        assert_eq!(group.icon, "fas fa-folder");
        assert!(group.enabled);
        assert!(group.reports.is_empty());
    }

    #[test]
    fn budget_report_matches_expected_record() {
        let mut builder = RegistryBuilder::default();
        builder.register_group(GroupSeed::new("finance", "Finance", "/groups/finance/"));
        builder.register_report(ReportSpec::new(
            "budget",
            "Budget Dashboard",
            "/groups/finance/budget/",
            "finance",
        ));
        let registry = builder.finish();

        let expected = json!([{
            "id": "budget",
            "name": "Budget Dashboard",
            "url": "/groups/finance/budget/",
            "description": "Budget Dashboard Report",
            "group_id": "finance",
            "icon": "fas fa-file-alt",
            "enabled": true
        }]);
        assert_eq!(
            serde_json::to_value(registry.group_reports("finance")).unwrap(),
            expected
        );
        assert_eq!(
            find_group(&registry, "finance").reports.as_slice(),
            registry.group_reports("finance")
        );
    }

    #[test]
    fn unknown_group_gets_placeholder() {
        let mut builder = RegistryBuilder::default();
        builder.register_report(ReportSpec::new(
            "hydrant_history",
            "Hydrant History",
            "/groups/water_resources/hydrant_history/",
            "water_resources",
        ));
        let registry = builder.finish();

        let group = find_group(&registry, "water_resources");
        assert_eq!(group.name, "Water Resources");
        assert_eq!(group.url, "/groups/water_resources/");
        assert_eq!(group.description, "Water Resources Reports");
        assert_eq!(group.reports.len(), 1);
    }

    #[test]
    fn all_reports_is_sum_of_group_reports() {
        let registry = sample_registry();
        let total: usize = registry
            .groups()
            .map(|g| registry.group_reports(&g.id).len())
            .sum();
        assert_eq!(registry.all_reports().len(), total);
        assert_eq!(registry.report_count(), total);
    }

    #[test]
    fn unknown_group_has_no_reports() {
        let registry = sample_registry();
        assert!(registry.group_reports("nope").is_empty());
        assert!(registry.group("nope").is_none());
    }

    #[test]
    fn regrouping_keeps_reports() {
        let mut builder = sample_builder();
        builder.register_group(
            GroupSeed::new("finance", "Finance & Budget", "/groups/finance/")
                .icon("fas fa-chart-pie"),
        );
        let registry = builder.finish();

        let group = find_group(&registry, "finance");
        assert_eq!(group.name, "Finance & Budget");
        assert_eq!(group.icon, "fas fa-chart-pie");
        assert_report_ids(&registry, "finance", &["budget", "cleargov"]);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut builder = sample_builder();
        builder.register_report(
            ReportSpec::new("budget", "Budget v2", "/groups/finance/budget/", "finance")
                .icon("fas fa-coins"),
        );
        let registry = builder.finish();

        assert_report_ids(&registry, "finance", &["budget", "cleargov"]);
        let budget = find_report(&registry, "finance", "budget");
        assert_eq!(budget.name, "Budget v2");
        assert_eq!(budget.icon, "fas fa-coins");
    }

    #[test]
    fn append_keeps_duplicates() {
        let mut builder = RegistryBuilder::new(DuplicatePolicy::Append);
        for _ in 0..2 {
            builder.register_report(ReportSpec::new(
                "budget",
                "Budget Dashboard",
                "/groups/finance/budget/",
                "finance",
            ));
        }
        let registry = builder.finish();
        assert_report_ids(&registry, "finance", &["budget", "budget"]);
    }

    #[test]
    fn same_report_id_in_two_groups_is_allowed() {
        let mut builder = RegistryBuilder::default();
        for group in ["warehouse", "utilities_billing"] {
            builder.register_report(ReportSpec::new(
                "work_order_search",
                "Work Order Search",
                format!("/groups/{group}/work_orders/search"),
                group,
            ));
        }
        let registry = builder.finish();
        assert_eq!(registry.all_reports().len(), 2);
        assert_eq!(registry.group_reports("warehouse").len(), 1);
    }

    #[test]
    fn visible_reports_honour_visibility() {
        let mut builder = sample_builder();
        builder.register_report(
            ReportSpec::new(
                "work_order_search",
                "Work Order Search",
                "/groups/warehouse/work_orders/search",
                "warehouse",
            )
            .visible_in(["warehouse", "finance"]),
        );
        let registry = builder.finish();

        let finance: Vec<&str> = registry
            .visible_reports("finance")
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(finance, vec!["budget", "cleargov", "work_order_search"]);
        assert_eq!(registry.visible_reports("warehouse").len(), 2);
        // Ownership is unchanged.
        assert_eq!(registry.group_reports("finance").len(), 2);
    }

    #[test]
    fn phases_only_move_forward() {
        let mut builder = RegistryBuilder::default();
        assert_eq!(builder.phase(), Phase::Empty);
        builder.seed_groups([GroupSeed::new("finance", "Finance", "/groups/finance/")]);
        assert_eq!(builder.phase(), Phase::GroupsSeeded);
        builder.advance(Phase::ModulesScanned);
        builder.advance(Phase::GroupsSeeded);
        assert_eq!(builder.phase(), Phase::ModulesScanned);
    }

    #[test]
    fn empty_description_falls_back_to_default() {
        let mut builder = RegistryBuilder::default();
        let report = builder.register_report(
            ReportSpec::new("vflex", "VFLEX for Sensus", "/groups/ub/vflex/", "ub")
                .description("")
                .icon(""),
        );
        assert_eq!(report.description, "VFLEX for Sensus Report");
        assert_eq!(report.icon, "fas fa-file-alt");
    }

    #[test]
    fn policy_parses_from_lowercase() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            duplicates: DuplicatePolicy,
        }
        let w: Wrapper = toml::from_str(r#"duplicates = "append""#).unwrap();
        assert_eq!(w.duplicates, DuplicatePolicy::Append);
    }
}
