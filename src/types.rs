//! Records shared by the registry, the scanner, and every read projection.
//!
//! These types are serialized as-is by the `/api/reports` endpoint and by the
//! `list` command, so field names and defaults are part of the wire contract.

use serde::{Deserialize, Serialize};

/// Icon used when a group is registered without one.
pub const DEFAULT_GROUP_ICON: &str = "fas fa-folder";

/// Icon used when a report is registered without one.
pub const DEFAULT_REPORT_ICON: &str = "fas fa-file-alt";

/// A named section of the dashboard that owns zero or more reports.
///
/// `reports` is kept in registration order and always holds exactly the
/// reports whose `group_id` equals `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub url: String,
    pub description: String,
    pub icon: String,
    pub enabled: bool,
    #[serde(default)]
    pub reports: Vec<Report>,
}

/// A single report page, owned by exactly one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub name: String,
    pub url: String,
    pub description: String,
    pub group_id: String,
    pub icon: String,
    pub enabled: bool,
    /// Groups whose dashboards list this report. Empty means the owning group only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub visible_in: Vec<String>,
}

impl Report {
    /// Whether this report should appear on the dashboard of `group_id`.
    pub fn is_visible_in(&self, group_id: &str) -> bool {
        if self.visible_in.is_empty() {
            self.group_id == group_id
        } else {
            self.visible_in.iter().any(|g| g == group_id)
        }
    }
}

/// Report description carried by a routable module.
///
/// Every field is optional so that partially declared modules (and config
/// file entries) can rely on the scanner's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub visible_in: Vec<String>,
}

impl ReportMetadata {
    /// The declared owning group, ignoring empty strings.
    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref().filter(|g| !g.is_empty())
    }
}

/// A group to register before discovery runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupSeed {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(group_id: &str, visible_in: &[&str]) -> Report {
        Report {
            id: "work_order_search".to_string(),
            name: "Work Order Search".to_string(),
            url: format!("/groups/{group_id}/work_orders/search"),
            description: "Search for a work order".to_string(),
            group_id: group_id.to_string(),
            icon: "fas fa-search".to_string(),
            enabled: true,
            visible_in: visible_in.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn empty_visibility_means_owning_group_only() {
        let r = report("warehouse", &[]);
        assert!(r.is_visible_in("warehouse"));
        assert!(!r.is_visible_in("finance"));
    }

    #[test]
    fn explicit_visibility_is_exhaustive() {
        let r = report("warehouse", &["finance"]);
        assert!(r.is_visible_in("finance"));
        assert!(!r.is_visible_in("warehouse"));
    }

    #[test]
    fn visible_in_omitted_from_json_when_empty() {
        let json = serde_json::to_value(report("warehouse", &[])).unwrap();
        assert!(json.get("visible_in").is_none());
        assert_eq!(json["group_id"], "warehouse");
    }

    #[test]
    fn metadata_ignores_empty_group_id() {
        let meta = ReportMetadata {
            group_id: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(meta.group_id(), None);
    }

    #[test]
    fn metadata_rejects_unknown_keys() {
        let result: Result<ReportMetadata, _> = toml::from_str(r#"colour = "red""#);
        assert!(result.is_err());
    }

    #[test]
    fn seed_defaults_to_enabled() {
        let seed: GroupSeed = toml::from_str(
            r#"
id = "finance"
name = "Finance"
url = "/groups/finance/"
"#,
        )
        .unwrap();
        assert!(seed.enabled);
        assert_eq!(seed.icon, None);
    }
}
