//! Read projections handed to page rendering and the JSON endpoint.
//!
//! Everything here reads a sealed [`Registry`], so nothing can fail: there is
//! no lock to poison and no half-initialized state to observe.

use crate::registry::Registry;
use crate::resolve::{GroupSource, resolve_group_id};
use crate::types::{Group, Report};
use serde::{Deserialize, Serialize};

/// All groups, in registration order, with their reports.
pub fn navigation_data(registry: &Registry) -> Vec<&Group> {
    registry.groups().collect()
}

/// Values every rendered page receives.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub nav_groups: Vec<&'a Group>,
    pub all_reports: Vec<&'a Report>,
    pub registry: &'a Registry,
}

impl<'a> RenderContext<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            nav_groups: navigation_data(registry),
            all_reports: registry.all_reports(),
            registry,
        }
    }

    /// Group-id resolver, exposed to templates.
    pub fn group_id_for<'s>(&self, source: impl Into<GroupSource<'s>>) -> Option<String> {
        resolve_group_id(source)
    }

    /// Groups shown in navigation: enabled ones only.
    pub fn enabled_groups(&self) -> impl Iterator<Item = &'a Group> + '_ {
        self.nav_groups.iter().copied().filter(|g| g.enabled)
    }

    /// Enabled reports listed on the dashboard of `group_id`.
    pub fn dashboard_reports(&self, group_id: &str) -> Vec<&'a Report> {
        self.registry
            .visible_reports(group_id)
            .into_iter()
            .filter(|r| r.enabled)
            .collect()
    }
}

/// Body of `GET /api/reports`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportListing {
    pub reports: Vec<Report>,
}

impl ReportListing {
    pub fn from_registry(registry: &Registry) -> Self {
        Self {
            reports: registry.all_reports().into_iter().cloned().collect(),
        }
    }
}
