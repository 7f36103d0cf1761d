//! Routable modules and the attachment table.
//!
//! A routable module is the routing layer's unit of attachment: a dotted name
//! (`{group}.{report}`), an optional URL prefix, and optional report metadata.
//! The registry never looks at anything else about a module.
//!
//! ## Attachment
//!
//! Modules are attached to a [`ModuleTable`] in startup order. Names are
//! unique; attaching a second module with the same name is an error, the same
//! way the routing layer rejects duplicate mount names.
//!
//! ## Shared Reports
//!
//! A [`SharedReport`] is one implementation mounted under several groups. Each
//! attachment registers itself directly with the registry (it is not picked up
//! by discovery), resolving its owning group from the parent module.

use crate::naming::display_title;
use crate::registry::{RegistryBuilder, ReportSpec};
use crate::resolve::resolve_group_id;
use crate::types::{Report, ReportMetadata};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug, PartialEq)]
pub enum AttachError {
    #[error("A module named {0:?} is already attached")]
    DuplicateName(String),
}

/// One unit of the routing layer, as seen by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutableModule {
    /// Dotted name, `{group}.{report}` for report modules.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ReportMetadata>,
}

impl RoutableModule {
    pub fn new(name: impl Into<String>, url_prefix: Option<&str>) -> Self {
        Self {
            name: name.into(),
            url_prefix: url_prefix.map(str::to_string),
            metadata: None,
        }
    }

    /// A report module mounted at `url`, with metadata derived from its ids.
    ///
    /// The display name defaults to the title-cased report id; use the
    /// chained setters to override it.
    pub fn report(group_id: &str, report_id: &str, url: &str) -> Self {
        Self {
            name: format!("{group_id}.{report_id}"),
            url_prefix: Some(url.trim_end_matches('/').to_string()),
            metadata: Some(ReportMetadata {
                id: Some(report_id.to_string()),
                name: Some(display_title(report_id)),
                url: Some(url.to_string()),
                group_id: Some(group_id.to_string()),
                ..Default::default()
            }),
        }
    }

    pub fn with_metadata(mut self, metadata: ReportMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn titled(mut self, name: &str) -> Self {
        self.metadata_mut().name = Some(name.to_string());
        self
    }

    pub fn described(mut self, description: &str) -> Self {
        self.metadata_mut().description = Some(description.to_string());
        self
    }

    pub fn icon(mut self, icon: &str) -> Self {
        self.metadata_mut().icon = Some(icon.to_string());
        self
    }

    fn metadata_mut(&mut self) -> &mut ReportMetadata {
        self.metadata.get_or_insert_with(ReportMetadata::default)
    }
}

/// Every module attached to the running application, keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleTable {
    modules: IndexMap<String, RoutableModule>,
}

impl ModuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, module: RoutableModule) -> Result<&RoutableModule, AttachError> {
        if self.modules.contains_key(&module.name) {
            return Err(AttachError::DuplicateName(module.name));
        }
        let name = module.name.clone();
        Ok(self.modules.entry(name).or_insert(module))
    }

    pub fn get(&self, name: &str) -> Option<&RoutableModule> {
        self.modules.get(name)
    }

    /// Modules in attachment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RoutableModule)> {
        self.modules.iter().map(|(name, m)| (name.as_str(), m))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// A report implementation that can be mounted under several groups.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedReport {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    /// Path below the owning group's dashboard, without leading slash.
    pub path: &'static str,
}

pub const WORK_ORDER_SEARCH: SharedReport = SharedReport {
    id: "work_order_search",
    name: "Work Order Search",
    description: "Search for specific a work order",
    icon: "fas fa-search",
    path: "work_orders/search",
};

pub const WORK_ORDER_COMMENTS: SharedReport = SharedReport {
    id: "work_order_comments",
    name: "Work Order Comments Search",
    description: "Search for specific text within work order comments",
    icon: "fas fa-search",
    path: "work_order_comments/",
};

/// One mount of a shared report under a parent (group) module.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedAttachment {
    pub parent: RoutableModule,
    pub report: SharedReport,
    /// Dashboards that list the report. `None` means the owning group only.
    pub visible_in: Option<Vec<String>>,
}

/// Register a shared report under the group its parent module belongs to.
///
/// Returns `None` (with a warning) when the parent's group cannot be resolved.
pub fn attach_shared_report<'b>(
    builder: &'b mut RegistryBuilder,
    parent: &RoutableModule,
    shared: &SharedReport,
    visible_in: Option<Vec<String>>,
) -> Option<&'b Report> {
    let Some(group_id) = resolve_group_id(parent) else {
        warn!(
            "Could not determine group_id from parent module {:?}, skipping {}",
            parent.name, shared.id
        );
        return None;
    };
    let visible_in = visible_in.unwrap_or_else(|| vec![group_id.clone()]);
    info!(
        "Registering {} with {}, visible in {}",
        shared.id,
        group_id,
        visible_in.join(", ")
    );
    let spec = ReportSpec::new(
        shared.id,
        shared.name,
        format!("/groups/{group_id}/{}", shared.path),
        group_id,
    )
    .description(shared.description)
    .icon(shared.icon)
    .visible_in(visible_in);
    Some(builder.register_report(spec))
}

/// The dashboard's own modules, in the order the application mounts them.
pub fn builtin_modules() -> ModuleTable {
    let modules = [
        RoutableModule::new("groups", Some("/groups")),
        RoutableModule::new("utilities_billing", Some("/groups/utilities_billing")),
        RoutableModule::report(
            "utilities_billing",
            "cut_nonpayment",
            "/groups/utilities_billing/cut_nonpayment/",
        )
        .titled("Cut for Nonpayment")
        .described("View accounts being cut for nonpayment")
        .icon("fas fa-cut"),
        RoutableModule::report(
            "utilities_billing",
            "utility_dashboard",
            "/groups/utilities_billing/trending/",
        )
        .titled("Utility Billing Dashboard")
        .described("Overview of utility billing metrics and KPIs")
        .icon("fa-solid fa-chart-column"),
        RoutableModule::report(
            "utilities_billing",
            "accounts_no_garbage",
            "/groups/utilities_billing/accounts_no_garbage/",
        )
        .titled("Accounts Without Garbage Service")
        .described("Report showing residential accounts without garbage service")
        .icon("fa-solid fa-trash"),
        RoutableModule::report("utilities_billing", "vflex", "/groups/utilities_billing/vflex/")
            .titled("VFLEX for Sensus")
            .described("VFLEX file to upload to Sensus to update customer data.")
            .icon("fa-solid fa-users"),
        RoutableModule::report(
            "utilities_billing",
            "work_order_counts",
            "/groups/utilities_billing/work_order_counts/",
        )
        .described("View work order counts by user")
        .icon("fas fa-tasks"),
        RoutableModule::report(
            "utilities_billing",
            "new_customer_accounts",
            "/groups/utilities_billing/new_customer_accounts/",
        )
        .described("Report showing new customer account information")
        .icon("fas fa-user-plus"),
        RoutableModule::report(
            "utilities_billing",
            "amount_billed_search",
            "/groups/utilities_billing/amount_billed_search/",
        )
        .described("Search for bill amounts in the system")
        .icon("fas fa-search-dollar"),
        RoutableModule::report(
            "utilities_billing",
            "water_no_sewer",
            "/groups/utilities_billing/water_no_sewer/",
        )
        .described("View accounts with water but no sewer service")
        .icon("fa-solid fa-glass-water"),
        // Mounted without metadata; discovery infers it from the name.
        RoutableModule::new(
            "utilities_billing.cycle_info",
            Some("/groups/utilities_billing/cycle_info"),
        ),
        RoutableModule::new("warehouse", Some("/groups/warehouse")),
        RoutableModule::report(
            "warehouse",
            "stock_by_storeroom",
            "/groups/warehouse/stock_by_storeroom/",
        )
        .described("View inventory items by storeroom location with min/max quantity analysis")
        .icon("fas fa-warehouse"),
        RoutableModule::report("warehouse", "fifo_cost_wo", "/groups/warehouse/fifo_cost_wo/")
            .titled("FIFO Cost by Account")
            .described("Report showing work order costs using FIFO inventory method")
            .icon("fas fa-clipboard-list"),
        RoutableModule::report("warehouse", "fifo_stock", "/groups/warehouse/fifo_stock/")
            .titled("Inventory Cost Trends")
            .described("View inventory items filtered by category with value and quantity analysis")
            .icon("fas fa-boxes"),
        RoutableModule::report(
            "warehouse",
            "audit_transactions",
            "/groups/warehouse/audit_transactions/",
        )
        .described("View inventory audit transactions showing cost and quantity changes")
        .icon("fas fa-file-invoice-dollar"),
        RoutableModule::new("finance", Some("/groups/finance")),
        RoutableModule::report("finance", "budget", "/groups/finance/budget/")
            .titled("Budget Dashboard")
            .described("Trends and analysis Budget")
            .icon("fa-solid fa-file-invoice-dollar"),
        RoutableModule::report("finance", "cleargov", "/groups/finance/cleargov/")
            .titled("ClearGov Budget Visualizations")
            .described("Interactive budget visualizations from ClearGov")
            .icon("fa-solid fa-chart-pie"),
        RoutableModule::new("public_works", Some("/groups/public_works")),
        RoutableModule::report(
            "public_works",
            "vehicle_fleet",
            "/groups/public_works/vehicle_fleet/",
        )
        .titled("Vehicle Fleet Dashboard")
        .described("Vehicle Replacement Scores and GeoTab Alerts")
        .icon("fa-solid fa-car"),
        RoutableModule::report("public_works", "solid_waste", "/groups/public_works/solid_waste/")
            .described("Solid Waste Billing Data for Town Provided Waste Pickup")
            .icon("fa-solid fa-trash"),
        RoutableModule::report("public_works", "fleet_costs", "/groups/public_works/fleet_costs/")
            .described("Analyze vehicle maintenance costs")
            .icon("fas fa-dollar-sign"),
        RoutableModule::new("community_development", Some("/groups/community_development")),
        RoutableModule::report(
            "community_development",
            "permits_inspections",
            "/groups/community_development/permits_inspections/",
        )
        .titled("Permits and Inspections")
        .described("Permit and Inspections Trends and Summaries")
        .icon("fa-solid fa-file-circle-check"),
        RoutableModule::report(
            "community_development",
            "bluebeam",
            "/groups/community_development/bluebeam/",
        )
        .titled("Bluebeam Development Projects")
        .described("Bluebeam Summary"),
        RoutableModule::new("water_resources", Some("/groups/water_resources")),
        RoutableModule::report(
            "water_resources",
            "sewer_clean_length",
            "/groups/water_resources/sewer_clean_length/",
        )
        .described("View sanitary sewer cleaning lengths by work order")
        .icon("fas fa-broom"),
        RoutableModule::report(
            "water_resources",
            "hydrant_history",
            "/groups/water_resources/hydrant_history/",
        )
        .described("View hydrant inspection and work order history")
        .icon("fas fa-history"),
    ];

    let mut table = ModuleTable::new();
    for module in modules {
        if let Err(e) = table.attach(module) {
            warn!("Skipping built-in module: {}", e);
        }
    }
    table
}

/// Shared report mounts of the dashboard.
pub fn builtin_shared_attachments() -> Vec<SharedAttachment> {
    vec![
        SharedAttachment {
            parent: RoutableModule::new("utilities_billing", Some("/groups/utilities_billing")),
            report: WORK_ORDER_SEARCH,
            visible_in: None,
        },
        SharedAttachment {
            parent: RoutableModule::new("warehouse", Some("/groups/warehouse")),
            report: WORK_ORDER_SEARCH,
            visible_in: None,
        },
        SharedAttachment {
            parent: RoutableModule::new("utilities_billing", Some("/groups/utilities_billing")),
            report: WORK_ORDER_COMMENTS,
            visible_in: None,
        },
    ]
}
