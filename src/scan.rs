//! Report auto-discovery.
//!
//! Walks every attached routable module, describes it with
//! [`extract_report_metadata`], and registers the report it implements. This
//! runs once during startup, after every module is attached and before the
//! registry is sealed.
//!
//! ## Skipping vs. failing
//!
//! - Modules that describe no report, or a report without a `group_id`, are
//!   skipped silently.
//! - Modules whose description yields no report id fail with a
//!   [`DiscoveryError`]. The failure is logged with the module name and the
//!   scan moves on; one bad module never aborts startup.
//!
//! Group ids and urls are registered as given, exactly as
//! [`RegistryBuilder::register_report`] would take them.
//!
//! ## Repeated scans
//!
//! Scanning the same table twice re-registers every report. Under
//! [`DuplicatePolicy::Upsert`](crate::registry::DuplicatePolicy) that is a
//! no-op; under `Append` every report is listed twice.

use crate::metadata::{extract_report_metadata, first_present};
use crate::modules::{ModuleTable, RoutableModule};
use crate::naming::{display_title, parse_module_name};
use crate::registry::{Phase, RegistryBuilder, ReportSpec};
use crate::types::ReportMetadata;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Error, Debug, PartialEq)]
pub enum DiscoveryError {
    #[error("report id is empty")]
    EmptyReportId,
}

/// What a discovery pass did with each module.
#[derive(Debug, Default)]
pub struct DiscoverySummary {
    /// `(group_id, report_id)` of every registered report, in scan order.
    pub registered: Vec<(String, String)>,
    /// Modules that describe no report.
    pub skipped: Vec<String>,
    /// Modules whose description could not be registered.
    pub failed: Vec<(String, DiscoveryError)>,
}

impl DiscoverySummary {
    pub fn total(&self) -> usize {
        self.registered.len() + self.skipped.len() + self.failed.len()
    }
}

/// Register the report of every module in `modules`.
pub fn discover_reports(builder: &mut RegistryBuilder, modules: &ModuleTable) -> DiscoverySummary {
    if builder.phase() >= Phase::ModulesScanned {
        warn!("Modules already scanned; registering their reports again");
    }

    let mut summary = DiscoverySummary::default();
    for (name, module) in modules.iter() {
        let Some(metadata) = extract_report_metadata(module) else {
            summary.skipped.push(name.to_string());
            continue;
        };
        match report_spec(name, module, &metadata) {
            Ok(Some(spec)) => {
                let report = builder.register_report(spec);
                info!(
                    "Auto-discovered report: {} in group {}",
                    report.id, report.group_id
                );
                summary
                    .registered
                    .push((report.group_id.clone(), report.id.clone()));
            }
            Ok(None) => summary.skipped.push(name.to_string()),
            Err(e) => {
                error!("Failed to register report from module {}: {}", name, e);
                summary.failed.push((name.to_string(), e));
            }
        }
    }

    builder.advance(Phase::ModulesScanned);
    info!(
        "Discovery scanned {} modules: {} registered, {} skipped, {} failed",
        summary.total(),
        summary.registered.len(),
        summary.skipped.len(),
        summary.failed.len()
    );
    summary
}

/// Turn a module's metadata into a registration, filling in defaults.
///
/// Returns `Ok(None)` when the metadata names no group.
fn report_spec(
    name: &str,
    module: &RoutableModule,
    metadata: &ReportMetadata,
) -> Result<Option<ReportSpec>, DiscoveryError> {
    let Some(group_id) = metadata.group_id() else {
        return Ok(None);
    };

    let id = first_present(&[metadata.id.as_deref(), Some(parse_module_name(name).report)])
        .ok_or(DiscoveryError::EmptyReportId)?;
    let display = first_present(&[metadata.name.as_deref()]).unwrap_or_else(|| display_title(&id));
    let url = first_present(&[metadata.url.as_deref(), module.url_prefix.as_deref()])
        .unwrap_or_else(|| format!("/{id}/"));

    let mut spec = ReportSpec::new(id, display, url, group_id)
        .enabled(metadata.enabled.unwrap_or(true))
        .visible_in(metadata.visible_in.iter().cloned());
    spec.description = metadata.description.clone();
    spec.icon = metadata.icon.clone();
    Ok(Some(spec))
}
