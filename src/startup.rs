//! Registry initialization.
//!
//! Builds the sealed [`Registry`] the server runs on, walking the phases in
//! order:
//!
//! ```text
//! Empty ─seed groups─▶ GroupsSeeded ─shared reports, discovery─▶ ModulesScanned ─finish─▶ Ready
//! ```
//!
//! Shared reports are registered before discovery runs, so they come first in
//! their group's report list.

use crate::config::DashboardConfig;
use crate::modules::{AttachError, ModuleTable, SharedAttachment, attach_shared_report};
use crate::registry::{Registry, RegistryBuilder};
use crate::scan::{DiscoverySummary, discover_reports};
use tracing::warn;

/// Seed the configured groups, attach shared reports, discover module
/// reports, and seal the result.
pub fn initialize(
    config: &DashboardConfig,
    modules: &ModuleTable,
    shared: &[SharedAttachment],
) -> (Registry, DiscoverySummary) {
    let mut builder = RegistryBuilder::new(config.registry.duplicates);
    builder.seed_groups(config.groups.iter().cloned());

    for attachment in shared {
        attach_shared_report(
            &mut builder,
            &attachment.parent,
            &attachment.report,
            attachment.visible_in.clone(),
        );
    }

    let summary = discover_reports(&mut builder, modules);
    (builder.finish(), summary)
}

/// Append the config's extra modules to `table`.
///
/// A name clash with an already attached module is logged and the config
/// entry is dropped; the first attachment wins.
pub fn attach_config_modules(table: &mut ModuleTable, config: &DashboardConfig) {
    for module in &config.modules {
        if let Err(AttachError::DuplicateName(name)) = table.attach(module.clone()) {
            warn!("Module {} from config is already attached, ignoring it", name);
        }
    }
}
