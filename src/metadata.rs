//! Report metadata extraction.
//!
//! A routable module describes the report it implements in one of two ways:
//!
//! ## Explicit metadata
//!
//! The module carries a [`ReportMetadata`] record. It is returned verbatim;
//! missing fields are filled in later by the scanner, not here.
//!
//! ## Inferred from the module
//!
//! A module without metadata but with a dotted name (`{group}.{report}`) and a
//! URL prefix is described by a minimal record:
//!
//! - **id**: the last name segment
//! - **name**: the title-cased id (`hydrant_history` → "Hydrant History")
//! - **url**: the module's URL prefix
//! - **group_id**: the first name segment
//!
//! Anything else (plain names, modules without a prefix) is not a report.
//!
//! ## Field defaults
//!
//! Each field is resolved independently: the first non-empty value wins.
//!
//! ```text
//! id:   metadata id  → last name segment
//! name: metadata name → title-cased id
//! url:  metadata url → module url prefix → "/{id}/"
//! ```

use crate::modules::RoutableModule;
use crate::naming::{display_title, parse_module_name};
use crate::types::ReportMetadata;

/// Describe the report a module implements, if it implements one.
pub fn extract_report_metadata(module: &RoutableModule) -> Option<ReportMetadata> {
    if let Some(meta) = &module.metadata {
        return Some(meta.clone());
    }

    let url_prefix = module.url_prefix.as_deref()?;
    let parsed = parse_module_name(&module.name);
    let group = parsed.group?;
    Some(ReportMetadata {
        id: Some(parsed.report.to_string()),
        name: Some(display_title(parsed.report)),
        url: Some(url_prefix.to_string()),
        group_id: Some(group.to_string()),
        ..Default::default()
    })
}

/// Pick the first non-empty value from sources in priority order.
///
/// ```text
/// url: first_present(&[meta.url, module.url_prefix])
/// ```
pub fn first_present(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| {
            opt.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_metadata_returned_verbatim() {
        let meta = ReportMetadata {
            id: Some("hydrant_history".to_string()),
            name: Some("Hydrant History".to_string()),
            url: Some("/groups/water_resources/hydrant_history/".to_string()),
            group_id: Some("water_resources".to_string()),
            ..Default::default()
        };
        let module = RoutableModule::new("hydrant_history", Some("/hydrant_history"))
            .with_metadata(meta.clone());
        assert_eq!(extract_report_metadata(&module), Some(meta));
    }

    #[test]
    fn inferred_from_dotted_name_and_prefix() {
        let module = RoutableModule::new(
            "utilities_billing.cycle_info",
            Some("/groups/utilities_billing/cycle_info"),
        );
        let meta = extract_report_metadata(&module).unwrap();
        assert_eq!(meta.id.as_deref(), Some("cycle_info"));
        assert_eq!(meta.name.as_deref(), Some("Cycle Info"));
        assert_eq!(
            meta.url.as_deref(),
            Some("/groups/utilities_billing/cycle_info")
        );
        assert_eq!(meta.group_id(), Some("utilities_billing"));
        assert_eq!(meta.description, None);
    }

    #[test]
    fn nested_name_uses_outer_group_and_last_report() {
        let module = RoutableModule::new("groups.finance.budget", Some("/budget"));
        let meta = extract_report_metadata(&module).unwrap();
        assert_eq!(meta.id.as_deref(), Some("budget"));
        assert_eq!(meta.group_id(), Some("groups"));
    }

    #[test]
    fn plain_name_is_not_a_report() {
        let module = RoutableModule::new("finance", Some("/groups/finance"));
        assert_eq!(extract_report_metadata(&module), None);
    }

    #[test]
    fn missing_prefix_is_not_a_report() {
        let module = RoutableModule::new("finance.budget", None);
        assert_eq!(extract_report_metadata(&module), None);
    }

    #[test]
    fn first_present_skips_empty() {
        assert_eq!(
            first_present(&[None, Some("  "), Some("/budget/")]),
            Some("/budget/".to_string())
        );
        assert_eq!(first_present(&[None, Some("")]), None);
    }
}
