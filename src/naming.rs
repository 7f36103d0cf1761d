//! Dotted module names and display titles.
//!
//! Routable modules are named `{group}.{report}`; nested attachments can add
//! more segments (`groups.finance.budget`), in which case the first segment is
//! still the group and the last one the report.
//!
//! ## Display Titles
//!
//! Identifiers are slugs with underscores. They are turned into display titles
//! by replacing underscores with spaces and title-casing every word:
//! - `water_resources` → "Water Resources"
//! - `fifo_cost_wo` → "Fifo Cost Wo"
//! - `ACCOUNTS_no_garbage` → "Accounts No Garbage"

/// Result of parsing a dotted module name like `finance.budget`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedModuleName<'a> {
    /// First segment when the name is dotted, `None` for plain names.
    pub group: Option<&'a str>,
    /// Last segment (the whole input for plain names).
    pub report: &'a str,
}

/// Split a module name into its group and report parts.
///
/// - `"finance.budget"` → group=Some("finance"), report="budget"
/// - `"groups.finance.budget"` → group=Some("groups"), report="budget"
/// - `"finance"` → group=None, report="finance"
pub fn parse_module_name(name: &str) -> ParsedModuleName<'_> {
    match name.split_once('.') {
        Some((group, rest)) => ParsedModuleName {
            group: Some(group),
            report: rest.rsplit('.').next().unwrap_or(rest),
        },
        None => ParsedModuleName {
            group: None,
            report: name,
        },
    }
}

/// Turn a slug into a display title: underscores become spaces, and each run
/// of letters starts upper-case with the rest lower-cased.
pub fn display_title(slug: &str) -> String {
    let mut out = String::with_capacity(slug.len());
    let mut prev_cased = false;
    for c in slug.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if prev_cased {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_cased = true;
        } else {
            out.push(c);
            prev_cased = false;
        }
    }
    out
}

/// Canonical dashboard path of a group.
pub fn group_url(group_id: &str) -> String {
    format!("/groups/{group_id}/")
}
