//! Owning-group resolution.
//!
//! A group id can be derived from three kinds of input, modelled as
//! [`GroupSource`]:
//!
//! | Variant | Result |
//! |---------|--------|
//! | `ExplicitMetadata` | the metadata's `group_id` |
//! | `DottedName("finance.budget")` | `"finance"` (text before the first dot) |
//! | `DottedName("finance")` | `"finance"` (plain names are already group ids) |
//! | `DottedName("")`, `DottedName(".budget")` | `None`, logged at warning level (an empty group is no group) |
//! | `Unresolvable` | `None`, logged at warning level |
//!
//! A routable module converts to `ExplicitMetadata` only when its metadata
//! declares a non-empty group, so explicit metadata always wins over the name.

use crate::modules::RoutableModule;
use crate::types::ReportMetadata;
use tracing::warn;

/// Input to [`resolve_group_id`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroupSource<'a> {
    ExplicitMetadata(&'a ReportMetadata),
    DottedName(&'a str),
    Unresolvable,
}

impl<'a> From<&'a RoutableModule> for GroupSource<'a> {
    fn from(module: &'a RoutableModule) -> Self {
        match &module.metadata {
            Some(meta) if meta.group_id().is_some() => GroupSource::ExplicitMetadata(meta),
            _ if !module.name.is_empty() => GroupSource::DottedName(&module.name),
            _ => GroupSource::Unresolvable,
        }
    }
}

impl<'a> From<&'a str> for GroupSource<'a> {
    fn from(name: &'a str) -> Self {
        GroupSource::DottedName(name)
    }
}

impl<'a> From<&'a String> for GroupSource<'a> {
    fn from(name: &'a String) -> Self {
        GroupSource::DottedName(name)
    }
}

impl<'a, T> From<Option<T>> for GroupSource<'a>
where
    T: Into<GroupSource<'a>>,
{
    fn from(source: Option<T>) -> Self {
        source.map_or(GroupSource::Unresolvable, Into::into)
    }
}

/// Derive the owning group id. Never panics; unusable input yields `None`.
pub fn resolve_group_id<'a>(source: impl Into<GroupSource<'a>>) -> Option<String> {
    match source.into() {
        GroupSource::ExplicitMetadata(meta) => match meta.group_id() {
            Some(group) => Some(group.to_string()),
            None => {
                warn!("Report metadata declares no group_id: {:?}", meta.id);
                None
            }
        },
        GroupSource::DottedName(name) => {
            let group = name.split('.').next().unwrap_or(name);
            if group.is_empty() {
                warn!("Could not determine group_id from name: {:?}", name);
                None
            } else {
                Some(group.to_string())
            }
        }
        GroupSource::Unresolvable => {
            warn!("Received no module when trying to get group_id");
            None
        }
    }
}
