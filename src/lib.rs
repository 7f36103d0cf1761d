//! # Report Registry
//!
//! The catalog behind a server-rendered reporting dashboard. Reports are
//! grouped by department (finance, warehouse, water resources, ...); the
//! registry knows which groups exist, which reports each one owns, and hands
//! that structure to navigation, the group dashboards, and `/api/reports`.
//!
//! # Architecture: Assemble, Then Seal
//!
//! The registry is built once at startup and never changes afterwards:
//!
//! ```text
//! 1. Seed       dashboard.toml [[groups]]  →  RegistryBuilder  (GroupsSeeded)
//! 2. Attach     shared reports             →  RegistryBuilder
//! 3. Discover   routable modules           →  RegistryBuilder  (ModulesScanned)
//! 4. Seal       RegistryBuilder::finish    →  Registry         (Ready)
//! ```
//!
//! Only [`registry::RegistryBuilder`] can register anything. The sealed
//! [`registry::Registry`] is shared behind an `Arc` with every request
//! handler and has no mutating methods, so reads need no lock and nothing
//! can register a report while requests are being served.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `Group`, `Report`, `ReportMetadata`, `GroupSeed` records |
//! | [`registry`] | Group/report store: the assembling builder and the sealed catalog |
//! | [`naming`] | Dotted module names, display titles, group urls |
//! | [`resolve`] | Owning-group resolution from metadata, names, or nothing |
//! | [`modules`] | Routable modules, the attachment table, shared reports, built-ins |
//! | [`metadata`] | Report metadata extraction from a routable module |
//! | [`scan`] | Auto-discovery of module reports, with per-module failure isolation |
//! | [`startup`] | The seed → attach → discover → seal sequence |
//! | [`nav`] | Navigation data, render context, `/api/reports` body |
//! | [`render`] | Maud HTML for the groups and group dashboards |
//! | [`server`] | Axum router, handlers, and the serve loop |
//! | [`config`] | `dashboard.toml` loading, merging, validation, and CSS colors |
//! | [`logging`] | Tracing subscriber setup for the binary |
//! | [`output`] | CLI output formatting for `check` and `list` |
//!
//! # Design Decisions
//!
//! ## Healing Over Failing
//!
//! Registering a report under a group nobody seeded creates a placeholder
//! group instead of failing. A module with unusable metadata is logged and
//! skipped. One bad report module never takes the dashboard down.
//!
//! ## Configurable Duplicates
//!
//! Re-registering a report id within a group either replaces the earlier entry
//! (`upsert`, the default) or keeps both (`append`). The choice lives in
//! `[registry] duplicates` so both behaviours can be relied upon explicitly.
//!
//! ## Ownership vs. Visibility
//!
//! Every report is owned by exactly one group. A report may additionally be
//! listed on other groups' dashboards through `visible_in`; that changes what
//! a dashboard shows, never which group owns the report.

pub mod config;
pub mod logging;
pub mod metadata;
pub mod modules;
pub mod naming;
pub mod nav;
pub mod output;
pub mod registry;
pub mod render;
pub mod resolve;
pub mod scan;
pub mod server;
pub mod startup;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
