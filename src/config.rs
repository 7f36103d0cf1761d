//! Dashboard configuration.
//!
//! Handles loading, validating, and merging `dashboard.toml`. Stock defaults
//! are serialized to a TOML table, the user file is merged on top key by key,
//! and the result is deserialized (rejecting unknown keys) and validated.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [logging]
//! level = "info"           # Used when RUST_LOG is not set
//!
//! [registry]
//! duplicates = "upsert"    # or "append"
//!
//! [colors.light]
//! background = "#ffffff"
//! # ...
//!
//! [[groups]]               # Replaces the whole default seed list
//! id = "finance"
//! name = "Finance"
//! url = "/groups/finance/"
//!
//! [[modules]]              # Attached after the built-in modules
//! name = "finance.payroll"
//! url_prefix = "/groups/finance/payroll"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [server]
//! port = 9000
//! ```
//!
//! Tables merge key by key; arrays (`[[groups]]`, `[[modules]]`) replace the
//! default array entirely. Unknown keys are rejected to catch typos early.

use crate::modules::RoutableModule;
use crate::registry::DuplicatePolicy;
use crate::types::GroupSeed;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Dashboard configuration loaded from `dashboard.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub registry: RegistryConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Groups registered before discovery, in order.
    pub groups: Vec<GroupSeed>,
    /// Extra routable modules attached after the built-in ones.
    pub modules: Vec<RoutableModule>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            registry: RegistryConfig::default(),
            colors: ColorConfig::default(),
            groups: default_groups(),
            modules: Vec::new(),
        }
    }
}

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

impl DashboardConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Validation(
                "server.host must not be empty".into(),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }

        let mut seen = HashSet::new();
        for group in &self.groups {
            if group.id.is_empty() {
                return Err(ConfigError::Validation("groups.id must not be empty".into()));
            }
            if !seen.insert(group.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "group {:?} is listed twice",
                    group.id
                )));
            }
            if !group.url.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "url of group {:?} must start with '/'",
                    group.id
                )));
            }
        }

        if self.modules.iter().any(|m| m.name.is_empty()) {
            return Err(ConfigError::Validation("modules.name must not be empty".into()));
        }
        Ok(())
    }

    /// `host:port` for binding the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// How a repeated `(group, report)` registration is stored.
    pub duplicates: DuplicatePolicy,
}

/// The dashboard's six report groups.
pub fn default_groups() -> Vec<GroupSeed> {
    vec![
        GroupSeed::new(
            "utilities_billing",
            "Utilities Billing",
            "/groups/utilities_billing/",
        )
        .description("Reports related to utility billing, accounts, and services")
        .icon("fas fa-file-invoice-dollar"),
        GroupSeed::new("warehouse", "Warehouse", "/groups/warehouse/")
            .description("Reports related to inventory, work orders, and stock management")
            .icon("fas fa-warehouse"),
        GroupSeed::new("finance", "Finance", "/groups/finance/")
            .description("Financial reports and budget analysis")
            .icon("fas fa-chart-pie"),
        GroupSeed::new("public_works", "Public Works", "/groups/public_works/")
            .description("Public Works reports on vehicles and solid waste")
            .icon("fas fa-car"),
        GroupSeed::new(
            "community_development",
            "Community Dev",
            "/groups/community_development/",
        )
        .description("Reports for Engineering, Development Services, Inspections and Planning")
        .icon("fas fa-file-circle-check"),
        GroupSeed::new("water_resources", "Water Resources", "/groups/water_resources/")
            .description("Reports related to water resources")
            .icon("fas fa-water"),
    ]
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Page background.
    pub background: String,
    /// Card background.
    pub surface: String,
    /// Primary text color.
    pub text: String,
    /// Descriptions, breadcrumbs, and the nav menu.
    pub text_muted: String,
    pub border: String,
    /// Links and card icons.
    pub accent: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#f5f6f8".to_string(),
            surface: "#ffffff".to_string(),
            text: "#1f2933".to_string(),
            text_muted: "#616e7c".to_string(),
            border: "#d9dee4".to_string(),
            accent: "#1d5fa7".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#12161b".to_string(),
            surface: "#1c2229".to_string(),
            text: "#e4e7eb".to_string(),
            text_muted: "#9aa5b1".to_string(),
            border: "#323f4b".to_string(),
            accent: "#6fa8ea".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(DashboardConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<DashboardConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: DashboardConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is absent.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(path: &Path) -> Result<DashboardConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `dashboard.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Report Dashboard Configuration
# ==============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Tables merge with the defaults key by key. Arrays ([[groups]], [[modules]])
# replace the default list entirely.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# HTTP server
# ---------------------------------------------------------------------------
[server]
host = "127.0.0.1"
port = 8080

# ---------------------------------------------------------------------------
# Logging
# ---------------------------------------------------------------------------
[logging]
# One of trace, debug, info, warn, error, off.
# RUST_LOG takes precedence when set.
level = "info"

# ---------------------------------------------------------------------------
# Registry
# ---------------------------------------------------------------------------
[registry]
# What happens when the same report id is registered twice in one group:
#   "upsert" - replace the earlier entry in place
#   "append" - keep both entries
duplicates = "upsert"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#f5f6f8"
surface = "#ffffff"       # Cards
text = "#1f2933"
text_muted = "#616e7c"    # Descriptions, breadcrumbs, nav
border = "#d9dee4"
accent = "#1d5fa7"        # Links, icons

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#12161b"
surface = "#1c2229"
text = "#e4e7eb"
text_muted = "#9aa5b1"
border = "#323f4b"
accent = "#6fa8ea"

# ---------------------------------------------------------------------------
# Report groups, registered in this order before discovery runs.
# description defaults to "<name> Reports", icon to "fas fa-folder".
# ---------------------------------------------------------------------------
[[groups]]
id = "utilities_billing"
name = "Utilities Billing"
url = "/groups/utilities_billing/"
description = "Reports related to utility billing, accounts, and services"
icon = "fas fa-file-invoice-dollar"

[[groups]]
id = "warehouse"
name = "Warehouse"
url = "/groups/warehouse/"
description = "Reports related to inventory, work orders, and stock management"
icon = "fas fa-warehouse"

[[groups]]
id = "finance"
name = "Finance"
url = "/groups/finance/"
description = "Financial reports and budget analysis"
icon = "fas fa-chart-pie"

[[groups]]
id = "public_works"
name = "Public Works"
url = "/groups/public_works/"
description = "Public Works reports on vehicles and solid waste"
icon = "fas fa-car"

[[groups]]
id = "community_development"
name = "Community Dev"
url = "/groups/community_development/"
description = "Reports for Engineering, Development Services, Inspections and Planning"
icon = "fas fa-file-circle-check"

[[groups]]
id = "water_resources"
name = "Water Resources"
url = "/groups/water_resources/"
description = "Reports related to water resources"
icon = "fas fa-water"

# ---------------------------------------------------------------------------
# Extra routable modules, attached after the built-in ones.
# A module named "<group>.<report>" with a url_prefix is discovered as a
# report; the optional [modules.metadata] table overrides the inferred fields.
# ---------------------------------------------------------------------------
# [[modules]]
# name = "finance.payroll"
# url_prefix = "/groups/finance/payroll"
#
# [modules.metadata]
# name = "Payroll Summary"
# group_id = "finance"
# icon = "fas fa-money-check"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-surface: {light_surface};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-accent: {light_accent};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-surface: {dark_surface};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-border: {dark_border};
        --color-accent: {dark_accent};
    }}
}}"#,
        light_bg = colors.light.background,
        light_surface = colors.light.surface,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_accent = colors.light.accent,
        dark_bg = colors.dark.background,
        dark_surface = colors.dark.surface,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_accent = colors.dark.accent,
    )
}
