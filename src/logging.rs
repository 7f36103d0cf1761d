//! Tracing subscriber setup for the binary.
//!
//! `RUST_LOG` wins when set; otherwise the `[logging] level` from
//! `dashboard.toml` is used. Output goes to stderr so `list` can print JSON on
//! stdout.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter from `RUST_LOG`, falling back to `default_level`.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(default_level: &str) {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(stderr_layer)
        .try_init();
}
