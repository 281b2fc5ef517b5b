//! Logging setup utilities for the Tomoshibi binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose events are shown at the default level.
const WORKSPACE_CRATES: [&str; 4] = [
    "tomoshibi_shared",
    "tomoshibi_server",
    "tomoshibi_client",
    "tower_http",
];

/// Build the default filter directive used when `RUST_LOG` is not set.
///
/// The binary target is included alongside the workspace libraries, with
/// hyphens replaced the same way cargo names the crate.
pub fn default_directive(binary_name: &str, default_log_level: &str) -> String {
    let mut targets = vec![binary_name.replace('-', "_")];
    targets.extend(
        WORKSPACE_CRATES
            .iter()
            .filter(|name| **name != binary_name.replace('-', "_"))
            .map(|name| name.to_string()),
    );

    targets
        .iter()
        .map(|target| format!("{}={}", target, default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "tomoshibi-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use tomoshibi_shared::logger::setup_logger;
///
/// setup_logger("tomoshibi-server", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
