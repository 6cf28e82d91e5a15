//! Tracing/logging setup shared by the EMS binary and tests.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset: info everywhere, debug for the
/// EMS crates so auth-gate decisions are visible during development.
const DEFAULT_DIRECTIVES: &str = "info,ems_auth=debug,ems_api=debug,ems_directory=debug";

/// Initialize process-wide logging.
///
/// Safe to call multiple times; subsequent calls become no-ops (tests share
/// one process). Honors `RUST_LOG`; set `EMS_LOG_JSON=1` for JSON lines.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let json = std::env::var("EMS_LOG_JSON").is_ok_and(|v| v == "1" || v == "true");
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
