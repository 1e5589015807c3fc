//! Logging bootstrap.

use reqbench_core::config::DebugSettings;
use tracing_subscriber::EnvFilter;

/// Installs a global fmt subscriber.
///
/// `RUST_LOG` wins over `settings.log_level`. An unparsable level falls back
/// to `info`. Returns `false` if a global subscriber was already installed,
/// which makes repeated calls harmless.
pub fn init_logging(settings: &DebugSettings) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"))
    });

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(level = %settings.log_level, "Tracing initialized");
    }
    installed
}
