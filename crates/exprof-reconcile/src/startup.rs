use std::time::Duration;

use exprof_config::ProfilesConfig;
use tracing::{debug, info, warn};

use crate::{ProfileAction, ProfileEngine, Signal};

/// Time the host needs to settle its own add-on enablement before queries
/// are trusted.
pub const STARTUP_DELAY: Duration = Duration::from_secs(3);

impl ProfileEngine<'_> {
    /// Startup reconciliation for every active name, independently.
    pub fn scan_active_profiles(&self, config: &ProfilesConfig) -> Vec<Signal> {
        config
            .active_profiles
            .iter()
            .flat_map(|name| self.reconcile(name, ProfileAction::Startup, config).signals)
            .collect()
    }
}

/// Process-start hook. Does nothing unless `enableStartupCheck` is set;
/// otherwise waits `delay` and scans the active profiles.
pub async fn run_startup_check(engine: &ProfileEngine<'_>, delay: Duration) -> Vec<Signal> {
    let config = match engine.store.load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "startup check cannot read settings");
            return vec![Signal::LoadFailed {
                message: e.to_string(),
            }];
        }
    };

    if !config.enable_startup_check {
        debug!("startup check disabled");
        return Vec::new();
    }

    tokio::time::sleep(delay).await;
    info!(active = config.active_profiles.len(), "running startup profile check");
    engine.scan_active_profiles(&config)
}
