//! Update detection across package managers

use std::sync::Arc;

use tendup_pkg::{UpdateInfo, Updater};
use tracing::{debug, warn};

/// Check every available updater and keep those with pending updates
///
/// Managers that are missing, up to date, or fail their check are left out.
/// Nothing is cached; each call queries the tools again.
pub async fn detect_category(updaters: &[Arc<dyn Updater>]) -> Vec<UpdateInfo> {
    let mut pending = Vec::new();

    for updater in updaters {
        if !updater.is_available().await {
            debug!(manager = %updater.kind(), "not installed");
            continue;
        }

        match updater.check_updates().await {
            Ok(info) if info.has_updates() => pending.push(info),
            Ok(_) => debug!(manager = %updater.kind(), "up to date"),
            Err(e) => warn!(manager = %updater.kind(), error = %e, "update check failed"),
        }
    }

    pending
}
