//! Flatpak universal package manager

use std::sync::Arc;

use async_trait::async_trait;
use tendup_exec::CommandExecutor;
use tracing::{info, instrument, warn};

use crate::command::{run_attached_checked, run_checked};
use crate::error::PackageError;
use crate::traits::Updater;
use crate::types::{ApplyOutcome, ManagerKind, UpdateInfo, plural};

const LIST_UPDATES: &str = "flatpak remote-ls --updates";
const UPDATE: &str = "flatpak update -y --noninteractive";

/// Flatpak implementation
///
/// Flatpak handles its own privilege escalation through polkit, so no sudo.
pub struct FlatpakManager {
    executor: Arc<dyn CommandExecutor>,
}

impl FlatpakManager {
    /// Create a new Flatpak manager
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    async fn pending(&self) -> Result<u32, PackageError> {
        let result = run_checked(self.executor.as_ref(), LIST_UPDATES).await?;
        Ok(u32::try_from(result.lines().count()).unwrap_or(u32::MAX))
    }
}

#[async_trait]
impl Updater for FlatpakManager {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Flatpak
    }

    async fn is_available(&self) -> bool {
        self.executor.has_command("flatpak").await
    }

    #[instrument(skip(self))]
    async fn check_updates(&self) -> Result<UpdateInfo, PackageError> {
        let count = self.pending().await?;
        info!(count, "found flatpak updates");
        Ok(UpdateInfo::count(ManagerKind::Flatpak, count))
    }

    #[instrument(skip(self))]
    async fn apply(&self) -> Result<ApplyOutcome, PackageError> {
        let count = match self.pending().await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "flatpak update check failed");
                return Ok(ApplyOutcome::Skipped {
                    reason: format!("update check failed: {e}"),
                });
            }
        };
        if count == 0 {
            return Ok(ApplyOutcome::UpToDate);
        }

        info!(count, "starting flatpak update");
        if let Err(e) = run_attached_checked(self.executor.as_ref(), UPDATE).await {
            warn!(error = %e, "flatpak update failed");
            return Ok(ApplyOutcome::Skipped {
                reason: e.to_string(),
            });
        }

        Ok(ApplyOutcome::Updated {
            summary: format!("updated {}", plural(count as usize, "ref")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedExecutor;

    const REMOTE_LS: &str = "Firefox\torg.mozilla.firefox\t\tstable\n\
                             GNOME Application Platform version 46\torg.gnome.Platform\t\t46\n";

    #[tokio::test]
    async fn test_check_updates_counts_lines() {
        let exec = Arc::new(ScriptedExecutor::new().ok(LIST_UPDATES, REMOTE_LS));
        let flatpak = FlatpakManager::new(exec);

        let info = flatpak.check_updates().await.unwrap();

        assert_eq!(info, UpdateInfo::count(ManagerKind::Flatpak, 2));
    }

    #[tokio::test]
    async fn test_apply_without_updates_is_a_skip() {
        let exec = Arc::new(ScriptedExecutor::new().ok(LIST_UPDATES, ""));
        let flatpak = FlatpakManager::new(exec.clone());

        assert_eq!(flatpak.apply().await.unwrap(), ApplyOutcome::UpToDate);
        assert!(!exec.ran(UPDATE));
    }

    #[tokio::test]
    async fn test_apply_updates() {
        let exec = Arc::new(
            ScriptedExecutor::new()
                .ok(LIST_UPDATES, REMOTE_LS)
                .ok(UPDATE, ""),
        );
        let flatpak = FlatpakManager::new(exec.clone());

        let outcome = flatpak.apply().await.unwrap();

        assert!(exec.ran(UPDATE));
        assert_eq!(
            outcome,
            ApplyOutcome::Updated {
                summary: "updated 2 refs".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_apply_failure_is_a_skip() {
        let exec = Arc::new(
            ScriptedExecutor::new()
                .ok(LIST_UPDATES, REMOTE_LS)
                .fail(UPDATE, 1),
        );
        let flatpak = FlatpakManager::new(exec);

        let outcome = flatpak.apply().await.unwrap();

        assert!(
            matches!(&outcome, ApplyOutcome::Skipped { reason } if reason.contains("status 1")),
            "unexpected outcome: {outcome:?}"
        );
    }

    #[tokio::test]
    async fn test_apply_list_failure_is_a_skip() {
        let exec = Arc::new(ScriptedExecutor::new().fail(LIST_UPDATES, 1));
        let flatpak = FlatpakManager::new(exec.clone());

        assert!(matches!(flatpak.apply().await.unwrap(), ApplyOutcome::Skipped { .. }));
        assert!(!exec.ran(UPDATE));
    }

    #[tokio::test]
    async fn test_check_updates_failure() {
        let exec = Arc::new(ScriptedExecutor::new().fail(LIST_UPDATES, 1));
        let flatpak = FlatpakManager::new(exec);

        assert!(flatpak.check_updates().await.is_err());
    }

    #[tokio::test]
    async fn test_is_available() {
        let present = FlatpakManager::new(Arc::new(ScriptedExecutor::new().tool("flatpak")));
        let absent = FlatpakManager::new(Arc::new(ScriptedExecutor::new()));

        assert!(present.is_available().await);
        assert!(!absent.is_available().await);
    }
}
