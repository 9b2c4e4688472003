//! Builds the package managers for this machine

use std::sync::Arc;

use tendup_core::Orchestrator;
use tendup_exec::CommandExecutor;
use tendup_pkg::{AptManager, FlatpakManager, GoManager, GoReleaseFeed, RustupManager, Updater};
use tracing::info;

use crate::config::Settings;

/// Create an orchestrator over every supported manager
///
/// Managers that are not installed stay registered; the orchestrator skips
/// them at run time.
pub async fn build_orchestrator(
    settings: &Settings,
    executor: Arc<dyn CommandExecutor>,
) -> Orchestrator {
    let use_sudo = match settings.sudo {
        Some(forced) => forced,
        None => needs_sudo(executor.as_ref()).await,
    };
    info!(use_sudo, "building package managers");

    let feed = Arc::new(GoReleaseFeed::new(
        &settings.go_version_url,
        &settings.go_download_url,
    ));

    let updaters: Vec<Arc<dyn Updater>> = vec![
        Arc::new(AptManager::new(executor.clone(), use_sudo)),
        Arc::new(FlatpakManager::new(executor.clone())),
        Arc::new(RustupManager::new(executor.clone())),
        Arc::new(GoManager::new(executor, feed, use_sudo)),
    ];

    Orchestrator::new(updaters).with_os_release(&settings.os_release)
}

/// Whether privileged commands need sudo (we are not root)
async fn needs_sudo(executor: &dyn CommandExecutor) -> bool {
    executor
        .run("whoami")
        .await
        .map(|r| r.stdout.trim() != "root")
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use tendup_exec::{CommandResult, ExecError};

    use super::*;

    struct WhoamiExecutor(&'static str);

    #[async_trait]
    impl CommandExecutor for WhoamiExecutor {
        async fn run(&self, _cmd: &str) -> Result<CommandResult, ExecError> {
            Ok(CommandResult {
                status: 0,
                stdout: format!("{}\n", self.0),
                stderr: String::new(),
                duration: Duration::from_millis(1),
            })
        }

        async fn run_attached(&self, cmd: &str) -> Result<CommandResult, ExecError> {
            self.run(cmd).await
        }
    }

    struct BrokenExecutor;

    #[async_trait]
    impl CommandExecutor for BrokenExecutor {
        async fn run(&self, _cmd: &str) -> Result<CommandResult, ExecError> {
            Err(ExecError::SpawnError("no shell".to_string()))
        }

        async fn run_attached(&self, cmd: &str) -> Result<CommandResult, ExecError> {
            self.run(cmd).await
        }
    }

    #[tokio::test]
    async fn test_needs_sudo() {
        assert!(!needs_sudo(&WhoamiExecutor("root")).await);
        assert!(needs_sudo(&WhoamiExecutor("alice")).await);
        assert!(needs_sudo(&BrokenExecutor).await);
    }
}
