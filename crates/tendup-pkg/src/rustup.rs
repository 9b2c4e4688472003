//! Rust toolchain via rustup, plus crates installed with `cargo install`

use std::sync::Arc;

use async_trait::async_trait;
use tendup_exec::CommandExecutor;
use tracing::{debug, info, instrument, warn};

use crate::command::{run_attached_checked, run_checked};
use crate::error::PackageError;
use crate::traits::Updater;
use crate::types::{ApplyOutcome, ManagerKind, UpdateInfo, plural};

const CHECK: &str = "rustup check";
const UPDATE: &str = "rustup update";
const LIST_CRATES: &str = "cargo install --list";
const REINSTALL: &str = "cargo install --force";

/// `rustup check` exit status when at least one update is available
const CHECK_UPDATES_AVAILABLE: i32 = 100;

/// rustup implementation
pub struct RustupManager {
    executor: Arc<dyn CommandExecutor>,
}

impl RustupManager {
    /// Create a new rustup manager
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    async fn pending(&self) -> Result<u32, PackageError> {
        let result = self.executor.run(CHECK).await?;
        if !result.success() && result.status != CHECK_UPDATES_AVAILABLE {
            return Err(PackageError::CommandFailed {
                command: CHECK.to_string(),
                status: result.status,
            });
        }
        Ok(Self::parse_check(&result.stdout))
    }

    /// Crates installed with `cargo install`; empty when cargo is unusable
    async fn installed_crates(&self) -> Vec<String> {
        if !self.executor.has_command("cargo").await {
            return Vec::new();
        }

        match run_checked(self.executor.as_ref(), LIST_CRATES).await {
            Ok(result) => Self::parse_installed_crates(&result.stdout),
            Err(e) => {
                warn!(error = %e, "could not list installed crates");
                Vec::new()
            }
        }
    }

    /// Count `rustup check` lines that are not up to date
    ///
    /// Example:
    /// stable-x86_64-unknown-linux-gnu - update available: 1.94.0 -> 1.95.0
    /// rustup - up to date: 1.29.0
    ///
    /// Older rustup releases capitalize the status.
    fn parse_check(output: &str) -> u32 {
        let count = output
            .lines()
            .filter(|line| {
                !line.trim().is_empty() && !line.to_ascii_lowercase().contains("up to date")
            })
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Crate names from `cargo install --list`
    ///
    /// Package lines are unindented (`ripgrep v14.1.0:`), binaries below
    /// them are indented.
    fn parse_installed_crates(output: &str) -> Vec<String> {
        output
            .lines()
            .filter(|line| !line.starts_with(char::is_whitespace))
            .filter_map(|line| line.split_whitespace().next())
            .map(|name| name.trim_end_matches(':').to_string())
            .collect()
    }
}

#[async_trait]
impl Updater for RustupManager {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Rust
    }

    async fn is_available(&self) -> bool {
        self.executor.has_command("rustup").await
    }

    #[instrument(skip(self))]
    async fn check_updates(&self) -> Result<UpdateInfo, PackageError> {
        let count = self.pending().await?;
        info!(count, "checked rust toolchains");
        Ok(UpdateInfo::count(ManagerKind::Rust, count))
    }

    #[instrument(skip(self))]
    async fn apply(&self) -> Result<ApplyOutcome, PackageError> {
        let count = match self.pending().await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "rust toolchain check failed");
                return Ok(ApplyOutcome::Skipped {
                    reason: format!("toolchain check failed: {e}"),
                });
            }
        };
        if count == 0 {
            return Ok(ApplyOutcome::UpToDate);
        }

        info!(count, "starting rustup update");
        if let Err(e) = run_attached_checked(self.executor.as_ref(), UPDATE).await {
            warn!(error = %e, "rustup update failed");
            return Ok(ApplyOutcome::Skipped {
                reason: e.to_string(),
            });
        }

        let mut summary = format!("updated {}", plural(count as usize, "toolchain component"));

        // cargo has no dry run for installed crates, so every tracked crate
        // is rebuilt
        let crates = self.installed_crates().await;
        if !crates.is_empty() {
            debug!(crates = ?crates, "reinstalling tracked crates");
            let cmd = format!("{REINSTALL} {}", crates.join(" "));
            match run_attached_checked(self.executor.as_ref(), &cmd).await {
                Ok(_) => {
                    summary.push_str(&format!(", reinstalled {}", plural(crates.len(), "crate")));
                }
                Err(e) => {
                    warn!(error = %e, "reinstalling crates failed");
                    summary.push_str(&format!(
                        ", reinstalling {} failed",
                        plural(crates.len(), "crate")
                    ));
                }
            }
        }

        Ok(ApplyOutcome::Updated { summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedExecutor;

    const CHECK_OUTPUT: &str = "stable-x86_64-unknown-linux-gnu - update available: 1.94.0 (4a4ef493e 2026-03-02) -> 1.95.0 (59807616e 2026-04-14)
nightly-x86_64-unknown-linux-gnu - up to date: 1.97.0-nightly (8e62bfd31 2026-05-01)
rustup - up to date: 1.29.0
";

    const CHECK_CURRENT: &str = "stable-x86_64-unknown-linux-gnu - up to date: 1.95.0 (59807616e 2026-04-14)
rustup - up to date: 1.29.0
";

    const CRATE_LIST: &str = "cargo-edit v0.12.2:
    cargo-add
    cargo-rm
ripgrep v14.1.0:
    rg
tendup-local v0.1.0 (/home/me/tendup):
    tendup
";

    const REINSTALL_ALL: &str = "cargo install --force cargo-edit ripgrep tendup-local";

    #[test]
    fn test_parse_check() {
        assert_eq!(RustupManager::parse_check(CHECK_OUTPUT), 1);
        assert_eq!(RustupManager::parse_check(CHECK_CURRENT), 0);
        assert_eq!(RustupManager::parse_check("rustup - Up to date : 1.26.0\n"), 0);
    }

    #[test]
    fn test_parse_installed_crates() {
        assert_eq!(
            RustupManager::parse_installed_crates(CRATE_LIST),
            vec!["cargo-edit", "ripgrep", "tendup-local"]
        );
    }

    #[tokio::test]
    async fn test_check_accepts_updates_available_status() {
        let exec = Arc::new(ScriptedExecutor::new().respond(CHECK, 100, CHECK_OUTPUT));
        let rust = RustupManager::new(exec);

        let info = rust.check_updates().await.unwrap();

        assert_eq!(info, UpdateInfo::count(ManagerKind::Rust, 1));
    }

    #[tokio::test]
    async fn test_check_failure() {
        let exec = Arc::new(ScriptedExecutor::new().fail(CHECK, 1));
        let rust = RustupManager::new(exec);

        assert!(matches!(
            rust.check_updates().await,
            Err(PackageError::CommandFailed { status: 1, .. })
        ));
    }

    #[tokio::test]
    async fn test_apply_up_to_date() {
        let exec = Arc::new(ScriptedExecutor::new().ok(CHECK, CHECK_CURRENT));
        let rust = RustupManager::new(exec.clone());

        assert_eq!(rust.apply().await.unwrap(), ApplyOutcome::UpToDate);
        assert!(!exec.ran(UPDATE));
    }

    #[tokio::test]
    async fn test_apply_reinstalls_every_crate() {
        let exec = Arc::new(
            ScriptedExecutor::new()
                .tool("cargo")
                .respond(CHECK, 100, CHECK_OUTPUT)
                .ok(UPDATE, "")
                .ok(LIST_CRATES, CRATE_LIST)
                .ok(REINSTALL_ALL, ""),
        );
        let rust = RustupManager::new(exec.clone());

        let outcome = rust.apply().await.unwrap();

        assert!(exec.ran(UPDATE));
        assert!(exec.ran(REINSTALL_ALL));
        assert_eq!(
            outcome,
            ApplyOutcome::Updated {
                summary: "updated 1 toolchain component, reinstalled 3 crates".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_apply_crate_failure_is_not_fatal() {
        let exec = Arc::new(
            ScriptedExecutor::new()
                .tool("cargo")
                .respond(CHECK, 100, CHECK_OUTPUT)
                .ok(UPDATE, "")
                .ok(LIST_CRATES, CRATE_LIST)
                .fail(REINSTALL_ALL, 101),
        );
        let rust = RustupManager::new(exec);

        assert_eq!(
            rust.apply().await.unwrap(),
            ApplyOutcome::Updated {
                summary: "updated 1 toolchain component, reinstalling 3 crates failed".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_apply_without_cargo() {
        let exec = Arc::new(ScriptedExecutor::new().ok(CHECK, CHECK_OUTPUT).ok(UPDATE, ""));
        let rust = RustupManager::new(exec.clone());

        let outcome = rust.apply().await.unwrap();

        assert!(!exec.ran(LIST_CRATES));
        assert_eq!(
            outcome,
            ApplyOutcome::Updated {
                summary: "updated 1 toolchain component".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_apply_update_failure_is_a_skip() {
        let exec = Arc::new(
            ScriptedExecutor::new()
                .tool("cargo")
                .ok(CHECK, CHECK_OUTPUT)
                .fail(UPDATE, 1),
        );
        let rust = RustupManager::new(exec.clone());

        let outcome = rust.apply().await.unwrap();

        assert!(matches!(outcome, ApplyOutcome::Skipped { .. }));
        assert!(!exec.ran(LIST_CRATES));
    }

    #[tokio::test]
    async fn test_apply_check_failure_is_a_skip() {
        let exec = Arc::new(ScriptedExecutor::new().fail(CHECK, 1));
        let rust = RustupManager::new(exec.clone());

        let outcome = rust.apply().await.unwrap();

        assert!(matches!(outcome, ApplyOutcome::Skipped { .. }));
        assert!(!exec.ran(UPDATE));
    }
}
