//! APT package manager (Debian/Ubuntu)

use std::sync::Arc;

use async_trait::async_trait;
use tendup_exec::CommandExecutor;
use tracing::{debug, info, instrument, warn};

use crate::command::{run_attached_checked, run_checked, with_sudo};
use crate::error::PackageError;
use crate::traits::Updater;
use crate::types::{ApplyOutcome, ManagerKind, UpdateInfo, UpgradablePackage, plural};

const REFRESH: &str = "apt-get update";
const LIST_UPGRADABLE: &str = "apt list --upgradable 2>/dev/null";
const UPGRADE: &str = "env DEBIAN_FRONTEND=noninteractive apt-get upgrade -y";
const AUTOREMOVE_SIMULATE: &str = "apt autoremove --dry-run 2>/dev/null";
const AUTOREMOVE: &str = "env DEBIAN_FRONTEND=noninteractive apt-get autoremove -y";
const VERSION: &str = "apt --version";

/// APT package manager implementation
pub struct AptManager {
    /// Executor for running commands
    executor: Arc<dyn CommandExecutor>,
    /// Whether to use sudo for commands that change the system
    use_sudo: bool,
}

impl AptManager {
    /// Create a new APT manager
    ///
    /// # Arguments
    /// * `executor` - Executor for running apt commands
    /// * `use_sudo` - Whether to prefix privileged commands with sudo
    pub fn new(executor: Arc<dyn CommandExecutor>, use_sudo: bool) -> Self {
        Self { executor, use_sudo }
    }

    /// Refresh the package index, discarding output and failure
    async fn refresh_index(&self) {
        let cmd = format!("{} > /dev/null 2>&1", with_sudo(self.use_sudo, REFRESH));
        match self.executor.run(&cmd).await {
            Ok(result) if !result.success() => {
                debug!(status = result.status, "package index refresh failed, continuing");
            }
            Err(e) => debug!(error = %e, "package index refresh failed, continuing"),
            Ok(_) => {}
        }
    }

    async fn list_upgradable(&self) -> Result<Vec<UpgradablePackage>, PackageError> {
        self.refresh_index().await;

        let result = run_checked(self.executor.as_ref(), LIST_UPGRADABLE).await?;
        let packages = Self::parse_upgradable(&result.stdout);
        debug!(
            packages = ?packages.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "upgradable packages"
        );
        Ok(packages)
    }

    /// Number of packages autoremove would delete, 0 if the simulation fails
    async fn autoremovable(&self) -> usize {
        match self.executor.run(AUTOREMOVE_SIMULATE).await {
            Ok(result) if result.success() => Self::parse_removal_count(&result.stdout),
            Ok(result) => {
                warn!(status = result.status, "autoremove simulation failed");
                0
            }
            Err(e) => {
                warn!(error = %e, "autoremove simulation failed");
                0
            }
        }
    }

    /// Parse apt list --upgradable output
    fn parse_upgradable(output: &str) -> Vec<UpgradablePackage> {
        let mut packages = Vec::new();

        for line in output.lines() {
            // Skip header lines and empty lines
            if line.trim().is_empty() || line.starts_with("Listing") || line.starts_with("WARNING")
            {
                continue;
            }

            // Parse: package/suite version arch [upgradable from: oldversion]
            // Example: vim/now 2:8.2.2434-3+deb11u1 amd64 [upgradable from: 2:8.2.2434-3]
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() >= 2 {
                let (name, suite) = match parts[0].split_once('/') {
                    Some((name, suite)) => (name, Some(suite)),
                    None => (parts[0], None),
                };

                let current_version = line
                    .split_once("[upgradable from: ")
                    .and_then(|(_, rest)| rest.split_once(']'))
                    .map_or("unknown", |(version, _)| version);

                let mut pkg = UpgradablePackage::new(name, current_version, parts[1]);
                if let Some(s) = suite {
                    pkg = pkg.with_arch(s);
                }
                packages.push(pkg);
            }
        }

        packages
    }

    /// Parse the removal count from an autoremove simulation
    ///
    /// APT 3 prints `Removing: N` in its summary block; older releases print
    /// `X upgraded, Y newly installed, N to remove and Z not upgraded.`
    fn parse_removal_count(output: &str) -> usize {
        for line in output.lines() {
            if let Some((_, rest)) = line.split_once("Removing:") {
                let field = rest.split(',').next().unwrap_or_default();
                if let Ok(num) = field.trim().parse::<usize>() {
                    return num;
                }
            }

            if line.contains(" to remove") {
                for part in line.split(',') {
                    let part = part.trim();
                    if let Some(n) = part.find(" to remove")
                        && let Ok(num) = part[..n].trim().parse::<usize>()
                    {
                        return num;
                    }
                }
            }
        }

        0
    }
}

#[async_trait]
impl Updater for AptManager {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Apt
    }

    async fn is_available(&self) -> bool {
        self.executor.has_command("apt").await
    }

    #[instrument(skip(self))]
    async fn check_updates(&self) -> Result<UpdateInfo, PackageError> {
        let packages = self.list_upgradable().await?;
        info!(count = packages.len(), "found upgradable packages");

        let count = u32::try_from(packages.len()).unwrap_or(u32::MAX);
        Ok(UpdateInfo::count(ManagerKind::Apt, count))
    }

    #[instrument(skip(self))]
    async fn apply(&self) -> Result<ApplyOutcome, PackageError> {
        let packages = self.list_upgradable().await?;
        if packages.is_empty() {
            info!("no upgradable packages");
            return Ok(ApplyOutcome::UpToDate);
        }

        info!(count = packages.len(), "starting apt upgrade");
        run_attached_checked(self.executor.as_ref(), &with_sudo(self.use_sudo, UPGRADE)).await?;

        let mut summary = format!("upgraded {}", plural(packages.len(), "package"));

        let removable = self.autoremovable().await;
        if removable > 0 {
            info!(count = removable, "removing unused packages");
            run_attached_checked(self.executor.as_ref(), &with_sudo(self.use_sudo, AUTOREMOVE))
                .await?;
            summary.push_str(&format!(", removed {}", plural(removable, "unused package")));
        }

        info!(%summary, "apt upgrade completed");
        Ok(ApplyOutcome::Updated { summary })
    }

    async fn version(&self) -> Option<String> {
        let result = self.executor.run(VERSION).await.ok()?;
        if !result.success() {
            return None;
        }
        result.first_line().map(str::to_string)
    }
}
