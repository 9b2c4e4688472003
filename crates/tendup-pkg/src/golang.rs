//! Go toolchain installed from the official release archives

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tendup_exec::CommandExecutor;
use tracing::{debug, info, instrument, warn};

use crate::command::{run_checked, shell_quote, with_sudo};
use crate::error::PackageError;
use crate::release::ReleaseFeed;
use crate::traits::Updater;
use crate::types::{ApplyOutcome, ManagerKind, PendingUpdates, UpdateInfo};

const VERSION: &str = "go version";
const WHICH: &str = "command -v go";
const LOCATE: &str = "readlink -f \"$(command -v go)\"";

/// Install directories owned by the OS package manager
const SYSTEM_INSTALL_DIRS: &[&str] = &["/usr"];

/// Platform segment of a Go archive name (`linux-amd64`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoPlatform {
    /// `GOOS` value
    pub os: &'static str,
    /// `GOARCH` value
    pub arch: &'static str,
}

impl GoPlatform {
    /// Platform of the running binary, if Go publishes archives for it
    #[must_use]
    pub fn current() -> Option<Self> {
        Self::from_consts(std::env::consts::OS, std::env::consts::ARCH)
    }

    fn from_consts(os: &str, arch: &str) -> Option<Self> {
        let os = match os {
            "linux" => "linux",
            "macos" => "darwin",
            "freebsd" => "freebsd",
            _ => return None,
        };
        let arch = match arch {
            "x86_64" => "amd64",
            "aarch64" => "arm64",
            "x86" => "386",
            "arm" => "armv6l",
            "powerpc64" => "ppc64le",
            "s390x" => "s390x",
            _ => return None,
        };
        Some(Self { os, arch })
    }

    /// Archive file name for a version
    #[must_use]
    pub fn archive_name(&self, version: &str) -> String {
        format!("{version}.{}-{}.tar.gz", self.os, self.arch)
    }
}

/// Go implementation
pub struct GoManager {
    executor: Arc<dyn CommandExecutor>,
    feed: Arc<dyn ReleaseFeed>,
    platform: Option<GoPlatform>,
    download_dir: PathBuf,
    use_sudo: bool,
}

impl GoManager {
    /// Create a new Go manager for the running platform
    ///
    /// # Arguments
    /// * `executor` - Executor for go, tar and rm
    /// * `feed` - Where versions and archives come from
    /// * `use_sudo` - Whether sudo may be used when the install root is not writable
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        feed: Arc<dyn ReleaseFeed>,
        use_sudo: bool,
    ) -> Self {
        Self {
            executor,
            feed,
            platform: GoPlatform::current(),
            download_dir: std::env::temp_dir(),
            use_sudo,
        }
    }

    /// Override the target platform
    #[must_use]
    pub fn with_platform(mut self, platform: Option<GoPlatform>) -> Self {
        self.platform = platform;
        self
    }

    /// Override where archives are downloaded
    #[must_use]
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    async fn installed_version(&self) -> Result<String, PackageError> {
        let result = run_checked(self.executor.as_ref(), VERSION).await?;
        Self::parse_version(&result.stdout).ok_or_else(|| {
            PackageError::ParseError(format!("unexpected `go version` output: {}", result.stdout))
        })
    }

    /// Install roots of the `go` on the search path, as found and with
    /// symlinks resolved
    async fn install_dirs(&self) -> Result<(PathBuf, PathBuf), PackageError> {
        let linked = self.install_dir_from(WHICH).await?;
        let resolved = self.install_dir_from(LOCATE).await?;
        Ok((linked, resolved))
    }

    /// Install root inferred from the executable path printed by `cmd`
    async fn install_dir_from(&self, cmd: &str) -> Result<PathBuf, PackageError> {
        let result = run_checked(self.executor.as_ref(), cmd).await?;
        let binary = result
            .first_line()
            .ok_or_else(|| PackageError::ManagerNotFound("go".to_string()))?;
        Self::install_dir_of(Path::new(binary)).ok_or_else(|| {
            PackageError::ParseError(format!("cannot infer Go install directory from {binary}"))
        })
    }

    /// Whether files in `dir` can be replaced without sudo
    async fn writable(&self, dir: &Path) -> bool {
        let cmd = format!("test -w {}", shell_quote(&dir.to_string_lossy()));
        self.executor
            .run(&cmd)
            .await
            .map(|r| r.success())
            .unwrap_or(false)
    }

    /// `go version go1.22.1 linux/amd64` -> `go1.22.1`
    fn parse_version(output: &str) -> Option<String> {
        output
            .split_whitespace()
            .nth(2)
            .map(str::to_string)
    }

    /// `/usr/local/go/bin/go` -> `/usr/local/go`
    fn install_dir_of(binary: &Path) -> Option<PathBuf> {
        binary.parent()?.parent().map(Path::to_path_buf)
    }

    fn is_system_install(dir: &Path) -> bool {
        SYSTEM_INSTALL_DIRS.iter().any(|system| dir == Path::new(system))
    }

    /// Replace the installation at `install_dir` with the `latest` archive
    async fn swap_install(
        &self,
        platform: GoPlatform,
        install_dir: &Path,
        latest: &str,
    ) -> Result<(), PackageError> {
        let archive_name = platform.archive_name(latest);
        let url = self.feed.archive_url(&archive_name);
        let archive = self.download_dir.join(&archive_name);

        self.feed.download(&url, &archive).await?;

        let Some(root) = install_dir.parent() else {
            return Err(PackageError::ParseError(format!(
                "install directory {} has no parent",
                install_dir.display()
            )));
        };
        let sudo = self.use_sudo && !self.writable(root).await;
        debug!(root = %root.display(), sudo, "replacing go installation");

        let remove = with_sudo(
            sudo,
            &format!("rm -rf {}", shell_quote(&install_dir.to_string_lossy())),
        );
        let removed = self.executor.run_attached(&remove).await?;
        if !removed.success() {
            warn!(status = removed.status, "removing previous go installation failed");
        }

        let archive_arg = archive.to_string_lossy();
        let extract = with_sudo(
            sudo,
            &format!(
                "tar -C {} -xzf {}",
                shell_quote(&root.to_string_lossy()),
                shell_quote(&archive_arg)
            ),
        );
        let extracted = self.executor.run_attached(&extract).await?;

        if let Err(e) = tokio::fs::remove_file(&archive).await {
            debug!(error = %e, "could not remove downloaded archive");
        }

        if !extracted.success() {
            return Err(PackageError::ExtractFailed {
                archive: archive_arg.into_owned(),
                status: extracted.status,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Updater for GoManager {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Go
    }

    async fn is_available(&self) -> bool {
        self.executor.has_command("go").await
    }

    #[instrument(skip(self))]
    async fn check_updates(&self) -> Result<UpdateInfo, PackageError> {
        let installed = self.installed_version().await?;
        let latest = self.feed.latest_version().await?;
        info!(%installed, %latest, "checked go version");
        Ok(UpdateInfo::version(ManagerKind::Go, installed, latest))
    }

    #[instrument(skip(self))]
    async fn apply(&self) -> Result<ApplyOutcome, PackageError> {
        let info = match self.check_updates().await {
            Ok(info) => info,
            Err(e) => {
                warn!(error = %e, "go update check failed");
                return Ok(ApplyOutcome::Skipped {
                    reason: format!("update check failed: {e}"),
                });
            }
        };
        if !info.has_updates() {
            return Ok(ApplyOutcome::UpToDate);
        }
        let PendingUpdates::Version { installed, latest } = info.pending else {
            return Ok(ApplyOutcome::UpToDate);
        };

        let (linked_dir, install_dir) = match self.install_dirs().await {
            Ok(dirs) => dirs,
            Err(e) => {
                warn!(error = %e, "could not locate go installation");
                return Ok(ApplyOutcome::Skipped {
                    reason: format!("cannot locate the Go installation: {e}"),
                });
            }
        };
        // Debian's /usr/bin/go links into /usr/lib/go-1.xx, so both paths count
        if let Some(system_dir) = [&linked_dir, &install_dir]
            .into_iter()
            .find(|dir| Self::is_system_install(dir))
        {
            return Ok(ApplyOutcome::Skipped {
                reason: format!(
                    "Go in {} is managed by the system package manager",
                    system_dir.display()
                ),
            });
        }
        if install_dir.file_name().is_none_or(|name| name != "go") {
            return Ok(ApplyOutcome::Skipped {
                reason: format!(
                    "{} does not look like a Go release directory",
                    install_dir.display()
                ),
            });
        }
        let Some(platform) = self.platform else {
            return Ok(ApplyOutcome::Skipped {
                reason: "no Go release archive for this platform".to_string(),
            });
        };

        info!(%installed, %latest, dir = %install_dir.display(), "updating go");
        self.swap_install(platform, &install_dir, &latest).await?;

        Ok(ApplyOutcome::Updated {
            summary: format!("{installed} -> {latest}"),
        })
    }
}
