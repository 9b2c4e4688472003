//! Type definitions for package management

use std::fmt;

/// Update category, applied in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// OS packages
    System,
    /// Distribution-agnostic packages layered on top of the OS
    Universal,
    /// Language toolchains
    Toolchain,
}

impl Category {
    /// Human-readable label used in messages
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::System => "system",
            Category::Universal => "universal",
            Category::Toolchain => "toolchain",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Package manager type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagerKind {
    /// APT (Debian/Ubuntu)
    Apt,
    /// Flatpak
    Flatpak,
    /// rustup and Cargo
    Rust,
    /// Go release channel
    Go,
}

impl ManagerKind {
    /// Category the manager belongs to
    #[must_use]
    pub fn category(self) -> Category {
        match self {
            ManagerKind::Apt => Category::System,
            ManagerKind::Flatpak => Category::Universal,
            ManagerKind::Rust | ManagerKind::Go => Category::Toolchain,
        }
    }
}

impl fmt::Display for ManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagerKind::Apt => write!(f, "APT"),
            ManagerKind::Flatpak => write!(f, "Flatpak"),
            ManagerKind::Rust => write!(f, "Rust"),
            ManagerKind::Go => write!(f, "Go"),
        }
    }
}

/// Pending updates reported by one manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingUpdates {
    /// Number of packages or components with a newer version
    Count(u32),
    /// Installed and latest published version strings
    Version {
        /// Installed version
        installed: String,
        /// Latest published version
        latest: String,
    },
}

/// Update status of a single manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateInfo {
    /// Manager that produced the result
    pub manager: ManagerKind,
    /// What is pending
    pub pending: PendingUpdates,
}

impl UpdateInfo {
    /// Create a count-based result
    #[must_use]
    pub fn count(manager: ManagerKind, count: u32) -> Self {
        Self {
            manager,
            pending: PendingUpdates::Count(count),
        }
    }

    /// Create a version-pair result
    pub fn version(
        manager: ManagerKind,
        installed: impl Into<String>,
        latest: impl Into<String>,
    ) -> Self {
        Self {
            manager,
            pending: PendingUpdates::Version {
                installed: installed.into(),
                latest: latest.into(),
            },
        }
    }

    /// Whether anything is pending
    ///
    /// Versions are compared as plain strings: any difference, including one
    /// string being a prefix of the other, counts as an update.
    #[must_use]
    pub fn has_updates(&self) -> bool {
        match &self.pending {
            PendingUpdates::Count(n) => *n > 0,
            PendingUpdates::Version { installed, latest } => installed != latest,
        }
    }

    /// Number of pending updates (version pairs count as one)
    #[must_use]
    pub fn pending_count(&self) -> u32 {
        match &self.pending {
            PendingUpdates::Count(n) => *n,
            PendingUpdates::Version { .. } => u32::from(self.has_updates()),
        }
    }
}

impl fmt::Display for UpdateInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pending {
            PendingUpdates::Count(n) => write!(f, "{} ({n})", self.manager),
            PendingUpdates::Version { installed, latest } => {
                write!(f, "{} ({installed} -> {latest})", self.manager)
            }
        }
    }
}

/// Result of applying one manager's updates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Updates were applied
    Updated {
        /// Short description of what changed
        summary: String,
    },
    /// Nothing was pending
    UpToDate,
    /// Updates were pending but deliberately not applied
    Skipped {
        /// Why the manager was skipped
        reason: String,
    },
}

/// A package with available updates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradablePackage {
    /// Package name
    pub name: String,
    /// Current installed version
    pub current_version: String,
    /// Available upgrade version
    pub new_version: String,
    /// Package architecture or suite
    pub arch: Option<String>,
}

impl UpgradablePackage {
    /// Create a new upgradable package
    pub fn new(
        name: impl Into<String>,
        current: impl Into<String>,
        new: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            current_version: current.into(),
            new_version: new.into(),
            arch: None,
        }
    }

    /// Set architecture
    #[must_use]
    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = Some(arch.into());
        self
    }
}

impl fmt::Display for UpgradablePackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(arch) = &self.arch {
            write!(f, "/{arch}")?;
        }
        write!(f, " {} -> {}", self.current_version, self.new_version)
    }
}

/// `1 package`, `3 packages`
pub(crate) fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
