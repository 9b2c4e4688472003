//! Consolidated update status report

use std::fmt;

use tendup_pkg::UpdateInfo;

use crate::sysinfo::SystemInfo;

/// Shown for a category without pending updates
pub const PLACEHOLDER: &str = "none";

/// Result of one detection pass
#[derive(Debug, Clone)]
pub struct StatusReport {
    /// Operating system identity
    pub system: SystemInfo,
    /// Version line of the system package manager
    pub package_manager: Option<String>,
    /// Upgradable OS packages
    pub system_updates: u32,
    /// Universal package managers with pending updates
    pub universal: Vec<UpdateInfo>,
    /// Toolchains with pending updates
    pub toolchain: Vec<UpdateInfo>,
}

impl StatusReport {
    /// Whether anything at all is pending
    #[must_use]
    pub fn has_updates(&self) -> bool {
        self.system_updates > 0 || !self.universal.is_empty() || !self.toolchain.is_empty()
    }

    fn summarize(updates: &[UpdateInfo]) -> String {
        if updates.is_empty() {
            return PLACEHOLDER.to_string();
        }
        updates
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let system = self.system.pretty_name.as_deref().unwrap_or("Unknown");
        let package_manager = self.package_manager.as_deref().unwrap_or("unavailable");

        writeln!(f, "{:<20}{system}", "System:")?;
        writeln!(f, "{:<20}{package_manager}", "Package manager:")?;
        writeln!(f, "{:<20}{}", "System updates:", self.system_updates)?;
        writeln!(f, "{:<20}{}", "Universal updates:", Self::summarize(&self.universal))?;
        write!(f, "{:<20}{}", "Toolchain updates:", Self::summarize(&self.toolchain))
    }
}
