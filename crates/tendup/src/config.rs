//! Runtime settings
//!
//! Nothing is persisted; every setting has a default and can be overridden
//! through a `TENDUP_*` environment variable.

use std::path::PathBuf;

use color_eyre::eyre::{Result, bail};
use tendup_core::sysinfo::DEFAULT_OS_RELEASE;
use tendup_pkg::release::{DEFAULT_DOWNLOAD_URL, DEFAULT_VERSION_URL};

/// Settings for one tendup run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Tracing filter directive
    pub log_filter: String,
    /// Force sudo on or off; `None` decides from the current user
    pub sudo: Option<bool>,
    /// os-release file
    pub os_release: PathBuf,
    /// Latest Go version endpoint
    pub go_version_url: String,
    /// Base URL for Go release archives
    pub go_download_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            sudo: None,
            os_release: PathBuf::from(DEFAULT_OS_RELEASE),
            go_version_url: DEFAULT_VERSION_URL.to_string(),
            go_download_url: DEFAULT_DOWNLOAD_URL.to_string(),
        }
    }
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Settings {
    /// Load settings from the process environment
    ///
    /// # Errors
    /// Returns error if a variable holds a value that cannot be parsed
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings from an arbitrary variable lookup
    ///
    /// # Errors
    /// Returns error if a variable holds a value that cannot be parsed
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut settings = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(filter) = non_empty("TENDUP_LOG") {
            settings.log_filter = filter;
        }
        if let Some(value) = non_empty("TENDUP_SUDO") {
            settings.sudo = Some(parse_bool("TENDUP_SUDO", &value)?);
        }
        if let Some(path) = non_empty("TENDUP_OS_RELEASE") {
            settings.os_release = PathBuf::from(path);
        }
        if let Some(url) = non_empty("TENDUP_GO_VERSION_URL") {
            settings.go_version_url = url;
        }
        if let Some(url) = non_empty("TENDUP_GO_DOWNLOAD_URL") {
            settings.go_download_url = url;
        }

        Ok(settings)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{key} must be a boolean (1/0, true/false), got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = load(&[]).unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.log_filter, "warn");
        assert_eq!(settings.sudo, None);
        assert_eq!(settings.os_release, PathBuf::from("/etc/os-release"));
    }

    #[test]
    fn test_overrides() {
        let settings = load(&[
            ("TENDUP_LOG", "tendup=debug"),
            ("TENDUP_SUDO", "false"),
            ("TENDUP_OS_RELEASE", "/run/host/os-release"),
            ("TENDUP_GO_DOWNLOAD_URL", "https://mirror.example/go"),
        ])
        .unwrap();

        assert_eq!(settings.log_filter, "tendup=debug");
        assert_eq!(settings.sudo, Some(false));
        assert_eq!(settings.os_release, PathBuf::from("/run/host/os-release"));
        assert_eq!(settings.go_download_url, "https://mirror.example/go");
        assert_eq!(settings.go_version_url, DEFAULT_VERSION_URL);
    }

    #[test]
    fn test_empty_values_keep_defaults() {
        let settings = load(&[("TENDUP_LOG", ""), ("TENDUP_SUDO", " ")]).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_invalid_sudo() {
        assert!(load(&[("TENDUP_SUDO", "maybe")]).is_err());
    }
}
