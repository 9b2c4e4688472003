//! Operating system identification from os-release

use std::path::Path;

use tracing::debug;

/// Default location of the OS release metadata
pub const DEFAULT_OS_RELEASE: &str = "/etc/os-release";

/// Identity of the running system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    /// `PRETTY_NAME`, e.g. `Ubuntu 24.04.1 LTS`
    pub pretty_name: Option<String>,
}

impl SystemInfo {
    /// Read the os-release file at `path`
    ///
    /// A missing or unreadable file yields an empty `SystemInfo`.
    pub async fn load(path: &Path) -> Self {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "cannot read os-release");
                Self { pretty_name: None }
            }
        }
    }

    /// Parse os-release `KEY=value` content
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let pretty_name = content
            .lines()
            .filter_map(|line| line.trim().split_once('='))
            .find(|(key, _)| *key == "PRETTY_NAME")
            .map(|(_, value)| unquote(value.trim()).to_string())
            .filter(|value| !value.is_empty());

        Self { pretty_name }
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
