//! Go release channel over HTTPS

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::error::PackageError;

/// Default endpoint returning the latest Go version as text
pub const DEFAULT_VERSION_URL: &str = "https://go.dev/VERSION?m=text";
/// Default base URL for Go release archives
pub const DEFAULT_DOWNLOAD_URL: &str = "https://go.dev/dl";

/// Source of Go release metadata and archives
#[async_trait]
pub trait ReleaseFeed: Send + Sync {
    /// Latest published version string, e.g. `go1.22.2`
    async fn latest_version(&self) -> Result<String, PackageError>;

    /// Download URL for a release archive
    fn archive_url(&self, archive: &str) -> String;

    /// Download `url` to `dest`
    async fn download(&self, url: &str, dest: &Path) -> Result<(), PackageError>;
}

/// [`ReleaseFeed`] backed by go.dev
#[derive(Debug, Clone)]
pub struct GoReleaseFeed {
    client: reqwest::Client,
    version_url: String,
    download_url: String,
}

impl GoReleaseFeed {
    /// Create a feed for the given endpoints
    pub fn new(version_url: impl Into<String>, download_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            version_url: version_url.into(),
            download_url: download_url.into(),
        }
    }

    /// First line of the version endpoint body
    fn parse_version(body: &str) -> Option<String> {
        body.lines()
            .next()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

impl Default for GoReleaseFeed {
    fn default() -> Self {
        Self::new(DEFAULT_VERSION_URL, DEFAULT_DOWNLOAD_URL)
    }
}

#[async_trait]
impl ReleaseFeed for GoReleaseFeed {
    #[instrument(skip(self), fields(url = %self.version_url))]
    async fn latest_version(&self) -> Result<String, PackageError> {
        let feed_error = |e: reqwest::Error| PackageError::ReleaseFeed {
            url: self.version_url.clone(),
            message: e.to_string(),
        };

        let body = self
            .client
            .get(&self.version_url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(feed_error)?
            .text()
            .await
            .map_err(feed_error)?;

        let version = Self::parse_version(&body).ok_or_else(|| {
            PackageError::ParseError(format!("empty response from {}", self.version_url))
        })?;
        debug!(%version, "latest go version");
        Ok(version)
    }

    fn archive_url(&self, archive: &str) -> String {
        format!("{}/{archive}", self.download_url.trim_end_matches('/'))
    }

    #[instrument(skip(self, dest), fields(dest = %dest.display()))]
    async fn download(&self, url: &str, dest: &Path) -> Result<(), PackageError> {
        let download_error = |message: String| PackageError::DownloadFailed {
            url: url.to_string(),
            message,
        };

        info!("downloading go archive");

        let bytes = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| download_error(e.to_string()))?
            .bytes()
            .await
            .map_err(|e| download_error(e.to_string()))?;

        tokio::fs::write(dest, &bytes)
            .await
            .map_err(|e| download_error(format!("writing {}: {e}", dest.display())))?;

        debug!(size = bytes.len(), "download complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version() {
        let body = "go1.22.2\ntime 2024-04-02T20:32:01Z\n";
        assert_eq!(GoReleaseFeed::parse_version(body).as_deref(), Some("go1.22.2"));
        assert_eq!(GoReleaseFeed::parse_version(""), None);
    }

    #[test]
    fn test_archive_url() {
        let feed = GoReleaseFeed::new(DEFAULT_VERSION_URL, "https://mirror.example/dl/");
        assert_eq!(
            feed.archive_url("go1.22.2.linux-amd64.tar.gz"),
            "https://mirror.example/dl/go1.22.2.linux-amd64.tar.gz"
        );
    }
}
