//! Fetching the SPDX license list over the network.
//!
//! The downloaded table of contents is kept in a file cache so repeated runs
//! within the TTL stay offline.

use super::known::KnownLicenses;
use crate::error::{LicenseErrorKind, Result, SbomError};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Location of the published license list
pub const DEFAULT_LICENSE_LIST_URL: &str = "https://spdx.org/licenses/licenses.json";

const CACHE_FILE: &str = "licenses.json";

/// Remote license list source with a TTL file cache.
#[derive(Debug, Clone)]
pub struct RemoteLicenseList {
    url: String,
    cache_dir: Option<PathBuf>,
    ttl: Duration,
    timeout: Duration,
}

impl Default for RemoteLicenseList {
    fn default() -> Self {
        Self {
            url: DEFAULT_LICENSE_LIST_URL.to_string(),
            cache_dir: dirs::cache_dir().map(|d| d.join("sbom-compiler").join("licenses")),
            ttl: Duration::from_secs(24 * 3600),
            timeout: Duration::from_secs(30),
        }
    }
}

impl RemoteLicenseList {
    /// Source with the default URL and cache location
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    #[must_use]
    pub fn with_cache_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.cache_dir = dir;
        self
    }

    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Path of the cached table of contents, if caching is enabled
    #[must_use]
    pub fn cache_path(&self) -> Option<PathBuf> {
        self.cache_dir.as_ref().map(|d| d.join(CACHE_FILE))
    }

    /// Cached content if present and younger than the TTL
    fn load_cached(&self) -> Option<String> {
        let path = self.cache_path()?;
        let metadata = fs::metadata(&path).ok()?;
        let age = metadata.modified().ok()?.elapsed().ok()?;
        if age > self.ttl {
            tracing::debug!("License list cache expired");
            let _ = fs::remove_file(&path);
            return None;
        }
        fs::read_to_string(&path).ok()
    }

    fn store_cached(&self, content: &str) -> Result<()> {
        let Some(path) = self.cache_path() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SbomError::license("creating cache dir", LicenseErrorKind::Cache(e.to_string()))
            })?;
        }
        fs::write(&path, content).map_err(|e| {
            SbomError::license("writing cache", LicenseErrorKind::Cache(e.to_string()))
        })
    }

    /// Load the table, preferring a fresh cache over the network.
    pub fn load(&self) -> Result<KnownLicenses> {
        if let Some(cached) = self.load_cached() {
            match KnownLicenses::from_toc_json(&cached) {
                Ok(known) => {
                    tracing::debug!("Using cached license list");
                    return Ok(known);
                }
                Err(e) => tracing::warn!("Ignoring unreadable license list cache: {e}"),
            }
        }

        let content = self.fetch()?;
        let known = KnownLicenses::from_toc_json(&content)?;
        if let Err(e) = self.store_cached(&content) {
            tracing::warn!("Failed to cache license list: {e}");
        }
        Ok(known)
    }

    #[cfg(feature = "remote-licenses")]
    fn fetch(&self) -> Result<String> {
        let download = |e: reqwest::Error| {
            SbomError::license(
                format!("fetching {}", self.url),
                LicenseErrorKind::Download(e.to_string()),
            )
        };

        tracing::info!("Downloading license list from {}", self.url);
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(download)?;
        let response = client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .map_err(download)?;

        if !response.status().is_success() {
            return Err(SbomError::license(
                format!("fetching {}", self.url),
                LicenseErrorKind::Download(format!("server returned {}", response.status())),
            ));
        }
        response.text().map_err(download)
    }

    #[cfg(not(feature = "remote-licenses"))]
    fn fetch(&self) -> Result<String> {
        Err(SbomError::license(
            format!("fetching {}", self.url),
            LicenseErrorKind::Download("remote-licenses feature not enabled".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOC: &str = r#"{"licenseListVersion":"3.23","licenses":[{"licenseId":"MIT","seeAlso":[]}]}"#;

    #[test]
    fn test_fresh_cache_is_used_without_network() {
        let dir = tempfile::tempdir().expect("temp dir");
        let source = RemoteLicenseList::new()
            .with_url("http://127.0.0.1:9/unreachable.json")
            .with_cache_dir(Some(dir.path().to_path_buf()));
        source.store_cached(TOC).expect("cache write");

        let known = source.load().expect("cached list loads");
        assert_eq!(known.license_list_version(), Some("3.23"));
    }

    #[test]
    fn test_expired_cache_is_discarded() {
        let dir = tempfile::tempdir().expect("temp dir");
        let source = RemoteLicenseList::new()
            .with_cache_dir(Some(dir.path().to_path_buf()))
            .with_ttl(Duration::ZERO);
        source.store_cached(TOC).expect("cache write");
        std::thread::sleep(Duration::from_millis(20));

        assert!(source.load_cached().is_none());
        assert!(!dir.path().join(CACHE_FILE).exists());
    }
}
