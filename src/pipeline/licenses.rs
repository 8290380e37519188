//! Known-license table selection.

use crate::config::LicensesConfig;
use crate::licenses::{KnownLicenses, RemoteLicenseList};
use anyhow::{Context, Result};
use std::time::Duration;

/// Where the known-license table came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseSource {
    /// Local `licenses.json`
    File,
    /// Downloaded or cached SPDX license list
    Remote,
    /// Built-in curated overrides only
    Curated,
}

/// Load the known-license table.
///
/// A configured local file must load; a remote list that cannot be fetched
/// falls back to the curated table with a warning.
pub fn load_known_licenses(
    config: &LicensesConfig,
    quiet: bool,
) -> Result<(KnownLicenses, LicenseSource)> {
    if let Some(path) = &config.list_path {
        let known = KnownLicenses::from_path(path)
            .with_context(|| format!("Failed to load license list: {}", path.display()))?;
        if !quiet {
            tracing::info!(urls = known.len(), "Loaded license list from {:?}", path);
        }
        return Ok((known, LicenseSource::File));
    }

    if config.offline {
        tracing::debug!("Offline mode, using curated license table");
        return Ok((KnownLicenses::curated(), LicenseSource::Curated));
    }

    let remote = RemoteLicenseList::new()
        .with_url(&config.remote_url)
        .with_ttl(Duration::from_secs(config.cache_ttl_hours.saturating_mul(3600)));
    match remote.load() {
        Ok(known) => {
            if !quiet {
                tracing::info!(
                    urls = known.len(),
                    version = known.license_list_version().unwrap_or("unknown"),
                    "Loaded SPDX license list"
                );
            }
            Ok((known, LicenseSource::Remote))
        }
        Err(e) => {
            tracing::warn!("License list unavailable, using curated table: {e}");
            Ok((KnownLicenses::curated(), LicenseSource::Curated))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_offline_uses_curated_table() {
        let config = LicensesConfig {
            offline: true,
            ..LicensesConfig::default()
        };
        let (known, source) = load_known_licenses(&config, true).unwrap();
        assert_eq!(source, LicenseSource::Curated);
        assert!(known.contains("https://opensource.org/licenses/mit-license.php"));
    }

    #[test]
    fn test_local_list_takes_precedence() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("licenses.json");
        std::fs::write(
            &path,
            r#"{"licenseListVersion": "3.22", "licenses": [
                {"licenseId": "MIT", "seeAlso": ["https://opensource.org/license/mit/"], "isDeprecatedLicenseId": false}
            ]}"#,
        )
        .unwrap();

        let config = LicensesConfig {
            list_path: Some(path),
            offline: true,
            ..LicensesConfig::default()
        };
        let (known, source) = load_known_licenses(&config, true).unwrap();
        assert_eq!(source, LicenseSource::File);
        assert_eq!(known.license_list_version(), Some("3.22"));
    }

    #[test]
    fn test_broken_local_list_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("licenses.json");
        std::fs::write(&path, "{}").unwrap();

        let config = LicensesConfig {
            list_path: Some(path),
            ..LicensesConfig::default()
        };
        assert!(load_known_licenses(&config, true).is_err());
    }
}
