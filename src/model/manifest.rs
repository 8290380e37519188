//! Upstream manifest metadata and the index the compiler joins against.
//!
//! Manifests arrive in a raw, stringly shape (as parsed from the upstream
//! descriptor). [`ManifestInfo::from_raw`] turns that into the typed form,
//! dropping malformed URLs with a warning instead of failing.

use super::ComponentId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// Placeholder used when a license entry carries no name.
const UNNAMED_LICENSE: &str = "NOASSERTION";

/// A license declared in a manifest
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LicenseInfo {
    /// Free-text license name
    pub name: String,
    /// License URL; the resolver cannot key a lookup without one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl LicenseInfo {
    /// Create a license entry
    pub fn new(name: impl Into<String>, url: Option<&str>) -> Self {
        Self {
            name: name.into(),
            url: url.map(str::to_string),
        }
    }
}

/// A developer listed in a manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeveloperInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
}

impl DeveloperInfo {
    /// Developer with only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Set the email
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the organization
    #[must_use]
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }
}

/// Organization block of a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestOrganization {
    pub name: String,
    pub url: Option<Url>,
}

/// Typed manifest metadata for one external component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestInfo {
    pub licenses: Vec<LicenseInfo>,
    pub organization: Option<ManifestOrganization>,
    pub developers: Vec<DeveloperInfo>,
    pub homepage: Option<Url>,
}

impl ManifestInfo {
    /// Empty manifest
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a license
    #[must_use]
    pub fn with_license(mut self, name: &str, url: Option<&str>) -> Self {
        self.licenses.push(LicenseInfo::new(name, url));
        self
    }

    /// Set the organization name
    #[must_use]
    pub fn with_organization(mut self, name: impl Into<String>) -> Self {
        self.organization = Some(ManifestOrganization {
            name: name.into(),
            url: None,
        });
        self
    }

    /// Add a developer
    #[must_use]
    pub fn with_developer(mut self, developer: DeveloperInfo) -> Self {
        self.developers.push(developer);
        self
    }

    /// Convert a raw manifest, warning about and dropping malformed URLs.
    pub fn from_raw(component: &str, raw: RawManifest) -> Self {
        let licenses = raw
            .licenses
            .into_iter()
            .map(|l| LicenseInfo {
                name: l
                    .name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| UNNAMED_LICENSE.to_string()),
                url: l.url.filter(|u| !u.trim().is_empty()),
            })
            .collect();

        let organization = raw.organization.and_then(|org| {
            let url = org
                .url
                .as_deref()
                .and_then(|u| parse_manifest_url(component, "organization url", u));
            org.name.map(|name| ManifestOrganization { name, url })
        });

        let homepage = raw
            .homepage
            .as_deref()
            .and_then(|u| parse_manifest_url(component, "homepage", u));

        Self {
            licenses,
            organization,
            developers: raw.developers,
            homepage,
        }
    }
}

fn parse_manifest_url(component: &str, field: &str, raw: &str) -> Option<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match Url::parse(trimmed) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!(
                component,
                field,
                "Ignoring invalid url detected in manifest: {trimmed} ({e})"
            );
            None
        }
    }
}

/// Manifest exactly as exported by the build, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawManifest {
    pub licenses: Vec<RawLicense>,
    pub organization: Option<RawOrganization>,
    pub developers: Vec<DeveloperInfo>,
    pub homepage: Option<String>,
}

/// Raw license entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLicense {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// Raw organization entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOrganization {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// Manifests keyed by component display string.
#[derive(Debug, Clone, Default)]
pub struct ManifestIndex {
    manifests: HashMap<String, ManifestInfo>,
}

impl ManifestIndex {
    /// Empty index
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from raw manifests keyed by display string
    #[must_use]
    pub fn from_raw(raw: IndexMap<String, RawManifest>) -> Self {
        let manifests = raw
            .into_iter()
            .map(|(key, manifest)| {
                let info = ManifestInfo::from_raw(&key, manifest);
                (key, info)
            })
            .collect();
        Self { manifests }
    }

    /// Register a manifest for a component
    pub fn insert(&mut self, id: &ComponentId, manifest: ManifestInfo) {
        self.manifests.insert(id.display_name(), manifest);
    }

    /// Manifest for a component, joined by display string
    #[must_use]
    pub fn get(&self, id: &ComponentId) -> Option<&ManifestInfo> {
        self.manifests.get(&id.display_name())
    }

    /// Number of manifests
    #[must_use]
    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    /// True if no manifests are indexed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_drops_invalid_homepage() {
        let raw: RawManifest = serde_json::from_str(
            r#"{
                "licenses": [{"name": "Apache 2", "url": "https://www.apache.org/licenses/LICENSE-2.0"}, {"url": ""}],
                "organization": {"name": "Example", "url": "not a url"},
                "homepage": "::invalid::"
            }"#,
        )
        .expect("raw manifest should parse");

        let info = ManifestInfo::from_raw("g:a:1", raw);
        assert!(info.homepage.is_none());
        let org = info.organization.expect("organization kept");
        assert_eq!(org.name, "Example");
        assert!(org.url.is_none());
        assert_eq!(info.licenses[1].name, "NOASSERTION");
        assert!(info.licenses[1].url.is_none());
    }

    #[test]
    fn test_from_raw_keeps_valid_homepage() {
        let raw = RawManifest {
            homepage: Some("https://github.com/google/guava".to_string()),
            ..RawManifest::default()
        };
        let info = ManifestInfo::from_raw("g:a:1", raw);
        assert_eq!(
            info.homepage.map(String::from).as_deref(),
            Some("https://github.com/google/guava")
        );
    }

    #[test]
    fn test_index_joins_by_display_string() {
        let mut raw = IndexMap::new();
        raw.insert("com.test:test:1.0.0".to_string(), RawManifest::default());
        let index = ManifestIndex::from_raw(raw);

        assert!(index.get(&ComponentId::module("com.test", "test", "1.0.0")).is_some());
        assert!(index.get(&ComponentId::module("com.test", "test", "2.0.0")).is_none());
    }
}
