//! Known-license table: normalized license URL to canonical SPDX id.
//!
//! Built from the SPDX license-list table of contents (`licenses.json`).
//! Every listed id is reachable through its canonical `spdx.org/licenses/<id>`
//! URL and through its `seeAlso` URLs. A `seeAlso` URL claimed by more than
//! one id is ambiguous and dropped. A handful of curated overrides are applied
//! last and always win.

use crate::error::{ErrorContext, LicenseErrorKind, Result, SbomError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

/// Canonical prefix of SPDX license pages
pub const SPDX_LICENSE_URL_PREFIX: &str = "https://spdx.org/licenses/";

/// URLs commonly found in manifests that the license list does not map, or
/// maps ambiguously.
pub const CURATED_OVERRIDES: &[(&str, &str)] = &[
    ("http://www.apache.org/licenses/LICENSE-2.0.txt", "Apache-2.0"),
    ("http://www.opensource.org/licenses/cpl1.0.txt", "CPL-1.0"),
    ("http://www.opensource.org/licenses/mit-license.php", "MIT"),
    ("http://www.mozilla.org/MPL/MPL-1.0.txt", "MPL-1.0"),
];

/// Normalize a license URL into a lookup key.
///
/// Keys are case-insensitive and `https` collides with `http`.
#[must_use]
pub fn normalize_license_url(url: &str) -> String {
    http_scheme(url).to_lowercase()
}

/// Rewrite an `https` URL to `http`, keeping the rest of it untouched.
///
/// Used for `seeAlso` cross-references, whose paths are case-sensitive.
#[must_use]
pub fn http_scheme(url: &str) -> String {
    let url = url.trim();
    match url.get(..8) {
        Some(scheme) if scheme.eq_ignore_ascii_case("https://") => format!("http://{}", &url[8..]),
        _ => url.to_string(),
    }
}

/// Table of contents of the SPDX license list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseListToc {
    #[serde(default)]
    pub license_list_version: Option<String>,
    #[serde(default)]
    pub licenses: Vec<LicenseListEntry>,
}

/// One entry of the license list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseListEntry {
    pub license_id: String,
    #[serde(default)]
    pub see_also: Vec<String>,
    #[serde(default)]
    pub is_deprecated_license_id: bool,
}

/// Immutable lookup table injected into each compilation.
#[derive(Debug, Clone, Default)]
pub struct KnownLicenses {
    by_url: HashMap<String, Arc<str>>,
    license_list_version: Option<String>,
}

impl KnownLicenses {
    /// Only the curated overrides; used when no license list is available.
    #[must_use]
    pub fn curated() -> Self {
        let mut known = Self::default();
        known.apply_overrides();
        known
    }

    /// Build the table from a parsed table of contents.
    #[must_use]
    pub fn from_toc(toc: &LicenseListToc) -> Self {
        let mut ids: HashMap<&str, Arc<str>> = HashMap::new();
        let mut by_url: HashMap<String, Arc<str>> = HashMap::new();
        let mut ambiguous: HashSet<String> = HashSet::new();

        for entry in &toc.licenses {
            let id = ids
                .entry(entry.license_id.as_str())
                .or_insert_with(|| Arc::from(entry.license_id.as_str()))
                .clone();
            by_url.insert(
                normalize_license_url(&format!("{SPDX_LICENSE_URL_PREFIX}{}", entry.license_id)),
                Arc::clone(&id),
            );
        }

        for entry in toc.licenses.iter().filter(|e| !e.is_deprecated_license_id) {
            let Some(id) = ids.get(entry.license_id.as_str()) else {
                continue;
            };
            for url in &entry.see_also {
                let key = normalize_license_url(url);
                match by_url.get(&key) {
                    Some(existing) if existing != id => {
                        ambiguous.insert(key);
                    }
                    Some(_) => {}
                    None => {
                        by_url.insert(key, Arc::clone(id));
                    }
                }
            }
        }

        for key in &ambiguous {
            by_url.remove(key);
        }
        tracing::debug!(
            urls = by_url.len(),
            ambiguous = ambiguous.len(),
            "Built known-license table"
        );

        let mut known = Self {
            by_url,
            license_list_version: toc.license_list_version.clone(),
        };
        known.apply_overrides();
        known
    }

    /// Parse a `licenses.json` document.
    pub fn from_toc_json(content: &str) -> Result<Self> {
        let toc: LicenseListToc = serde_json::from_str(content).map_err(|e| {
            SbomError::license(
                "parsing license list",
                LicenseErrorKind::MalformedList(e.to_string()),
            )
        })?;
        if toc.licenses.is_empty() {
            return Err(SbomError::license(
                "parsing license list",
                LicenseErrorKind::MalformedList("no licenses in list".to_string()),
            ));
        }
        Ok(Self::from_toc(&toc))
    }

    /// Load a `licenses.json` file from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SbomError::io(path, e))?;
        Self::from_toc_json(&content)
            .with_context(|| format!("loading license list {}", path.display()))
    }

    /// Add or replace a mapping.
    #[must_use]
    pub fn with_mapping(mut self, url: &str, id: &str) -> Self {
        self.by_url.insert(normalize_license_url(url), Arc::from(id));
        self
    }

    fn apply_overrides(&mut self) {
        for (url, id) in CURATED_OVERRIDES {
            let shared = self
                .by_url
                .values()
                .find(|existing| existing.as_ref() == *id)
                .cloned()
                .unwrap_or_else(|| Arc::from(*id));
            self.by_url.insert(normalize_license_url(url), shared);
        }
    }

    /// Canonical SPDX id for a license URL.
    ///
    /// Besides the table itself, canonical `spdx.org/licenses/<id>` URLs (with
    /// or without `.html`/`.json`) are recognised for any valid SPDX id.
    #[must_use]
    pub fn id_for(&self, url: &str) -> Option<Arc<str>> {
        if let Some(id) = self.by_url.get(&normalize_license_url(url)) {
            return Some(Arc::clone(id));
        }
        canonical_spdx_id(url).map(Arc::from)
    }

    /// True when the URL maps to a listed license
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.id_for(url).is_some()
    }

    /// Version of the license list the table was built from
    #[must_use]
    pub fn license_list_version(&self) -> Option<&str> {
        self.license_list_version.as_deref()
    }

    /// Number of URL mappings
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_url.len()
    }

    /// True if the table has no mappings
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_url.is_empty()
    }
}

fn canonical_spdx_id(url: &str) -> Option<&'static str> {
    let trimmed = url.trim();
    let rest = ["https://spdx.org/licenses/", "http://spdx.org/licenses/"]
        .iter()
        .find_map(|prefix| {
            trimmed
                .get(..prefix.len())
                .filter(|head| head.eq_ignore_ascii_case(prefix))
                .map(|_| &trimmed[prefix.len()..])
        })?;
    let candidate = rest
        .trim_end_matches('/')
        .trim_end_matches(".html")
        .trim_end_matches(".json");
    spdx::license_id(candidate).map(|id| id.name)
}
