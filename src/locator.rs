//! Download location and package URL synthesis.
//!
//! Both are derived from the base URI of the repository a module was resolved
//! from plus its coordinates. The `NOASSERTION` base is passed through: the
//! download location stays `NOASSERTION` and the package URL carries no
//! repository qualifier.

use crate::error::{LocatorErrorKind, Result, SbomError};
use crate::model::{ModuleCoordinates, NOASSERTION};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Repository that package URLs leave unqualified.
pub const DEFAULT_REPOSITORY: &str = "https://repo.maven.org/maven2";

/// Base URI of an artifact repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RepositoryUri {
    /// Explicitly unknown location
    NoAssertion,
    /// Absolute, hierarchical URL
    Url(Url),
}

impl RepositoryUri {
    /// Parse an absolute repository URL
    pub fn parse(raw: &str) -> Result<Self> {
        raw.parse()
    }

    /// True for the NOASSERTION placeholder
    #[must_use]
    pub const fn is_no_assertion(&self) -> bool {
        matches!(self, Self::NoAssertion)
    }

    /// The URL, unless this is NOASSERTION
    #[must_use]
    pub const fn as_url(&self) -> Option<&Url> {
        match self {
            Self::Url(url) => Some(url),
            Self::NoAssertion => None,
        }
    }
}

impl FromStr for RepositoryUri {
    type Err = SbomError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed == NOASSERTION {
            return Ok(Self::NoAssertion);
        }
        let invalid = |reason: String| {
            SbomError::locator(
                "parsing repository uri",
                LocatorErrorKind::InvalidRepositoryUri {
                    uri: trimmed.to_string(),
                    reason,
                },
            )
        };
        let url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(invalid("not a hierarchical url".to_string()));
        }
        Ok(Self::Url(url))
    }
}

impl TryFrom<String> for RepositoryUri {
    type Error = SbomError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<RepositoryUri> for String {
    fn from(uri: RepositoryUri) -> Self {
        uri.to_string()
    }
}

impl From<Url> for RepositoryUri {
    fn from(url: Url) -> Self {
        Self::Url(url)
    }
}

impl fmt::Display for RepositoryUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAssertion => f.write_str(NOASSERTION),
            Self::Url(url) => f.write_str(url.as_str()),
        }
    }
}

/// Download URL of a module file inside a repository.
///
/// The path is `group/segments/name/version/<filename>` with the filename
/// form-urlencoded, resolved against the base with exactly one trailing `/`.
pub fn download_location(
    base: &RepositoryUri,
    coords: &ModuleCoordinates,
    filename: &str,
) -> Result<String> {
    let Some(url) = base.as_url() else {
        return Ok(NOASSERTION.to_string());
    };

    let mut base = url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    let encoded: String = url::form_urlencoded::byte_serialize(filename.as_bytes()).collect();
    let mut relative = String::from(".");
    for segment in coords.group_segments() {
        relative.push('/');
        relative.push_str(segment);
    }
    for segment in [coords.name.as_str(), coords.version.as_str(), encoded.as_str()] {
        relative.push('/');
        relative.push_str(segment);
    }

    base.join(&relative).map(String::from).map_err(|e| {
        SbomError::locator(
            format!("download location for {coords}"),
            LocatorErrorKind::Unresolvable {
                base: base.to_string(),
                path: relative.clone(),
                reason: e.to_string(),
            },
        )
    })
}

/// Package URL of a module, qualified with the repository unless it is the
/// default one.
#[must_use]
pub fn package_url(base: &RepositoryUri, coords: &ModuleCoordinates) -> String {
    let locator = format!(
        "pkg:maven/{}/{}@{}",
        coords.group, coords.name, coords.version
    );
    let Some(url) = base.as_url() else {
        return locator;
    };

    let repo = url.as_str().trim_end_matches('/');
    if repo == DEFAULT_REPOSITORY {
        return locator;
    }
    let repo = repo
        .strip_prefix("http://")
        .or_else(|| repo.strip_prefix("https://"))
        .unwrap_or(repo);
    let encoded: String = url::form_urlencoded::byte_serialize(repo.as_bytes()).collect();
    format!("{locator}?repository_url={encoded}")
}
