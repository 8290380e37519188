//! Customization hooks consulted during compilation.

use crate::locator::RepositoryUri;
use crate::model::{ModuleCoordinates, ProjectInfo, ScmInfo};
use std::collections::HashSet;

/// Hooks a build can supply to adjust the compiled document.
///
/// Every method has a default that leaves the input unchanged, so
/// implementors override only what they need.
pub trait SbomExtension: Send + Sync {
    /// Replace the repository base used for locator synthesis.
    ///
    /// `original` is `None` when the component's repository is not a known
    /// Maven repository. Returning `None` yields `NOASSERTION` and no
    /// package URL.
    fn map_repo_uri(
        &self,
        original: Option<&RepositoryUri>,
        _coords: &ModuleCoordinates,
    ) -> Option<RepositoryUri> {
        original.cloned()
    }

    /// Replace the SCM descriptor used for a project's source info.
    fn map_scm_for_project(&self, original: &ScmInfo, _project: &ProjectInfo) -> ScmInfo {
        original.clone()
    }

    /// Whether a workspace project gets a package. Vetoed projects are
    /// collapsed like components without artifacts.
    fn should_create_package_for_project(&self, _project: &ProjectInfo) -> bool {
        true
    }
}

/// Extension that changes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExtension;

impl SbomExtension for DefaultExtension {}

/// Extension driven by configuration: repository mirrors and excluded
/// projects.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredExtension {
    mirrors: Vec<(String, String)>,
    excluded_projects: HashSet<String>,
}

impl ConfiguredExtension {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrite repository URLs starting with `prefix` to start with
    /// `replacement` instead. The first matching mirror wins.
    #[must_use]
    pub fn with_mirror(mut self, prefix: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.mirrors.push((prefix.into(), replacement.into()));
        self
    }

    /// Do not create a package for the project at `path`
    #[must_use]
    pub fn exclude_project(mut self, path: impl Into<String>) -> Self {
        self.excluded_projects.insert(path.into());
        self
    }

    /// True if no hook changes anything
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.mirrors.is_empty() && self.excluded_projects.is_empty()
    }
}

impl SbomExtension for ConfiguredExtension {
    fn map_repo_uri(
        &self,
        original: Option<&RepositoryUri>,
        coords: &ModuleCoordinates,
    ) -> Option<RepositoryUri> {
        let original = original?;
        let Some(url) = original.as_url() else {
            return Some(original.clone());
        };
        let current = url.as_str();
        let Some((prefix, replacement)) = self
            .mirrors
            .iter()
            .find(|(prefix, _)| current.starts_with(prefix.as_str()))
        else {
            return Some(original.clone());
        };

        let mapped = format!("{replacement}{}", &current[prefix.len()..]);
        match RepositoryUri::parse(&mapped) {
            Ok(uri) => {
                tracing::debug!(component = %coords, from = current, to = %uri, "Remapped repository");
                Some(uri)
            }
            Err(e) => {
                tracing::warn!(component = %coords, "Ignoring repository mirror: {e}");
                Some(original.clone())
            }
        }
    }

    fn should_create_package_for_project(&self, project: &ProjectInfo) -> bool {
        !self.excluded_projects.contains(&project.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords() -> ModuleCoordinates {
        ModuleCoordinates::new("com.test", "test", "1.0.0")
    }

    #[test]
    fn test_default_extension_is_identity() {
        let ext = DefaultExtension;
        let uri = RepositoryUri::parse("https://repo.example.org/maven2").expect("uri");
        assert_eq!(ext.map_repo_uri(Some(&uri), &coords()), Some(uri));
        assert_eq!(ext.map_repo_uri(None, &coords()), None);

        let scm = ScmInfo::new("git", "github.com/x/y", "abc");
        let project = ProjectInfo::new("app", ":app");
        assert_eq!(ext.map_scm_for_project(&scm, &project), scm);
        assert!(ext.should_create_package_for_project(&project));
    }

    #[test]
    fn test_mirror_rewrites_prefix() {
        let ext = ConfiguredExtension::new()
            .with_mirror("https://internal.mirror/", "https://repo.maven.org/");
        let uri = RepositoryUri::parse("https://internal.mirror/maven2").expect("uri");
        let mapped = ext.map_repo_uri(Some(&uri), &coords()).expect("mapped");
        assert_eq!(mapped.to_string(), "https://repo.maven.org/maven2");

        let other = RepositoryUri::parse("https://other.org/maven2").expect("uri");
        assert_eq!(ext.map_repo_uri(Some(&other), &coords()), Some(other));
    }

    #[test]
    fn test_invalid_mirror_keeps_original() {
        let ext = ConfiguredExtension::new().with_mirror("https://internal.mirror/", "::bad::");
        let uri = RepositoryUri::parse("https://internal.mirror/maven2").expect("uri");
        assert_eq!(ext.map_repo_uri(Some(&uri), &coords()), Some(uri));
    }

    #[test]
    fn test_excluded_projects() {
        let ext = ConfiguredExtension::new().exclude_project(":platform");
        assert!(!ext.is_noop());
        assert!(!ext.should_create_package_for_project(&ProjectInfo::new("platform", ":platform")));
        assert!(ext.should_create_package_for_project(&ProjectInfo::new("app", ":app")));
    }
}
