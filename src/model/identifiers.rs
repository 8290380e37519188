//! Component identities used as join keys across all compiler inputs.
//!
//! A dependency graph node is either a workspace project (keyed by its project
//! path) or a published module (keyed by group, name and version). Manifests
//! and artifacts are looked up by the identity's display string, so
//! [`ComponentId::display_name`] must stay stable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Group/name/version coordinates of a published module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleCoordinates {
    /// Dotted group, e.g. `com.google.guava`
    pub group: String,
    /// Artifact name
    pub name: String,
    /// Resolved version
    pub version: String,
}

impl ModuleCoordinates {
    /// Create new coordinates
    pub fn new(group: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Group segments in path order (`com.test` yields `com`, `test`).
    pub fn group_segments(&self) -> impl Iterator<Item = &str> {
        self.group.split('.').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for ModuleCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

/// Identity of a node in the resolved dependency graph.
///
/// Equality drives deduplication: two nodes with equal identities produce a
/// single package in the compiled document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ComponentId {
    /// A project inside the build workspace
    Project {
        /// Project path, e.g. `:app` or `:libs:core`
        path: String,
    },
    /// A versioned module fetched from a repository
    Module(ModuleCoordinates),
    /// Anything else the resolver produced; the compiler rejects these
    Other {
        #[serde(rename = "displayName")]
        display_name: String,
    },
}

impl ComponentId {
    /// Identity of a workspace project
    pub fn project(path: impl Into<String>) -> Self {
        Self::Project { path: path.into() }
    }

    /// Identity of a published module
    pub fn module(group: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self::Module(ModuleCoordinates::new(group, name, version))
    }

    /// Stable textual key used to join manifests and artifacts.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::Project { path } => format!("project {path}"),
            Self::Module(coords) => coords.to_string(),
            Self::Other { display_name } => display_name.clone(),
        }
    }

    /// Module coordinates, if this is a published module
    #[must_use]
    pub const fn as_module(&self) -> Option<&ModuleCoordinates> {
        match self {
            Self::Module(coords) => Some(coords),
            _ => None,
        }
    }

    /// True for workspace projects
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Project { .. })
    }

    /// True for published modules
    #[must_use]
    pub const fn is_external(&self) -> bool {
        matches!(self, Self::Module(_))
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

impl From<ModuleCoordinates> for ComponentId {
    fn from(coords: ModuleCoordinates) -> Self {
        Self::Module(coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_display_names() {
        assert_eq!(
            ComponentId::module("com.test", "test", "1.0.0").display_name(),
            "com.test:test:1.0.0"
        );
        assert_eq!(ComponentId::project(":app").display_name(), "project :app");
    }

    #[test]
    fn test_identity_equality_drives_dedup() {
        let mut seen = HashSet::new();
        assert!(seen.insert(ComponentId::module("g", "a", "1")));
        assert!(!seen.insert(ComponentId::module("g", "a", "1")));
        assert!(seen.insert(ComponentId::module("g", "a", "2")));
        assert!(seen.insert(ComponentId::project(":a")));
    }

    #[test]
    fn test_group_segments_skip_empty() {
        let coords = ModuleCoordinates::new("org..example.", "x", "1");
        let segments: Vec<_> = coords.group_segments().collect();
        assert_eq!(segments, vec!["org", "example"]);
    }

    #[test]
    fn test_tagged_json_shape() {
        let id: ComponentId = serde_json::from_str(
            r#"{"kind":"module","group":"com.test","name":"test","version":"1.0.0"}"#,
        )
        .expect("module identity should parse");
        assert_eq!(id, ComponentId::module("com.test", "test", "1.0.0"));

        let id: ComponentId =
            serde_json::from_str(r#"{"kind":"project","path":":lib"}"#).expect("project");
        assert!(id.is_internal());

        let id: ComponentId =
            serde_json::from_str(r#"{"kind":"other","displayName":"file libs/x.jar"}"#)
                .expect("other");
        assert!(!id.is_internal() && !id.is_external());
    }
}
