//! Build snapshot loading.
//!
//! A build snapshot is the JSON document the build orchestrator exports after
//! resolution: workspace projects, the resolved graph, artifact files,
//! repositories and raw manifests. [`BuildSnapshot::into_inputs`] turns it
//! into the [`CompileInputs`] a compilation reads.

use crate::compiler::{ArtifactFile, ArtifactIndex, CompileInputs, RepositoryIndex};
use crate::error::{ErrorContext, InputErrorKind, Result, SbomError};
use crate::model::{ComponentId, DependencyGraph, ManifestIndex, ProjectInfo, RawManifest, ResolvedComponent};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Kind of a declared repository. Only Maven repositories can be used for
/// locator synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RepositoryKind {
    Maven,
    Ivy,
    FlatDir,
    #[serde(other)]
    Other,
}

/// A repository declared by the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryEntry {
    pub name: String,
    pub kind: RepositoryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Everything the build exports for one compilation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSnapshot {
    /// Path of the project the document is compiled for, e.g. `:app`
    pub project_path: String,
    #[serde(default)]
    pub projects: Vec<ProjectInfo>,
    #[serde(default)]
    pub roots: Vec<ComponentId>,
    #[serde(default)]
    pub components: Vec<ResolvedComponent>,
    /// Artifact files keyed by component display string
    #[serde(default)]
    pub artifacts: IndexMap<String, Vec<ArtifactFile>>,
    #[serde(default)]
    pub repositories: Vec<RepositoryEntry>,
    /// Raw manifests keyed by component display string
    #[serde(default)]
    pub manifests: IndexMap<String, RawManifest>,
}

impl BuildSnapshot {
    /// Parse a snapshot from JSON.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("decoding build snapshot")
    }

    /// Read and parse a snapshot file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SbomError::io(path, e))?;
        Self::from_json(&content)
    }

    /// Split into compiler inputs and the requested roots.
    ///
    /// Non-Maven repositories and Maven repositories with an unusable URL are
    /// left out of the repository index, with a warning for the latter.
    pub fn into_inputs(self) -> Result<(CompileInputs, Vec<ComponentId>)> {
        if self.roots.is_empty() {
            return Err(SbomError::missing_field("roots", "build snapshot"));
        }

        let mut graph = DependencyGraph::new();
        for component in self.components {
            let id = component.id.clone();
            if graph.insert(component).is_some() {
                return Err(SbomError::input(
                    "building dependency graph",
                    InputErrorKind::InvalidValue {
                        field: "components".to_string(),
                        message: format!("duplicate component '{id}'"),
                    },
                ));
            }
        }

        let mut repositories = RepositoryIndex::new();
        for repo in self.repositories {
            if repo.kind != RepositoryKind::Maven {
                tracing::debug!(repository = %repo.name, kind = ?repo.kind, "Ignoring non-maven repository");
                continue;
            }
            let Some(url) = repo.url else {
                tracing::warn!(repository = %repo.name, "Maven repository has no url");
                continue;
            };
            if let Err(e) = repositories.insert_url(&repo.name, &url) {
                tracing::warn!(repository = %repo.name, "Ignoring repository with invalid url: {e}");
            }
        }

        let artifacts: HashMap<String, Vec<ArtifactFile>> = self.artifacts.into_iter().collect();
        let inputs = CompileInputs {
            graph,
            projects: self.projects.into_iter().collect(),
            manifests: ManifestIndex::from_raw(self.manifests),
            artifacts: ArtifactIndex::from_map(artifacts),
            repositories,
            scm: None,
        };
        Ok((inputs, self.roots))
    }
}

/// Load a snapshot with context for error messages
pub fn load_snapshot(path: &Path, quiet: bool) -> anyhow::Result<BuildSnapshot> {
    if !quiet {
        tracing::info!("Loading build snapshot: {:?}", path);
    }

    let snapshot = BuildSnapshot::from_path(path).map_err(|e| {
        anyhow::Error::new(e).context(format!("Failed to load build snapshot: {}", path.display()))
    })?;

    if !quiet {
        tracing::info!(
            components = snapshot.components.len(),
            manifests = snapshot.manifests.len(),
            "Loaded snapshot for {}",
            snapshot.project_path
        );
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "projectPath": ":app",
        "projects": [{"name": "app", "path": ":app", "version": "1.0"}],
        "roots": [{"kind": "project", "path": ":app"}],
        "components": [
            {
                "id": {"kind": "project", "path": ":app"},
                "dependencies": [
                    {"state": "resolved", "selected": {"kind": "module", "group": "com.test", "name": "test", "version": "1.0.0"}},
                    {"state": "unresolved", "requested": "com.missing:missing:1.0"}
                ]
            },
            {
                "id": {"kind": "module", "group": "com.test", "name": "test", "version": "1.0.0"},
                "repository": "MavenRepo"
            }
        ],
        "artifacts": {"com.test:test:1.0.0": [{"path": "test-1.0.0.jar", "sha1": "aa", "sha256": "bb"}]},
        "repositories": [
            {"name": "MavenRepo", "kind": "maven", "url": "https://repo.maven.org/maven2/"},
            {"name": "local", "kind": "flatDir"},
            {"name": "broken", "kind": "maven", "url": "not a url"},
            {"name": "custom", "kind": "p2", "url": "https://example.com/p2"}
        ],
        "manifests": {"com.test:test:1.0.0": {"licenses": [{"name": "MIT", "url": "https://opensource.org/licenses/MIT"}]}}
    }"#;

    #[test]
    fn test_snapshot_into_inputs() {
        let snapshot = BuildSnapshot::from_json(SNAPSHOT).expect("valid snapshot");
        assert_eq!(snapshot.project_path, ":app");

        let (inputs, roots) = snapshot.into_inputs().expect("inputs");
        assert_eq!(roots, vec![ComponentId::project(":app")]);
        assert_eq!(inputs.graph.len(), 2);
        assert!(inputs.projects.get(":app").is_some());

        let module = ComponentId::module("com.test", "test", "1.0.0");
        assert_eq!(inputs.artifacts.get(&module).map(<[_]>::len), Some(1));
        assert_eq!(inputs.manifests.get(&module).map(|m| m.licenses.len()), Some(1));

        assert_eq!(inputs.repositories.len(), 1);
        assert!(inputs.repositories.get("MavenRepo").is_some());
        assert!(inputs.repositories.get("broken").is_none());
    }

    #[test]
    fn test_snapshot_without_roots_is_rejected() {
        let snapshot = BuildSnapshot::from_json(r#"{"projectPath": ":app"}"#).expect("parses");
        assert!(matches!(
            snapshot.into_inputs(),
            Err(SbomError::Input {
                source: InputErrorKind::MissingField { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_duplicate_components_are_rejected() {
        let json = r#"{
            "projectPath": ":app",
            "roots": [{"kind": "project", "path": ":app"}],
            "components": [
                {"id": {"kind": "project", "path": ":app"}},
                {"id": {"kind": "project", "path": ":app"}}
            ]
        }"#;
        let snapshot = BuildSnapshot::from_json(json).expect("parses");
        assert!(snapshot.into_inputs().is_err());
    }

    #[test]
    fn test_malformed_snapshot_is_input_error() {
        let err = BuildSnapshot::from_json("{\"roots\": 5}").expect_err("malformed");
        assert!(err.to_string().contains("decoding build snapshot"));
    }

    #[test]
    fn test_load_snapshot_missing_file() {
        let err = load_snapshot(Path::new("/nonexistent/snapshot.json"), true)
            .expect_err("missing file");
        assert!(err.to_string().contains("Failed to load build snapshot"));
    }
}
