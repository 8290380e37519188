//! Everything a compilation reads besides the roots.
//!
//! The three metadata sources (artifacts, manifests, repositories) are
//! produced independently by the build and joined to graph nodes through the
//! component display string or the repository name.

use crate::error::{CompileErrorKind, Result, SbomError};
use crate::locator::RepositoryUri;
use crate::model::{ComponentId, DependencyGraph, ManifestIndex, ProjectInfo, ScmInfo};
use crate::utils::digest_file;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A resolved binary file of an external component.
///
/// Digests may be precomputed by the pipeline; otherwise they are computed
/// from the file on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactFile {
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl ArtifactFile {
    /// File without precomputed digests
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sha1: None,
            sha256: None,
        }
    }

    /// Attach precomputed SHA-1 and SHA-256 digests
    #[must_use]
    pub fn with_digests(mut self, sha1: impl Into<String>, sha256: impl Into<String>) -> Self {
        self.sha1 = Some(sha1.into());
        self.sha256 = Some(sha256.into());
        self
    }

    /// True when both digests are already known
    #[must_use]
    pub const fn has_digests(&self) -> bool {
        self.sha1.is_some() && self.sha256.is_some()
    }

    /// Final path component, used in the download location
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// SHA-1 and SHA-256 hex digests, reading the file only if needed.
    pub fn digests(&self) -> Result<(String, String)> {
        if let (Some(sha1), Some(sha256)) = (&self.sha1, &self.sha256) {
            return Ok((sha1.clone(), sha256.clone()));
        }
        digest_file(&self.path).map_err(|e| {
            SbomError::compile(
                "computing checksums",
                CompileErrorKind::ArtifactDigest {
                    path: self.path.clone(),
                    message: e.to_string(),
                },
            )
        })
    }

    /// Compute and store any missing digest
    pub fn ensure_digests(&mut self) -> Result<()> {
        if !self.has_digests() {
            let (sha1, sha256) = self.digests()?;
            self.sha1 = Some(sha1);
            self.sha256 = Some(sha256);
        }
        Ok(())
    }
}

/// Resolved artifact files keyed by component display string.
#[derive(Debug, Clone, Default)]
pub struct ArtifactIndex {
    files: HashMap<String, Vec<ArtifactFile>>,
}

impl ArtifactIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a display-string keyed map
    #[must_use]
    pub fn from_map(files: HashMap<String, Vec<ArtifactFile>>) -> Self {
        Self { files }
    }

    /// Register a file for a component
    pub fn insert(&mut self, id: &ComponentId, file: ArtifactFile) {
        self.files.entry(id.display_name()).or_default().push(file);
    }

    /// Files of a component, if any were resolved
    #[must_use]
    pub fn get(&self, id: &ComponentId) -> Option<&[ArtifactFile]> {
        self.files
            .get(&id.display_name())
            .map(Vec::as_slice)
            .filter(|files| !files.is_empty())
    }

    /// Mutable access to every file, for digest precomputation
    pub fn files_mut(&mut self) -> impl Iterator<Item = &mut ArtifactFile> {
        self.files.values_mut().flatten()
    }

    /// Total number of files
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }
}

/// Workspace projects keyed by project path.
#[derive(Debug, Clone, Default)]
pub struct ProjectIndex {
    by_path: HashMap<String, ProjectInfo>,
}

impl ProjectIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, project: ProjectInfo) {
        self.by_path.insert(project.path.clone(), project);
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&ProjectInfo> {
        self.by_path.get(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}

impl FromIterator<ProjectInfo> for ProjectIndex {
    fn from_iter<I: IntoIterator<Item = ProjectInfo>>(iter: I) -> Self {
        let mut index = Self::new();
        for project in iter {
            index.insert(project);
        }
        index
    }
}

/// Maven repositories keyed by repository name.
#[derive(Debug, Clone, Default)]
pub struct RepositoryIndex {
    by_name: HashMap<String, RepositoryUri>,
}

impl RepositoryIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, uri: RepositoryUri) {
        self.by_name.insert(name.into(), uri);
    }

    /// Register a repository from a URL string
    pub fn insert_url(&mut self, name: impl Into<String>, url: &str) -> Result<()> {
        self.insert(name, RepositoryUri::parse(url)?);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RepositoryUri> {
        self.by_name.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// All inputs of one compilation.
#[derive(Debug, Clone, Default)]
pub struct CompileInputs {
    pub graph: DependencyGraph,
    pub projects: ProjectIndex,
    pub manifests: ManifestIndex,
    pub artifacts: ArtifactIndex,
    pub repositories: RepositoryIndex,
    pub scm: Option<ScmInfo>,
}

impl CompileInputs {
    #[must_use]
    pub fn new(graph: DependencyGraph) -> Self {
        Self {
            graph,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_scm(mut self, scm: Option<ScmInfo>) -> Self {
        self.scm = scm;
        self
    }
}

/// Check that a path points at a readable file before digesting it
pub(crate) fn is_readable_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_precomputed_digests_skip_io() {
        let file = ArtifactFile::new("/does/not/exist.jar").with_digests("aa", "bb");
        assert_eq!(
            file.digests().expect("precomputed"),
            ("aa".to_string(), "bb".to_string())
        );
        assert_eq!(file.file_name(), "exist.jar");
    }

    #[test]
    fn test_missing_file_is_digest_error() {
        let file = ArtifactFile::new("/does/not/exist.jar");
        match file.digests() {
            Err(SbomError::Compile {
                source: CompileErrorKind::ArtifactDigest { path, .. },
                ..
            }) => assert_eq!(path, PathBuf::from("/does/not/exist.jar")),
            other => panic!("expected digest error, got {other:?}"),
        }
    }

    #[test]
    fn test_ensure_digests_reads_file() {
        let mut tmp = tempfile::NamedTempFile::new().expect("temp file");
        tmp.write_all(b"abc").expect("write");
        let mut file = ArtifactFile::new(tmp.path());
        assert!(is_readable_file(&file.path));
        file.ensure_digests().expect("digests");
        assert_eq!(
            file.sha1.as_deref(),
            Some("a9993e364706816aba3e25717850c26c9cd0d89d")
        );
        assert!(file.has_digests());
    }

    #[test]
    fn test_artifact_index_ignores_empty_lists() {
        let id = ComponentId::module("g", "a", "1");
        let mut map = HashMap::new();
        map.insert(id.display_name(), Vec::new());
        let index = ArtifactIndex::from_map(map);
        assert!(index.get(&id).is_none());

        let mut index = ArtifactIndex::new();
        index.insert(&id, ArtifactFile::new("a-1.jar"));
        index.insert(&id, ArtifactFile::new("a-1-sources.jar"));
        assert_eq!(index.get(&id).map(<[_]>::len), Some(2));
        assert_eq!(index.file_count(), 2);
    }
}
