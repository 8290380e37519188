//! Workspace project metadata and the SCM descriptor used for source info.

use serde::{Deserialize, Serialize};

/// Version string the build reports for projects that never set one.
pub const UNSPECIFIED_VERSION: &str = "unspecified";

/// Metadata of one project in the build workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub name: String,
    /// Name of the workspace root project
    #[serde(default)]
    pub root_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "unspecified")]
    pub version: String,
    /// Project path, e.g. `:libs:core`
    pub path: String,
    #[serde(default)]
    pub group: String,
}

fn unspecified() -> String {
    UNSPECIFIED_VERSION.to_string()
}

impl ProjectInfo {
    /// Project with the given name and path; version stays unspecified
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            root_name: name.clone(),
            name,
            description: None,
            version: unspecified(),
            path: path.into(),
            group: String::new(),
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    #[must_use]
    pub fn with_root_name(mut self, root_name: impl Into<String>) -> Self {
        self.root_name = root_name.into();
        self
    }

    /// True when the build never assigned a version
    #[must_use]
    pub fn has_unspecified_version(&self) -> bool {
        self.version == UNSPECIFIED_VERSION
    }
}

/// Source-control descriptor (`tool`, `uri`, `revision`).
///
/// All three parts are required; a partially configured descriptor is a
/// configuration error raised before compilation starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScmInfo {
    pub tool: String,
    pub uri: String,
    pub revision: String,
}

impl ScmInfo {
    pub fn new(tool: impl Into<String>, uri: impl Into<String>, revision: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            uri: uri.into(),
            revision: revision.into(),
        }
    }

    /// Source info string for a project: `tool+uri@revision#name[path]`
    #[must_use]
    pub fn source_info(&self, project: &ProjectInfo) -> String {
        format!(
            "{}+{}@{}#{}[{}]",
            self.tool, self.uri, self.revision, project.name, project.path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_info_format() {
        let scm = ScmInfo::new("git", "github.com/example/repo", "abc123");
        let project = ProjectInfo::new("core", ":libs:core");
        assert_eq!(
            scm.source_info(&project),
            "git+github.com/example/repo@abc123#core[:libs:core]"
        );
    }

    #[test]
    fn test_version_defaults_to_unspecified() {
        let project: ProjectInfo =
            serde_json::from_str(r#"{"name":"app","path":":app"}"#).expect("project parses");
        assert!(project.has_unspecified_version());
        assert!(!project.with_version("1.2.3").has_unspecified_version());
    }
}
