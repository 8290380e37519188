//! Output handling for compiled documents.

use crate::model::SpdxDocument;
use anyhow::{Context, Result};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Target for output - either stdout or a file
#[derive(Debug, Clone)]
pub enum OutputTarget {
    /// Write to stdout
    Stdout,
    /// Write to a file
    File(PathBuf),
}

impl OutputTarget {
    /// Create output target from optional path
    pub fn from_option(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) => OutputTarget::File(p),
            None => OutputTarget::Stdout,
        }
    }

    /// Check if output is to a terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, OutputTarget::Stdout) && std::io::stdout().is_terminal()
    }
}

/// Serialize a document as SPDX JSON
pub fn render_document(document: &SpdxDocument, compact: bool) -> Result<String> {
    let rendered = if compact {
        document.to_json()
    } else {
        document.to_json_pretty()
    };
    rendered.context("Failed to serialize SPDX document")
}

/// Write output to the target (stdout or file)
pub fn write_output(content: &str, target: &OutputTarget, quiet: bool) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            println!("{content}");
            Ok(())
        }
        OutputTarget::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write output to {path:?}"))?;
            if !quiet {
                tracing::info!("SPDX document written to {:?}", path);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CreationInfo;
    use tempfile::TempDir;

    fn document() -> SpdxDocument {
        SpdxDocument::new(
            "app",
            "https://example.com/spdx/app",
            CreationInfo {
                created: "2024-01-01T00:00:00Z".to_string(),
                creators: vec!["Tool: sbom-compiler".to_string()],
                license_list_version: None,
            },
        )
    }

    #[test]
    fn test_output_target_from_option_none() {
        let target = OutputTarget::from_option(None);
        assert!(matches!(target, OutputTarget::Stdout));
    }

    #[test]
    fn test_output_target_from_option_some() {
        let path = PathBuf::from("/tmp/test.json");
        let target = OutputTarget::from_option(Some(path.clone()));
        match target {
            OutputTarget::File(p) => assert_eq!(p, path),
            _ => panic!("Expected File variant"),
        }
    }

    #[test]
    fn test_file_target_is_not_terminal() {
        assert!(!OutputTarget::File(PathBuf::from("/tmp/test.json")).is_terminal());
    }

    #[test]
    fn test_render_compact_and_pretty() {
        let doc = document();
        let compact = render_document(&doc, true).unwrap();
        let pretty = render_document(&doc, false).unwrap();
        assert!(!compact.contains('\n'));
        assert!(pretty.contains("\n  \"spdxVersion\": \"SPDX-2.3\""));
    }

    #[test]
    fn test_write_output_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("app.spdx.json");
        write_output("{}", &OutputTarget::File(path.clone()), true).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "{}");
    }
}
