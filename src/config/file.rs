//! Locating and reading `.sbom-compiler.yaml`.
//!
//! The first file found wins; nothing is merged across locations. CLI flags
//! are layered on top with [`AppConfig::merge`].

use super::types::AppConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE_NAMES: &[&str] = &[
    ".sbom-compiler.yaml",
    ".sbom-compiler.yml",
    "sbom-compiler.yaml",
    "sbom-compiler.yml",
];

/// Locate the config file to use.
///
/// An explicit path is taken as-is when it exists. Otherwise the working
/// directory, the enclosing git checkout, `<config dir>/sbom-compiler/` and
/// the home directory are searched in that order.
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path.filter(|p| p.is_file()) {
        return Some(path.to_path_buf());
    }

    let cwd = std::env::current_dir().ok();
    let checkout = cwd.as_deref().and_then(enclosing_checkout);
    let candidates = [
        cwd,
        checkout,
        dirs::config_dir().map(|dir| dir.join("sbom-compiler")),
        dirs::home_dir(),
    ];
    candidates
        .iter()
        .flatten()
        .find_map(|dir| find_config_in_dir(dir))
}

fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Closest ancestor of `start` containing a `.git` entry
fn enclosing_checkout(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

/// Failure to read a config file
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("config file {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a valid sbom-compiler config: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

/// Read and parse one config file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigFileError::NotFound(path.to_path_buf())
        } else {
            ConfigFileError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_yaml_ng::from_str(&content).map_err(|source| ConfigFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// The discovered config and where it came from, or defaults.
///
/// A file that exists but cannot be parsed is reported and ignored.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    let Some(path) = discover_config_file(explicit_path) else {
        return (AppConfig::default(), None);
    };
    match load_config_file(&path) {
        Ok(config) => (config, Some(path)),
        Err(e) => {
            tracing::warn!("Ignoring config file: {e}");
            (AppConfig::default(), None)
        }
    }
}

// ============================================================================
// Configuration Merging
// ============================================================================

fn override_option<T: Clone>(target: &mut Option<T>, other: &Option<T>) {
    if other.is_some() {
        target.clone_from(other);
    }
}

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// Optional values override when set and flags override when raised,
    /// so CLI args can be layered over file config.
    pub fn merge(&mut self, other: &Self) {
        // Document config
        override_option(&mut self.document.name, &other.document.name);
        override_option(&mut self.document.namespace, &other.document.namespace);
        override_option(&mut self.document.creator, &other.document.creator);
        override_option(&mut self.document.package_supplier, &other.document.package_supplier);
        if !other.document.uber_package.is_empty() {
            self.document.uber_package = other.document.uber_package.clone();
        }

        // SCM is replaced as a whole
        if other.scm != super::types::ScmConfig::default() {
            self.scm = other.scm.clone();
        }

        // Behavior config (booleans - if set, override)
        if other.behavior.ignore_non_maven_dependencies {
            self.behavior.ignore_non_maven_dependencies = true;
        }
        if !other.behavior.verify {
            self.behavior.verify = false;
        }
        if other.behavior.fail_on_verification {
            self.behavior.fail_on_verification = true;
        }
        if other.behavior.quiet {
            self.behavior.quiet = true;
        }

        // License list config
        override_option(&mut self.licenses.list_path, &other.licenses.list_path);
        if other.licenses.remote_url != crate::licenses::DEFAULT_LICENSE_LIST_URL {
            self.licenses.remote_url.clone_from(&other.licenses.remote_url);
        }
        if other.licenses.cache_ttl_hours != super::DEFAULT_LICENSE_CACHE_TTL_HOURS {
            self.licenses.cache_ttl_hours = other.licenses.cache_ttl_hours;
        }
        if other.licenses.offline {
            self.licenses.offline = true;
        }

        // Extension config extends the file's lists
        self.extension
            .mirrors
            .extend(other.extension.mirrors.iter().cloned());
        for path in &other.extension.excluded_projects {
            if !self.extension.excluded_projects.contains(path) {
                self.extension.excluded_projects.push(path.clone());
            }
        }

        // Output config
        override_option(&mut self.output.file, &other.output.file);
        if other.output.compact {
            self.output.compact = true;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# sbom-compiler configuration
# Place this file at .sbom-compiler.yaml in your project root or ~/.config/sbom-compiler/

{}
",
        serde_yaml_ng::to_string(&example).unwrap_or_default()
    )
}

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r#"# sbom-compiler Configuration File
# ================================
#
# Place it at:
#   - .sbom-compiler.yaml in your project root
#   - ~/.config/sbom-compiler/sbom-compiler.yaml for global config
#
# CLI arguments always override file settings.

# Document-level settings
document:
  # Document name (defaults to the snapshot's project path)
  # name: my-app
  # Namespace URI (defaults to a random urn:uuid:)
  # namespace: https://example.com/spdx/my-app
  # Extra creator next to the tool
  # creator: "Organization: Example Inc."
  # Supplier of workspace project packages
  # package_supplier: "Organization: Example Inc."
  # Root package describing the whole document; all three or none
  uber_package: {}
  #   name: my-app-distribution
  #   version: 1.0.0
  #   supplier: "Organization: Example Inc."

# Source control descriptor for project source info; all three or none
scm: {}
#  tool: git
#  uri: https://github.com/example/my-app
#  revision: 0123456789abcdef

# Behavior flags
behavior:
  # Skip external components without a Maven manifest instead of failing
  ignore_non_maven_dependencies: false
  # Run the structural verifier on the compiled document
  verify: true
  # Exit with code 1 if the verifier reports errors
  fail_on_verification: false
  # Suppress non-essential output
  quiet: false

# Known-license table
licenses:
  # Local SPDX license list (licenses.json); takes precedence over remote
  # list_path: ./licenses.json
  remote_url: https://spdx.org/licenses/licenses.json
  cache_ttl_hours: 24
  # Use only the built-in curated table
  offline: false

# Compilation hooks
extension: {}
  # Rewrite repository URLs, first match wins
  # mirrors:
  #   - prefix: https://repo.maven.org/maven2
  #     replacement: https://mirror.example.com/maven2
  # Projects that get no package
  # excluded_projects:
  #   - ":buildSrc"

# Output configuration
output:
  # Output file path (omit for stdout)
  # file: app.spdx.json
  compact: false
"#
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MirrorConfig, Validatable};
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".sbom-compiler.yaml");
        std::fs::write(&config_path, "behavior:\n  verify: false\n").unwrap();

        let found = find_config_in_dir(tmp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_enclosing_checkout() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join(".git")).unwrap();
        let nested = tmp.path().join("app/src");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(enclosing_checkout(&nested).as_deref(), Some(tmp.path()));
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        let found = find_config_in_dir(tmp.path());
        assert_eq!(found, None);
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");

        let yaml = r#"
document:
  name: my-app
  uber_package:
    name: all
    version: "1.0"
    supplier: "Organization: Acme"
behavior:
  ignore_non_maven_dependencies: true
extension:
  mirrors:
    - prefix: https://repo.maven.org/maven2
      replacement: https://mirror.example.com/maven2
"#;
        std::fs::write(&config_path, yaml).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.document.name.as_deref(), Some("my-app"));
        assert_eq!(config.document.uber_package.version.as_deref(), Some("1.0"));
        assert!(config.behavior.ignore_non_maven_dependencies);
        assert!(config.behavior.verify);
        assert_eq!(config.extension.mirrors.len(), 1);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_load_config_file_parse_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("broken.yaml");
        std::fs::write(&config_path, "behavior: [unclosed").unwrap();

        let result = load_config_file(&config_path);
        let err = result.expect_err("malformed yaml");
        assert!(matches!(err, ConfigFileError::Parse { .. }));
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[test]
    fn test_config_merge() {
        let mut base = AppConfig::builder()
            .document_name("from-file")
            .creator("Organization: Acme")
            .mirror("https://a.example.com", "https://b.example.com")
            .build();
        let overrides = AppConfig::builder()
            .document_name("from-cli")
            .verify(false)
            .mirror("https://c.example.com", "https://d.example.com")
            .build();

        base.merge(&overrides);

        assert_eq!(base.document.name.as_deref(), Some("from-cli"));
        assert_eq!(base.document.creator.as_deref(), Some("Organization: Acme"));
        assert!(!base.behavior.verify);
        assert_eq!(
            base.extension.mirrors.last(),
            Some(&MirrorConfig {
                prefix: "https://c.example.com".to_string(),
                replacement: "https://d.example.com".to_string(),
            })
        );
    }

    #[test]
    fn test_generate_example_config() {
        let example = generate_example_config();
        assert!(example.contains("document:"));
        assert!(example.contains("ignore_non_maven_dependencies"));
    }

    #[test]
    fn test_full_example_config_parses() {
        let config: AppConfig =
            serde_yaml_ng::from_str(&generate_full_example_config()).unwrap();
        assert!(config.is_valid());
        assert_eq!(config.licenses.cache_ttl_hours, 24);
    }

    #[test]
    fn test_discover_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("custom-config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "output:\n  compact: true").unwrap();

        let discovered = discover_config_file(Some(&config_path));
        assert_eq!(discovered, Some(config_path));
    }
}
