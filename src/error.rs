//! Unified error types for sbom-compiler.
//!
//! Data-quality problems never surface here: they are logged and replaced with
//! a placeholder by the compiler. What remains are configuration errors (raised
//! before any traversal), fatal consistency errors (raised mid-traversal) and
//! plain I/O or input decoding failures.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sbom-compiler operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SbomError {
    /// Errors raised while walking the dependency graph
    #[error("Compilation failed: {context}")]
    Compile {
        context: String,
        #[source]
        source: CompileErrorKind,
    },

    /// Errors while loading or interpreting the known-license table
    #[error("License table error: {context}")]
    License {
        context: String,
        #[source]
        source: LicenseErrorKind,
    },

    /// Errors while synthesizing download locations
    #[error("Locator synthesis failed: {context}")]
    Locator {
        context: String,
        #[source]
        source: LocatorErrorKind,
    },

    /// Errors decoding build snapshots or SPDX documents
    #[error("Invalid input: {context}")]
    Input {
        context: String,
        #[source]
        source: InputErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Fatal consistency errors found during traversal
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CompileErrorKind {
    #[error("Unknown component type for '{0}'")]
    UnsupportedComponent(String),

    #[error("Component '{0}' was resolved without a source repository")]
    MissingRepository(String),

    #[error("No manifest available for '{0}'")]
    MissingManifest(String),

    #[error("No project metadata for path '{0}'")]
    UnknownProject(String),

    #[error("Dependency edge points at '{0}', which is not part of the graph")]
    MissingNode(String),

    #[error("Failed to digest artifact {path}: {message}")]
    ArtifactDigest { path: PathBuf, message: String },
}

/// License table error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LicenseErrorKind {
    #[error("Malformed license list: {0}")]
    MalformedList(String),

    #[error("License list download failed: {0}")]
    Download(String),

    #[error("License list cache error: {0}")]
    Cache(String),
}

/// Locator error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LocatorErrorKind {
    #[error("Invalid repository URI '{uri}': {reason}")]
    InvalidRepositoryUri { uri: String, reason: String },

    #[error("Cannot resolve '{path}' against '{base}': {reason}")]
    Unresolvable {
        base: String,
        path: String,
        reason: String,
    },
}

/// Input decoding error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum InputErrorKind {
    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Missing required field: {field} in {context}")]
    MissingField { field: String, context: String },

    #[error("Invalid field value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for sbom-compiler operations
pub type Result<T> = std::result::Result<T, SbomError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl SbomError {
    /// Create a compile error with context
    pub fn compile(context: impl Into<String>, source: CompileErrorKind) -> Self {
        Self::Compile {
            context: context.into(),
            source,
        }
    }

    /// Create a license table error with context
    pub fn license(context: impl Into<String>, source: LicenseErrorKind) -> Self {
        Self::License {
            context: context.into(),
            source,
        }
    }

    /// Create a locator error with context
    pub fn locator(context: impl Into<String>, source: LocatorErrorKind) -> Self {
        Self::Locator {
            context: context.into(),
            source,
        }
    }

    /// Create an input error with context
    pub fn input(context: impl Into<String>, source: InputErrorKind) -> Self {
        Self::Input {
            context: context.into(),
            source,
        }
    }

    /// Create an input error for a missing field
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::input(
            "missing required field",
            InputErrorKind::MissingField {
                field: field.into(),
                context: context.into(),
            },
        )
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// True for errors in the configuration class, raised before traversal.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for SbomError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for SbomError {
    fn from(err: serde_json::Error) -> Self {
        Self::input(
            "JSON deserialization",
            InputErrorKind::InvalidJson(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to the error's existing context, so the
/// final message reads outermost-first:
///
/// ```ignore
/// use sbom_compiler::error::ErrorContext;
///
/// let known = KnownLicenses::from_path(&path)
///     .with_context(|| format!("loading license list {}", path.display()))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<SbomError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: SbomError, new_ctx: &str) -> SbomError {
    match err {
        SbomError::Compile {
            context: existing,
            source,
        } => SbomError::Compile {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SbomError::License {
            context: existing,
            source,
        } => SbomError::License {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SbomError::Locator {
            context: existing,
            source,
        } => SbomError::Locator {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SbomError::Input {
            context: existing,
            source,
        } => SbomError::Input {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SbomError::Io {
            path,
            message,
            source,
        } => SbomError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        SbomError::Config(msg) => SbomError::Config(chain_context(new_ctx, &msg)),
        SbomError::Validation(msg) => SbomError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together as "`new`: `existing`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to an error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;

    /// Convert None to an error with context from a closure.
    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| SbomError::Validation(context.into()))
    }

    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.ok_or_else(|| SbomError::Validation(f().into()))
    }
}
