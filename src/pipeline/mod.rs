//! Pipeline orchestration for SBOM compilation.
//!
//! This module provides the load → digest → compile → verify → write stages
//! shared by the CLI command handlers.

mod compile_stage;
mod digest;
mod licenses;
mod output;
mod snapshot;
mod verify_stage;

pub use compile_stage::{compile_snapshot, CompiledSbom};
pub use digest::{precompute_digests, DigestStats};
pub use licenses::{load_known_licenses, LicenseSource};
pub use output::{render_document, write_output, OutputTarget};
pub use snapshot::{load_snapshot, BuildSnapshot, RepositoryEntry, RepositoryKind};
pub use verify_stage::verify_document;

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The snapshot could not be turned into compiler inputs
    #[error("Snapshot rejected: {source}")]
    SnapshotFailed {
        #[source]
        source: anyhow::Error,
    },

    /// An artifact file could not be digested
    #[error("Digest computation failed: {source}")]
    DigestFailed {
        #[source]
        source: anyhow::Error,
    },

    /// Compilation aborted
    #[error("Compilation failed: {source}")]
    CompileFailed {
        #[source]
        source: anyhow::Error,
    },

    /// Serialization or output failed
    #[error("Output failed: {source}")]
    OutputFailed {
        #[source]
        source: anyhow::Error,
    },
}

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success - document written (verification errors tolerated)
    pub const SUCCESS: i32 = 0;
    /// Verification reported errors and failing on them was requested
    pub const VERIFICATION_FAILED: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::VERIFICATION_FAILED, 1);
        assert_eq!(exit_codes::ERROR, 3);
    }

    #[test]
    fn test_pipeline_error_display() {
        let err = PipelineError::DigestFailed {
            source: anyhow::anyhow!("boom"),
        };
        assert_eq!(err.to_string(), "Digest computation failed: boom");
    }
}
