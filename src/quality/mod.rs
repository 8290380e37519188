//! Post-compilation checks.
//!
//! # Usage
//!
//! ```no_run
//! use sbom_compiler::model::SpdxDocument;
//! use sbom_compiler::quality::DocumentVerifier;
//!
//! let doc = SpdxDocument::from_json(&std::fs::read_to_string("app.spdx.json").unwrap()).unwrap();
//! let result = DocumentVerifier::new().verify(&doc);
//! for v in &result.violations {
//!     println!("[{:?}] {}: {}", v.severity, v.category.name(), v.message);
//! }
//! ```

mod verifier;

pub use verifier::{
    DocumentVerifier, VerificationResult, Violation, ViolationCategory, ViolationSeverity,
};
