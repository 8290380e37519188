#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_compiler::model::SpdxDocument;
use sbom_compiler::quality::DocumentVerifier;

/// Fuzz SPDX document parsing and structural verification.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(doc) = SpdxDocument::from_json(s) {
            let _ = DocumentVerifier::new().verify(&doc);
            let _ = doc.to_json();
        }
    }
});
