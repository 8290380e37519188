#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_compiler::compiler::{DocumentSettings, SbomCompiler};
use sbom_compiler::licenses::KnownLicenses;
use sbom_compiler::pipeline::BuildSnapshot;

/// Fuzz snapshot decoding and compilation.
///
/// Artifacts without precomputed digests point at files that do not exist,
/// so compilation is expected to fail for most inputs; it must never panic
/// or loop.
fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(snapshot) = BuildSnapshot::from_json(s) else {
        return;
    };
    let Ok((inputs, roots)) = snapshot.into_inputs() else {
        return;
    };

    let known = KnownLicenses::curated();
    let settings = DocumentSettings::new("fuzz", "https://example.com/fuzz");
    let _ = SbomCompiler::new(settings, &known).compile(&inputs, &roots);
});
