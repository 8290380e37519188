#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_compiler::licenses::{KnownLicenses, LicenseResolver};
use sbom_compiler::model::LicenseInfo;

/// Fuzz license list loading and resolution of arbitrary URLs.
fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let known = KnownLicenses::from_toc_json(s).unwrap_or_else(|_| KnownLicenses::curated());

    let mut resolver = LicenseResolver::new(&known);
    let licenses: Vec<LicenseInfo> = s
        .lines()
        .take(32)
        .map(|line| LicenseInfo::new("fuzz", Some(line)))
        .collect();
    let expression = resolver.resolve(&licenses);
    let _ = expression.to_string();
});
