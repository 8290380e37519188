//! Per-compilation license resolution.
//!
//! Maps manifest license entries to [`LicenseExpression`]s. Results are cached
//! by normalized URL for the lifetime of one compilation, so the same URL
//! always yields the same instance and each unmatched license is declared
//! exactly once.

use super::known::{http_scheme, normalize_license_url, KnownLicenses};
use crate::model::{ExtractedLicense, LicenseExpression, LicenseInfo, LICENSE_REF_PREFIX};
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves manifest licenses against a known-license table.
#[derive(Debug)]
pub struct LicenseResolver<'a> {
    known: &'a KnownLicenses,
    cache: HashMap<String, LicenseExpression>,
    extracted: Vec<Arc<ExtractedLicense>>,
    next_ref: usize,
}

impl<'a> LicenseResolver<'a> {
    /// Create a resolver with an empty cache
    #[must_use]
    pub fn new(known: &'a KnownLicenses) -> Self {
        Self {
            known,
            cache: HashMap::new(),
            extracted: Vec::new(),
            next_ref: 1,
        }
    }

    /// Resolve a manifest's license list.
    ///
    /// No licenses yields NOASSERTION, one yields that license, several yield
    /// an order-preserving conjunction. NOASSERTION members are dropped from
    /// a conjunction, since SPDX does not allow them inside compound
    /// expressions.
    pub fn resolve(&mut self, licenses: &[LicenseInfo]) -> LicenseExpression {
        match licenses {
            [] => LicenseExpression::NoAssertion,
            [single] => self.resolve_one(single),
            many => {
                let mut members: Vec<_> = many
                    .iter()
                    .map(|license| self.resolve_one(license))
                    .filter(|expr| !expr.is_no_assertion())
                    .collect();
                match members.len() {
                    0 => LicenseExpression::NoAssertion,
                    1 => members.remove(0),
                    _ => LicenseExpression::Conjunction(members),
                }
            }
        }
    }

    /// Resolve a single license entry.
    pub fn resolve_one(&mut self, license: &LicenseInfo) -> LicenseExpression {
        let Some(url) = license.url.as_deref() else {
            tracing::warn!(license = %license.name, "Ignoring license without url");
            return LicenseExpression::NoAssertion;
        };

        let key = normalize_license_url(url);
        if let Some(cached) = self.cache.get(&key) {
            return cached.clone();
        }

        let resolved = match self.known.id_for(url) {
            Some(id) => LicenseExpression::Listed(id),
            None => {
                tracing::debug!(license = %license.name, url, "Non-standard license detected");
                let extracted = Arc::new(ExtractedLicense {
                    license_id: format!("{LICENSE_REF_PREFIX}{}", self.next_ref),
                    name: license.name.clone(),
                    extracted_text: license.name.clone(),
                    see_also: http_scheme(url),
                });
                self.next_ref += 1;
                self.extracted.push(Arc::clone(&extracted));
                LicenseExpression::Extracted(extracted)
            }
        };
        self.cache.insert(key, resolved.clone());
        resolved
    }

    /// Extracted licenses minted so far, in creation order
    #[must_use]
    pub fn extracted(&self) -> &[Arc<ExtractedLicense>] {
        &self.extracted
    }

    /// Number of distinct normalized URLs seen
    #[must_use]
    pub fn cached_urls(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apache() -> LicenseInfo {
        LicenseInfo::new(
            "The Apache Software License, Version 2.0",
            Some("https://www.apache.org/licenses/LICENSE-2.0.txt"),
        )
    }

    fn custom(url: &str) -> LicenseInfo {
        LicenseInfo::new("Custom License", Some(url))
    }

    #[test]
    fn test_zero_licenses_is_no_assertion() {
        let known = KnownLicenses::curated();
        let mut resolver = LicenseResolver::new(&known);
        assert!(resolver.resolve(&[]).is_no_assertion());
    }

    #[test]
    fn test_missing_url_is_no_assertion() {
        let known = KnownLicenses::curated();
        let mut resolver = LicenseResolver::new(&known);
        let expr = resolver.resolve(&[LicenseInfo::new("Mystery", None)]);
        assert!(expr.is_no_assertion());
        assert_eq!(resolver.cached_urls(), 0);
    }

    #[test]
    fn test_listed_license() {
        let known = KnownLicenses::curated();
        let mut resolver = LicenseResolver::new(&known);
        assert_eq!(resolver.resolve(&[apache()]).to_string(), "Apache-2.0");
        assert!(resolver.extracted().is_empty());
    }

    #[test]
    fn test_two_licenses_conjunction_in_order() {
        let known = KnownLicenses::curated();
        let mut resolver = LicenseResolver::new(&known);
        let expr = resolver.resolve(&[custom("https://example.com/l1"), apache()]);
        assert_eq!(expr.to_string(), "LicenseRef-1 AND Apache-2.0");
    }

    #[test]
    fn test_same_url_yields_same_instance() {
        let known = KnownLicenses::curated();
        let mut resolver = LicenseResolver::new(&known);

        let first = resolver.resolve_one(&custom("https://example.com/license"));
        let second = resolver.resolve_one(&custom("HTTP://EXAMPLE.COM/license"));
        assert!(first.same_instance(&second));
        assert_eq!(resolver.extracted().len(), 1);

        let other = resolver.resolve_one(&custom("https://example.com/other"));
        assert!(!first.same_instance(&other));
        assert_eq!(other.to_string(), "LicenseRef-2");
    }

    #[test]
    fn test_extracted_license_fields() {
        let known = KnownLicenses::curated();
        let mut resolver = LicenseResolver::new(&known);
        resolver.resolve_one(&custom("https://Example.com/EULA"));

        let extracted = &resolver.extracted()[0];
        assert_eq!(extracted.license_id, "LicenseRef-1");
        assert_eq!(extracted.name, "Custom License");
        assert_eq!(extracted.extracted_text, "Custom License");
        assert_eq!(extracted.see_also, "http://Example.com/EULA");
    }

    #[test]
    fn test_see_also_keeps_path_case() {
        let known = KnownLicenses::curated();
        let mut resolver = LicenseResolver::new(&known);
        let url = "https://github.com/Foo/Bar/blob/main/LICENSE.txt";
        let first = resolver.resolve_one(&LicenseInfo::new("EULA", Some(url)));
        let second = resolver.resolve_one(&custom("http://github.com/foo/bar/blob/main/license.txt"));

        assert!(first.same_instance(&second));
        assert_eq!(
            resolver.extracted()[0].see_also,
            "http://github.com/Foo/Bar/blob/main/LICENSE.txt"
        );
    }

    #[test]
    fn test_license_without_url_is_dropped_from_conjunction() {
        let known = KnownLicenses::curated();
        let mut resolver = LicenseResolver::new(&known);

        let expr = resolver.resolve(&[LicenseInfo::new("Mystery", None), apache()]);
        assert_eq!(expr.to_string(), "Apache-2.0");

        let expr = resolver.resolve(&[
            custom("https://example.com/l1"),
            LicenseInfo::new("Mystery", None),
            apache(),
        ]);
        assert_eq!(expr.to_string(), "LicenseRef-1 AND Apache-2.0");

        let none = [LicenseInfo::new("A", None), LicenseInfo::new("B", None)];
        assert!(resolver.resolve(&none).is_no_assertion());
    }
}
