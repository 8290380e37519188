//! License normalization and inference.
//!
//! [`KnownLicenses`] is an immutable table built once and injected into each
//! compilation; [`LicenseResolver`] holds the per-compilation cache.

mod known;
mod remote;
mod resolver;

pub use known::{
    normalize_license_url, KnownLicenses, LicenseListEntry, LicenseListToc, CURATED_OVERRIDES,
    SPDX_LICENSE_URL_PREFIX,
};
pub use remote::{RemoteLicenseList, DEFAULT_LICENSE_LIST_URL};
pub use resolver::LicenseResolver;
