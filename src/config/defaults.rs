//! Default values shared by the configuration types.

/// Default lifetime of a downloaded SPDX license list, in hours
pub const DEFAULT_LICENSE_CACHE_TTL_HOURS: u64 = 24;
