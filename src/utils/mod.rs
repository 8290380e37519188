//! Shared utilities.

mod hash;

pub use hash::{digest_file, sha1_hex, sha256_hex};
