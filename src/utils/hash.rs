//! Artifact digest utilities.

use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Lowercase hex SHA-1 of arbitrary bytes
#[must_use]
pub fn sha1_hex(data: &[u8]) -> String {
    to_hex(&Sha1::digest(data))
}

/// Lowercase hex SHA-256 of arbitrary bytes
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    to_hex(&Sha256::digest(data))
}

/// SHA-1 and SHA-256 of a file, computed in a single streaming pass.
pub fn digest_file(path: &Path) -> io::Result<(String, String)> {
    let mut file = File::open(path)?;
    let mut sha1 = Sha1::new();
    let mut sha256 = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        sha1.update(&buf[..n]);
        sha256.update(&buf[..n]);
    }
    Ok((to_hex(&sha1.finalize()), to_hex(&sha256.finalize())))
}

fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_known_digests() {
        assert_eq!(sha1_hex(b"abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_digest_file_matches_in_memory() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        let content = vec![7u8; 200_000];
        file.write_all(&content).expect("write");

        let (sha1, sha256) = digest_file(file.path()).expect("digest");
        assert_eq!(sha1, sha1_hex(&content));
        assert_eq!(sha256, sha256_hex(&content));
    }

    #[test]
    fn test_digest_missing_file() {
        assert!(digest_file(Path::new("/nonexistent/artifact.jar")).is_err());
    }
}
