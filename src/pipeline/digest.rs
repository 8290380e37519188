//! Parallel artifact digest precomputation.
//!
//! Digesting large jars dominates compilation time, so the pipeline hashes
//! every artifact file on the rayon pool before the single-threaded compiler
//! runs. Files that already carry both digests are left alone. Unreadable
//! files are skipped with a warning: the compiler only fails on them if a
//! packaged component actually references one.

use crate::compiler::{is_readable_file, ArtifactIndex};
use anyhow::Result;
use rayon::prelude::*;

/// Outcome of digest precomputation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DigestStats {
    /// Files hashed in this run
    pub computed: usize,
    /// Files that already had both digests
    pub precomputed: usize,
    /// Unreadable files left for the compiler
    pub skipped: usize,
}

/// Compute missing SHA-1/SHA-256 digests for every readable artifact file.
pub fn precompute_digests(artifacts: &mut ArtifactIndex, quiet: bool) -> Result<DigestStats> {
    let total = artifacts.file_count();
    let (mut pending, unreadable): (Vec<_>, Vec<_>) = artifacts
        .files_mut()
        .filter(|f| !f.has_digests())
        .partition(|f| is_readable_file(&f.path));

    for file in &unreadable {
        tracing::warn!(path = %file.path.display(), "Skipping unreadable artifact file");
    }
    let stats = DigestStats {
        computed: pending.len(),
        precomputed: total - pending.len() - unreadable.len(),
        skipped: unreadable.len(),
    };

    pending
        .par_iter_mut()
        .try_for_each(|file| file.ensure_digests())?;

    if !quiet {
        tracing::info!(
            computed = stats.computed,
            precomputed = stats.precomputed,
            skipped = stats.skipped,
            "Artifact digests ready"
        );
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ArtifactFile;
    use crate::model::ComponentId;
    use tempfile::TempDir;

    #[test]
    fn test_precompute_fills_missing_digests() {
        let tmp = TempDir::new().unwrap();
        let jar = tmp.path().join("test-1.0.0.jar");
        std::fs::write(&jar, b"abc").unwrap();

        let id = ComponentId::module("com.test", "test", "1.0.0");
        let mut index = ArtifactIndex::new();
        index.insert(&id, ArtifactFile::new(&jar));
        index.insert(&id, ArtifactFile::new("/elsewhere/x.jar").with_digests("aa", "bb"));

        let stats = precompute_digests(&mut index, true).unwrap();
        assert_eq!(
            stats,
            DigestStats {
                computed: 1,
                precomputed: 1,
                skipped: 0
            }
        );

        let files = index.get(&id).unwrap();
        assert_eq!(
            files[0].sha256.as_deref(),
            Some("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
    }

    #[test]
    fn test_precompute_skips_missing_file() {
        let id = ComponentId::module("com.test", "test", "1.0.0");
        let mut index = ArtifactIndex::new();
        index.insert(&id, ArtifactFile::new("/does/not/exist.jar"));

        let stats = precompute_digests(&mut index, true).unwrap();
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.computed, 0);
        assert!(!index.get(&id).unwrap()[0].has_digests());
    }
}
