use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;

use crate::ScrublineResult;

/// Source of encoded frame bytes.
///
/// The seam between the preloader and wherever frames actually live (a local
/// asset folder in production, an in-memory map in tests). Implementations are
/// called from loader worker threads.
pub trait AssetFetcher: Send + Sync {
    fn fetch(&self, path: &str) -> ScrublineResult<Vec<u8>>;
}

/// Serves frames from a directory on disk.
#[derive(Clone, Debug)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetFetcher for DirFetcher {
    fn fetch(&self, path: &str) -> ScrublineResult<Vec<u8>> {
        let full = self.root.join(path);
        Ok(std::fs::read(&full).with_context(|| format!("read frame '{}'", full.display()))?)
    }
}

/// Serves frames from an in-memory path-to-bytes map; any path absent from the
/// map fails to fetch. Deterministic source for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemFetcher {
    entries: HashMap<String, Vec<u8>>,
}

impl MemFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(path.into(), bytes);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AssetFetcher for MemFetcher {
    fn fetch(&self, path: &str) -> ScrublineResult<Vec<u8>> {
        self.entries
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no entry for '{path}'").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_fetcher_reads_and_reports_missing() {
        let dir = std::path::PathBuf::from("target").join("fetch_unit");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("frame.bin"), [1u8, 2, 3]).unwrap();

        let fetcher = DirFetcher::new(&dir);
        assert_eq!(fetcher.fetch("frame.bin").unwrap(), vec![1, 2, 3]);
        assert!(fetcher.fetch("missing.bin").is_err());
    }

    #[test]
    fn mem_fetcher_round_trips() {
        let mut fetcher = MemFetcher::new();
        fetcher.insert("a/b.jpg", vec![9u8]);
        assert_eq!(fetcher.fetch("a/b.jpg").unwrap(), vec![9]);
        assert!(fetcher.fetch("a/c.jpg").is_err());
    }
}
