//! Local storage for downloaded cover images.
//!
//! Every cover lives in one flat directory under a name derived from the
//! book's title and first author. A file already present under that name is
//! the dedup record: callers check [`CoverStore::existing`] before touching
//! the network.
//!
//! Writes are not locked. Two processes resolving the same book at once may
//! both download it; the later rename wins.

pub mod naming;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub use naming::{cover_filename, sanitize};

use crate::Error;

/// Handle on the covers directory.
#[derive(Debug, Clone)]
pub struct CoverStore {
    root: PathBuf,
    public_prefix: String,
}

impl CoverStore {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        let public_prefix = public_prefix.into().trim_end_matches('/').to_string();
        Self { root: root.into(), public_prefix }
    }

    pub fn from_config(config: &crate::AppConfig) -> Self {
        Self::new(config.covers_dir.clone(), config.public_prefix.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the covers directory (and parents) if missing.
    pub async fn ensure_dir(&self) -> Result<(), Error> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| Error::Storage(format!("cannot create {}: {e}", self.root.display())))
    }

    /// Absolute location of `filename` inside the store.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Path handed back to callers, e.g. `/covers/dune_by_frank_herbert.jpg`.
    pub fn public_path(&self, filename: &str) -> String {
        format!("{}/{}", self.public_prefix, filename)
    }

    /// Public path of `filename` if it is already stored.
    pub async fn existing(&self, filename: &str) -> Option<String> {
        match tokio::fs::try_exists(self.path_for(filename)).await {
            Ok(true) => Some(self.public_path(filename)),
            _ => None,
        }
    }

    /// Delete stored covers whose public path is not in `referenced`.
    ///
    /// Only `.jpg` files directly inside the directory are considered. A
    /// missing directory counts as nothing to clean. Returns the number of
    /// files removed.
    pub async fn remove_orphans(&self, referenced: &HashSet<String>) -> Result<usize, Error> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !entry.file_type().await?.is_file() || path.extension().is_none_or(|ext| ext != "jpg") {
                continue;
            }

            let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            if referenced.contains(&self.public_path(filename)) {
                continue;
            }

            tokio::fs::remove_file(&path).await?;
            tracing::info!(file = %path.display(), "removed orphaned cover");
            removed += 1;
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_path_trims_trailing_slash() {
        let store = CoverStore::new("/tmp/covers", "/covers/");
        assert_eq!(store.public_path("dune.jpg"), "/covers/dune.jpg");
    }

    #[tokio::test]
    async fn test_ensure_dir_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CoverStore::new(tmp.path().join("public").join("covers"), "/covers");

        store.ensure_dir().await.unwrap();
        store.ensure_dir().await.unwrap();
        assert!(store.root().is_dir());
    }

    #[tokio::test]
    async fn test_existing() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CoverStore::new(tmp.path(), "/covers");

        assert_eq!(store.existing("dune.jpg").await, None);

        tokio::fs::write(store.path_for("dune.jpg"), b"jpeg").await.unwrap();
        assert_eq!(store.existing("dune.jpg").await, Some("/covers/dune.jpg".to_string()));
    }

    #[tokio::test]
    async fn test_remove_orphans() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CoverStore::new(tmp.path(), "/covers");

        for name in ["keep.jpg", "orphan.jpg", "notes.txt"] {
            tokio::fs::write(store.path_for(name), b"x").await.unwrap();
        }

        let referenced: HashSet<String> = ["/covers/keep.jpg".to_string()].into_iter().collect();
        let removed = store.remove_orphans(&referenced).await.unwrap();

        assert_eq!(removed, 1);
        assert!(store.path_for("keep.jpg").exists());
        assert!(!store.path_for("orphan.jpg").exists());
        assert!(store.path_for("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_remove_orphans_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CoverStore::new(tmp.path().join("absent"), "/covers");
        assert_eq!(store.remove_orphans(&HashSet::new()).await.unwrap(), 0);
    }
}
