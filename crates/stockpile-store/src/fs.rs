//! Filesystem backend.
//!
//! Writes land in a temporary file in the target's directory, which is then
//! renamed over the target. The rename is atomic on the same filesystem, so
//! readers never observe a partially written file.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::traits::{DurableWrite, RawRead};

/// [`DurableWrite`] and [`RawRead`] over the local filesystem.
#[derive(Clone, Debug, Default)]
pub struct FsBackend {
    config: StoreConfig,
}

impl FsBackend {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DurableWrite for FsBackend {
    async fn write_durable(&self, path: &Path, contents: &[u8]) -> StoreResult<()> {
        let path = path.to_path_buf();
        let contents = contents.to_vec();
        let fsync = self.config.fsync;

        tokio::task::spawn_blocking(move || replace_file(&path, &contents, fsync))
            .await
            .map_err(io::Error::other)??;
        Ok(())
    }
}

#[async_trait]
impl RawRead for FsBackend {
    async fn read_raw(&self, path: &Path) -> StoreResult<Option<Vec<u8>>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn replace_file(path: &Path, contents: &[u8], fsync: bool) -> io::Result<()> {
    let parent = parent_dir(path);
    std::fs::create_dir_all(&parent)?;

    let mut tmp = NamedTempFile::new_in(&parent)?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    if fsync {
        tmp.as_file().sync_all()?;
    }
    tmp.persist(path).map_err(|e| e.error)?;

    debug!(path = %path.display(), bytes = contents.len(), "file replaced");
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("data.json");
        let backend = FsBackend::new(StoreConfig::fast());

        backend.write_durable(&path, b"{}").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"{}");
    }

    #[tokio::test]
    async fn write_replaces_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let backend = FsBackend::default();

        backend.write_durable(&path, b"first, and longer").await.unwrap();
        backend.write_durable(&path, b"second").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");

        // No temp files left behind next to the target.
        let names: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(names.len(), 1);
    }

    #[tokio::test]
    async fn read_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FsBackend::default();
        let read = backend.read_raw(&dir.path().join("absent.json")).await.unwrap();
        assert!(read.is_none());
    }

    #[tokio::test]
    async fn read_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FsBackend::default();
        assert!(backend.read_raw(dir.path()).await.is_err());
    }

    #[test]
    fn bare_file_name_resolves_to_current_dir() {
        assert_eq!(parent_dir(Path::new("data.json")), PathBuf::from("."));
        assert_eq!(parent_dir(Path::new("/tmp/data.json")), PathBuf::from("/tmp"));
    }
}
