//! Disk-backed file store.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use agora_core::ports::{FileError, FileStore};

/// Stores attachment blobs as plain files under an upload directory.
pub struct DiskFileStore {
    root: PathBuf,
}

impl DiskFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FileStore for DiskFileStore {
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, FileError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| FileError::Write(e.to_string()))?;

        let path = self.root.join(filename);
        fs::write(&path, bytes)
            .await
            .map_err(|e| FileError::Write(e.to_string()))?;

        Ok(path.to_string_lossy().into_owned())
    }

    async fn delete(&self, path: &str) -> Result<(), FileError> {
        fs::remove_file(path)
            .await
            .map_err(|e| FileError::Delete(format!("{path}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_then_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskFileStore::new(dir.path());

        let path = store.store("note.txt", b"hello").await.unwrap();
        assert_eq!(fs::read(&path).await.unwrap(), b"hello");

        store.delete(&path).await.unwrap();
        assert!(fs::metadata(&path).await.is_err());
    }

    #[tokio::test]
    async fn delete_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskFileStore::new(dir.path());

        let result = store.delete(&format!("{}/nope.bin", dir.path().display())).await;
        assert!(matches!(result, Err(FileError::Delete(_))));
    }
}
