//! In-memory file store - fallback and test double.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use agora_core::ports::{FileError, FileStore};

/// Keeps blobs in a map keyed by their storage path. Contents are lost on
/// process restart.
pub struct InMemoryFileStore {
    store: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    /// Whether a blob exists at `path`.
    pub async fn contains(&self, path: &str) -> bool {
        self.store.read().await.contains_key(path)
    }

    /// Number of stored blobs.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

impl Default for InMemoryFileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, FileError> {
        let path = format!("mem://{filename}");
        self.store.write().await.insert(path.clone(), bytes.to_vec());
        Ok(path)
    }

    async fn delete(&self, path: &str) -> Result<(), FileError> {
        match self.store.write().await.remove(path) {
            Some(_) => Ok(()),
            None => Err(FileError::Delete(format!("{path}: no such blob"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_and_delete() {
        let store = InMemoryFileStore::new();

        let path = store.store("a.png", b"abc").await.unwrap();
        assert!(store.contains(&path).await);

        store.delete(&path).await.unwrap();
        assert!(!store.contains(&path).await);
        assert!(store.delete(&path).await.is_err());
    }
}
