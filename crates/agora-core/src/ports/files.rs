//! File storage port.

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by the file store.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("File write failed: {0}")]
    Write(String),

    #[error("File delete failed: {0}")]
    Delete(String),
}

/// Blob store for comment attachments.
///
/// `delete` is fallible and non-fatal: callers log failures and carry on,
/// leaving residue for an external sweep. The store never participates in
/// the consistency guarantees of document mutations.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Persist `bytes` under `filename`, returning the storage path.
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, FileError>;

    /// Delete the blob at `path`.
    async fn delete(&self, path: &str) -> Result<(), FileError>;
}
