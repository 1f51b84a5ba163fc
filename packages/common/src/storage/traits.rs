use std::io::Cursor;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::checksum::Checksum;
use super::error::StorageError;
use super::key::BlobKey;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Receipt for a completed blob write.
#[derive(Debug, Clone, Copy)]
pub struct StoredBlob {
    /// Number of bytes written.
    pub size: u64,
    /// SHA-256 of the written content.
    pub checksum: Checksum,
}

/// Key-addressed blob storage.
///
/// Keys are assigned by the caller (derived from the owning record's id) and
/// are never reused, so implementations do not need to arbitrate between
/// writers of the same key.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a byte slice under `key`.
    async fn put(&self, key: &BlobKey, data: &[u8]) -> Result<StoredBlob, StorageError> {
        let reader: BoxReader = Box::new(Cursor::new(data.to_vec()));
        self.put_stream(key, reader).await
    }

    /// Store data from an async reader under `key`, without buffering the
    /// whole content in memory.
    async fn put_stream(&self, key: &BlobKey, reader: BoxReader) -> Result<StoredBlob, StorageError>;

    /// Retrieve a blob as a streaming async reader.
    async fn get_stream(&self, key: &BlobKey) -> Result<BoxReader, StorageError>;

    /// Check whether a blob exists.
    async fn exists(&self, key: &BlobKey) -> Result<bool, StorageError>;

    /// Delete a blob.
    ///
    /// Returns `true` if the blob was deleted, `false` if it did not exist.
    async fn delete(&self, key: &BlobKey) -> Result<bool, StorageError>;

    /// Get the size of a blob in bytes.
    async fn size(&self, key: &BlobKey) -> Result<u64, StorageError>;
}
