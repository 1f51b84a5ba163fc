use std::path::PathBuf;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};

use super::checksum::Checksum;
use super::error::StorageError;
use super::key::BlobKey;
use super::traits::{BlobStore, BoxReader, StoredBlob};

/// Filesystem-backed blob store.
///
/// Blobs live in a sharded directory layout keyed by the record id:
/// `{base_path}/{first 2 hex chars}/{remaining 30 hex chars}`. Writes go
/// through a spool file under `.tmp` and are renamed into place, so a reader
/// never observes a partially written blob.
pub struct FilesystemBlobStore {
    base_path: PathBuf,
}

impl FilesystemBlobStore {
    /// Create a new filesystem blob store, creating the root directory and
    /// its `.tmp` spool area if absent.
    pub async fn new(base_path: PathBuf) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self { base_path })
    }

    /// Compute the filesystem path for a given key.
    fn blob_path(&self, key: &BlobKey) -> PathBuf {
        self.base_path
            .join(key.shard_prefix())
            .join(key.shard_suffix())
    }

    /// Path for a spool file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn put_stream(
        &self,
        key: &BlobKey,
        mut reader: BoxReader,
    ) -> Result<StoredBlob, StorageError> {
        let temp_path = self.temp_path();
        let mut hasher = Sha256::new();
        let mut total_bytes: u64 = 0;

        let mut buf = vec![0u8; 64 * 1024]; // 64KB read buffer
        let mut temp_file = fs::File::create(&temp_path).await?;

        loop {
            let n = match reader.read(&mut buf).await {
                Ok(n) => n,
                Err(e) => {
                    drop(temp_file);
                    let _ = fs::remove_file(&temp_path).await;
                    return Err(e.into());
                }
            };
            if n == 0 {
                break;
            }

            total_bytes += n as u64;
            hasher.update(&buf[..n]);
            if let Err(e) = temp_file.write_all(&buf[..n]).await {
                drop(temp_file);
                let _ = fs::remove_file(&temp_path).await;
                return Err(e.into());
            }
        }

        temp_file.flush().await?;
        drop(temp_file);

        let blob_path = self.blob_path(key);
        if let Some(parent) = blob_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(&temp_path, &blob_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(StoredBlob {
            size: total_bytes,
            checksum: Checksum::from_bytes(hasher.finalize().into()),
        })
    }

    async fn get_stream(&self, key: &BlobKey) -> Result<BoxReader, StorageError> {
        let blob_path = self.blob_path(key);
        match fs::File::open(&blob_path).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, key: &BlobKey) -> Result<bool, StorageError> {
        let blob_path = self.blob_path(key);
        Ok(fs::try_exists(&blob_path).await?)
    }

    async fn delete(&self, key: &BlobKey) -> Result<bool, StorageError> {
        let blob_path = self.blob_path(key);
        match fs::remove_file(&blob_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn size(&self, key: &BlobKey) -> Result<u64, StorageError> {
        let blob_path = self.blob_path(key);
        match fs::metadata(&blob_path).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
