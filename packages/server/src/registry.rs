use std::fmt;
use std::sync::Arc;

use chrono::Duration;
use common::storage::{BlobKey, BlobStore, BoxReader, StorageError};
use uuid::Uuid;

use crate::clock::Clock;
use crate::entity::file_record;
use crate::metadata::MetadataStore;

/// Failures of the registry's public contract.
///
/// Each variant maps to a distinct client-visible outcome; the HTTP layer
/// translates them without inspecting messages.
#[derive(Debug)]
pub enum RegistryError {
    /// The lookup key is not a well-formed identifier. Rejected before any
    /// store access.
    InvalidIdentifier,
    /// Well-formed identifier with no matching record.
    NotFound,
    /// The record exists but its retention window has lapsed.
    Expired,
    /// Metadata and blob disagree, or a backing store is unreachable.
    StorageUnavailable(String),
    /// A store write failed mid-upload; no record became visible.
    UploadFailed(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIdentifier => write!(f, "malformed file identifier"),
            Self::NotFound => write!(f, "no file record matches the identifier"),
            Self::Expired => write!(f, "file link has expired"),
            Self::StorageUnavailable(msg) => write!(f, "storage unavailable: {msg}"),
            Self::UploadFailed(msg) => write!(f, "upload failed: {msg}"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Binds uploaded byte streams to durable, uniquely identified, time-bounded
/// records, and enforces expiry at read time.
///
/// All collaborators are injected: the registry owns no ambient state and
/// never reads the wall clock directly.
#[derive(Clone)]
pub struct FileRegistry {
    metadata: Arc<dyn MetadataStore>,
    blobs: Arc<dyn BlobStore>,
    clock: Arc<dyn Clock>,
    retention: Duration,
}

impl FileRegistry {
    pub fn new(
        metadata: Arc<dyn MetadataStore>,
        blobs: Arc<dyn BlobStore>,
        clock: Arc<dyn Clock>,
        retention: Duration,
    ) -> Self {
        debug_assert!(retention > Duration::zero());
        Self {
            metadata,
            blobs,
            clock,
            retention,
        }
    }

    /// Persist `content` under a freshly allocated identifier and record its
    /// metadata.
    ///
    /// `filename` must be non-empty (enforced by the calling layer) and is
    /// stored as opaque metadata; the storage location derives from the
    /// identifier alone. The blob write completes before the metadata insert
    /// begins; the two are not transactional. If the insert fails, the blob
    /// is removed best-effort and no identifier escapes to the caller.
    pub async fn store(
        &self,
        filename: &str,
        content: BoxReader,
    ) -> Result<file_record::Model, RegistryError> {
        let id = self.metadata.allocate_id();
        let key = BlobKey::from_id(id);

        let stored = self
            .blobs
            .put_stream(&key, content)
            .await
            .map_err(|e| RegistryError::UploadFailed(format!("blob write failed: {e}")))?;

        let upload_date = self.clock.now();
        let record = file_record::Model {
            id,
            filename: filename.to_string(),
            storage_path: key.to_string(),
            size: i64::try_from(stored.size).unwrap_or(i64::MAX),
            checksum: stored.checksum.to_hex(),
            upload_date,
            expiry_date: upload_date + self.retention,
        };

        if let Err(e) = self.metadata.insert(record.clone()).await {
            tracing::error!(
                file_id = %id,
                error = %e,
                "metadata insert failed after blob write; removing orphaned blob"
            );
            if let Err(del) = self.blobs.delete(&key).await {
                tracing::warn!(
                    key = %key,
                    error = %del,
                    "orphaned blob left behind; operational cleanup required"
                );
            }
            return Err(RegistryError::UploadFailed(format!(
                "metadata insert failed: {e}"
            )));
        }

        Ok(record)
    }

    /// Look up a record and open its content for reading.
    ///
    /// Performs no mutation. A request at exactly `expiry_date` still
    /// succeeds; one instant later fails with [`RegistryError::Expired`].
    pub async fn retrieve(
        &self,
        id: &str,
    ) -> Result<(file_record::Model, BoxReader), RegistryError> {
        let id = Uuid::parse_str(id).map_err(|_| RegistryError::InvalidIdentifier)?;

        let record = self
            .metadata
            .find(id)
            .await
            .map_err(|e| RegistryError::StorageUnavailable(format!("metadata lookup failed: {e}")))?
            .ok_or(RegistryError::NotFound)?;

        if self.clock.now() > record.expiry_date {
            return Err(RegistryError::Expired);
        }

        let key = BlobKey::parse(&record.storage_path).map_err(|e| {
            tracing::error!(file_id = %id, error = %e, "record carries a malformed storage path");
            RegistryError::StorageUnavailable(format!("corrupt storage path: {e}"))
        })?;

        let reader = self.blobs.get_stream(&key).await.map_err(|e| match e {
            StorageError::NotFound(_) => {
                tracing::error!(file_id = %id, key = %key, "blob missing for a valid metadata record");
                RegistryError::StorageUnavailable("stored content is missing".into())
            }
            other => RegistryError::StorageUnavailable(format!("blob read failed: {other}")),
        })?;

        Ok((record, reader))
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }
}
