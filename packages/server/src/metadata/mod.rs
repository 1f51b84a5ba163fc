mod database;
mod memory;

pub use database::DbMetadataStore;
pub use memory::InMemoryMetadataStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::entity::file_record;

/// Errors from the metadata backend.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// A record with this id already exists. Indicates an identifier
    /// allocation bug, not a client error.
    #[error("duplicate file id: {0}")]
    DuplicateId(Uuid),

    /// The backing store failed or is unreachable.
    #[error("metadata store unavailable: {0}")]
    Unavailable(String),
}

/// Document store mapping file identifiers to metadata records.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Allocate a fresh record identifier.
    ///
    /// UUIDv7 keeps ids time-ordered to match upload order; the allocation
    /// becomes durable only through [`MetadataStore::insert`].
    fn allocate_id(&self) -> Uuid {
        Uuid::now_v7()
    }

    /// Insert a record atomically. Fails with [`MetadataError::DuplicateId`]
    /// rather than overwriting an existing record.
    async fn insert(&self, record: file_record::Model) -> Result<(), MetadataError>;

    /// Look up a record by id. `None` if no record exists.
    async fn find(&self, id: Uuid) -> Result<Option<file_record::Model>, MetadataError>;
}
