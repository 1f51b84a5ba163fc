use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, Set, SqlErr};
use uuid::Uuid;

use super::{MetadataError, MetadataStore};
use crate::entity::file_record;

/// Metadata store backed by the application database.
///
/// Id uniqueness is enforced by the primary key, so concurrent inserts can
/// never both claim the same identifier.
pub struct DbMetadataStore {
    db: DatabaseConnection,
}

impl DbMetadataStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MetadataStore for DbMetadataStore {
    async fn insert(&self, record: file_record::Model) -> Result<(), MetadataError> {
        let id = record.id;

        let active = file_record::ActiveModel {
            id: Set(record.id),
            filename: Set(record.filename),
            storage_path: Set(record.storage_path),
            size: Set(record.size),
            checksum: Set(record.checksum),
            upload_date: Set(record.upload_date),
            expiry_date: Set(record.expiry_date),
        };

        file_record::Entity::insert(active)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => MetadataError::DuplicateId(id),
                _ => MetadataError::Unavailable(e.to_string()),
            })?;

        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<file_record::Model>, MetadataError> {
        file_record::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| MetadataError::Unavailable(e.to_string()))
    }
}
