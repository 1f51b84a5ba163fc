use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "file_record")]
pub struct Model {
    /// UUIDv7 primary key, the public download handle.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Original upload filename. Metadata only; never addresses storage.
    pub filename: String,

    /// Blob store key derived from `id`. 1:1 with the record, never reused.
    #[sea_orm(unique)]
    pub storage_path: String,

    /// Purposefully denormalized to serve Content-Length without a blob stat.
    pub size: i64,

    /// SHA-256 hex of the stored content, used as the download ETag.
    pub checksum: String,

    pub upload_date: DateTimeUtc,

    /// `upload_date` plus the retention window, computed once at creation.
    pub expiry_date: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
