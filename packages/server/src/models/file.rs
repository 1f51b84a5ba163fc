use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::file_record;

/// Response DTO for a completed upload.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    /// Assigned file identifier (UUIDv7), the sole handle for download.
    #[schema(example = "01936f0e-1234-7abc-8000-000000000001")]
    pub file_id: String,
    /// Original upload filename.
    #[schema(example = "report.pdf")]
    pub filename: String,
    /// Fully qualified download link for sharing.
    #[schema(
        example = "http://198.51.100.7:8000/api/v1/download/01936f0e-1234-7abc-8000-000000000001"
    )]
    pub shareable_link: String,
    /// Instant the link stops working (ISO-8601 UTC).
    pub expiry_date: DateTime<Utc>,
}

impl UploadResponse {
    pub fn new(record: file_record::Model, shareable_link: String) -> Self {
        Self {
            file_id: record.id.to_string(),
            filename: record.filename,
            shareable_link,
            expiry_date: record.expiry_date,
        }
    }
}
