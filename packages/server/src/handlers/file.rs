use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, body::Body};
use common::storage::BoxReader;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::file_record;
use crate::error::{AppError, ErrorBody};
use crate::models::file::UploadResponse;
use crate::registry::FileRegistry;
use crate::state::AppState;

pub fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(128 * 1024 * 1024) // 128 MB
}

#[utoipa::path(
    post,
    path = "/upload",
    tag = "Files",
    operation_id = "uploadFile",
    summary = "Upload a file",
    description = "Uploads the `file` multipart field and returns a shareable download link. \
        The link stops working after the configured retention window (7 days by default).",
    request_body(content_type = "multipart/form-data", description = "File upload"),
    responses(
        (status = 201, description = "File stored", body = UploadResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Upload failed (UPLOAD_FAILED, STORAGE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut record: Option<file_record::Model> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| {
                        AppError::Validation("File field must have a filename".into())
                    })?;

                record = Some(spool_field_to_registry(field, &filename, &state.registry).await?);
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let record = record.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;
    let shareable_link = state.links.download_url(record.id);

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse::new(record, shareable_link)),
    ))
}

#[utoipa::path(
    get,
    path = "/download/{file_id}",
    tag = "Files",
    operation_id = "downloadFile",
    summary = "Download a shared file",
    description = "Streams the stored content with the original filename as disposition hint. \
        Fails with 403 once the link's retention window has lapsed. Supports ETag-based \
        caching via If-None-Match.",
    params(("file_id" = String, Path, description = "File identifier (UUID)")),
    responses(
        (status = 200, description = "File content"),
        (status = 304, description = "Not Modified (ETag match)"),
        (status = 400, description = "Malformed identifier (INVALID_IDENTIFIER)", body = ErrorBody),
        (status = 403, description = "Link expired (EXPIRED)", body = ErrorBody),
        (status = 404, description = "File not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, headers), fields(file_id))]
pub async fn download_file(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let (record, reader) = state.registry.retrieve(&file_id).await?;

    // Revalidation only after the expiry check has passed; an expired link
    // must fail even for clients holding a cached copy.
    let etag_value = format!("\"{}\"", record.checksum);
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && let Ok(val) = if_none_match.to_str()
        && (val == etag_value || val == "*")
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let stream = ReaderStream::new(reader);
    let body = Body::from_stream(stream);

    let content_type = mime_guess::from_path(&record.filename)
        .first()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, record.size.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(&record.filename),
        )
        .header(header::ETAG, &etag_value)
        .header(header::CACHE_CONTROL, "private, max-age=3600")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))?;

    Ok(response)
}

/// Build a safe `Content-Disposition` header value.
fn content_disposition_value(filename: &str) -> String {
    let ascii_safe: String = filename
        .chars()
        .filter(|c| c.is_ascii_graphic() && !matches!(c, '"' | ';' | '\\'))
        .collect();
    let ascii_name = if ascii_safe.is_empty() {
        "download".to_string()
    } else {
        ascii_safe
    };

    // RFC 5987 percent-encoding for filename*.
    let encoded: String = filename
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'!'
            | b'#'
            | b'$'
            | b'&'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~' => String::from(b as char),
            _ => format!("%{b:02X}"),
        })
        .collect();

    format!("attachment; filename=\"{ascii_name}\"; filename*=UTF-8''{encoded}")
}

/// Spool a multipart field through a temp file, then hand it to the registry
/// as a streaming reader. Uploads of arbitrary size never sit fully in
/// memory.
async fn spool_field_to_registry(
    mut field: axum::extract::multipart::Field<'_>,
    filename: &str,
    registry: &FileRegistry,
) -> Result<file_record::Model, AppError> {
    let temp_path = std::env::temp_dir().join(format!("droplink-upload-{}", Uuid::new_v4()));

    let result = async {
        let mut temp_file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create spool file: {e}")))?;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
        {
            temp_file
                .write_all(&chunk)
                .await
                .map_err(|e| AppError::Internal(format!("Spool file write failed: {e}")))?;
        }

        temp_file
            .flush()
            .await
            .map_err(|e| AppError::Internal(format!("Spool file flush failed: {e}")))?;
        drop(temp_file);

        let file = tokio::fs::File::open(&temp_path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to reopen spool file: {e}")))?;
        let reader: BoxReader = Box::new(file);

        Ok(registry.store(filename, reader).await?)
    }
    .await;

    // Best effort.
    let _ = tokio::fs::remove_file(&temp_path).await;

    result
}
