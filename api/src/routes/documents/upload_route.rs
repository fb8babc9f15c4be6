use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Query, State},
};
use section_store::IngestReport;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    core::{
        app_state::AppState,
        http::response_envelope::ApiResponse,
        ingest::ingest_record,
        library::{DocumentRecord, Stored, UploadType},
    },
    error_handler::{AppError, AppResult},
    routes::documents::upload_type_query::UploadTypeQuery,
};

/// Outcome of extracting and embedding an uploaded file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    Processed,
    /// Re-upload of a file that was already indexed.
    AlreadyIndexed,
    Failed,
}

#[derive(Debug, Serialize)]
pub struct Processing {
    pub status: ProcessingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<IngestReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub document: DocumentRecord,
    pub created: bool,
    pub processing: Processing,
}

/// One multipart file part.
pub(crate) struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Collects every `file`/`files` part that carries a filename.
pub(crate) async fn collect_files(multipart: &mut Multipart) -> AppResult<Vec<UploadedFile>> {
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if !matches!(field.name(), Some("file" | "files")) {
            continue;
        }
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field.bytes().await?.to_vec();
        files.push(UploadedFile { name, bytes });
    }
    Ok(files)
}

/// Stores one file and indexes it unless it already is.
///
/// The bytes ingested are always the bytes now on disk: new files and
/// replaced unindexed files are indexed from the request, indexed files are
/// left as they are.
///
/// Extraction failures are reported in `processing`; the upload itself
/// still succeeds because the file and record are kept.
pub(crate) async fn store_and_process(
    state: &AppState,
    file: UploadedFile,
    upload_type: UploadType,
) -> AppResult<UploadResponse> {
    let stored = state
        .library
        .store(&file.name, &file.bytes, upload_type)
        .await?;
    let created = matches!(stored, Stored::Created(_));
    let record = stored.record().clone();

    if let Stored::Existing(_) = stored {
        return Ok(UploadResponse {
            document: record,
            created,
            processing: Processing {
                status: ProcessingStatus::AlreadyIndexed,
                report: None,
                error: None,
            },
        });
    }

    let processing = match ingest_record(state, &record, file.bytes).await {
        Ok(report) => Processing {
            status: ProcessingStatus::Processed,
            report: Some(report),
            error: None,
        },
        Err(e) => {
            warn!(id = record.id, filename = %record.filename, error = %e, "uploaded file not processed");
            Processing {
                status: ProcessingStatus::Failed,
                report: None,
                error: Some(e.to_string()),
            }
        }
    };

    // Reflect `indexed`/`section_count` written by the ingest.
    let document = state.library.get(record.id).await.unwrap_or(record);
    Ok(UploadResponse {
        document,
        created,
        processing,
    })
}

/// POST /api/upload?upload_type=fresh|bulk: multipart field `file`.
pub async fn upload_route(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UploadTypeQuery>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<UploadResponse>>> {
    let upload_type = query.resolve(UploadType::Fresh)?;
    let file = collect_files(&mut multipart)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::BadRequest("multipart field `file` with a filename is required".into()))?;

    let response = store_and_process(&state, file, upload_type).await?;
    info!(
        id = response.document.id,
        created = response.created,
        "upload handled"
    );
    Ok(Json(ApiResponse::success(response)))
}
