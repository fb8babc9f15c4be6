use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, State},
};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::info;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse, library::UploadType},
    error_handler::{AppError, AppResult},
    routes::documents::upload_route::{UploadResponse, collect_files, store_and_process},
};

#[derive(Debug, Serialize)]
pub struct BulkItem {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<UploadResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BulkUploadResponse {
    pub total: usize,
    pub stored: usize,
    pub items: Vec<BulkItem>,
}

/// POST /api/bulk-upload: every `files`/`file` part, stored as `bulk`.
///
/// Files are processed `ingest_concurrency` at a time; items keep the
/// order of the request.
pub async fn bulk_upload_route(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<BulkUploadResponse>>> {
    let files = collect_files(&mut multipart).await?;
    if files.is_empty() {
        return Err(AppError::BadRequest("no files in the request".into()));
    }
    let concurrency = state.config.ingest_concurrency.max(1);

    let items: Vec<BulkItem> = stream::iter(files)
        .map(|file| {
            let state = Arc::clone(&state);
            async move {
                let filename = file.name.clone();
                match store_and_process(&state, file, UploadType::Bulk).await {
                    Ok(result) => BulkItem {
                        filename,
                        result: Some(result),
                        error: None,
                    },
                    Err(e) => BulkItem {
                        filename,
                        result: None,
                        error: Some(e.to_string()),
                    },
                }
            }
        })
        .buffered(concurrency)
        .collect()
        .await;

    let stored = items.iter().filter(|i| i.result.is_some()).count();
    info!(total = items.len(), stored, "bulk upload handled");
    Ok(Json(ApiResponse::success(BulkUploadResponse {
        total: items.len(),
        stored,
        items,
    })))
}
