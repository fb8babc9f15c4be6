use std::sync::Arc;

use axum::extract::{Path, State};
use serde::Serialize;
use tracing::info;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
};

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub document_id: u64,
    /// Embeddings dropped together with the document's sections.
    pub removed_embeddings: usize,
}

/// DELETE /api/documents/{id}: removes the record, the file, the sections
/// and exactly the embeddings of those sections.
pub async fn delete_document_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<ApiResponse<DeleteResponse>> {
    // Library first: an ingest finishing after this point sees the record
    // gone and drops its own entries. The store is cleared even when the
    // record is already gone.
    let record = state.library.remove(id).await;
    let removed_embeddings = state.store.remove_document(id).await.unwrap_or(0);
    let record = record?;
    info!(id, removed_embeddings, "document and index entries removed");
    Ok(ApiResponse::success(DeleteResponse {
        message: format!("Document {} deleted successfully", record.filename),
        document_id: id,
        removed_embeddings,
    }))
}
