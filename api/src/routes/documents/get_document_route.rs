use std::sync::Arc;

use axum::extract::{Path, State};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse, library::DocumentRecord},
    error_handler::{AppError, AppResult},
};

/// GET /api/documents/{id}
pub async fn get_document_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<ApiResponse<DocumentRecord>> {
    let record = state
        .library
        .get(id)
        .await
        .ok_or(AppError::DocumentNotFound(id))?;
    Ok(ApiResponse::success(record))
}
