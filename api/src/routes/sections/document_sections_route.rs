use std::sync::Arc;

use axum::extract::{Path, State};
use pdf_sections::Section;
use serde::Serialize;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
};

#[derive(Debug, Serialize)]
pub struct DocumentSections {
    pub document_id: u64,
    pub filename: String,
    pub sections: Vec<Section>,
}

/// GET /api/document-sections/{id}: sections in document order.
pub async fn document_sections_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<ApiResponse<DocumentSections>> {
    let record = state
        .library
        .get(id)
        .await
        .ok_or(AppError::DocumentNotFound(id))?;
    let sections = state.store.sections(id).await?;
    Ok(ApiResponse::success(DocumentSections {
        document_id: id,
        filename: record.filename,
        sections,
    }))
}
