use std::sync::Arc;

use axum::{Json, extract::State};

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse, library::DocumentRecord};

/// GET /api/documents
pub async fn list_documents_route(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<DocumentRecord>>> {
    Json(ApiResponse::success(state.library.list().await))
}
