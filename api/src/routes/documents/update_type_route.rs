use std::sync::Arc;

use axum::extract::{Path, Query, State};

use crate::{
    core::{
        app_state::AppState,
        http::response_envelope::ApiResponse,
        library::{DocumentRecord, UploadType},
    },
    error_handler::{AppError, AppResult},
    routes::documents::upload_type_query::UploadTypeQuery,
};

/// PUT /api/documents/{id}/type?upload_type=fresh|bulk
pub async fn update_type_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Query(query): Query<UploadTypeQuery>,
) -> AppResult<ApiResponse<DocumentRecord>> {
    if query.upload_type.is_none() {
        return Err(AppError::BadRequest("missing `upload_type` query parameter".into()));
    }
    let upload_type = query.resolve(UploadType::Fresh)?;
    let record = state.library.set_upload_type(id, upload_type).await?;
    Ok(ApiResponse::success(record))
}
