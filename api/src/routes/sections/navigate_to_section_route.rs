use std::sync::Arc;

use axum::extract::{Path, State};
use pdf_sections::{HeadingLevel, Section};
use serde::Serialize;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
};

/// Where a viewer should jump to.
#[derive(Debug, Serialize)]
pub struct Navigation {
    pub page: u32,
    pub title: String,
    pub level: HeadingLevel,
}

#[derive(Debug, Serialize)]
pub struct NavigateResponse {
    pub document_id: u64,
    pub section: Section,
    pub navigation: Navigation,
}

/// GET /api/navigate-to-section/{id}/{section_id}
pub async fn navigate_to_section_route(
    State(state): State<Arc<AppState>>,
    Path((id, section_id)): Path<(u64, String)>,
) -> AppResult<ApiResponse<NavigateResponse>> {
    if state.library.get(id).await.is_none() {
        return Err(AppError::DocumentNotFound(id));
    }
    let section = state.store.section(id, &section_id).await?;
    let navigation = Navigation {
        page: section.page,
        title: section.title.clone(),
        level: section.level,
    };
    Ok(ApiResponse::success(NavigateResponse {
        document_id: id,
        section,
        navigation,
    }))
}
