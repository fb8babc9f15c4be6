use std::{sync::Arc, time::Instant};

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use section_store::RelatedQuery;
use tracing::{info, instrument};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
    routes::analysis::{analysis_request::AnalysisRequest, analysis_response::AnalysisResponse},
};

/// POST /api/intelligent-analysis
///
/// Finds sections of *other* documents related to the selection, labels
/// them supporting, contradictory or related, and adds a digest.
#[instrument(skip_all)]
pub async fn intelligent_analysis_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> AppResult<ApiResponse<AnalysisResponse>> {
    let started = Instant::now();
    let Json(req) = payload?;

    let related_snippets = state
        .store
        .find_related(RelatedQuery {
            text: &req.selected_text,
            exclude_document: req.current_document_id,
            max_results: req.max_results,
        })
        .await?;
    let analysis_summary = state
        .digester
        .digest(&req.selected_text, &related_snippets)
        .await;

    let processing_time = started.elapsed().as_secs_f64();
    info!(
        current_document_id = req.current_document_id,
        hits = related_snippets.len(),
        source = ?analysis_summary.source,
        processing_time,
        "analysis completed"
    );

    Ok(ApiResponse::success(AnalysisResponse {
        query_text: req.selected_text,
        related_snippets,
        analysis_summary,
        processing_time,
    }))
}
