//! GET /health: service status plus LLM provider checks.

use std::sync::Arc;

use ai_llm_service::health_service::HealthStatus;
use axum::extract::State;
use serde::Serialize;

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub documents: usize,
    pub indexed_documents: usize,
    pub sections: usize,
    pub embeddings: usize,
    /// Related-content search is possible (an embedder is configured).
    pub analysis_available: bool,
    /// Digests can use a narrative summarizer.
    pub narrative_available: bool,
    pub providers: Vec<HealthStatus>,
}

pub async fn health_route(State(state): State<Arc<AppState>>) -> ApiResponse<HealthResponse> {
    let providers = match &state.llm {
        Some(llm) => llm.health_all().await,
        None => Vec::new(),
    };
    let body = HealthResponse {
        status: "healthy",
        documents: state.library.list().await.len(),
        indexed_documents: state.store.document_count().await,
        sections: state.store.section_count().await,
        embeddings: state.store.embedding_count().await,
        analysis_available: state.store.has_embedder(),
        narrative_available: state.digester.has_summarizer(),
        providers,
    };
    ApiResponse::success(body)
}
