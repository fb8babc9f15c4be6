//! HTTP surface: document library, section navigation and related-content
//! analysis.

pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
};
use tokio::signal;
use tracing::{error, info};

use crate::{
    core::{app_state::AppState, ingest::ingest_library},
    error_handler::AppError,
    middleware_layer::error_envelope::error_envelope,
    routes::{
        analysis::intelligent_analysis_route::intelligent_analysis_route,
        documents::{
            bulk_upload_route::bulk_upload_route, delete_document_route::delete_document_route,
            get_document_route::get_document_route, list_documents_route::list_documents_route,
            update_type_route::update_type_route, upload_route::upload_route,
        },
        health_route::health_route,
        sections::{
            document_sections_route::document_sections_route,
            navigate_to_section_route::navigate_to_section_route,
        },
    },
};

pub use crate::middleware_layer::error_envelope::REQUEST_ID_HEADER;

/// Builds the application router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health_route))
        .route("/api/documents", get(list_documents_route))
        .route(
            "/api/documents/{id}",
            get(get_document_route).delete(delete_document_route),
        )
        .route("/api/documents/{id}/type", put(update_type_route))
        .route("/api/upload", post(upload_route))
        .route("/api/bulk-upload", post(bulk_upload_route))
        .route("/api/document-sections/{id}", get(document_sections_route))
        .route(
            "/api/navigate-to-section/{id}/{section_id}",
            get(navigate_to_section_route),
        )
        .route("/api/intelligent-analysis", post(intelligent_analysis_route))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(error_envelope))
        .with_state(state)
}

/// Wires state from the environment, indexes the stored library in the
/// background and serves until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let state = Arc::new(AppState::from_env()?);
    let address = state.config.address.clone();

    tokio::spawn(ingest_library(Arc::clone(&state)));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(AppError::Bind)?;
    info!(%address, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl+C. If the handler cannot be installed the server keeps
/// running until killed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
