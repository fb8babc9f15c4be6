use axum::{
    extract::multipart::MultipartError,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use section_store::StoreError;
use thiserror::Error;
use tracing::error;

use crate::core::{
    config::ConfigError,
    http::response_envelope::ApiResponse,
    library::LibraryError,
};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("startup failed: {0}")]
    Startup(String),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("document {0} not found")]
    DocumentNotFound(u64),

    /// Error mapped from a lower layer with its own status and code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::DocumentNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Http { status, .. } => *status,
            AppError::Config(_)
            | AppError::Startup(_)
            | AppError::Bind(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Startup(_) => "STARTUP_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::DocumentNotFound(_) => "DOCUMENT_NOT_FOUND",
            AppError::Http { code, .. } => code,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        ApiResponse::error(self.error_code(), self.to_string(), Vec::new())
            .into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Maps store failures to distinct statuses so callers can tell "no results"
/// from "bad input" from "subsystem unavailable".
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        let (status, code) = match &err {
            StoreError::InvalidQuery(_) => (StatusCode::BAD_REQUEST, "INVALID_QUERY"),
            StoreError::DocumentNotIndexed(_) => (StatusCode::NOT_FOUND, "DOCUMENT_NOT_INDEXED"),
            StoreError::SectionNotFound { .. } => (StatusCode::NOT_FOUND, "SECTION_NOT_FOUND"),
            StoreError::AnalysisUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "ANALYSIS_UNAVAILABLE")
            }
            StoreError::DocumentUnreadable { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "DOCUMENT_UNREADABLE")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR"),
        };
        AppError::Http {
            status,
            code,
            message,
        }
    }
}

impl From<LibraryError> for AppError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::NotFound(id) => AppError::DocumentNotFound(id),
            LibraryError::NotPdf(_) | LibraryError::InvalidUploadType(_) => {
                AppError::BadRequest(err.to_string())
            }
            LibraryError::Io(e) => AppError::Http {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "IO_ERROR",
                message: format!("Filesystem error in the document library: {e}"),
            },
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Http {
            status: err.status(),
            code: "MULTIPART_ERROR",
            message: err.body_text(),
        }
    }
}
