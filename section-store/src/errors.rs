//! Unified error types for the crate.

use thiserror::Error;

use crate::record::DocumentId;

/// Top-level error for section-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The PDF could not be read; corpus state for the document is unchanged.
    #[error("document {document_id} unreadable: {reason}")]
    DocumentUnreadable { document_id: DocumentId, reason: String },

    /// Embedding one section failed. Ingestion logs this and moves on.
    #[error("embedding failed for section `{section_id}`: {reason}")]
    EmbeddingFailed { section_id: String, reason: String },

    /// The query text is empty after trimming.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Related-content search cannot run (no embedder, or the embedder failed).
    #[error("analysis unavailable: {0}")]
    AnalysisUnavailable(String),

    /// No sections are recorded for this document.
    #[error("document {0} is not indexed")]
    DocumentNotIndexed(DocumentId),

    #[error("section `{section_id}` not found in document {document_id}")]
    SectionNotFound {
        document_id: DocumentId,
        section_id: String,
    },

    /// Embedding vector does not have the configured dimension.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// LLM provider errors (wrapped).
    #[error("provider error: {0}")]
    Provider(#[from] ai_llm_service::error_handler::AiLlmError),

    #[error("internal: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
