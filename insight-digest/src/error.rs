//! Typed error for the insight-digest crate.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DigestError {
    /// Errors from the LLM provider client.
    #[error("LLM error: {0}")]
    Provider(#[from] ai_llm_service::error_handler::AiLlmError),

    /// The summarizer did not answer in time.
    #[error("summary timed out after {0:?}")]
    Timeout(Duration),

    /// The summarizer answered with blank text.
    #[error("summary was empty")]
    EmptyResponse,

    #[error("config error: {0}")]
    Config(String),
}
