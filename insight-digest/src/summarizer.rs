//! Narrative generation seam and its LLM-backed implementation.

use std::{future::Future, pin::Pin, sync::Arc};

use ai_llm_service::service_profiles::LlmClient;

use crate::error::DigestError;

/// Best-effort narrative generator.
pub trait Summarizer: Send + Sync {
    fn summarize<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, DigestError>> + Send + 'a>>;
}

/// System instructions sent with every narrative request.
pub const SYSTEM_PROMPT: &str =
    "You analyze document search results for a reader. Be concise and concrete.";

/// Generates narratives through the configured summary profile.
#[derive(Clone, Debug)]
pub struct LlmSummarizer {
    client: Arc<LlmClient>,
}

impl LlmSummarizer {
    pub fn new(client: Arc<LlmClient>) -> Self {
        Self { client }
    }
}

impl Summarizer for LlmSummarizer {
    fn summarize<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, DigestError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.client.generate(prompt, Some(SYSTEM_PROMPT)).await?) })
    }
}
