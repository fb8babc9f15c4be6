//! Embedding provider backed by an `ai-llm-service` client.

use std::{future::Future, pin::Pin, sync::Arc};

use ai_llm_service::service_profiles::LlmClient;

use crate::{EmbeddingsProvider, StoreError};

/// Embeds text through the configured embedding profile (Ollama or OpenAI).
#[derive(Clone, Debug)]
pub struct LlmEmbedder {
    client: Arc<LlmClient>,
}

impl LlmEmbedder {
    pub fn new(client: Arc<LlmClient>) -> Self {
        Self { client }
    }
}

impl EmbeddingsProvider for LlmEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, StoreError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.client.embed(text).await?) })
    }
}
