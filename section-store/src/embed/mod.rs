use std::{future::Future, pin::Pin};

use crate::errors::StoreError;

/// Asynchronous embedding provider.
///
/// Async is required because real providers (Ollama, OpenAI) perform HTTP
/// requests. Implementations should be deterministic for identical input.
pub trait EmbeddingsProvider: Send + Sync {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, StoreError>> + Send + 'a>>;
}

pub mod llm;
