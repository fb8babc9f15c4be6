//! Shared LLM service with two optional profiles: `summary` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Provider clients are built eagerly, so a bad config surfaces at startup.
//! - A profile whose configuration is missing is simply absent; callers decide
//!   how to degrade (no embeddings → search unavailable, no summary → template).

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    config::{
        default_config::{config_embedding, config_summary},
        llm_model_config::LlmModelConfig,
        llm_provider::LlmProvider,
    },
    error_handler::AiLlmError,
    health_service::{HealthService, HealthStatus},
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

#[derive(Debug)]
enum ProviderClient {
    Ollama(OllamaService),
    OpenAI(OpenAiService),
}

/// One configured model together with its provider client.
#[derive(Debug)]
pub struct LlmClient {
    cfg: LlmModelConfig,
    inner: ProviderClient,
}

impl LlmClient {
    /// Builds the provider client matching `cfg.provider`.
    ///
    /// # Errors
    /// Propagates provider constructor errors (bad endpoint, missing key).
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        let inner = match cfg.provider {
            LlmProvider::Ollama => ProviderClient::Ollama(OllamaService::new(cfg.clone())?),
            LlmProvider::OpenAI => ProviderClient::OpenAI(OpenAiService::new(cfg.clone())?),
        };
        Ok(Self { cfg, inner })
    }

    pub fn config(&self) -> &LlmModelConfig {
        &self.cfg
    }

    /// Generates text for `prompt`, with an optional system instruction.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
        match &self.inner {
            ProviderClient::Ollama(cli) => cli.generate(prompt, system).await,
            ProviderClient::OpenAI(cli) => cli.generate(prompt, system).await,
        }
    }

    /// Computes one embedding vector for `input`.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        match &self.inner {
            ProviderClient::Ollama(cli) => cli.embeddings(input).await,
            ProviderClient::OpenAI(cli) => cli.embeddings(input).await,
        }
    }
}

/// The backend's LLM profiles plus a shared health checker.
#[derive(Debug)]
pub struct LlmServiceProfiles {
    summary: Option<Arc<LlmClient>>,
    embedding: Option<Arc<LlmClient>>,
    health: HealthService,
}

impl LlmServiceProfiles {
    /// Creates the service from already-resolved profiles.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if a provider client or the health client cannot be built.
    pub fn new(
        summary: Option<LlmModelConfig>,
        embedding: Option<LlmModelConfig>,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, AiLlmError> {
        Ok(Self {
            summary: summary.map(LlmClient::new).transpose()?.map(Arc::new),
            embedding: embedding.map(LlmClient::new).transpose()?.map(Arc::new),
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Resolves both profiles from the environment.
    ///
    /// A profile that cannot be configured is logged and left out; only a
    /// failure to build the HTTP clients themselves is an error.
    pub fn from_env() -> Result<Self, AiLlmError> {
        let summary = match config_summary() {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                warn!(error = %e, "summary profile not configured; digests will use templates");
                None
            }
        };
        let embedding = match config_embedding() {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                warn!(error = %e, "embedding profile not configured; related-content search disabled");
                None
            }
        };

        let svc = Self::new(summary, embedding, None)?;
        info!(
            summary = svc.summary.as_ref().map(|c| c.cfg.model.as_str()).unwrap_or("none"),
            embedding = svc.embedding.as_ref().map(|c| c.cfg.model.as_str()).unwrap_or("none"),
            "LLM profiles resolved"
        );
        Ok(svc)
    }

    /// Client for narrative generation, if configured.
    pub fn summary(&self) -> Option<Arc<LlmClient>> {
        self.summary.clone()
    }

    /// Client for embeddings, if configured.
    pub fn embedding(&self) -> Option<Arc<LlmClient>> {
        self.embedding.clone()
    }

    /// Health snapshot for every configured profile; identical configs are checked once.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let mut out = Vec::with_capacity(2);
        if let Some(cli) = &self.summary {
            out.push(self.health.check("summary", cli.config()).await);
        }
        if let Some(cli) = &self.embedding {
            let same_as_summary = self
                .summary
                .as_ref()
                .is_some_and(|s| s.config() == cli.config());
            if !same_as_summary {
                out.push(self.health.check("embedding", cli.config()).await);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ollama(model: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: model.into(),
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(1),
        }
    }

    #[test]
    fn absent_profiles_stay_absent() {
        let svc = LlmServiceProfiles::new(None, Some(ollama("nomic-embed-text")), None).unwrap();
        assert!(svc.summary().is_none());
        assert_eq!(svc.embedding().unwrap().config().model, "nomic-embed-text");
    }

    #[test]
    fn bad_profile_fails_construction() {
        let mut cfg = ollama("m");
        cfg.endpoint = "ftp://nope".into();
        assert!(LlmServiceProfiles::new(Some(cfg), None, None).is_err());
    }

    #[tokio::test]
    async fn no_profiles_means_no_health_checks() {
        let svc = LlmServiceProfiles::new(None, None, Some(1)).unwrap();
        assert!(svc.health_all().await.is_empty());
    }
}
