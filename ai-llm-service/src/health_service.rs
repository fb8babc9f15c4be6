//! Health checks for LLM backends (Ollama, OpenAI).
//!
//! - Ollama: `GET {endpoint}/api/tags` (best-effort model existence check)
//! - OpenAI: `GET {endpoint}/v1/models` with Bearer auth (best-effort model existence check)
//!
//! [`HealthService::check`] never fails: errors are mapped to `ok=false`.
//! The provider-specific checks (`try_*`) return a strict `Result`.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{AiLlmError, HealthError, HttpError, is_http_endpoint, make_snippet};

/// A serializable health snapshot for a single provider/config.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Logical role of the checked profile (`summary`, `embedding`).
    pub role: String,
    /// Backend/provider (`ollama`, `openai`).
    pub provider: String,
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Model identifier relevant to the check.
    pub model: String,
    /// Overall health flag.
    pub ok: bool,
    /// Measured HTTP latency in milliseconds for the main check.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    fn new(role: &str, cfg: &LlmModelConfig, ok: bool, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            provider: cfg.provider.to_string(),
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            ok,
            latency_ms,
            message: message.into(),
        }
    }
}

/// Reusable health checker holding one HTTP client.
#[derive(Debug)]
pub struct HealthService {
    client: reqwest::Client,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds, default 10).
    ///
    /// # Errors
    /// Returns [`AiLlmError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Checks one profile, routing to the provider-specific check.
    pub async fn check(&self, role: &str, cfg: &LlmModelConfig) -> HealthStatus {
        if !is_http_endpoint(&cfg.endpoint) {
            warn!(role, endpoint = %cfg.endpoint, "invalid endpoint (empty or missing http/https)");
            return HealthStatus::new(role, cfg, false, 0, "endpoint is empty or missing http/https");
        }

        let start = Instant::now();
        let result = match cfg.provider {
            LlmProvider::Ollama => self.try_check_ollama(cfg).await,
            LlmProvider::OpenAI => self.try_check_openai(cfg).await,
        };
        let latency = start.elapsed().as_millis();

        match result {
            Ok((ok, message)) => {
                info!(role, provider = %cfg.provider, model = %cfg.model, ok, latency_ms = latency, "health check completed");
                HealthStatus::new(role, cfg, ok, latency, message)
            }
            Err(err) => {
                warn!(role, provider = %cfg.provider, model = %cfg.model, latency_ms = latency, error = %err, "health check failed");
                HealthStatus::new(role, cfg, false, latency, err.to_string())
            }
        }
    }

    /// Strict Ollama check: 2xx from `/api/tags`, then look the model up.
    async fn try_check_ollama(&self, cfg: &LlmModelConfig) -> Result<(bool, String), AiLlmError> {
        let url = format!("{}/api/tags", cfg.endpoint.trim().trim_end_matches('/'));
        debug!(provider = "ollama", model = %cfg.model, "GET {url}");

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            return Err(HealthError::HttpStatus(HttpError { status, url, snippet }).into());
        }

        #[derive(Deserialize)]
        struct Tag {
            name: String,
        }
        #[derive(Deserialize)]
        struct Tags {
            models: Option<Vec<Tag>>,
        }

        let tags: Tags = resp
            .json()
            .await
            .map_err(|e| HealthError::Decode(format!("/api/tags: {e}")))?;

        Ok(match tags.models {
            Some(models) if models.iter().any(|m| model_matches(&m.name, &cfg.model)) => {
                (true, "Ollama is healthy; model is available".into())
            }
            Some(_) => (false, "Ollama is up, but model not found in /api/tags".into()),
            None => (true, "Ollama is healthy; tags response without `models` field".into()),
        })
    }

    /// Strict OpenAI check: 2xx from `/v1/models`, then look the model up.
    async fn try_check_openai(&self, cfg: &LlmModelConfig) -> Result<(bool, String), AiLlmError> {
        let url = format!("{}/v1/models", cfg.endpoint.trim().trim_end_matches('/'));
        let api_key = cfg
            .api_key
            .as_ref()
            .ok_or_else(|| HealthError::Decode("missing OpenAI API key".into()))?;
        let auth = header::HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| HealthError::Decode(format!("invalid API key header: {e}")))?;

        debug!(provider = "openai", model = %cfg.model, "GET {url}");
        let resp = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, auth)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            return Err(HealthError::HttpStatus(HttpError { status, url, snippet }).into());
        }

        #[derive(Deserialize)]
        struct ModelItem {
            id: String,
        }
        #[derive(Deserialize)]
        struct Models {
            data: Vec<ModelItem>,
        }

        let models: Models = resp
            .json()
            .await
            .map_err(|e| HealthError::Decode(format!("/v1/models: {e}")))?;

        Ok(if models.data.iter().any(|m| m.id == cfg.model) {
            (true, "OpenAI is healthy; model is available".into())
        } else {
            (false, "OpenAI is up, but model not found in /v1/models".into())
        })
    }
}

/// Ollama reports `name:latest` for models pulled without an explicit tag.
fn model_matches(listed: &str, wanted: &str) -> bool {
    listed == wanted || listed.strip_suffix(":latest") == Some(wanted)
}
