//! Default LLM profiles loaded from environment variables.
//!
//! Two roles are used by the backend:
//!
//! - **Summary**   → generates the narrative digest of related content
//! - **Embedding** → vectorizes section text and selection queries
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_PROVIDER` = `ollama` (default) or `openai`
//! - `LLM_MAX_TOKENS` = optional generation cap (u32)
//! - `LLM_TIMEOUT_SECS` = optional request timeout override (u64)
//!
//! Ollama:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `OLLAMA_MODEL`                = summary model (mandatory)
//! - `EMBEDDING_MODEL`             = embedding model (mandatory)
//!
//! OpenAI:
//! - `OPENAI_API_KEY`          = bearer token (mandatory)
//! - `OPENAI_BASE_URL`         = endpoint, defaults to `https://api.openai.com`
//! - `OPENAI_MODEL`            = summary model, defaults to `gpt-4o-mini`
//! - `OPENAI_EMBEDDING_MODEL`  = embedding model, defaults to `text-embedding-3-small`
//!
//! Every constructor has a `*_with` twin taking an explicit lookup so that
//! configuration can be resolved from something other than the process env.

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, is_http_endpoint, must_var, opt_u32, opt_u64, opt_var,
    },
};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_EMBEDDING_MODEL: &str = "text-embedding-3-small";

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Resolves `LLM_PROVIDER`, defaulting to Ollama.
///
/// # Errors
/// [`ConfigError::UnsupportedProvider`] for unknown values.
pub fn provider_with<F>(env: &F) -> Result<LlmProvider, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    match opt_var(env, "LLM_PROVIDER") {
        Some(raw) => Ok(raw.parse::<LlmProvider>()?),
        None => Ok(LlmProvider::Ollama),
    }
}

/// Resolves the Ollama endpoint.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
///
/// # Errors
///
/// - [`ConfigError::MissingVar`] if both are missing
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` is invalid
/// - [`ConfigError::InvalidFormat`] if `OLLAMA_URL` lacks an http(s) scheme
fn ollama_endpoint<F>(env: &F) -> Result<String, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = opt_var(env, "OLLAMA_URL") {
        if !is_http_endpoint(&url) {
            return Err(ConfigError::InvalidFormat {
                var: "OLLAMA_URL",
                reason: "must start with http:// or https://",
            }
            .into());
        }
        return Ok(url);
    }
    if let Some(port) = opt_var(env, "OLLAMA_PORT") {
        let port = port
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(format!("http://localhost:{port}"));
    }
    Err(ConfigError::MissingVar("OLLAMA_URL or OLLAMA_PORT").into())
}

fn openai_endpoint<F>(env: &F) -> Result<String, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let url = opt_var(env, "OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.into());
    if !is_http_endpoint(&url) {
        return Err(ConfigError::InvalidFormat {
            var: "OPENAI_BASE_URL",
            reason: "must start with http:// or https://",
        }
        .into());
    }
    Ok(url)
}

/// Summary profile from the process environment.
///
/// # Defaults
/// - `temperature = Some(0.3)`
/// - `timeout_secs = Some(30)` unless `LLM_TIMEOUT_SECS` is set
pub fn config_summary() -> Result<LlmModelConfig, AiLlmError> {
    config_summary_with(&process_env)
}

/// Summary profile resolved through `env`.
pub fn config_summary_with<F>(env: &F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let provider = provider_with(env)?;
    let max_tokens = opt_u32(env, "LLM_MAX_TOKENS")?;
    let timeout_secs = opt_u64(env, "LLM_TIMEOUT_SECS")?.or(Some(30));

    let (endpoint, model, api_key) = match provider {
        LlmProvider::Ollama => (ollama_endpoint(env)?, must_var(env, "OLLAMA_MODEL")?, None),
        LlmProvider::OpenAI => (
            openai_endpoint(env)?,
            opt_var(env, "OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.into()),
            Some(must_var(env, "OPENAI_API_KEY")?),
        ),
    };

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens,
        temperature: Some(0.3),
        top_p: None,
        timeout_secs,
    })
}

/// Embedding profile from the process environment.
///
/// # Defaults
/// - `temperature = Some(0.0)` (deterministic)
/// - `max_tokens = None`
/// - `timeout_secs = Some(30)` unless `LLM_TIMEOUT_SECS` is set
pub fn config_embedding() -> Result<LlmModelConfig, AiLlmError> {
    config_embedding_with(&process_env)
}

/// Embedding profile resolved through `env`.
pub fn config_embedding_with<F>(env: &F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let provider = provider_with(env)?;
    let timeout_secs = opt_u64(env, "LLM_TIMEOUT_SECS")?.or(Some(30));

    let (endpoint, model, api_key) = match provider {
        LlmProvider::Ollama => (
            ollama_endpoint(env)?,
            must_var(env, "EMBEDDING_MODEL")?,
            None,
        ),
        LlmProvider::OpenAI => (
            openai_endpoint(env)?,
            opt_var(env, "OPENAI_EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_EMBEDDING_MODEL.into()),
            Some(must_var(env, "OPENAI_API_KEY")?),
        ),
    };

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn ollama_profiles_from_port() {
        let env = env_of(&[
            ("OLLAMA_PORT", "11434"),
            ("OLLAMA_MODEL", "llama3.1:8b"),
            ("EMBEDDING_MODEL", "nomic-embed-text"),
            ("LLM_MAX_TOKENS", "300"),
        ]);

        let summary = config_summary_with(&env).unwrap();
        assert_eq!(summary.provider, LlmProvider::Ollama);
        assert_eq!(summary.endpoint, "http://localhost:11434");
        assert_eq!(summary.model, "llama3.1:8b");
        assert_eq!(summary.max_tokens, Some(300));

        let embedding = config_embedding_with(&env).unwrap();
        assert_eq!(embedding.model, "nomic-embed-text");
        assert_eq!(embedding.max_tokens, None);
        assert_eq!(embedding.temperature, Some(0.0));
    }

    #[test]
    fn openai_defaults_apply() {
        let env = env_of(&[("LLM_PROVIDER", "openai"), ("OPENAI_API_KEY", "sk-test")]);

        let summary = config_summary_with(&env).unwrap();
        assert_eq!(summary.endpoint, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(summary.model, DEFAULT_OPENAI_MODEL);
        assert_eq!(summary.api_key.as_deref(), Some("sk-test"));

        let embedding = config_embedding_with(&env).unwrap();
        assert_eq!(embedding.model, DEFAULT_OPENAI_EMBEDDING_MODEL);
    }

    #[test]
    fn missing_endpoint_is_reported() {
        let env = env_of(&[("OLLAMA_MODEL", "m"), ("EMBEDDING_MODEL", "e")]);
        let err = config_embedding_with(&env).unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::MissingVar("OLLAMA_URL or OLLAMA_PORT"))
        ));
    }

    #[test]
    fn openai_requires_key() {
        let env = env_of(&[("LLM_PROVIDER", "openai")]);
        assert!(matches!(
            config_summary_with(&env),
            Err(AiLlmError::Config(ConfigError::MissingVar("OPENAI_API_KEY")))
        ));
    }

    #[test]
    fn invalid_url_scheme_is_rejected() {
        let env = env_of(&[("OLLAMA_URL", "localhost:11434"), ("OLLAMA_MODEL", "m")]);
        assert!(matches!(
            config_summary_with(&env),
            Err(AiLlmError::Config(ConfigError::InvalidFormat { var: "OLLAMA_URL", .. }))
        ));
    }
}
