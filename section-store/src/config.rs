//! Runtime configuration for the section store.

use ai_llm_service::error_handler::{opt_u64, opt_var};

use crate::errors::StoreError;

/// Default number of related snippets returned per query.
pub const DEFAULT_MAX_RESULTS: usize = 5;
/// Default number of concurrent embedding requests per document.
pub const DEFAULT_EMBEDDING_CONCURRENCY: usize = 4;

/// Configuration for ingestion and retrieval.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Result cap used when a query does not specify one.
    pub max_results: usize,
    /// Maximum number of in-flight embedding requests for one document.
    pub embedding_concurrency: usize,
    /// If set, vectors of any other length are rejected per section.
    pub embedding_dim: Option<usize>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            embedding_concurrency: DEFAULT_EMBEDDING_CONCURRENCY,
            embedding_dim: None,
        }
    }
}

impl StoreConfig {
    /// Reads `RELATED_MAX_RESULTS`, `EMBEDDING_CONCURRENCY` and `EMBEDDING_DIM`
    /// from the process environment.
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_env_with(&|k: &str| std::env::var(k).ok())
    }

    /// Same as [`StoreConfig::from_env`] with an explicit variable lookup.
    pub fn from_env_with<F>(env: &F) -> Result<Self, StoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let num = |name: &'static str| -> Result<Option<usize>, StoreError> {
            let value = opt_u64(env, name).map_err(|e| StoreError::Config(e.to_string()))?;
            Ok(value.map(|v| v as usize))
        };

        let cfg = Self {
            max_results: num("RELATED_MAX_RESULTS")?.unwrap_or(DEFAULT_MAX_RESULTS),
            embedding_concurrency: num("EMBEDDING_CONCURRENCY")?
                .unwrap_or(DEFAULT_EMBEDDING_CONCURRENCY),
            embedding_dim: if opt_var(env, "EMBEDDING_DIM").is_some() {
                num("EMBEDDING_DIM")?
            } else {
                None
            },
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.max_results == 0 {
            return Err(StoreError::Config("max_results must be > 0".into()));
        }
        if self.embedding_concurrency == 0 {
            return Err(StoreError::Config("embedding_concurrency must be > 0".into()));
        }
        if self.embedding_dim == Some(0) {
            return Err(StoreError::Config("embedding_dim must be > 0".into()));
        }
        Ok(())
    }
}
