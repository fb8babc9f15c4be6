//! Server configuration from environment variables.

use std::path::PathBuf;

use ai_llm_service::error_handler::{opt_u64, opt_var};
use thiserror::Error;

pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;
pub const DEFAULT_INGEST_CONCURRENCY: usize = 4;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Settings owned by the HTTP layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// `host:port` to bind.
    pub address: String,
    /// Directory holding the PDF library.
    pub upload_dir: PathBuf,
    /// Request body limit for uploads.
    pub max_upload_bytes: usize,
    /// Documents processed in parallel during startup scans and bulk uploads.
    pub ingest_concurrency: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_API_ADDRESS.into(),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            ingest_concurrency: DEFAULT_INGEST_CONCURRENCY,
        }
    }
}

impl AppConfig {
    /// Reads `API_ADDRESS`, `UPLOAD_DIR`, `MAX_UPLOAD_BYTES` and `INGEST_CONCURRENCY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(&|k: &str| std::env::var(k).ok())
    }

    pub fn from_env_with<F>(env: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let positive = |var: &'static str, default: usize| -> Result<usize, ConfigError> {
            let value = opt_u64(env, var)
                .map_err(|e| ConfigError::Invalid {
                    var,
                    reason: e.to_string(),
                })?
                .map_or(default, |v| v as usize);
            if value == 0 {
                return Err(ConfigError::Invalid {
                    var,
                    reason: "must be > 0".into(),
                });
            }
            Ok(value)
        };

        Ok(Self {
            address: opt_var(env, "API_ADDRESS").unwrap_or_else(|| DEFAULT_API_ADDRESS.into()),
            upload_dir: opt_var(env, "UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            max_upload_bytes: positive("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            ingest_concurrency: positive("INGEST_CONCURRENCY", DEFAULT_INGEST_CONCURRENCY)?,
        })
    }
}
