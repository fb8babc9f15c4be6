use std::time::Duration;

use ai_llm_service::error_handler::opt_u64;

use crate::error::DigestError;

/// Default upper bound for one narrative request.
pub const DEFAULT_SUMMARY_TIMEOUT_SECS: u64 = 15;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DigestConfig {
    pub timeout: Duration,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_SUMMARY_TIMEOUT_SECS),
        }
    }
}

impl DigestConfig {
    /// Reads `SUMMARY_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, DigestError> {
        Self::from_env_with(&|k: &str| std::env::var(k).ok())
    }

    pub fn from_env_with<F>(env: &F) -> Result<Self, DigestError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secs = opt_u64(env, "SUMMARY_TIMEOUT_SECS")
            .map_err(|e| DigestError::Config(e.to_string()))?
            .unwrap_or(DEFAULT_SUMMARY_TIMEOUT_SECS);
        if secs == 0 {
            return Err(DigestError::Config("SUMMARY_TIMEOUT_SECS must be > 0".into()));
        }
        Ok(Self {
            timeout: Duration::from_secs(secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_defaults_and_overrides() {
        let none = |_: &str| -> Option<String> { None };
        assert_eq!(DigestConfig::from_env_with(&none).unwrap(), DigestConfig::default());

        let five = |k: &str| (k == "SUMMARY_TIMEOUT_SECS").then(|| "5".to_string());
        assert_eq!(
            DigestConfig::from_env_with(&five).unwrap().timeout,
            Duration::from_secs(5)
        );

        let zero = |_: &str| Some("0".to_string());
        assert!(DigestConfig::from_env_with(&zero).is_err());
    }
}
