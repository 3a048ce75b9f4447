//! # Configuration System
//!
//! Typed, validated configuration for the sync engine. Values come from a
//! YAML base file plus an environment overlay, with `RECIPIENT_SYNC_*`
//! environment variables taking final precedence; every field has an
//! explicit default so an embedding with no config files still gets a
//! working engine.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::orchestration::RetryPolicy;

pub use loader::ConfigManager;

/// Configuration load or validation failure.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Configuration load error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Root configuration for the recipient sync core.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RecipientSyncConfig {
    /// Shared retry policy applied to every collaborator call.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Fan-out execution settings.
    #[serde(default)]
    pub execution: ExecutionConfig,
}

impl RecipientSyncConfig {
    /// Validate cross-field constraints. No silent fallbacks: a nonsensical
    /// configuration is rejected at load time.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigurationError::Invalid {
                message: "retry.max_attempts must be at least 1".to_string(),
            });
        }
        if self.retry.backoff_multiplier < 1.0 {
            return Err(ConfigurationError::Invalid {
                message: "retry.backoff_multiplier must be >= 1.0".to_string(),
            });
        }
        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err(ConfigurationError::Invalid {
                message: "retry.base_delay_ms must not exceed retry.max_delay_ms".to_string(),
            });
        }
        if self.execution.max_concurrent_lookups == 0 {
            return Err(ConfigurationError::Invalid {
                message: "execution.max_concurrent_lookups must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Retry policy settings, in milliseconds for YAML/env ergonomics.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    pub jitter: bool,
    pub max_elapsed_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1_000,
            max_delay_ms: 300_000,     // 5 minutes
            backoff_multiplier: 2.0,
            jitter: true,
            max_elapsed_ms: 1_800_000, // 30 minutes
        }
    }
}

impl RetryConfig {
    /// Build the runtime policy from these settings.
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            backoff_multiplier: self.backoff_multiplier,
            jitter: self.jitter,
            max_elapsed: Duration::from_millis(self.max_elapsed_ms),
        }
    }
}

/// Fan-out execution settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Upper bound on concurrently executing entity lookups within one
    /// fan-out. Logical concurrency is unbounded; this bounds the worker
    /// pool underneath it.
    pub max_concurrent_lookups: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_concurrent_lookups: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(RecipientSyncConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut cfg = RecipientSyncConfig::default();
        cfg.retry.max_attempts = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_inverted_delays_rejected() {
        let mut cfg = RecipientSyncConfig::default();
        cfg.retry.base_delay_ms = 10_000;
        cfg.retry.max_delay_ms = 1_000;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_policy_conversion() {
        let policy = RetryConfig::default().to_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_secs(1));
        assert_eq!(policy.max_elapsed, Duration::from_secs(1800));
    }
}
