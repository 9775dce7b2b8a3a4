//! Dispatcher Configuration Module
//!
//! Runtime configuration for the inference dispatcher. The only externally
//! supplied setting that matters operationally is the address of the remote
//! inference boundary; everything else has safe built-in defaults.
//!
//! ## Loading Order
//!
//! 1. `ENROLLIQ_*` environment variables
//! 2. Built-in defaults

use std::time::Duration;
use tracing::warn;

/// Default remote inference endpoint (the original backend's predict route)
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/api/predict";
/// Default remote call timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Default number of history entries retained for operator review
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("inference endpoint must not be empty")]
    EmptyEndpoint,
    #[error("history capacity must be at least 1")]
    ZeroHistoryCapacity,
    #[error("request timeout must be non-zero")]
    ZeroTimeout,
}

/// Dispatcher runtime configuration
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Full URL of the remote inference boundary
    pub endpoint: String,
    /// Upper bound on a single remote attempt
    pub request_timeout: Duration,
    /// Capacity of the history ledger
    pub history_capacity: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl DispatchConfig {
    /// Load configuration from the environment, falling back to defaults.
    ///
    /// Reads `ENROLLIQ_INFERENCE_URL`, `ENROLLIQ_TIMEOUT_SECS` and
    /// `ENROLLIQ_HISTORY_CAPACITY`. Malformed numeric values log a warning
    /// and keep the default; a missing endpoint is not an error.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("ENROLLIQ_INFERENCE_URL") {
            if url.trim().is_empty() {
                warn!("ENROLLIQ_INFERENCE_URL is empty, keeping default endpoint");
            } else {
                config.endpoint = url.trim().to_string();
            }
        }

        if let Ok(raw) = std::env::var("ENROLLIQ_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => warn!(value = %raw, "Invalid ENROLLIQ_TIMEOUT_SECS, keeping default"),
            }
        }

        if let Ok(raw) = std::env::var("ENROLLIQ_HISTORY_CAPACITY") {
            match raw.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => config.history_capacity = capacity,
                _ => warn!(value = %raw, "Invalid ENROLLIQ_HISTORY_CAPACITY, keeping default"),
            }
        }

        config
    }

    /// Validate the configuration before constructing a dispatcher.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}
