//! Opt-in retry for forecast requests.
//!
//! The default policy performs exactly one attempt. When retries are enabled
//! only transient failures are retried:
//! - timeouts and connection errors
//! - 5xx responses and 429 Too Many Requests
//!
//! Decoding failures and other 4xx responses are never retried.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ForecastError;

pub const DEFAULT_INITIAL_DELAY_MS: u64 = 200;
pub const DEFAULT_MAX_DELAY_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Additional attempts after the first one. Zero disables retrying.
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
        }
    }

    pub fn with_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::none()
        }
    }

    /// Backoff before retry number `attempt` (0-based): doubles each time, capped.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        let delay_ms = self.initial_delay_ms.saturating_mul(factor);
        Duration::from_millis(delay_ms.min(self.max_delay_ms))
    }

    /// Whether another attempt should follow `error` after `attempt` retries.
    pub fn should_retry(&self, attempt: u32, error: &ForecastError) -> bool {
        attempt < self.max_retries && is_transient(error)
    }
}

fn is_transient(error: &ForecastError) -> bool {
    let ForecastError::Network { source } = error else {
        return false;
    };

    if source.is_timeout() || source.is_connect() {
        return true;
    }

    match source.status() {
        Some(status) => {
            status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS
        }
        None => source.is_request(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_never_retries() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 0);
        assert!(!policy.should_retry(0, &ForecastError::Cancelled));
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_retries: 5,
            initial_delay_ms: 100,
            max_delay_ms: 1_000,
        };
        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(800));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_millis(1_000));
        assert_eq!(policy.delay_for_attempt(60), Duration::from_millis(1_000));
    }

    #[test]
    fn non_network_errors_are_not_transient() {
        let policy = RetryPolicy::with_retries(3);
        assert!(!policy.should_retry(0, &ForecastError::missing("currently")));
        assert!(!policy.should_retry(
            0,
            &ForecastError::InvalidCoordinate {
                latitude: 100.0,
                longitude: 0.0
            }
        ));
    }

    #[test]
    fn policy_deserializes_with_defaults() {
        let policy: RetryPolicy = toml::from_str("max_retries = 2").unwrap();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.initial_delay_ms, DEFAULT_INITIAL_DELAY_MS);
        assert_eq!(policy.max_delay_ms, DEFAULT_MAX_DELAY_MS);
    }
}
