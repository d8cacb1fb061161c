use crewkit_core::api::{RetryConfig, RetryStrategy};
use std::time::Duration;

pub struct ExponentialBackoffPlugin {
    config: RetryConfig,
}

pub struct LinearRetryPlugin {
    config: RetryConfig,
}

impl ExponentialBackoffPlugin {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }
}

impl LinearRetryPlugin {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }
}

impl RetryStrategy for ExponentialBackoffPlugin {
    fn name(&self) -> &str {
        "exponential-backoff"
    }

    fn next_delay(&self, attempt: u32) -> Duration {
        let exp = 1u64 << attempt.saturating_sub(1).min(30);
        let delay = self.config.base_delay_ms.saturating_mul(exp);
        let delay = delay.min(self.config.max_delay_ms);
        Duration::from_millis(delay)
    }
}

impl RetryStrategy for LinearRetryPlugin {
    fn name(&self) -> &str {
        "linear"
    }

    fn next_delay(&self, attempt: u32) -> Duration {
        let multiplier = attempt.max(1) as u64;
        let delay = self.config.base_delay_ms.saturating_mul(multiplier);
        let delay = delay.min(self.config.max_delay_ms);
        Duration::from_millis(delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewkit_core::api::BackendError;

    #[test]
    fn test_exponential_backoff() {
        let cfg = RetryConfig {
            base_delay_ms: 100,
            max_delay_ms: 1000,
            strategy: "exponential-backoff".to_string(),
        };
        let plugin = ExponentialBackoffPlugin::new(cfg);
        assert_eq!(plugin.next_delay(1).as_millis(), 100);
        assert_eq!(plugin.next_delay(2).as_millis(), 200);
        assert_eq!(plugin.next_delay(10).as_millis(), 1000);
    }

    #[test]
    fn test_linear_backoff() {
        let cfg = RetryConfig {
            base_delay_ms: 50,
            max_delay_ms: 200,
            strategy: "linear".to_string(),
        };
        let plugin = LinearRetryPlugin::new(cfg);
        assert_eq!(plugin.next_delay(1).as_millis(), 50);
        assert_eq!(plugin.next_delay(3).as_millis(), 150);
        assert_eq!(plugin.next_delay(9).as_millis(), 200);
    }

    #[test]
    fn test_auth_errors_are_fatal() {
        let plugin = LinearRetryPlugin::new(RetryConfig::default());
        assert!(plugin.is_fatal_error(&BackendError::Status {
            status: 401,
            body: "bad key".to_string(),
        }));
        assert!(!plugin.is_fatal_error(&BackendError::Status {
            status: 503,
            body: "busy".to_string(),
        }));
    }
}
