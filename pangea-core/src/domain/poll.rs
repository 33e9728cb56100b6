//! Polling configuration
//!
//! Controls how long the client keeps checking an accepted request, how far
//! apart the checks are, and how many consecutive network failures it
//! tolerates along the way.

use std::time::Duration;
use thiserror::Error;

/// Returned by [`PollConfig::validate`] for settings that can never work
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid poll config: {0}")]
pub struct InvalidPollConfig(pub String);

/// Polling configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PollConfig {
    /// Maximum wall-clock time to wait, measured from submission.
    /// Zero disables polling entirely.
    pub timeout: Duration,

    /// Delay before the first status check
    pub interval: Duration,

    /// Growth factor applied to the delay after every check (1.0 = fixed)
    pub backoff_multiplier: f64,

    /// Upper bound for the delay between checks
    pub max_interval: Duration,

    /// Hard cap on status checks, independent of the timeout
    pub max_attempts: Option<u32>,

    /// Consecutive transient network failures tolerated while polling
    pub max_transport_retries: u32,
}

impl PollConfig {
    /// Creates a configuration with the default interval and backoff
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    /// A configuration that never polls
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_backoff(mut self, multiplier: f64, max_interval: Duration) -> Self {
        self.backoff_multiplier = multiplier;
        self.max_interval = max_interval;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_max_transport_retries(mut self, retries: u32) -> Self {
        self.max_transport_retries = retries;
        self
    }

    /// Whether an accepted request should be polled at all
    pub fn is_enabled(&self) -> bool {
        !self.timeout.is_zero()
    }

    /// Delay before the given status check (1-based)
    ///
    /// `interval * multiplier^(attempt - 1)`, capped at `max_interval`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let factor = self.backoff_multiplier.powi(exponent);
        let secs = (self.interval.as_secs_f64() * factor).min(self.max_interval.as_secs_f64());

        // Out of range once the cap is near Duration::MAX
        Duration::try_from_secs_f64(secs).unwrap_or(self.max_interval)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), InvalidPollConfig> {
        if self.interval.is_zero() {
            return Err(InvalidPollConfig("interval must be greater than 0".into()));
        }

        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(InvalidPollConfig(format!(
                "backoff_multiplier must be a finite value >= 1.0, got {}",
                self.backoff_multiplier
            )));
        }

        if self.max_interval < self.interval {
            return Err(InvalidPollConfig(
                "max_interval cannot be smaller than interval".into(),
            ));
        }

        if self.max_attempts == Some(0) {
            return Err(InvalidPollConfig(
                "max_attempts must be greater than 0 when set".into(),
            ));
        }

        Ok(())
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            interval: Duration::from_secs(1),
            backoff_multiplier: 1.0,
            max_interval: Duration::from_secs(30),
            max_attempts: None,
            max_transport_retries: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PollConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.interval, Duration::from_secs(1));
        assert_eq!(config.max_transport_retries, 3);
        assert!(config.is_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_disables_polling() {
        let config = PollConfig::disabled();
        assert!(!config.is_enabled());
        // Still a valid configuration
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = PollConfig::default();

        config.interval = Duration::ZERO;
        assert!(config.validate().is_err());
        config.interval = Duration::from_secs(1);

        config.backoff_multiplier = 0.5;
        assert!(config.validate().is_err());
        config.backoff_multiplier = f64::NAN;
        assert!(config.validate().is_err());
        config.backoff_multiplier = 2.0;

        config.max_interval = Duration::from_millis(500);
        assert!(config.validate().is_err());
        config.max_interval = Duration::from_secs(10);

        config.max_attempts = Some(0);
        assert!(config.validate().is_err());
        config.max_attempts = Some(3);

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fixed_interval() {
        let config = PollConfig::default().with_interval(Duration::from_millis(250));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(250));
        assert_eq!(config.delay_for_attempt(7), Duration::from_millis(250));
    }

    #[test]
    fn test_backoff_is_capped() {
        let config = PollConfig::default()
            .with_interval(Duration::from_secs(1))
            .with_backoff(2.0, Duration::from_secs(5));

        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(1));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(2));
        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(4));
        assert_eq!(config.delay_for_attempt(4), Duration::from_secs(5));
        assert_eq!(config.delay_for_attempt(u32::MAX), Duration::from_secs(5));
    }

    #[test]
    fn test_unbounded_cap() {
        let config = PollConfig::new(Duration::MAX).with_backoff(2.0, Duration::MAX);
        assert!(config.validate().is_ok());

        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(4));
        assert_eq!(config.delay_for_attempt(u32::MAX), Duration::MAX);
    }
}
