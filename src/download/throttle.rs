//! Retry policy for throttled (HTTP 429) requests.
//!
//! The upstream API answers 429 when a client sends requests too quickly and
//! recovers on its own after a short pause. [`ThrottlePolicy`] describes how
//! long to pause and whether to give up at all.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use wallhaven_core::download::{ThrottleDecision, ThrottlePolicy};
//!
//! let policy = ThrottlePolicy::default().with_max_retries(Some(2));
//! assert!(matches!(policy.decide(1), ThrottleDecision::Wait(_)));
//! assert!(matches!(policy.decide(3), ThrottleDecision::GiveUp));
//! ```

use std::time::Duration;

use tracing::{debug, instrument};

use super::constants::DEFAULT_THROTTLE_COOLDOWN;

/// Decision after a throttled attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// Sleep for the given duration, then re-send the identical request.
    Wait(Duration),
    /// The retry bound is exhausted.
    GiveUp,
}

/// Cooldown and optional retry bound for 429 responses.
///
/// # Default Values
///
/// - `cooldown`: 10 seconds
/// - `max_retries`: `None` (retry forever)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottlePolicy {
    cooldown: Duration,
    max_retries: Option<u32>,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            cooldown: DEFAULT_THROTTLE_COOLDOWN,
            max_retries: None,
        }
    }
}

impl ThrottlePolicy {
    /// Creates a policy with an explicit cooldown and retry bound.
    #[must_use]
    pub fn new(cooldown: Duration, max_retries: Option<u32>) -> Self {
        Self {
            cooldown,
            max_retries,
        }
    }

    /// Returns a copy with a different cooldown.
    #[must_use]
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Returns a copy with a different retry bound (`None` retries forever).
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: Option<u32>) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Cooldown slept between throttled attempts.
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Configured retry bound.
    #[must_use]
    pub fn max_retries(&self) -> Option<u32> {
        self.max_retries
    }

    /// Decides what to do after `throttled_attempts` consecutive 429 responses.
    #[instrument(level = "trace", skip(self), fields(max_retries = ?self.max_retries))]
    pub fn decide(&self, throttled_attempts: u32) -> ThrottleDecision {
        match self.max_retries {
            Some(max) if throttled_attempts > max => {
                debug!(throttled_attempts, "throttle retry bound exhausted");
                ThrottleDecision::GiveUp
            }
            _ => ThrottleDecision::Wait(self.cooldown),
        }
    }
}
