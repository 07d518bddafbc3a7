// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Capped exponential backoff.
//!
//! The state is `(current, base, multiplier, cap)`. `current` starts at
//! `base`, returns to `base` on success, and on failure becomes
//! `min(current * multiplier, cap)`. A [`Backoff`] is owned by exactly one
//! task; nothing here is shared.

use crate::errors::ConfigError;
use std::time::Duration;

/// Parameters for a [`Backoff`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    pub base: Duration,
    pub multiplier: f64,
    pub cap: Duration,
}

impl BackoffPolicy {
    /// Build a policy, rejecting parameters that cannot back off.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use the_conduit::streaming::BackoffPolicy;
    ///
    /// let policy = BackoffPolicy::new(Duration::from_millis(100), 1.5, Duration::from_secs(30)).unwrap();
    /// assert_eq!(policy.base, Duration::from_millis(100));
    ///
    /// assert!(BackoffPolicy::new(Duration::ZERO, 2.0, Duration::from_secs(1)).is_err());
    /// ```
    pub fn new(base: Duration, multiplier: f64, cap: Duration) -> Result<Self, ConfigError> {
        let policy = Self {
            base,
            multiplier,
            cap,
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base.is_zero() {
            return Err(ConfigError::InvalidBackoff {
                reason: "base must be greater than zero".to_string(),
            });
        }
        if !self.multiplier.is_finite() || self.multiplier <= 1.0 {
            return Err(ConfigError::InvalidBackoff {
                reason: format!("multiplier must be a finite value > 1.0, got {}", self.multiplier),
            });
        }
        if self.cap < self.base {
            return Err(ConfigError::InvalidBackoff {
                reason: format!("cap {:?} is below base {:?}", self.cap, self.base),
            });
        }
        Ok(())
    }
}

/// Mutable backoff state for a single worker.
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: BackoffPolicy,
    current: Duration,
    failures: u32,
}

impl Backoff {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            current: policy.base,
            policy,
            failures: 0,
        }
    }

    /// The wait to apply now.
    pub fn current(&self) -> Duration {
        self.current
    }

    /// Consecutive failures since the last success.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Record a failure and return the advanced wait.
    pub fn record_failure(&mut self) -> Duration {
        self.failures = self.failures.saturating_add(1);
        if self.current >= self.policy.cap {
            return self.current;
        }

        // base * multiplier^failures, which equals current * multiplier below the cap.
        let exponent = i32::try_from(self.failures).unwrap_or(i32::MAX);
        let next_nanos = self.policy.base.as_nanos() as f64 * self.policy.multiplier.powi(exponent);
        let next = if next_nanos >= self.policy.cap.as_nanos() as f64 {
            self.policy.cap
        } else {
            Duration::from_nanos(next_nanos.round() as u64)
        };
        // Rounding must never hold the wait in place below the cap.
        self.current = next.max(self.current + Duration::from_nanos(1)).min(self.policy.cap);
        self.current
    }

    /// Record a success: the wait goes back to `base`.
    pub fn reset(&mut self) {
        self.failures = 0;
        self.current = self.policy.base;
    }
}
