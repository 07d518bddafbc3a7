// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration validation.
//!
//! Checks run independently and every problem is collected, so a config file
//! with several mistakes is reported in one go rather than one per attempt.
//!
//! # Examples
//!
//! ```rust
//! use the_conduit::config::{validate_config, Config};
//!
//! let mut config = Config::default();
//! assert!(validate_config(&config).is_ok());
//!
//! config.queue.batch_size = 0;
//! config.workers.receive = 0;
//! assert_eq!(validate_config(&config).unwrap_err().len(), 2);
//! ```

use crate::config::Config;
use crate::errors::ConfigError;

/// Validate every setting in `config`.
///
/// # Returns
///
/// * `Ok(())` - The config can build a client and start its pipelines
/// * `Err(Vec<ConfigError>)` - Every problem found
pub fn validate_config(config: &Config) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let queue = &config.queue;

    if queue.batch_size == 0 {
        errors.push(ConfigError::ZeroBatchSize);
    }
    if queue.batch_timeout_ms == 0 {
        errors.push(ConfigError::ZeroBatchTimeout);
    }
    if queue.receive_max == 0 {
        errors.push(ConfigError::ZeroReceiveSize);
    }
    for (name, settings) in [("poll_backoff", &queue.poll_backoff), ("send_backoff", &queue.send_backoff)] {
        if let Err(ConfigError::InvalidBackoff { reason }) = settings.to_policy().validate() {
            errors.push(ConfigError::InvalidBackoff {
                reason: format!("{}: {}", name, reason),
            });
        }
    }
    for (pool, count) in [("receive", config.workers.receive), ("send", config.workers.send)] {
        if count == 0 {
            errors.push(ConfigError::EmptyWorkerPool { pool });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_batch_settings_both_reported() {
        let mut config = Config::default();
        config.queue.batch_size = 0;
        config.queue.batch_timeout_ms = 0;

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ConfigError::ZeroBatchSize));
        assert!(matches!(errors[1], ConfigError::ZeroBatchTimeout));
    }

    #[test]
    fn test_backoff_problems_name_the_policy() {
        let mut config = Config::default();
        config.queue.send_backoff.multiplier = 0.5;
        config.queue.poll_backoff.base_ms = 0;

        let errors = validate_config(&config).unwrap_err();
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("poll_backoff"));
        assert!(messages[1].contains("send_backoff"));
    }

    #[test]
    fn test_zero_batch_timeout_alone_reported() {
        let mut config = Config::default();
        config.queue.batch_timeout_ms = 0;

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors.as_slice(), [ConfigError::ZeroBatchTimeout]));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = Config::default();
        config.workers.send = 0;

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors.as_slice(), [ConfigError::EmptyWorkerPool { pool: "send" }]));
    }

    #[test]
    fn test_each_empty_worker_pool_named() {
        let mut config = Config::default();
        config.workers.receive = 0;
        config.workers.send = 0;

        let messages: Vec<String> = validate_config(&config)
            .unwrap_err()
            .iter()
            .map(|e| e.to_string())
            .collect();
        assert_eq!(
            messages,
            vec![
                "receive worker count must be greater than zero",
                "send worker count must be greater than zero",
            ]
        );
    }
}
