// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::*;
use crate::errors::ConfigError;
use crate::observability::messages::config::ConfigLoaded;
use crate::observability::messages::StructuredLog;
use crate::streaming::BackoffPolicy;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Top-level configuration for a queue pipeline.
///
/// Every field is optional; missing values fall back to the constants in
/// [`crate::config::consts`].
///
/// # Fields
/// * `queue` - Buffering, batching and backoff knobs for the client
/// * `workers` - How many receive and send workers to start
///
/// # Example
/// ```yaml
/// queue:
///   batch_size: 10
///   batch_timeout_ms: 1000
///   poll_backoff:
///     base_ms: 500
///     multiplier: 2.0
///     cap_ms: 127000
/// workers:
///   receive: 2
///   send: 2
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub queue: QueueSettings,
    #[serde(default)]
    pub workers: WorkerSettings,
}

/// Queue client settings as written in the config file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct QueueSettings {
    pub buffer_size: usize,
    pub batch_size: usize,
    pub batch_timeout_ms: u64,
    pub receive_max: usize,
    pub poll_backoff: BackoffSettings,
    pub send_backoff: BackoffSettings,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_timeout_ms: DEFAULT_BATCH_TIMEOUT_MS,
            receive_max: DEFAULT_RECEIVE_MAX,
            poll_backoff: BackoffSettings {
                base_ms: DEFAULT_POLL_BACKOFF_BASE_MS,
                multiplier: DEFAULT_POLL_BACKOFF_MULTIPLIER,
                cap_ms: MAX_POLL_WAIT_MS,
            },
            send_backoff: BackoffSettings::default(),
        }
    }
}

/// Backoff parameters in milliseconds.
///
/// A partially written block keeps the send-backoff defaults for the
/// missing fields.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackoffSettings {
    pub base_ms: u64,
    pub multiplier: f64,
    pub cap_ms: u64,
}

impl Default for BackoffSettings {
    fn default() -> Self {
        Self {
            base_ms: DEFAULT_SEND_BACKOFF_BASE_MS,
            multiplier: DEFAULT_SEND_BACKOFF_MULTIPLIER,
            cap_ms: DEFAULT_SEND_BACKOFF_CAP_MS,
        }
    }
}

impl BackoffSettings {
    /// Unvalidated policy; see [`BackoffPolicy::validate`].
    pub fn to_policy(&self) -> BackoffPolicy {
        BackoffPolicy {
            base: Duration::from_millis(self.base_ms),
            multiplier: self.multiplier,
            cap: Duration::from_millis(self.cap_ms),
        }
    }
}

/// Worker counts for each pipeline.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkerSettings {
    pub receive: usize,
    pub send: usize,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            receive: DEFAULT_RECEIVE_WORKERS,
            send: DEFAULT_SEND_WORKERS,
        }
    }
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

/// Load a config from a YAML file and validate it.
///
/// All validation problems are reported together in
/// [`ConfigError::Invalid`].
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let cfg = load_config(path)?;

    crate::config::validate_config(&cfg).map_err(ConfigError::Invalid)?;

    ConfigLoaded {
        path: &path.display().to_string(),
        receive_workers: cfg.workers.receive,
        send_workers: cfg.workers.send,
    }
    .log();

    Ok(cfg)
}
