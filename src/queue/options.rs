// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::*;
use crate::config::Config;
use crate::errors::ConfigError;
use crate::streaming::{BackoffPolicy, BatchOptions};
use std::time::Duration;

/// Queue client knobs. Plain values; checked once when the client is built.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueOptions {
    /// Capacity of the buffered stage between serializers and senders, and of
    /// each polling worker's output.
    pub buffer_size: usize,
    /// Most messages per batch send.
    pub batch_size: usize,
    /// Longest a partial batch waits before it is sent.
    pub batch_timeout: Duration,
    /// Messages requested per receive call.
    pub receive_max: usize,
    pub poll_backoff: BackoffPolicy,
    pub send_backoff: BackoffPolicy,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_timeout: Duration::from_millis(DEFAULT_BATCH_TIMEOUT_MS),
            receive_max: DEFAULT_RECEIVE_MAX,
            poll_backoff: BackoffPolicy {
                base: Duration::from_millis(DEFAULT_POLL_BACKOFF_BASE_MS),
                multiplier: DEFAULT_POLL_BACKOFF_MULTIPLIER,
                cap: Duration::from_millis(MAX_POLL_WAIT_MS),
            },
            send_backoff: BackoffPolicy {
                base: Duration::from_millis(DEFAULT_SEND_BACKOFF_BASE_MS),
                multiplier: DEFAULT_SEND_BACKOFF_MULTIPLIER,
                cap: Duration::from_millis(DEFAULT_SEND_BACKOFF_CAP_MS),
            },
        }
    }
}

impl QueueOptions {
    /// Check every knob, returning the batcher settings on success.
    pub fn validate(&self) -> Result<BatchOptions, ConfigError> {
        if self.receive_max == 0 {
            return Err(ConfigError::ZeroReceiveSize);
        }
        self.poll_backoff.validate()?;
        self.send_backoff.validate()?;
        BatchOptions::new(self.batch_size, self.batch_timeout)
    }
}

impl TryFrom<&Config> for QueueOptions {
    type Error = ConfigError;

    fn try_from(cfg: &Config) -> Result<Self, Self::Error> {
        let queue = &cfg.queue;
        let options = Self {
            buffer_size: queue.buffer_size,
            batch_size: queue.batch_size,
            batch_timeout: Duration::from_millis(queue.batch_timeout_ms),
            receive_max: queue.receive_max,
            poll_backoff: queue.poll_backoff.to_policy(),
            send_backoff: queue.send_backoff.to_policy(),
        };
        options.validate()?;
        Ok(options)
    }
}
