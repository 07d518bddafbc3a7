// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Size- or time-bounded batching.
//!
//! A batch is flushed when it reaches `max_size` items or when `timeout` has
//! elapsed since the first item that entered an empty buffer, whichever
//! comes first. The timer is only armed while the buffer holds something, so
//! an empty batch is never emitted. When the input closes or `done` fires the
//! remainder is flushed exactly once.

use super::{stream, Done, ItemSink, ItemStream, STAGE_CAPACITY};
use crate::errors::ConfigError;
use crate::observability::messages::streaming::{BatchFlushed, FlushReason};
use crate::observability::messages::StructuredLog;
use std::time::Duration;
use tokio::time::Instant;

/// An ordered, non-empty group of items.
pub type Batch<T> = Vec<T>;

/// Validated batcher settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchOptions {
    max_size: usize,
    timeout: Duration,
}

impl BatchOptions {
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use the_conduit::streaming::BatchOptions;
    ///
    /// assert!(BatchOptions::new(10, Duration::from_secs(1)).is_ok());
    /// assert!(BatchOptions::new(0, Duration::from_secs(1)).is_err());
    /// assert!(BatchOptions::new(10, Duration::ZERO).is_err());
    /// ```
    pub fn new(max_size: usize, timeout: Duration) -> Result<Self, ConfigError> {
        if max_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if timeout.is_zero() {
            return Err(ConfigError::ZeroBatchTimeout);
        }
        Ok(Self { max_size, timeout })
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Group items from `input` into batches.
pub fn batch<T>(done: &Done, input: ItemStream<T>, options: BatchOptions) -> ItemStream<Batch<T>>
where
    T: Send + 'static,
{
    let (out, batches) = stream(STAGE_CAPACITY);
    let done = done.clone();

    tokio::spawn(async move {
        let mut buffer: Batch<T> = Vec::with_capacity(options.max_size);
        let timer = tokio::time::sleep(options.timeout);
        tokio::pin!(timer);
        let mut armed = false;

        let reason = loop {
            tokio::select! {
                biased;
                _ = done.wait() => break FlushReason::Cancelled,
                item = input.recv_async() => {
                    let Ok(item) = item else {
                        break FlushReason::Closed;
                    };

                    if buffer.is_empty() {
                        // A timeout too large to represent leaves the timer disarmed.
                        armed = match Instant::now().checked_add(options.timeout) {
                            Some(deadline) => {
                                timer.as_mut().reset(deadline);
                                true
                            }
                            None => false,
                        };
                    }
                    buffer.push(item);

                    if buffer.len() >= options.max_size {
                        armed = false;
                        let full = std::mem::replace(&mut buffer, Vec::with_capacity(options.max_size));
                        if !flush(&out, full, FlushReason::Full).await {
                            return;
                        }
                    }
                }
                _ = &mut timer, if armed => {
                    armed = false;
                    if !buffer.is_empty() {
                        let partial = std::mem::replace(&mut buffer, Vec::with_capacity(options.max_size));
                        if !flush(&out, partial, FlushReason::Timeout).await {
                            return;
                        }
                    }
                }
            }
        };

        if !buffer.is_empty() {
            flush(&out, buffer, reason).await;
        }
    });

    batches
}

async fn flush<T>(out: &ItemSink<Batch<T>>, batch: Batch<T>, reason: FlushReason) -> bool {
    let size = batch.len();
    let delivered = out.send_async(batch).await.is_ok();
    if delivered {
        BatchFlushed { size, reason }.log();
    }
    delivered
}
