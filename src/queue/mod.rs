// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message-queue client built on the streaming stages.
//!
//! Receive flow:
//!
//! ```text
//! transport -> N polling workers -> merge -> N deserializers -> merge -> consumer
//! ```
//!
//! Send flow:
//!
//! ```text
//! producer -> N serializers -> merge (buffered) -> per-worker batcher -> transport
//!                                                      ^ retry batcher <-'  (on failure)
//! ```
//!
//! Every worker stops when the client's [`Done`] fires. Transport failures
//! are reported on error streams and retried; they never end a pipeline.

mod message;
mod options;
mod receive;
mod send;
mod serializer;


pub use message::{Message, RawMessage};
pub use options::QueueOptions;
pub use serializer::JsonSerializer;

use crate::errors::{ConfigError, QueueError};
use crate::streaming::{BatchOptions, Done};
use crate::traits::{MetricsSink, Serializer, Transport};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

pub const RECEIVE_COUNT: &str = "queue_receive_count";
pub const RECEIVE_ERROR: &str = "queue_receive_error";
pub const RECEIVE_DURATION: &str = "queue_receive_duration";
pub const SEND_COUNT: &str = "queue_send_count";
pub const SEND_ERROR: &str = "queue_send_error";
pub const SEND_DURATION: &str = "queue_send_duration";
pub const SEND_BATCH_COUNT: &str = "queue_send_batch_count";
pub const SEND_BATCH_ERROR: &str = "queue_send_batch_error";
pub const SEND_BATCH_DURATION: &str = "queue_send_batch_duration";
pub const DELETE_COUNT: &str = "queue_delete_count";
pub const DELETE_ERROR: &str = "queue_delete_error";

/// Typed client for one queue.
///
/// Cloning is cheap; clones share the transport, serializer, metrics sink
/// and cancellation signal.
pub struct QueueClient<T> {
    done: Done,
    transport: Arc<dyn Transport>,
    serializer: Arc<dyn Serializer<T>>,
    options: QueueOptions,
    batch: BatchOptions,
    metrics: Arc<dyn MetricsSink>,
}

impl<T> Clone for QueueClient<T> {
    fn clone(&self) -> Self {
        Self {
            done: self.done.clone(),
            transport: Arc::clone(&self.transport),
            serializer: Arc::clone(&self.serializer),
            options: self.options.clone(),
            batch: self.batch,
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl<T> QueueClient<T>
where
    T: Send + 'static,
{
    /// Build a client, validating `options` up front.
    pub fn new(
        done: Done,
        transport: Arc<dyn Transport>,
        serializer: Arc<dyn Serializer<T>>,
        options: QueueOptions,
        metrics: Arc<dyn MetricsSink>,
    ) -> Result<Self, ConfigError> {
        let batch = options.validate()?;
        Ok(Self {
            done,
            transport,
            serializer,
            options,
            batch,
            metrics,
        })
    }

    /// Build a client that carries items as JSON bodies.
    pub fn json(
        done: Done,
        transport: Arc<dyn Transport>,
        options: QueueOptions,
        metrics: Arc<dyn MetricsSink>,
    ) -> Result<Self, ConfigError>
    where
        T: Serialize + DeserializeOwned,
    {
        Self::new(
            done,
            transport,
            Arc::new(JsonSerializer::<T>::new()),
            options,
            metrics,
        )
    }

    pub fn done(&self) -> &Done {
        &self.done
    }

    pub fn options(&self) -> &QueueOptions {
        &self.options
    }

    /// Acknowledge a processed message so the queue does not redeliver it.
    pub async fn delete_message(&self, message: &Message<T>) -> Result<(), QueueError> {
        match self.transport.delete(&message.raw).await {
            Ok(()) => {
                self.metrics.incr_counter(DELETE_COUNT, 1);
                Ok(())
            }
            Err(source) => {
                self.metrics.incr_counter(DELETE_ERROR, 1);
                Err(QueueError::Delete {
                    message_id: message.id().to_string(),
                    source,
                })
            }
        }
    }
}

fn require_workers(worker_count: usize) -> Result<(), ConfigError> {
    if worker_count == 0 {
        return Err(ConfigError::ZeroWorkers);
    }
    Ok(())
}

/// Sleep for `wait` unless `done` fires first. Returns `false` on cancellation.
async fn sleep_or_done(done: &Done, wait: Duration) -> bool {
    tokio::select! {
        biased;
        _ = done.wait() => false,
        _ = tokio::time::sleep(wait) => !done.is_set(),
    }
}
