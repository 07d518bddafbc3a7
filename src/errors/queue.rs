// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors published by the queue client on its error streams.
//!
//! None of these stop a pipeline. Receive and send failures are retried,
//! malformed items are dropped after being reported once.

use crate::errors::{SerializationError, TransportError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueueError {
    /// A polling worker's receive call failed.
    #[error("receive failed on worker {worker}: {source}")]
    Receive {
        worker: usize,
        #[source]
        source: TransportError,
    },

    /// A single-message send failed and will be retried.
    #[error("send failed on worker {worker}: {source}")]
    Send {
        worker: usize,
        #[source]
        source: TransportError,
    },

    /// A whole batch was rejected and requeued.
    #[error("batch send of {size} messages failed on worker {worker}: {source}")]
    BatchSend {
        worker: usize,
        size: usize,
        #[source]
        source: TransportError,
    },

    /// Some entries of a batch were rejected and requeued.
    #[error("{failed} of {total} batch entries failed on worker {worker}")]
    PartialBatch {
        worker: usize,
        failed: usize,
        total: usize,
    },

    /// An outgoing item could not be serialized and was dropped.
    #[error("failed to serialize item: {0}")]
    Serialize(#[source] SerializationError),

    /// A received message body could not be deserialized and was dropped.
    #[error("failed to deserialize message '{message_id}': {source}")]
    Deserialize {
        message_id: String,
        #[source]
        source: SerializationError,
    },

    /// Deleting a processed message failed.
    #[error("delete of message '{message_id}' failed: {source}")]
    Delete {
        message_id: String,
        #[source]
        source: TransportError,
    },
}

impl QueueError {
    /// Returns true when the failure came from the transport rather than the data.
    pub fn is_transient(&self) -> bool {
        !matches!(self, QueueError::Serialize(_) | QueueError::Deserialize { .. })
    }
}
