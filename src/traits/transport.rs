// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::TransportError;
use crate::queue::RawMessage;

/// Outcome of a batch send the transport accepted as a request.
///
/// `failed` lists the indices of entries the service rejected individually.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub failed: Vec<usize>,
}

impl BatchReport {
    pub fn all_ok() -> Self {
        Self::default()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// A message queue service.
///
/// Implementations wrap a concrete queue SDK. Every call is a single network
/// round trip; the queue client layers retry, backoff and batching on top.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch up to `max_messages`; an empty vector means the queue is idle.
    async fn receive(&self, max_messages: usize) -> Result<Vec<RawMessage>, TransportError>;

    async fn send(&self, body: String) -> Result<(), TransportError>;

    /// Send several bodies in one request.
    ///
    /// `Err` means the whole request failed; `Ok` may still report
    /// individually rejected entries.
    async fn send_batch(&self, bodies: &[String]) -> Result<BatchReport, TransportError>;

    /// Acknowledge a received message so it is not redelivered.
    async fn delete(&self, message: &RawMessage) -> Result<(), TransportError>;

    fn name(&self) -> &'static str;
}
