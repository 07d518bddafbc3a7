// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for queue client events.
//!
//! This module contains message types for logging events related to:
//! * Pipeline start-up (polling and sending)
//! * Empty polls and the backoff they trigger
//! * Transport failures, requeued batches and retry backoff
//! * Malformed messages dropped from the receive path

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Receive pipeline started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_conduit::observability::messages::queue::PollingStarted;
///
/// let msg = PollingStarted {
///     transport: "memory",
///     workers: 4,
///     receive_max: 10,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct PollingStarted<'a> {
    pub transport: &'a str,
    pub workers: usize,
    pub receive_max: usize,
}

impl Display for PollingStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Started polling '{}' with {} workers, up to {} messages per receive",
            self.transport, self.workers, self.receive_max
        )
    }
}

impl StructuredLog for PollingStarted<'_> {
    fn log(&self) {
        tracing::info!(
            transport = self.transport,
            workers = self.workers,
            receive_max = self.receive_max,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "polling",
            span_name = name,
            transport = self.transport,
            workers = self.workers,
        )
    }
}

/// Send pipeline started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct SendingStarted<'a> {
    pub transport: &'a str,
    pub workers: usize,
    pub batched: bool,
}

impl Display for SendingStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let mode = if self.batched { "batched" } else { "single-message" };
        write!(
            f,
            "Started {} sending to '{}' with {} workers",
            mode, self.transport, self.workers
        )
    }
}

impl StructuredLog for SendingStarted<'_> {
    fn log(&self) {
        tracing::info!(
            transport = self.transport,
            workers = self.workers,
            batched = self.batched,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "sending",
            span_name = name,
            transport = self.transport,
            workers = self.workers,
            batched = self.batched,
        )
    }
}

/// A poll came back empty and the worker is backing off.
///
/// # Log Level
/// `debug!` - Routine while a queue is idle
pub struct PollEmpty {
    pub worker: usize,
    pub wait: Duration,
}

impl Display for PollEmpty {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker {} received no messages, waiting {:?}",
            self.worker, self.wait
        )
    }
}

impl StructuredLog for PollEmpty {
    fn log(&self) {
        tracing::debug!(
            worker = self.worker,
            wait_ms = self.wait.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "poll_empty",
            span_name = name,
            worker = self.worker,
            wait = ?self.wait,
        )
    }
}

/// A failed batch was put back on the retry path.
///
/// # Log Level
/// `warn!` - Transient failure, will be retried
pub struct BatchRequeued<'a> {
    pub worker: usize,
    pub count: usize,
    pub wait: Option<Duration>,
    pub error: &'a dyn std::error::Error,
}

impl Display for BatchRequeued<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker {} requeued {} messages after: {}",
            self.worker, self.count, self.error
        )?;
        if let Some(wait) = self.wait {
            write!(f, " (backing off {:?})", wait)?;
        }
        Ok(())
    }
}

impl StructuredLog for BatchRequeued<'_> {
    fn log(&self) {
        tracing::warn!(
            worker = self.worker,
            count = self.count,
            wait = ?self.wait,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "batch_requeued",
            span_name = name,
            worker = self.worker,
            count = self.count,
        )
    }
}

/// A single send failed and will be retried after `wait`.
///
/// # Log Level
/// `warn!` - Transient failure, will be retried
pub struct SendRetrying<'a> {
    pub worker: usize,
    pub attempt: u32,
    pub wait: Duration,
    pub error: &'a dyn std::error::Error,
}

impl Display for SendRetrying<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker {} send attempt {} failed, retrying in {:?}: {}",
            self.worker, self.attempt, self.wait, self.error
        )
    }
}

impl StructuredLog for SendRetrying<'_> {
    fn log(&self) {
        tracing::warn!(
            worker = self.worker,
            attempt = self.attempt,
            wait_ms = self.wait.as_millis() as u64,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "send_retrying",
            span_name = name,
            worker = self.worker,
            attempt = self.attempt,
        )
    }
}

/// Sending recovered after a failure streak.
///
/// # Log Level
/// `info!` - Recovery is worth knowing about
pub struct BackoffReset {
    pub worker: usize,
    pub failures: u32,
}

impl Display for BackoffReset {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker {} recovered after {} consecutive failures",
            self.worker, self.failures
        )
    }
}

impl StructuredLog for BackoffReset {
    fn log(&self) {
        tracing::info!(worker = self.worker, failures = self.failures, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("backoff_reset", span_name = name, worker = self.worker)
    }
}

/// A worker left its loop.
///
/// # Log Level
/// `debug!` - Shutdown detail
pub struct WorkerStopped<'a> {
    pub role: &'a str,
    pub worker: usize,
    pub cancelled: bool,
}

impl Display for WorkerStopped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let why = if self.cancelled { "cancelled" } else { "input exhausted" };
        write!(f, "{} worker {} stopped: {}", self.role, self.worker, why)
    }
}

impl StructuredLog for WorkerStopped<'_> {
    fn log(&self) {
        tracing::debug!(
            role = self.role,
            worker = self.worker,
            cancelled = self.cancelled,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("worker_stopped", span_name = name, role = self.role, worker = self.worker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TransportError;

    #[test]
    fn test_batch_requeued_display() {
        let error = TransportError::Throttled;
        let msg = BatchRequeued {
            worker: 1,
            count: 10,
            wait: Some(Duration::from_millis(150)),
            error: &error,
        };
        assert_eq!(
            msg.to_string(),
            "Worker 1 requeued 10 messages after: request throttled (backing off 150ms)"
        );
    }

    #[test]
    fn test_send_retrying_display() {
        let error = TransportError::Unavailable("connection reset".to_string());
        let msg = SendRetrying {
            worker: 0,
            attempt: 3,
            wait: Duration::from_millis(40),
            error: &error,
        };
        assert_eq!(
            msg.to_string(),
            "Worker 0 send attempt 3 failed, retrying in 40ms: transport unavailable: connection reset"
        );
        let _entered = msg.span("retry").entered();
        msg.log();
    }

    #[test]
    fn test_worker_stopped_display() {
        let msg = WorkerStopped {
            role: "receive",
            worker: 2,
            cancelled: true,
        };
        assert_eq!(msg.to_string(), "receive worker 2 stopped: cancelled");
    }
}
