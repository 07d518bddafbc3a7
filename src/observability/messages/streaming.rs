// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for stage lifecycle events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Why a batcher emitted a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushReason {
    Full,
    Timeout,
    Closed,
    Cancelled,
}

impl Display for FlushReason {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let reason = match self {
            FlushReason::Full => "full",
            FlushReason::Timeout => "timeout",
            FlushReason::Closed => "input closed",
            FlushReason::Cancelled => "cancelled",
        };
        f.write_str(reason)
    }
}

/// A batch left the batcher.
///
/// # Log Level
/// `trace!` - emitted for every batch
pub struct BatchFlushed {
    pub size: usize,
    pub reason: FlushReason,
}

impl Display for BatchFlushed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Flushed batch of {} items ({})", self.size, self.reason)
    }
}

impl StructuredLog for BatchFlushed {
    fn log(&self) {
        tracing::trace!(
            size = self.size,
            reason = %self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "batch_flushed",
            span_name = name,
            size = self.size,
            reason = %self.reason,
        )
    }
}
