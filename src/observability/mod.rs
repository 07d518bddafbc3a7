// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability: structured log messages and injected metrics sinks.
//!
//! Log messages follow a struct-based pattern with a `Display` implementation
//! so that wording lives in one place instead of being scattered through the
//! stages as format strings. Messages are grouped by subsystem:
//!
//! * `messages::streaming` - batcher and stage lifecycle events
//! * `messages::queue` - polling, sending, retry and backoff events
//! * `messages::config` - configuration loading
//!
//! Metrics are never global. A [`crate::traits::MetricsSink`] is built by the
//! caller and handed to whatever needs it; [`metrics`] holds the stock
//! implementations.
//!
//! # Usage
//!
//! ```rust
//! use the_conduit::observability::messages::queue::PollEmpty;
//! use the_conduit::observability::messages::StructuredLog;
//! use std::time::Duration;
//!
//! let msg = PollEmpty {
//!     worker: 0,
//!     wait: Duration::from_secs(2),
//! };
//!
//! msg.log();
//! assert_eq!(msg.to_string(), "Worker 0 received no messages, waiting 2s");
//! ```

pub mod messages;
pub mod metrics;
