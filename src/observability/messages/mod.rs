// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line. The
//! ones worth filtering on also implement [`StructuredLog`], which emits the
//! event at the message's level with its fields attached.

use tracing::Span;

pub mod config;
pub mod queue;
pub mod streaming;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a tracing event.
    fn log(&self);

    /// Build a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
