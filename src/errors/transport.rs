// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Failures reported by a queue transport.
///
/// All of these are treated as transient by the queue client: they are
/// published on the error stream and the operation is retried with backoff.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The service could not be reached or refused the request.
    #[error("transport unavailable: {0}")]
    Unavailable(String),

    /// The service asked the caller to slow down.
    #[error("request throttled")]
    Throttled,

    /// A receipt did not match any in-flight message.
    #[error("unknown receipt handle: {0}")]
    UnknownReceipt(String),
}
