// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Capacity of the buffered fan-in between serializers and senders
pub const DEFAULT_BUFFER_SIZE: usize = 100;
/// Messages per batch send, the usual service limit
pub const DEFAULT_BATCH_SIZE: usize = 10;
/// Longest a partial batch waits before being sent (1 second)
pub const DEFAULT_BATCH_TIMEOUT_MS: u64 = 1_000;
/// Messages requested per receive call
pub const DEFAULT_RECEIVE_MAX: usize = 10;

/// First wait after an empty poll is base * multiplier (1 second)
pub const DEFAULT_POLL_BACKOFF_BASE_MS: u64 = 500;
pub const DEFAULT_POLL_BACKOFF_MULTIPLIER: f64 = 2.0;
/// Longest wait between polls of an idle queue (127 seconds)
pub const MAX_POLL_WAIT_MS: u64 = 127_000;

pub const DEFAULT_SEND_BACKOFF_BASE_MS: u64 = 100;
pub const DEFAULT_SEND_BACKOFF_MULTIPLIER: f64 = 1.5;
/// Longest wait between send retries (30 seconds)
pub const DEFAULT_SEND_BACKOFF_CAP_MS: u64 = 30_000;

pub const DEFAULT_RECEIVE_WORKERS: usize = 1;
pub const DEFAULT_SEND_WORKERS: usize = 1;
