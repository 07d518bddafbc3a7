// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::Duration;

/// Destination for counters and timers.
///
/// Passed explicitly to whatever emits metrics; there is no process-wide
/// default instance.
pub trait MetricsSink: Send + Sync {
    fn incr_counter(&self, key: &'static str, by: u64);

    fn record_timer(&self, key: &'static str, elapsed: Duration);
}
