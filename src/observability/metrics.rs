// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Stock [`MetricsSink`] implementations and the timer guard.

use crate::traits::MetricsSink;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn incr_counter(&self, _key: &'static str, _by: u64) {}

    fn record_timer(&self, _key: &'static str, _elapsed: Duration) {}
}

/// Emits each metric as a `debug!` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMetrics;

impl MetricsSink for TracingMetrics {
    fn incr_counter(&self, key: &'static str, by: u64) {
        tracing::debug!(metric = key, value = by, kind = "counter");
    }

    fn record_timer(&self, key: &'static str, elapsed: Duration) {
        tracing::debug!(metric = key, elapsed_us = elapsed.as_micros() as u64, kind = "timer");
    }
}

/// Timer statistics kept by [`InMemoryMetrics`].
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TimerStats {
    pub count: u64,
    pub total: Duration,
    pub max: Duration,
}

/// Accumulates metrics in memory for tests and end-of-run summaries.
#[derive(Debug, Default)]
pub struct InMemoryMetrics {
    counters: Mutex<HashMap<&'static str, u64>>,
    timers: Mutex<HashMap<&'static str, TimerStats>>,
}

impl InMemoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self, key: &str) -> u64 {
        self.counters.lock().get(key).copied().unwrap_or(0)
    }

    pub fn timer(&self, key: &str) -> TimerStats {
        self.timers.lock().get(key).copied().unwrap_or_default()
    }

    /// Counter values sorted by key.
    pub fn counters(&self) -> Vec<(&'static str, u64)> {
        let mut all: Vec<_> = self.counters.lock().iter().map(|(k, v)| (*k, *v)).collect();
        all.sort();
        all
    }
}

impl MetricsSink for InMemoryMetrics {
    fn incr_counter(&self, key: &'static str, by: u64) {
        *self.counters.lock().entry(key).or_insert(0) += by;
    }

    fn record_timer(&self, key: &'static str, elapsed: Duration) {
        let mut timers = self.timers.lock();
        let stats = timers.entry(key).or_default();
        stats.count += 1;
        stats.total += elapsed;
        stats.max = stats.max.max(elapsed);
    }
}

/// Records the time between creation and drop under `key`.
///
/// ```
/// use the_conduit::observability::metrics::{InMemoryMetrics, TimerGuard};
///
/// let metrics = InMemoryMetrics::new();
/// {
///     let _timer = TimerGuard::start(&metrics, "work_duration");
/// }
/// assert_eq!(metrics.timer("work_duration").count, 1);
/// ```
pub struct TimerGuard<'a> {
    sink: &'a dyn MetricsSink,
    key: &'static str,
    started: Instant,
}

impl<'a> TimerGuard<'a> {
    pub fn start(sink: &'a dyn MetricsSink, key: &'static str) -> Self {
        Self {
            sink,
            key,
            started: Instant::now(),
        }
    }
}

impl Drop for TimerGuard<'_> {
    fn drop(&mut self) {
        self.sink.record_timer(self.key, self.started.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = InMemoryMetrics::new();
        metrics.incr_counter("a", 2);
        metrics.incr_counter("a", 3);
        metrics.incr_counter("b", 1);

        assert_eq!(metrics.counter("a"), 5);
        assert_eq!(metrics.counter("missing"), 0);
        assert_eq!(metrics.counters(), vec![("a", 5), ("b", 1)]);
    }

    #[test]
    fn test_timer_stats() {
        let metrics = InMemoryMetrics::new();
        metrics.record_timer("t", Duration::from_millis(5));
        metrics.record_timer("t", Duration::from_millis(15));

        let stats = metrics.timer("t");
        assert_eq!(stats.count, 2);
        assert_eq!(stats.total, Duration::from_millis(20));
        assert_eq!(stats.max, Duration::from_millis(15));
    }
}
