// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Composable stages for moving typed items between independently scheduled tasks.
//!
//! Every stage follows the same contract:
//!
//! ```text
//! (outputs..., errors) = stage(done, inputs...)
//! ```
//!
//! * Output and error streams are created and owned by the stage.
//! * Each output is closed exactly once, after all inputs are exhausted or
//!   `done` fires. Closing happens by dropping the producer side.
//! * A malformed single item never takes a stage down; it becomes an entry on
//!   the stage's error stream (or is dropped, for [`morph`]).
//!
//! Stages spawn their tasks with `tokio::spawn`, so they must be called from
//! inside a tokio runtime.
//!
//! # Example
//!
//! ```rust
//! use the_conduit::streaming::{self, Done};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let done = Done::new();
//! let numbers = streaming::generate(&done, vec![1, 2, 3]);
//! let squared = streaming::apply(&done, numbers, |n| n * n);
//!
//! assert_eq!(streaming::gather(squared).await, vec![1, 4, 9]);
//! # }
//! ```

pub mod backoff;
pub mod batch;
pub mod done;
pub mod fan_out;
pub mod merge;
pub mod sink;
pub mod transform;

pub use backoff::{Backoff, BackoffPolicy};
pub use batch::{batch, Batch, BatchOptions};
pub use done::{and_done, or_done, Done, DONE_FOLD_ARITY};
pub use fan_out::{demultiplex, fan_out};
pub use merge::{merge, merge_buffer, merge_done, merge_error};
pub use sink::{consume, first_error, gather, log_errors};
pub use transform::{apply, generate, morph, repeat, try_morph};

/// Consumer side of an item stream.
///
/// Cloning yields another consumer of the same stream; each item is delivered
/// to exactly one of them. Once every [`ItemSink`] is dropped and the buffer is
/// empty, `recv_async` returns `Err(RecvError::Disconnected)`: the stream is
/// exhausted.
pub type ItemStream<T> = flume::Receiver<T>;

/// Producer side of an item stream. Dropping the last clone closes the stream.
pub type ItemSink<T> = flume::Sender<T>;

/// An item stream carrying per-item failures alongside a data stream.
pub type ErrorStream<E> = flume::Receiver<E>;

/// Capacity used for stage outputs: enough to decouple neighbours by one item.
pub const STAGE_CAPACITY: usize = 1;

/// Capacity of stage error streams. A slow error consumer only throttles data
/// once this many errors are waiting.
pub const ERROR_CAPACITY: usize = 16;

/// Create a bounded item stream.
pub fn stream<T>(capacity: usize) -> (ItemSink<T>, ItemStream<T>) {
    flume::bounded(capacity)
}

/// Send `item` unless `done` fires first.
///
/// Returns `false` when the stage should stop: either `done` fired or every
/// consumer of `sink` has gone away.
pub(crate) async fn send_or_done<T>(done: &Done, sink: &ItemSink<T>, item: T) -> bool {
    tokio::select! {
        biased;
        _ = done.wait() => false,
        sent = sink.send_async(item) => sent.is_ok(),
    }
}

/// Publish a per-item error without letting a missing error consumer stall data.
///
/// A dropped error stream is ignored. Returns `false` only when `done` fired
/// while the error stream was full.
pub(crate) async fn report<E>(done: &Done, errors: &ItemSink<E>, error: E) -> bool {
    tokio::select! {
        biased;
        _ = done.wait() => false,
        _ = errors.send_async(error) => true,
    }
}
