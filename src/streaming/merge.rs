// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Fan-in: many item streams into one.
//!
//! One forwarding task runs per input. Each task owns a clone of the output
//! sink, so the output closes on its own once the last task finishes; no
//! separate closer is needed. Order is preserved per input, never across
//! inputs.

use super::{send_or_done, stream, Done, ItemStream, STAGE_CAPACITY};

/// Merge streams into one with a minimally buffered output.
pub fn merge<T>(streams: Vec<ItemStream<T>>) -> ItemStream<T>
where
    T: Send + 'static,
{
    merge_buffer(STAGE_CAPACITY, streams)
}

/// Merge streams into one whose output holds up to `capacity` items.
///
/// The output closes only after every input has closed.
pub fn merge_buffer<T>(capacity: usize, streams: Vec<ItemStream<T>>) -> ItemStream<T>
where
    T: Send + 'static,
{
    let (out, merged) = stream(capacity);

    for input in streams {
        let out = out.clone();
        tokio::spawn(async move {
            while let Ok(item) = input.recv_async().await {
                if out.send_async(item).await.is_err() {
                    break;
                }
            }
        });
    }

    merged
}

/// Merge streams into one, abandoning forwarding as soon as `done` fires.
///
/// Forwarding tasks blocked on a full output exit promptly on `done`; they do
/// not wait for their inputs to close.
pub fn merge_done<T>(done: &Done, streams: Vec<ItemStream<T>>) -> ItemStream<T>
where
    T: Send + 'static,
{
    let (out, merged) = stream(STAGE_CAPACITY);

    for input in streams {
        let out = out.clone();
        let done = done.clone();
        tokio::spawn(async move {
            loop {
                let item = tokio::select! {
                    biased;
                    _ = done.wait() => break,
                    item = input.recv_async() => match item {
                        Ok(item) => item,
                        Err(_) => break,
                    },
                };
                if !send_or_done(&done, &out, item).await {
                    break;
                }
            }
        });
    }

    merged
}

/// Merge a set of data streams and a set of error streams in one call.
///
/// Each output closes once all of its own inputs have closed.
pub fn merge_error<T, E>(
    streams: Vec<ItemStream<T>>,
    errors: Vec<ItemStream<E>>,
) -> (ItemStream<T>, ItemStream<E>)
where
    T: Send + 'static,
    E: Send + 'static,
{
    (merge(streams), merge(errors))
}
