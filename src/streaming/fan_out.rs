// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Fan-out by broadcast: every consumer sees the full sequence.
//!
//! There is no partitioning or round-robin here. For load balancing, clone an
//! [`ItemStream`] instead: each item then goes to exactly one consumer.

use super::{stream, Done, ItemSink, ItemStream, STAGE_CAPACITY};

/// Broadcast every item of `input` to every sink in `outs`.
///
/// Each item is offered to the outputs in order and the stage blocks until all
/// of them accepted it or `done` fires. Outputs whose consumer has gone away
/// are dropped from the rotation. All sinks are released together when
/// `input` closes or `done` fires, so no output closes before another.
pub fn demultiplex<T>(done: &Done, input: ItemStream<T>, outs: Vec<ItemSink<T>>)
where
    T: Clone + Send + 'static,
{
    let done = done.clone();

    tokio::spawn(async move {
        let mut outs = outs;

        'items: loop {
            let item = tokio::select! {
                biased;
                _ = done.wait() => break,
                item = input.recv_async() => match item {
                    Ok(item) => item,
                    Err(_) => break,
                },
            };

            let mut live = Vec::with_capacity(outs.len());
            for out in outs.drain(..) {
                tokio::select! {
                    biased;
                    _ = done.wait() => break 'items,
                    sent = out.send_async(item.clone()) => {
                        if sent.is_ok() {
                            live.push(out);
                        }
                    }
                }
            }
            outs = live;

            if outs.is_empty() {
                break;
            }
        }
    });
}

/// Broadcast `input` to `n` freshly created streams.
pub fn fan_out<T>(input: ItemStream<T>, n: usize) -> Vec<ItemStream<T>>
where
    T: Clone + Send + 'static,
{
    let (sinks, streams): (Vec<_>, Vec<_>) = (0..n).map(|_| stream(STAGE_CAPACITY)).unzip();
    demultiplex(&Done::never(), input, sinks);
    streams
}
