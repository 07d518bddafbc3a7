// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Terminal helpers that drain a stream.

use super::ItemStream;
use std::fmt::Display;

/// Drain and discard every item.
pub async fn consume<T>(input: ItemStream<T>) {
    while input.recv_async().await.is_ok() {}
}

/// Drain every item into a vector, in arrival order.
pub async fn gather<T>(input: ItemStream<T>) -> Vec<T> {
    let mut items = Vec::new();
    while let Ok(item) = input.recv_async().await {
        items.push(item);
    }
    items
}

/// Return the first error seen, or `None` if the stream closed without one.
pub async fn first_error<E>(errors: ItemStream<E>) -> Option<E> {
    errors.recv_async().await.ok()
}

/// Log every error on a background task until the stream closes.
pub fn log_errors<E>(errors: ItemStream<E>, source: &'static str) -> tokio::task::JoinHandle<usize>
where
    E: Display + Send + 'static,
{
    tokio::spawn(async move {
        let mut count = 0;
        while let Ok(error) = errors.recv_async().await {
            count += 1;
            tracing::warn!(source, error = %error, "pipeline error");
        }
        count
    })
}
