// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-item mapping stages and finite sources.

use super::{report, send_or_done, stream, Done, ErrorStream, ItemStream, ERROR_CAPACITY, STAGE_CAPACITY};
use crate::errors::ConfigError;

/// Map each item through a fallible function, silently dropping failures.
///
/// Wrap `f` (or use [`try_morph`]) when failures need to be visible.
pub fn morph<T, U, E, F>(done: &Done, input: ItemStream<T>, f: F) -> ItemStream<U>
where
    T: Send + 'static,
    U: Send + 'static,
    E: Send + 'static,
    F: Fn(T) -> Result<U, E> + Send + 'static,
{
    let (out, mapped) = stream(STAGE_CAPACITY);
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

            let Ok(value) = f(item) else {
                continue;
            };
            if !send_or_done(&done, &out, value).await {
                break;
            }
        }
    });

    mapped
}

/// Map each item through a fallible function, publishing failures.
///
/// A failing item produces no output; its error goes to the returned error
/// stream once. Both streams close when `input` is exhausted or `done` fires.
pub fn try_morph<T, U, E, F>(done: &Done, input: ItemStream<T>, f: F) -> (ItemStream<U>, ErrorStream<E>)
where
    T: Send + 'static,
    U: Send + 'static,
    E: Send + 'static,
    F: Fn(T) -> Result<U, E> + Send + 'static,
{
    let (out, mapped) = stream(STAGE_CAPACITY);
    let (errors_out, errors) = stream(ERROR_CAPACITY);
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

            let delivered = match f(item) {
                Ok(value) => send_or_done(&done, &out, value).await,
                Err(error) => report(&done, &errors_out, error).await,
            };
            if !delivered {
                break;
            }
        }
    });

    (mapped, errors)
}

/// Map each item to a new value of the same type.
pub fn apply<T, F>(done: &Done, input: ItemStream<T>, f: F) -> ItemStream<T>
where
    T: Send + 'static,
    F: Fn(T) -> T + Send + 'static,
{
    morph(done, input, move |item| Ok::<T, std::convert::Infallible>(f(item)))
}

/// Replay a finite sequence, stopping early if `done` fires.
pub fn generate<T, I>(done: &Done, items: I) -> ItemStream<T>
where
    T: Send + 'static,
    I: IntoIterator<Item = T>,
    I::IntoIter: Send + 'static,
{
    let (out, generated) = stream(STAGE_CAPACITY);
    let done = done.clone();
    let items = items.into_iter();

    tokio::spawn(async move {
        for item in items {
            if !send_or_done(&done, &out, item).await {
                break;
            }
        }
    });

    generated
}

/// Cycle through `items` until `done` fires or the consumer goes away.
pub fn repeat<T>(done: &Done, items: Vec<T>) -> Result<ItemStream<T>, ConfigError>
where
    T: Clone + Send + 'static,
{
    if items.is_empty() {
        return Err(ConfigError::EmptySequence);
    }

    let (out, repeated) = stream(STAGE_CAPACITY);
    let done = done.clone();

    tokio::spawn(async move {
        let mut index = 0;
        loop {
            let item = items[index].clone();
            if !send_or_done(&done, &out, item).await {
                break;
            }
            index = (index + 1) % items.len();
        }
    });

    Ok(repeated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streaming::gather;
    use std::time::Duration;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_generate_replays_everything() {
        let items = generate(&Done::never(), vec![1, 2, 3, 4, 5]);
        assert_eq!(timeout(WAIT, gather(items)).await.unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_generate_stops_on_done() {
        let done = Done::new();
        let items = generate(&done, 0..10_000);

        items.recv_async().await.unwrap();
        done.set();

        let rest = timeout(WAIT, gather(items)).await.unwrap();
        assert!(rest.len() <= 2, "kept emitting after done: {}", rest.len());
    }

    #[tokio::test]
    async fn test_identity_morph_round_trip() {
        let done = Done::never();
        let letters = generate(&done, vec!["a", "b", "c"]);
        let same = morph(&done, letters, Ok::<_, String>);

        assert_eq!(timeout(WAIT, gather(same)).await.unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_morph_drops_failures() {
        let done = Done::never();
        let raw = generate(&done, vec!["1", "two", "3"]);
        let parsed = morph(&done, raw, |s: &str| s.parse::<u32>());

        assert_eq!(timeout(WAIT, gather(parsed)).await.unwrap(), vec![1, 3]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_try_morph_reports_each_failure_once() {
        let done = Done::never();
        let raw = generate(&done, vec!["1", "two", "3", "four"]);
        let (parsed, errors) = try_morph(&done, raw, |s: &str| s.parse::<u32>().map_err(|_| s.to_string()));

        let (values, failures) = timeout(WAIT, async { tokio::join!(gather(parsed), gather(errors)) })
            .await
            .unwrap();

        assert_eq!(values, vec![1, 3]);
        assert_eq!(failures, vec!["two".to_string(), "four".to_string()]);
    }

    #[tokio::test]
    async fn test_try_morph_ignores_missing_error_consumer() {
        let done = Done::never();
        let raw = generate(&done, vec!["x", "1", "y", "2"]);
        let (parsed, errors) = try_morph(&done, raw, |s: &str| s.parse::<u32>());
        drop(errors);

        assert_eq!(timeout(WAIT, gather(parsed)).await.unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_apply_maps_in_order() {
        let done = Done::never();
        let squares = apply(&done, generate(&done, 1..=5), |i| i * i);

        assert_eq!(timeout(WAIT, gather(squares)).await.unwrap(), vec![1, 4, 9, 16, 25]);
    }

    #[tokio::test]
    async fn test_apply_closes_on_done() {
        let done = Done::new();
        let (_held, never_closes) = stream::<u32>(1);
        let mapped = apply(&done, never_closes, |i| i + 1);

        done.set();
        assert!(timeout(WAIT, mapped.recv_async()).await.unwrap().is_err());
    }

    #[tokio::test]
    async fn test_repeat_cycles_until_done() {
        let done = Done::new();
        let cycled = repeat(&done, vec![1, 2, 3]).unwrap();

        let mut seen = Vec::new();
        for _ in 0..7 {
            seen.push(cycled.recv_async().await.unwrap());
        }
        done.set();

        assert_eq!(seen, vec![1, 2, 3, 1, 2, 3, 1]);
        assert!(timeout(WAIT, gather(cycled)).await.is_ok());
    }

    #[tokio::test]
    async fn test_repeat_accepts_items_that_are_not_sync() {
        use std::cell::Cell;

        let done = Done::new();
        let cycled = repeat(&done, vec![Cell::new(4u32), Cell::new(5)]).unwrap();

        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(cycled.recv_async().await.unwrap().get());
        }
        done.set();

        assert_eq!(seen, vec![4, 5, 4]);
    }

    #[tokio::test]
    async fn test_repeat_rejects_empty_sequence() {
        assert!(matches!(repeat::<u8>(&Done::never(), vec![]), Err(ConfigError::EmptySequence)));
    }
}
