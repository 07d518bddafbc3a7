// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! One-shot broadcast cancellation signals and their composites.
//!
//! [`Done`] wraps a [`CancellationToken`]: setting it is idempotent and wakes
//! every current and future listener.
//!
//! `tokio::select!` waits on a fixed set of branches, so composing an
//! arbitrary number of signals is done by folding: constituents are grouped
//! into chunks of [`DONE_FOLD_ARITY`], one watcher task per chunk fires an
//! intermediate signal, and the intermediate signals are folded again until a
//! single chunk feeds the composite. Depth is `O(log n)`. Every watcher also
//! listens to the composite itself, so once it fires no watcher is left
//! parked on a constituent that never fires.

use crate::errors::ConfigError;
use tokio_util::sync::CancellationToken;

/// Number of signals a single watcher task waits on when folding composites.
pub const DONE_FOLD_ARITY: usize = 3;

/// A one-shot, broadcast, idempotent "stop" notification.
#[derive(Debug, Clone, Default)]
pub struct Done {
    token: CancellationToken,
}

impl Done {
    /// Create an unset signal.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// A signal nobody holds a setter for.
    ///
    /// Handy for stages that should only stop when their input closes.
    pub fn never() -> Self {
        Self::new()
    }

    pub fn is_set(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Fire the signal. Calling this more than once has no further effect.
    pub fn set(&self) {
        self.token.cancel();
    }

    /// Suspend until the signal is set. Returns immediately if it already is.
    pub async fn wait(&self) {
        self.token.cancelled().await
    }

    /// A signal that fires with this one but can also be set on its own.
    pub fn child(&self) -> Done {
        Self {
            token: self.token.child_token(),
        }
    }
}

/// Combine signals into one that fires as soon as any constituent fires.
///
/// Must be called inside a tokio runtime when more than one signal is given.
pub fn or_done(signals: &[Done]) -> Result<Done, ConfigError> {
    match signals {
        [] => Err(ConfigError::EmptySignalSet),
        [only] => Ok(only.clone()),
        _ => {
            let composite = Done::new();
            let mut level = signals.to_vec();

            while level.len() > DONE_FOLD_ARITY {
                level = level
                    .chunks(DONE_FOLD_ARITY)
                    .map(|chunk| match chunk {
                        [single] => single.clone(),
                        _ => {
                            let node = Done::new();
                            watch_any(chunk.to_vec(), node.clone(), composite.clone());
                            node
                        }
                    })
                    .collect();
            }

            watch_any(level, composite.clone(), composite.clone());
            Ok(composite)
        }
    }
}

/// Combine signals into one that fires once every constituent has fired.
///
/// Must be called inside a tokio runtime when more than one signal is given.
pub fn and_done(signals: &[Done]) -> Result<Done, ConfigError> {
    match signals {
        [] => Err(ConfigError::EmptySignalSet),
        [only] => Ok(only.clone()),
        _ => {
            let composite = Done::new();
            let signals = signals.to_vec();
            let out = composite.clone();

            tokio::spawn(async move {
                // Set is permanent, so waiting in sequence observes all of them.
                for signal in &signals {
                    signal.wait().await;
                }
                out.set();
            });

            Ok(composite)
        }
    }
}

/// Spawn a watcher that sets `node` when any of `chunk` (at most
/// [`DONE_FOLD_ARITY`] signals) fires, or when `composite` fires.
fn watch_any(chunk: Vec<Done>, node: Done, composite: Done) {
    tokio::spawn(async move {
        match chunk.as_slice() {
            [a, b] => {
                tokio::select! {
                    _ = a.wait() => {}
                    _ = b.wait() => {}
                    _ = composite.wait() => {}
                }
            }
            [a, b, c] => {
                tokio::select! {
                    _ = a.wait() => {}
                    _ = b.wait() => {}
                    _ = c.wait() => {}
                    _ = composite.wait() => {}
                }
            }
            [a] => {
                tokio::select! {
                    _ = a.wait() => {}
                    _ = composite.wait() => {}
                }
            }
            _ => {}
        }
        node.set();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn test_set_is_idempotent() {
        let done = Done::new();
        assert!(!done.is_set());

        done.set();
        done.set();

        assert!(done.is_set());
        timeout(WAIT, done.wait()).await.unwrap();
    }

    #[tokio::test]
    async fn test_set_wakes_clones() {
        let done = Done::new();
        let listener = done.clone();

        let handle = tokio::spawn(async move { listener.wait().await });
        done.set();

        timeout(WAIT, handle).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_child_follows_parent_only() {
        let parent = Done::new();
        let child = parent.child();

        child.set();
        assert!(!parent.is_set());

        let other = parent.child();
        parent.set();
        assert!(other.is_set());
    }

    #[tokio::test]
    async fn test_or_done_rejects_empty_set() {
        assert!(matches!(or_done(&[]), Err(ConfigError::EmptySignalSet)));
        assert!(matches!(and_done(&[]), Err(ConfigError::EmptySignalSet)));
    }

    #[tokio::test]
    async fn test_or_done_single_signal_is_passthrough() {
        let done = Done::new();
        let composite = or_done(&[done.clone()]).unwrap();

        done.set();
        assert!(composite.is_set());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_or_done_fires_for_any_of_ten() {
        for firing in 0..10 {
            let signals: Vec<Done> = (0..10).map(|_| Done::new()).collect();
            let composite = or_done(&signals).unwrap();

            let listeners: Vec<_> = (0..4)
                .map(|_| {
                    let c = composite.clone();
                    tokio::spawn(async move { c.wait().await })
                })
                .collect();

            assert!(!composite.is_set());
            signals[firing].set();

            for listener in listeners {
                timeout(WAIT, listener).await.unwrap().unwrap();
            }
            assert!(composite.is_set());
        }
    }

    #[tokio::test]
    async fn test_or_done_two_and_three() {
        let pair = [Done::new(), Done::new()];
        let composite = or_done(&pair).unwrap();
        pair[1].set();
        timeout(WAIT, composite.wait()).await.unwrap();

        let triple = [Done::new(), Done::new(), Done::new()];
        let composite = or_done(&triple).unwrap();
        triple[0].set();
        timeout(WAIT, composite.wait()).await.unwrap();
    }

    #[tokio::test]
    async fn test_or_done_stays_unset_until_a_constituent_fires() {
        let signals: Vec<Done> = (0..7).map(|_| Done::new()).collect();
        let composite = or_done(&signals).unwrap();

        let waited = timeout(Duration::from_millis(50), composite.wait()).await;
        assert!(waited.is_err());
        assert!(!composite.is_set());
    }

    #[tokio::test]
    async fn test_and_done_needs_every_signal() {
        let signals: Vec<Done> = (0..5).map(|_| Done::new()).collect();
        let composite = and_done(&signals).unwrap();

        for signal in &signals[..4] {
            signal.set();
        }
        let waited = timeout(Duration::from_millis(50), composite.wait()).await;
        assert!(waited.is_err());

        signals[4].set();
        timeout(WAIT, composite.wait()).await.unwrap();
    }
}
