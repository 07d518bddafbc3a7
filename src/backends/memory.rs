// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::TransportError;
use crate::queue::RawMessage;
use crate::traits::{BatchReport, Transport};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
struct QueueState {
    next_id: u64,
    ready: VecDeque<RawMessage>,
    /// Delivered but not yet deleted, keyed by receipt.
    in_flight: HashMap<String, RawMessage>,
}

impl QueueState {
    fn push(&mut self, body: String) -> String {
        self.next_id += 1;
        let id = format!("msg-{}", self.next_id);
        self.ready.push_back(RawMessage {
            id: id.clone(),
            body,
            receipt: String::new(),
            receive_count: 0,
        });
        id
    }
}

/// An in-process queue with the delivery semantics of a hosted one.
///
/// Received messages move to an in-flight set until deleted by receipt.
/// Failures can be injected per call for testing retry paths.
#[derive(Debug, Default)]
pub struct InMemoryQueue {
    state: Mutex<QueueState>,
    failing_sends: AtomicUsize,
    failing_receives: AtomicUsize,
    rejected_entries: AtomicUsize,
    receive_calls: AtomicUsize,
    send_calls: AtomicUsize,
    send_batch_calls: AtomicUsize,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a message straight onto the queue, returning its id.
    pub fn enqueue(&self, body: impl Into<String>) -> String {
        self.state.lock().push(body.into())
    }

    /// Messages waiting to be received.
    pub fn len(&self) -> usize {
        self.state.lock().ready.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Messages received but not deleted.
    pub fn in_flight(&self) -> usize {
        self.state.lock().in_flight.len()
    }

    /// Bodies waiting to be received, in queue order.
    pub fn bodies(&self) -> Vec<String> {
        self.state.lock().ready.iter().map(|m| m.body.clone()).collect()
    }

    /// Fail the next `n` send and batch-send requests as a whole.
    pub fn fail_next_sends(&self, n: usize) {
        self.failing_sends.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` receive requests.
    pub fn fail_next_receives(&self, n: usize) {
        self.failing_receives.store(n, Ordering::SeqCst);
    }

    /// Reject the next `n` individual batch entries while accepting the rest.
    pub fn reject_next_entries(&self, n: usize) {
        self.rejected_entries.store(n, Ordering::SeqCst);
    }

    pub fn receive_calls(&self) -> usize {
        self.receive_calls.load(Ordering::SeqCst)
    }

    pub fn send_calls(&self) -> usize {
        self.send_calls.load(Ordering::SeqCst)
    }

    pub fn send_batch_calls(&self) -> usize {
        self.send_batch_calls.load(Ordering::SeqCst)
    }
}

/// Consume one unit of an injected fault, if any are left.
fn take_fault(remaining: &AtomicUsize) -> bool {
    remaining
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[async_trait]
impl Transport for InMemoryQueue {
    async fn receive(&self, max_messages: usize) -> Result<Vec<RawMessage>, TransportError> {
        self.receive_calls.fetch_add(1, Ordering::SeqCst);
        if take_fault(&self.failing_receives) {
            return Err(TransportError::Unavailable("injected receive failure".to_string()));
        }

        let mut state = self.state.lock();
        let take = max_messages.min(state.ready.len());
        let drained: Vec<RawMessage> = state.ready.drain(..take).collect();
        let mut delivered = Vec::with_capacity(take);
        for mut message in drained {
            message.receive_count += 1;
            message.receipt = format!("{}-{}", message.id, message.receive_count);
            state.in_flight.insert(message.receipt.clone(), message.clone());
            delivered.push(message);
        }
        Ok(delivered)
    }

    async fn send(&self, body: String) -> Result<(), TransportError> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        if take_fault(&self.failing_sends) {
            return Err(TransportError::Throttled);
        }
        self.state.lock().push(body);
        Ok(())
    }

    async fn send_batch(&self, bodies: &[String]) -> Result<BatchReport, TransportError> {
        self.send_batch_calls.fetch_add(1, Ordering::SeqCst);
        if take_fault(&self.failing_sends) {
            return Err(TransportError::Throttled);
        }

        let mut report = BatchReport::all_ok();
        let mut state = self.state.lock();
        for (index, body) in bodies.iter().enumerate() {
            if take_fault(&self.rejected_entries) {
                report.failed.push(index);
            } else {
                state.push(body.clone());
            }
        }
        Ok(report)
    }

    async fn delete(&self, message: &RawMessage) -> Result<(), TransportError> {
        match self.state.lock().in_flight.remove(&message.receipt) {
            Some(_) => Ok(()),
            None => Err(TransportError::UnknownReceipt(message.receipt.clone())),
        }
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_receive_moves_messages_in_flight() {
        let queue = InMemoryQueue::new();
        for body in ["a", "b", "c"] {
            queue.enqueue(body);
        }

        let first = queue.receive(2).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].body, "a");
        assert_eq!(first[0].receipt, "msg-1-1");
        assert_eq!(first[0].receive_count, 1);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.in_flight(), 2);

        queue.delete(&first[0]).await.unwrap();
        assert_eq!(queue.in_flight(), 1);
        assert!(matches!(
            queue.delete(&first[0]).await,
            Err(TransportError::UnknownReceipt(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_queue_receives_nothing() {
        let queue = InMemoryQueue::new();
        assert!(queue.receive(10).await.unwrap().is_empty());
        assert_eq!(queue.receive_calls(), 1);
    }

    #[tokio::test]
    async fn test_injected_faults_are_consumed() {
        let queue = InMemoryQueue::new();
        queue.fail_next_sends(1);
        queue.fail_next_receives(1);

        assert_eq!(queue.send("x".to_string()).await, Err(TransportError::Throttled));
        assert!(queue.send("y".to_string()).await.is_ok());
        assert!(queue.receive(1).await.is_err());
        assert_eq!(queue.receive(1).await.unwrap()[0].body, "y");
    }

    #[tokio::test]
    async fn test_batch_rejects_individual_entries() {
        let queue = InMemoryQueue::new();
        queue.reject_next_entries(2);

        let bodies: Vec<String> = vec!["1".into(), "2".into(), "3".into()];
        let report = queue.send_batch(&bodies).await.unwrap();

        assert_eq!(report.failed, vec![0, 1]);
        assert_eq!(queue.bodies(), vec!["3"]);
    }
}
