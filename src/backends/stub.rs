// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::TransportError;
use crate::queue::RawMessage;
use crate::traits::{BatchReport, Transport};
use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::time::Instant;

/// A transport whose service is down: every call fails.
///
/// Records when each receive was attempted so backoff spacing can be checked.
#[derive(Debug, Default)]
pub struct DownTransport {
    pub receives: Mutex<Vec<Instant>>,
    pub sends: Mutex<Vec<Instant>>,
}

impl DownTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send_count(&self) -> usize {
        self.sends.lock().len()
    }

    fn outage() -> TransportError {
        TransportError::Unavailable("service down".to_string())
    }
}

#[async_trait::async_trait]
impl Transport for DownTransport {
    async fn receive(&self, _max_messages: usize) -> Result<Vec<RawMessage>, TransportError> {
        self.receives.lock().push(Instant::now());
        Err(Self::outage())
    }

    async fn send(&self, _body: String) -> Result<(), TransportError> {
        self.sends.lock().push(Instant::now());
        Err(Self::outage())
    }

    async fn send_batch(&self, _bodies: &[String]) -> Result<BatchReport, TransportError> {
        self.sends.lock().push(Instant::now());
        Err(Self::outage())
    }

    async fn delete(&self, message: &RawMessage) -> Result<(), TransportError> {
        Err(TransportError::UnknownReceipt(message.receipt.clone()))
    }

    fn name(&self) -> &'static str {
        "down"
    }
}

/// A transport that fails sends according to a script, then recovers.
///
/// Each send or batch send pops the next entry of `failures`; `true` fails
/// the call, `false` or an exhausted script delivers it. Attempt times are
/// recorded.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    failures: Mutex<VecDeque<bool>>,
    pub sends: Mutex<Vec<Instant>>,
    pub delivered: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new(failures: impl IntoIterator<Item = bool>) -> Self {
        Self {
            failures: Mutex::new(failures.into_iter().collect()),
            ..Self::default()
        }
    }

    fn attempt(&self) -> Result<(), TransportError> {
        self.sends.lock().push(Instant::now());
        match self.failures.lock().pop_front() {
            Some(true) => Err(TransportError::Throttled),
            _ => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn receive(&self, _max_messages: usize) -> Result<Vec<RawMessage>, TransportError> {
        Ok(Vec::new())
    }

    async fn send(&self, body: String) -> Result<(), TransportError> {
        self.attempt()?;
        self.delivered.lock().push(body);
        Ok(())
    }

    async fn send_batch(&self, bodies: &[String]) -> Result<BatchReport, TransportError> {
        self.attempt()?;
        self.delivered.lock().extend_from_slice(bodies);
        Ok(BatchReport::all_ok())
    }

    async fn delete(&self, _message: &RawMessage) -> Result<(), TransportError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Accepts every batch entry but reports indices that do not exist.
#[derive(Debug, Default)]
pub struct MisreportingTransport {
    pub delivered: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl Transport for MisreportingTransport {
    async fn receive(&self, _max_messages: usize) -> Result<Vec<RawMessage>, TransportError> {
        Ok(Vec::new())
    }

    async fn send(&self, body: String) -> Result<(), TransportError> {
        self.delivered.lock().push(body);
        Ok(())
    }

    async fn send_batch(&self, bodies: &[String]) -> Result<BatchReport, TransportError> {
        self.delivered.lock().extend_from_slice(bodies);
        Ok(BatchReport {
            failed: vec![bodies.len() + 6, bodies.len() + 6],
        })
    }

    async fn delete(&self, _message: &RawMessage) -> Result<(), TransportError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "misreporting"
    }
}
