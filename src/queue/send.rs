// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::serializer::serialize_stage;
use super::{
    require_workers, sleep_or_done, QueueClient, SEND_BATCH_COUNT, SEND_BATCH_DURATION,
    SEND_BATCH_ERROR, SEND_COUNT, SEND_DURATION, SEND_ERROR,
};
use crate::errors::{ConfigError, QueueError, TransportError};
use crate::observability::messages::queue::{
    BackoffReset, BatchRequeued, SendRetrying, SendingStarted, WorkerStopped,
};
use crate::observability::messages::StructuredLog;
use crate::observability::metrics::TimerGuard;
use crate::streaming::{
    batch, merge_buffer, merge_done, report, stream, Backoff, Batch, ErrorStream, ItemStream,
    ERROR_CAPACITY,
};
use crate::traits::BatchReport;

impl<T> QueueClient<T>
where
    T: Send + 'static,
{
    /// Send every item of `input` one message at a time.
    ///
    /// The returned error stream closes once `input` is drained and every
    /// worker has finished, or when `Done` fires.
    pub fn start_sending(
        &self,
        worker_count: usize,
        input: ItemStream<T>,
    ) -> Result<ErrorStream<QueueError>, ConfigError> {
        require_workers(worker_count)?;
        SendingStarted {
            transport: self.transport.name(),
            workers: worker_count,
            batched: false,
        }
        .log();

        let (bodies, mut errors) = self.encode(worker_count, input);
        for worker in 0..worker_count {
            errors.push(self.send_loop(worker, bodies.clone()));
        }

        Ok(merge_done(&self.done, errors))
    }

    /// Send every item of `input` in batches, requeueing failed entries.
    ///
    /// Each worker owns a primary batcher over the shared body stream and a
    /// retry batcher fed with the entries it failed to deliver. Retries are
    /// unbounded; only `Done` abandons them.
    pub fn start_batch_sending(
        &self,
        worker_count: usize,
        input: ItemStream<T>,
    ) -> Result<ErrorStream<QueueError>, ConfigError> {
        require_workers(worker_count)?;
        SendingStarted {
            transport: self.transport.name(),
            workers: worker_count,
            batched: true,
        }
        .log();

        let (bodies, mut errors) = self.encode(worker_count, input);
        for worker in 0..worker_count {
            errors.push(self.batch_send_loop(worker, bodies.clone()));
        }

        Ok(merge_done(&self.done, errors))
    }

    /// Serialize `input` on `worker_count` stages into one buffered body stream.
    fn encode(
        &self,
        worker_count: usize,
        input: ItemStream<T>,
    ) -> (ItemStream<String>, Vec<ErrorStream<QueueError>>) {
        let mut encoded = Vec::with_capacity(worker_count);
        let mut errors = Vec::with_capacity(worker_count * 2);
        for _ in 0..worker_count {
            let (bodies, encode_errors) =
                serialize_stage(&self.done, input.clone(), self.serializer.clone());
            encoded.push(bodies);
            errors.push(encode_errors);
        }
        (merge_buffer(self.options.buffer_size, encoded), errors)
    }

    fn send_loop(&self, worker: usize, bodies: ItemStream<String>) -> ErrorStream<QueueError> {
        let (errors_out, errors) = stream(ERROR_CAPACITY);
        let client = self.clone();

        tokio::spawn(async move {
            let done = client.done.clone();
            let mut backoff = Backoff::new(client.options.send_backoff);

            'bodies: loop {
                let body = tokio::select! {
                    biased;
                    _ = done.wait() => break,
                    body = bodies.recv_async() => match body {
                        Ok(body) => body,
                        Err(_) => break,
                    },
                };

                loop {
                    match client.send(body.clone()).await {
                        Ok(()) => {
                            if backoff.failures() > 0 {
                                BackoffReset {
                                    worker,
                                    failures: backoff.failures(),
                                }
                                .log();
                                backoff.reset();
                            }
                            break;
                        }
                        Err(source) => {
                            let wait = backoff.record_failure();
                            SendRetrying {
                                worker,
                                attempt: backoff.failures(),
                                wait,
                                error: &source,
                            }
                            .log();
                            let error = QueueError::Send { worker, source };
                            if !report(&done, &errors_out, error).await {
                                break 'bodies;
                            }
                            if !sleep_or_done(&done, wait).await {
                                break 'bodies;
                            }
                        }
                    }
                }
            }

            WorkerStopped {
                role: "send",
                worker,
                cancelled: done.is_set(),
            }
            .log();
        });

        errors
    }

    fn batch_send_loop(&self, worker: usize, bodies: ItemStream<String>) -> ErrorStream<QueueError> {
        let (errors_out, errors) = stream(ERROR_CAPACITY);
        let client = self.clone();

        tokio::spawn(async move {
            let done = client.done.clone();
            let fresh = batch(&done, bodies, client.batch);
            let (requeue, retry_bodies) = flume::unbounded::<String>();
            let retries = batch(&done, retry_bodies, client.batch);

            let mut backoff = Backoff::new(client.options.send_backoff);
            // Entries handed to the retry batcher and not yet received back.
            let mut pending = 0usize;
            let mut input_open = true;

            loop {
                if !input_open && pending == 0 {
                    break;
                }

                let (entries, is_retry) = tokio::select! {
                    biased;
                    _ = done.wait() => break,
                    retry = retries.recv_async(), if pending > 0 => match retry {
                        Ok(entries) => (entries, true),
                        Err(_) => break,
                    },
                    next = fresh.recv_async(), if input_open => match next {
                        Ok(entries) => (entries, false),
                        Err(_) => {
                            input_open = false;
                            continue;
                        }
                    },
                };
                if is_retry {
                    pending = pending.saturating_sub(entries.len());
                }

                let total = entries.len();
                let (failed, error) = match client.send_batch(&entries).await {
                    Ok(failed) => {
                        if failed.is_empty() {
                            if backoff.failures() > 0 {
                                BackoffReset {
                                    worker,
                                    failures: backoff.failures(),
                                }
                                .log();
                                backoff.reset();
                            }
                            continue;
                        }
                        let error = QueueError::PartialBatch {
                            worker,
                            failed: failed.len(),
                            total,
                        };
                        (failed, error)
                    }
                    Err(source) => (
                        entries,
                        QueueError::BatchSend {
                            worker,
                            size: total,
                            source,
                        },
                    ),
                };

                let count = failed.len();
                for body in failed {
                    if requeue.send(body).is_ok() {
                        pending += 1;
                    }
                }

                let wait = is_retry.then(|| backoff.record_failure());
                BatchRequeued {
                    worker,
                    count,
                    wait,
                    error: &error,
                }
                .log();

                if !report(&done, &errors_out, error).await {
                    break;
                }
                if let Some(wait) = wait {
                    if !sleep_or_done(&done, wait).await {
                        break;
                    }
                }
            }

            WorkerStopped {
                role: "batch-send",
                worker,
                cancelled: done.is_set(),
            }
            .log();
        });

        errors
    }

    async fn send(&self, body: String) -> Result<(), TransportError> {
        let _timer = TimerGuard::start(self.metrics.as_ref(), SEND_DURATION);
        let sent = self.transport.send(body).await;
        match &sent {
            Ok(()) => self.metrics.incr_counter(SEND_COUNT, 1),
            Err(_) => self.metrics.incr_counter(SEND_ERROR, 1),
        }
        sent
    }

    /// Send one batch, returning the entries the transport rejected.
    async fn send_batch(&self, bodies: &Batch<String>) -> Result<Vec<String>, TransportError> {
        let _timer = TimerGuard::start(self.metrics.as_ref(), SEND_BATCH_DURATION);
        let outcome = match self.transport.send_batch(bodies).await {
            Ok(outcome) => outcome,
            Err(source) => {
                self.metrics
                    .incr_counter(SEND_BATCH_ERROR, bodies.len() as u64);
                return Err(source);
            }
        };

        let rejected = rejected_entries(bodies, &outcome);
        self.metrics
            .incr_counter(SEND_BATCH_COUNT, (bodies.len() - rejected.len()) as u64);
        if !rejected.is_empty() {
            self.metrics
                .incr_counter(SEND_BATCH_ERROR, rejected.len() as u64);
        }
        Ok(rejected)
    }
}

/// The entries a transport rejected, in batch order. Unknown or repeated
/// indices are ignored.
fn rejected_entries(entries: &Batch<String>, outcome: &BatchReport) -> Vec<String> {
    if outcome.is_complete() {
        return Vec::new();
    }
    let mut indices: Vec<usize> = outcome
        .failed
        .iter()
        .copied()
        .filter(|&index| index < entries.len())
        .collect();
    indices.sort_unstable();
    indices.dedup();
    indices.into_iter().map(|index| entries[index].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_entries_ignores_bad_indices() {
        let entries: Batch<String> = vec!["a".into(), "b".into(), "c".into()];
        let outcome = BatchReport {
            failed: vec![2, 0, 2, 9],
        };
        assert_eq!(rejected_entries(&entries, &outcome), vec!["a", "c"]);
        assert!(rejected_entries(&entries, &BatchReport::all_ok()).is_empty());
    }
}
