// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::serializer::deserialize_stage;
use super::{
    require_workers, sleep_or_done, Message, QueueClient, RawMessage, RECEIVE_COUNT,
    RECEIVE_DURATION, RECEIVE_ERROR,
};
use crate::errors::{ConfigError, QueueError, TransportError};
use crate::observability::messages::queue::{PollEmpty, PollingStarted, WorkerStopped};
use crate::observability::messages::StructuredLog;
use crate::observability::metrics::TimerGuard;
use crate::streaming::{
    merge_done, report, send_or_done, stream, Backoff, ErrorStream, ItemStream, ERROR_CAPACITY,
};

impl<T> QueueClient<T>
where
    T: Send + 'static,
{
    /// Start `worker_count` polling workers and return the decoded message
    /// stream with its error stream.
    ///
    /// Both streams run until the client's `Done` fires.
    pub fn start_polling(
        &self,
        worker_count: usize,
    ) -> Result<(ItemStream<Message<T>>, ErrorStream<QueueError>), ConfigError> {
        require_workers(worker_count)?;

        PollingStarted {
            transport: self.transport.name(),
            workers: worker_count,
            receive_max: self.options.receive_max,
        }
        .log();

        let mut raw_streams = Vec::with_capacity(worker_count);
        let mut errors = Vec::with_capacity(worker_count * 2);
        for worker in 0..worker_count {
            let (raw, receive_errors) = self.receive_loop(worker);
            raw_streams.push(raw);
            errors.push(receive_errors);
        }
        let raw = merge_done(&self.done, raw_streams);

        let mut decoded = Vec::with_capacity(worker_count);
        for _ in 0..worker_count {
            let (messages, decode_errors) =
                deserialize_stage(&self.done, raw.clone(), self.serializer.clone());
            decoded.push(messages);
            errors.push(decode_errors);
        }

        Ok((merge_done(&self.done, decoded), merge_done(&self.done, errors)))
    }

    /// One polling worker.
    ///
    /// A poll that returns messages resets the backoff and polls again right
    /// away. An empty or failed poll advances the backoff and waits before
    /// the next one.
    fn receive_loop(&self, worker: usize) -> (ItemStream<RawMessage>, ErrorStream<QueueError>) {
        let (out, raw) = stream(self.options.buffer_size);
        let (errors_out, errors) = stream(ERROR_CAPACITY);
        let client = self.clone();

        tokio::spawn(async move {
            let done = client.done.clone();
            let mut backoff = Backoff::new(client.options.poll_backoff);

            'polling: loop {
                if done.is_set() {
                    break;
                }

                match client.receive().await {
                    Ok(messages) if !messages.is_empty() => {
                        backoff.reset();
                        for message in messages {
                            if !send_or_done(&done, &out, message).await {
                                break 'polling;
                            }
                        }
                        continue;
                    }
                    Ok(_) => {}
                    Err(source) => {
                        let error = QueueError::Receive { worker, source };
                        if !report(&done, &errors_out, error).await {
                            break;
                        }
                    }
                }

                let wait = backoff.record_failure();
                PollEmpty { worker, wait }.log();
                if !sleep_or_done(&done, wait).await {
                    break;
                }
            }

            WorkerStopped {
                role: "receive",
                worker,
                cancelled: done.is_set(),
            }
            .log();
        });

        (raw, errors)
    }

    async fn receive(&self) -> Result<Vec<RawMessage>, TransportError> {
        let _timer = TimerGuard::start(self.metrics.as_ref(), RECEIVE_DURATION);
        let received = self.transport.receive(self.options.receive_max).await;
        match &received {
            Ok(messages) => self.metrics.incr_counter(RECEIVE_COUNT, messages.len() as u64),
            Err(_) => self.metrics.incr_counter(RECEIVE_ERROR, 1),
        }
        received
    }
}
