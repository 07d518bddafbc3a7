// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Transport implementations for the queue client.
//!
//! # Available Backends
//!
//! ## Memory Backend
//! [`memory::InMemoryQueue`] keeps the queue in process:
//! - **Semantics**: ready messages, in-flight deliveries with receipts, deletes
//! - **Fault injection**: failed sends, failed receives, rejected batch entries
//! - **Use Case**: demos, tests, local development without a queue service
//!
//! ## Stub Backend (Test-Only)
//! Transports that always misbehave, for backoff and shutdown tests. Only
//! compiled into test builds.
//!
//! # Example
//! ```rust
//! use the_conduit::backends::memory::InMemoryQueue;
//! use the_conduit::traits::Transport;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let queue = InMemoryQueue::new();
//! queue.enqueue("hello");
//!
//! let received = queue.receive(10).await.unwrap();
//! assert_eq!(received[0].body, "hello");
//! assert_eq!(queue.in_flight(), 1);
//! # }
//! ```

pub mod memory;
#[cfg(test)]
pub mod stub;
