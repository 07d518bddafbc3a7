// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod queue;
mod serialization;
mod transport;

pub use config::ConfigError;
pub use queue::QueueError;
pub use serialization::SerializationError;
pub use transport::TransportError;
