// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod metrics;
pub mod serializer;
pub mod transport;

pub use metrics::MetricsSink;
pub use serializer::Serializer;
pub use transport::{BatchReport, Transport};
