// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // queue transports
pub mod config;     // YAML config + validation
pub mod errors;     // error handling
pub mod observability;
pub mod queue;      // queue client
pub mod streaming;  // pipeline stages
pub mod traits;     // unified abstractions
