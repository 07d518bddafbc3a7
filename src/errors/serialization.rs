// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Failures raised by a serializer strategy for a single item.
#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised by custom strategies that are not JSON based.
    #[error("{0}")]
    Custom(String),
}
