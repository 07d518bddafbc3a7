// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Construction-time configuration errors.
//!
//! Everything in this enum is raised before a stage or client starts running.
//! Nothing here is ever produced at runtime on an error stream.

use thiserror::Error;

/// Errors raised while building stages, signals, or queue clients.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A batcher was asked for batches of zero items.
    #[error("batch size must be greater than zero")]
    ZeroBatchSize,

    /// A batcher was given a zero flush timeout.
    #[error("batch timeout must be greater than zero")]
    ZeroBatchTimeout,

    /// A client pipeline was started with no workers.
    #[error("worker count must be greater than zero")]
    ZeroWorkers,

    /// A config file asked for an empty worker pool.
    #[error("{pool} worker count must be greater than zero")]
    EmptyWorkerPool { pool: &'static str },

    /// A receive request for zero messages.
    #[error("receive batch size must be greater than zero")]
    ZeroReceiveSize,

    /// A composite cancellation signal was built from no constituents.
    #[error("at least one cancellation signal is required")]
    EmptySignalSet,

    /// A cycling source was given nothing to cycle.
    #[error("cannot repeat an empty sequence")]
    EmptySequence,

    /// Backoff parameters that cannot produce a sane wait sequence.
    #[error("invalid backoff policy: {reason}")]
    InvalidBackoff { reason: String },

    /// One or more problems found while validating a config file.
    #[error("configuration validation failed:\n{}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("\n"))]
    Invalid(Vec<ConfigError>),

    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid YAML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_lists_every_problem() {
        let err = ConfigError::Invalid(vec![ConfigError::ZeroBatchSize, ConfigError::ZeroWorkers]);
        let msg = err.to_string();
        assert!(msg.starts_with("configuration validation failed:"));
        assert!(msg.contains("batch size must be greater than zero"));
        assert!(msg.contains("worker count must be greater than zero"));
    }
}
