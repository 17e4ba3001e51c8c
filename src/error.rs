//! Error types for the map and the word-frequency client.

use thiserror::Error;

/// Errors raised by `ChainedHashMap`.
///
/// Lookup misses and removals of absent keys are not errors; the only
/// rejected input is a table with no buckets, which would make modular
/// addressing divide by zero.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    #[error("bucket capacity must be at least 1")]
    ZeroCapacity,
}

/// Errors raised while building a word-frequency table.
#[derive(Error, Debug)]
pub enum FrequencyError {
    /// Reading the text source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing map rejected its configuration.
    #[error(transparent)]
    Map(#[from] MapError),

    /// The client configuration is unusable.
    #[error("invalid configuration: {message}")]
    Configuration {
        /// What was wrong with it
        message: String,
    },
}

impl FrequencyError {
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
