//! Error types for anneal-tuner
//!
//! Invalid schedules are recoverable inside a sweep (the grid point is
//! skipped). Every other variant propagates to the caller unmodified.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// anneal-tuner error types
#[derive(Error, Debug)]
pub enum Error {
    /// A schedule violates a physical invariant
    #[error("Invalid anneal schedule: {0}")]
    InvalidSchedule(String),

    /// The external solver failed or timed out
    #[error("Solver invocation failed on backend '{backend}': {message}")]
    SolverInvocation {
        /// Backend that failed
        backend: String,
        /// Failure reported by the backend
        message: String,
    },

    /// No persisted results table exists for the requested problem size
    #[error("No results table for num_nodes={num_nodes}\nRun a tuning experiment with write_results enabled first.")]
    MissingResults {
        /// Problem size that was requested
        num_nodes: u32,
    },

    /// No trial logs exist for the requested problem size
    #[error("No trial logs for num_nodes={num_nodes}\nRun chain or schedule tuning before aggregating results.")]
    MissingTrialLogs {
        /// Problem size that was requested
        num_nodes: u32,
    },

    /// Unknown mode, unknown experiment or malformed selector
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed persisted value (schedule text, chain value, column type)
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Storage error (Parquet/CSV)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether a sweep may skip the offending grid point and continue.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidSchedule(_))
    }
}
