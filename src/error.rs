//! Error types for the sgg-eval library.

use thiserror::Error;

/// Result type for sgg-eval operations.
pub type Result<T> = std::result::Result<T, SggEvalError>;

/// Error types that can occur during scene-graph relation evaluation.
#[derive(Error, Debug)]
pub enum SggEvalError {
    /// Error during JSON parsing or serialization.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error during I/O operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Parallel input arrays disagree on scan count or per-scan pair/object count.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A `compute*` call was made before any `step()` in the current batch cycle.
    #[error("Processor not stepped: {0}")]
    NotStepped(String),

    /// Empty batch provided where at least one scan is required.
    #[error("Empty batch: {0}")]
    EmptyBatch(String),

    /// Invalid confidence threshold.
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Missing required column in a DataFrame.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Error from a Polars DataFrame operation.
    #[error("Polars error: {0}")]
    PolarsError(#[from] polars::error::PolarsError),

    /// A DataFrame does not satisfy the expected schema.
    #[error("Invalid DataFrame: {0}")]
    InvalidDataFrame(String),
}
