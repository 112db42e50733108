//! Error types for sensor-array operations.

use thiserror::Error;

use field_source::SourceError;

/// Result type for sensor-array operations.
pub type ArrayResult<T> = Result<T, ArrayError>;

/// Errors that can occur while aggregating fields over sensor geometries.
#[derive(Debug, Error)]
pub enum ArrayError {
    /// A query ran over an empty batch (no positions, or an empty
    /// per-sample angle/axis batch).
    #[error("empty batch: {0}")]
    EmptyBatch(String),

    /// A circular array was requested with no sensors.
    #[error("circular array needs at least one sensor")]
    NoSensors,

    /// A field source failed to answer a query.
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl ArrayError {
    /// Creates an empty-batch error.
    #[must_use]
    pub fn empty_batch(reason: impl Into<String>) -> Self {
        Self::EmptyBatch(reason.into())
    }
}
