//! Error types for field-source operations.

use thiserror::Error;

/// Result type for field-source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors that can occur while building or querying a tabulated source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Underlying I/O failure while reading a table file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A table row could not be parsed.
    #[error("line {line}: {reason}")]
    ParseRow {
        /// 1-based line number in the input file.
        line: usize,
        /// Why the row was rejected.
        reason: String,
    },

    /// The table does not describe a usable rectilinear sample grid.
    #[error("malformed field table: {0}")]
    MalformedTable(String),

    /// The table holds no rows.
    #[error("field table is empty")]
    EmptyTable,

    /// A query point fell outside the interpolation domain under
    /// [`BoundsPolicy::Error`](crate::BoundsPolicy::Error).
    #[error("query point ({x}, {y}, {z}) is outside the interpolation domain")]
    OutOfBounds {
        /// X coordinate of the offending query point.
        x: f64,
        /// Y coordinate of the offending query point.
        y: f64,
        /// Z coordinate of the offending query point.
        z: f64,
    },
}

impl SourceError {
    /// Creates a row parse error.
    #[must_use]
    pub fn parse_row(line: usize, reason: impl Into<String>) -> Self {
        Self::ParseRow {
            line,
            reason: reason.into(),
        }
    }

    /// Creates a malformed-table error.
    #[must_use]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedTable(reason.into())
    }
}
