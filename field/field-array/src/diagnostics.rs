//! Structured diagnostics for recoverable query conditions.
//!
//! Recoverable conditions (broadcast shims, missing sources) do not abort a
//! query. Each one is recorded as a [`Notice`] on the returned
//! [`FieldSamples`] and mirrored to `tracing`, so tests can assert on the
//! diagnostic as well as the value.

use std::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A non-fatal condition encountered while aggregating a field batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    /// A single angle was replicated across a larger position batch.
    AngleBroadcast {
        /// Number of angles supplied.
        provided: usize,
        /// Number of positions in the batch.
        expected: usize,
    },
    /// A single axis was replicated across a larger position batch.
    AxisBroadcast {
        /// Number of axes supplied.
        provided: usize,
        /// Number of positions in the batch.
        expected: usize,
    },
    /// No field sources were supplied; a zero field was returned.
    NoSources,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AngleBroadcast { provided, expected } => write!(
                f,
                "angle batch has {provided} entries for {expected} positions; repeating the first"
            ),
            Self::AxisBroadcast { provided, expected } => write!(
                f,
                "axis batch has {provided} entries for {expected} positions; repeating the first"
            ),
            Self::NoSources => write!(f, "no field sources supplied; returning a zero field"),
        }
    }
}

/// An aggregated field batch together with the notices raised computing it.
///
/// `values` is index-aligned with the query positions that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSamples {
    /// One field vector per query position, in the sensors' local frames.
    pub values: Vec<Vector3<f64>>,
    /// Non-fatal conditions encountered during aggregation.
    pub notices: Vec<Notice>,
}

impl FieldSamples {
    /// Arithmetic mean of the sampled field vectors.
    ///
    /// Returns zero for an empty batch (aggregation never produces one).
    #[must_use]
    pub fn mean(&self) -> Vector3<f64> {
        if self.values.is_empty() {
            return Vector3::zeros();
        }
        #[allow(clippy::cast_precision_loss)]
        let count = self.values.len() as f64;
        self.values.iter().sum::<Vector3<f64>>() / count
    }

    /// Whether the batch was computed without notices.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.notices.is_empty()
    }
}
