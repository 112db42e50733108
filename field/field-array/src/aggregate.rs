//! Batched field aggregation.
//!
//! The one algorithm every sensor geometry funnels into: query each source
//! with the full position batch, superpose the results, and reproject each
//! summed vector into its sample's local measurement frame.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use tracing::warn;

use field_source::FieldSource;
use field_types::rotate_vector;

use crate::diagnostics::{FieldSamples, Notice};
use crate::error::{ArrayError, ArrayResult};

/// Orientation angles for a position batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AngleBatch {
    /// One angle shared by every position.
    Uniform(f64),
    /// One angle per position.
    PerSample(Vec<f64>),
}

impl From<f64> for AngleBatch {
    fn from(angle: f64) -> Self {
        Self::Uniform(angle)
    }
}

impl From<Vec<f64>> for AngleBatch {
    fn from(angles: Vec<f64>) -> Self {
        Self::PerSample(angles)
    }
}

/// Orientation axes for a position batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AxisBatch {
    /// One axis shared by every position.
    Uniform(Vector3<f64>),
    /// One axis per position.
    PerSample(Vec<Vector3<f64>>),
}

impl From<Vector3<f64>> for AxisBatch {
    fn from(axis: Vector3<f64>) -> Self {
        Self::Uniform(axis)
    }
}

impl From<Vec<Vector3<f64>>> for AxisBatch {
    fn from(axes: Vec<Vector3<f64>>) -> Self {
        Self::PerSample(axes)
    }
}

/// A flat, index-aligned batch of sample positions and orientations, as
/// gathered from a sensor geometry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SampleBatch {
    /// World-frame sample positions.
    pub positions: Vec<Point3<f64>>,
    /// Orientation angle of each sample, degrees.
    pub angles: Vec<f64>,
    /// Orientation axis of each sample.
    pub axes: Vec<Vector3<f64>>,
}

impl SampleBatch {
    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the batch holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Aggregates the field over this batch.
    ///
    /// Gathered batches are always index-aligned, so no broadcast shims
    /// apply here.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::EmptyBatch`] if the batch is empty while
    /// sources are supplied; source query failures propagate.
    pub fn aggregate(&self, sources: &[&dyn FieldSource]) -> ArrayResult<FieldSamples> {
        aggregate_resolved(sources, &self.positions, &self.angles, &self.axes, Vec::new())
    }
}

/// Aggregates one or more field sources over a batch of oriented samples.
///
/// Queries every source at all positions, sums the per-position field
/// vectors across sources, and rotates each sum by the negative of its
/// sample's (angle, axis) — reprojecting the world-frame field into the
/// sample's own measurement frame. Rotation acts on field vectors only;
/// positions are never displaced.
///
/// Broadcast shims: a [`AngleBatch::Uniform`] angle over several positions,
/// or a per-sample batch of the wrong length, is replicated (from its first
/// element) across the batch and recorded as a [`Notice`]. With no sources
/// at all, a single zero vector is returned alongside
/// [`Notice::NoSources`] — a documented placeholder, not an error.
///
/// # Errors
///
/// Returns [`ArrayError::EmptyBatch`] when sources are supplied but the
/// position batch (or a per-sample orientation batch) is empty; source
/// query failures propagate as [`ArrayError::Source`].
///
/// # Example
///
/// ```
/// use field_array::{AngleBatch, AxisBatch, aggregate_field};
/// use nalgebra::{Point3, Vector3};
///
/// let samples = aggregate_field(
///     &[],
///     &[Point3::origin()],
///     &AngleBatch::Uniform(0.0),
///     &AxisBatch::Uniform(Vector3::z()),
/// )
/// .unwrap();
///
/// // No sources: placeholder zero field plus a notice.
/// assert_eq!(samples.values, vec![Vector3::zeros()]);
/// assert!(!samples.is_clean());
/// ```
pub fn aggregate_field(
    sources: &[&dyn FieldSource],
    positions: &[Point3<f64>],
    angles: &AngleBatch,
    axes: &AxisBatch,
) -> ArrayResult<FieldSamples> {
    let mut notices = Vec::new();
    let angles = resolve_angles(angles, positions.len(), &mut notices)?;
    let axes = resolve_axes(axes, positions.len(), &mut notices)?;
    aggregate_resolved(sources, positions, &angles, &axes, notices)
}

fn aggregate_resolved(
    sources: &[&dyn FieldSource],
    positions: &[Point3<f64>],
    angles: &[f64],
    axes: &[Vector3<f64>],
    mut notices: Vec<Notice>,
) -> ArrayResult<FieldSamples> {
    if sources.is_empty() {
        let notice = Notice::NoSources;
        warn!(%notice);
        notices.push(notice);
        return Ok(FieldSamples {
            values: vec![Vector3::zeros()],
            notices,
        });
    }
    if positions.is_empty() {
        return Err(ArrayError::empty_batch("no query positions"));
    }

    let mut totals = vec![Vector3::zeros(); positions.len()];
    for source in sources {
        for (total, b) in totals.iter_mut().zip(source.field(positions)?) {
            *total += b;
        }
    }

    let values = totals
        .iter()
        .zip(angles)
        .zip(axes)
        .map(|((b, angle), axis)| rotate_vector(b, -angle, axis))
        .collect();

    Ok(FieldSamples { values, notices })
}

fn resolve_angles(
    batch: &AngleBatch,
    count: usize,
    notices: &mut Vec<Notice>,
) -> ArrayResult<Vec<f64>> {
    match batch {
        AngleBatch::Uniform(angle) => {
            if count > 1 {
                push_notice(
                    notices,
                    Notice::AngleBroadcast {
                        provided: 1,
                        expected: count,
                    },
                );
            }
            Ok(vec![*angle; count])
        }
        AngleBatch::PerSample(angles) => {
            if angles.is_empty() {
                return Err(ArrayError::empty_batch("angle batch is empty"));
            }
            if angles.len() == count {
                Ok(angles.clone())
            } else {
                push_notice(
                    notices,
                    Notice::AngleBroadcast {
                        provided: angles.len(),
                        expected: count,
                    },
                );
                Ok(vec![angles[0]; count])
            }
        }
    }
}

fn resolve_axes(
    batch: &AxisBatch,
    count: usize,
    notices: &mut Vec<Notice>,
) -> ArrayResult<Vec<Vector3<f64>>> {
    match batch {
        AxisBatch::Uniform(axis) => {
            if count > 1 {
                push_notice(
                    notices,
                    Notice::AxisBroadcast {
                        provided: 1,
                        expected: count,
                    },
                );
            }
            Ok(vec![*axis; count])
        }
        AxisBatch::PerSample(axes) => {
            if axes.is_empty() {
                return Err(ArrayError::empty_batch("axis batch is empty"));
            }
            if axes.len() == count {
                Ok(axes.clone())
            } else {
                push_notice(
                    notices,
                    Notice::AxisBroadcast {
                        provided: axes.len(),
                        expected: count,
                    },
                );
                Ok(vec![axes[0]; count])
            }
        }
    }
}

fn push_notice(notices: &mut Vec<Notice>, notice: Notice) {
    warn!(%notice);
    notices.push(notice);
}
