//! Discrete (tabulated) field sources.

// Exact float comparisons are intended here: lattice coordinates are
// copied table values, and an angle of exactly zero marks an unrotated
// source.
#![allow(clippy::float_cmp)]

use std::fmt;
use std::path::Path;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use field_types::rotate_vector;

use crate::FieldSource;
use crate::error::{SourceError, SourceResult};
use crate::grid::{BoundsPolicy, RegularGrid3};
use crate::table::{DownsampledPoint, FieldRecord, FieldTable};

/// Unique coordinates kept per axis in the visualization point cloud.
const DOWNSAMPLE_TARGET: usize = 5;

/// World placement of a discrete source: an offset from the data centroid
/// plus an orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourcePlacement {
    /// Displacement of the source from the table's centroid.
    pub offset: Vector3<f64>,
    /// Orientation angle in degrees.
    pub angle: f64,
    /// Orientation axis.
    pub axis: Vector3<f64>,
}

impl Default for SourcePlacement {
    fn default() -> Self {
        Self {
            offset: Vector3::zeros(),
            angle: 0.0,
            axis: Vector3::z(),
        }
    }
}

/// A field source backed by a tabulated sample grid.
///
/// The table's samples live in the source's local data frame; the source as
/// a whole is placed in the world by a position (the data centroid plus the
/// placement offset) and an (angle, axis) orientation. Queries are mapped
/// into the local frame, each field component is interpolated on its own
/// regular grid, and the resulting vectors are rotated back into the world
/// frame. Immutable after construction.
///
/// # Example
///
/// ```
/// use field_source::{DiscreteFieldSource, FieldTable, SourcePlacement, BoundsPolicy};
/// use nalgebra::Point3;
///
/// let mut rows = Vec::new();
/// for i in 0..2 {
///     for j in 0..2 {
///         for k in 0..2 {
///             let (x, y, z) = (f64::from(i), f64::from(j), f64::from(k));
///             rows.push([x, y, z, x, 0.0, 0.0]);
///         }
///     }
/// }
/// let table = FieldTable::from_rows(&rows).unwrap();
/// let source = DiscreteFieldSource::from_table(
///     &table,
///     SourcePlacement::default(),
///     BoundsPolicy::Extrapolate,
/// )
/// .unwrap();
///
/// let b = source.field_at(&Point3::new(1.0, 0.0, 0.0)).unwrap();
/// assert!((b.x - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteFieldSource {
    extent: Vector3<f64>,
    center: Point3<f64>,
    position: Point3<f64>,
    angle: f64,
    axis: Vector3<f64>,
    bx: RegularGrid3,
    by: RegularGrid3,
    bz: RegularGrid3,
    downsampled: Vec<DownsampledPoint>,
}

impl DiscreteFieldSource {
    /// Builds a source from a sample table.
    ///
    /// The table must cover a complete rectilinear grid: every combination
    /// of its unique x, y and z coordinates present exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MalformedTable`] if the samples do not form
    /// a complete rectilinear grid.
    pub fn from_table(
        table: &FieldTable,
        placement: SourcePlacement,
        policy: BoundsPolicy,
    ) -> SourceResult<Self> {
        let xs = table.unique_x();
        let ys = table.unique_y();
        let zs = table.unique_z();
        let (nx, ny, nz) = (xs.len(), ys.len(), zs.len());

        if table.len() != nx * ny * nz {
            return Err(SourceError::malformed(format!(
                "{} rows cannot fill a {nx}x{ny}x{nz} rectilinear grid",
                table.len()
            )));
        }

        // Rows are sorted by (x, y, z), so row i must sit on lattice slot i.
        let records = table.records();
        for (i, r) in records.iter().enumerate() {
            let expected = (xs[i / (ny * nz)], ys[(i / nz) % ny], zs[i % nz]);
            if (r.x, r.y, r.z) != expected {
                return Err(SourceError::malformed(format!(
                    "duplicate or missing grid point near ({}, {}, {})",
                    r.x, r.y, r.z
                )));
            }
        }

        let component = |pick: fn(&FieldRecord) -> f64| {
            RegularGrid3::new(
                xs.clone(),
                ys.clone(),
                zs.clone(),
                records.iter().map(pick).collect(),
                policy,
            )
        };

        debug!(nx, ny, nz, "fitted discrete source grids");

        Ok(Self {
            extent: table.extent(),
            center: table.center(),
            position: table.center() + placement.offset,
            angle: placement.angle,
            axis: placement.axis,
            bx: component(|r| r.bx)?,
            by: component(|r| r.by)?,
            bz: component(|r| r.bz)?,
            downsampled: table.downsample(DOWNSAMPLE_TARGET),
        })
    }

    /// Loads a table from a file and builds a source from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// samples do not form a complete rectilinear grid.
    pub fn load<P: AsRef<Path>>(
        path: P,
        placement: SourcePlacement,
        policy: BoundsPolicy,
    ) -> SourceResult<Self> {
        Self::from_table(&FieldTable::load(path)?, placement, policy)
    }

    /// Size of the raw data's bounding box.
    #[must_use]
    pub const fn extent(&self) -> Vector3<f64> {
        self.extent
    }

    /// Centroid of the raw data's bounding box (local frame).
    #[must_use]
    pub const fn center(&self) -> Point3<f64> {
        self.center
    }

    /// World-frame position of the source.
    #[must_use]
    pub const fn position(&self) -> Point3<f64> {
        self.position
    }

    /// Orientation angle in degrees.
    #[must_use]
    pub const fn angle(&self) -> f64 {
        self.angle
    }

    /// Orientation axis.
    #[must_use]
    pub const fn axis(&self) -> Vector3<f64> {
        self.axis
    }

    /// The coarse `(x, y, z, |B|)` point cloud kept for visualization.
    #[must_use]
    pub fn downsampled_points(&self) -> &[DownsampledPoint] {
        &self.downsampled
    }

    /// The field at a single world-frame point.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::OutOfBounds`] for an out-of-domain query
    /// under [`BoundsPolicy::Error`].
    pub fn field_at(&self, point: &Point3<f64>) -> SourceResult<Vector3<f64>> {
        let local = self.to_local(point);
        let b = Vector3::new(
            self.bx.value_at(&local)?,
            self.by.value_at(&local)?,
            self.bz.value_at(&local)?,
        );

        if self.angle == 0.0 {
            Ok(b)
        } else {
            Ok(rotate_vector(&b, self.angle, &self.axis))
        }
    }

    /// Maps a world-frame query point into the local, unrotated data frame.
    ///
    /// The interpolation grids only know the local frame, so a rotated
    /// source must un-rotate the query offset about its own position
    /// before looking it up.
    fn to_local(&self, point: &Point3<f64>) -> Point3<f64> {
        let offset = point - self.position;
        if self.angle == 0.0 {
            self.center + offset
        } else {
            self.center + rotate_vector(&offset, -self.angle, &self.axis)
        }
    }
}

impl FieldSource for DiscreteFieldSource {
    fn field(&self, positions: &[Point3<f64>]) -> SourceResult<Vec<Vector3<f64>>> {
        positions.iter().map(|p| self.field_at(p)).collect()
    }
}

impl fmt::Display for DiscreteFieldSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DiscreteFieldSource")?;
        writeln!(
            f,
            "  dimensions: a={:.2} b={:.2} c={:.2}",
            self.extent.x, self.extent.y, self.extent.z
        )?;
        writeln!(
            f,
            "  position: x={:.2} y={:.2} z={:.2}",
            self.position.x, self.position.y, self.position.z
        )?;
        writeln!(f, "  angle: {:.2} deg", self.angle)?;
        write!(
            f,
            "  axis: x={:.2} y={:.2} z={:.2}",
            self.axis.x, self.axis.y, self.axis.z
        )
    }
}
