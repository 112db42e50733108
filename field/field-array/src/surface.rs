//! Surface sensors: planar grids of virtual sample points.

use std::fmt;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use field_source::FieldSource;
use field_types::{Anchor, RigidFrame, rotate_vector};

use crate::aggregate::SampleBatch;
use crate::diagnostics::FieldSamples;
use crate::error::ArrayResult;

/// Physical extent of a surface sensor's sampling footprint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ExtentSpec {
    /// One side length shared by both local axes.
    Uniform(f64),
    /// Width and height along the local X and Y axes.
    PerAxis(f64, f64),
}

impl ExtentSpec {
    /// Resolves the spec into a `(width, height)` pair.
    #[must_use]
    pub const fn resolve(self) -> (f64, f64) {
        match self {
            Self::Uniform(side) => (side, side),
            Self::PerAxis(w, h) => (w, h),
        }
    }
}

/// Number of sample elements of a surface sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridSpec {
    /// A total element count, factored as `n1 = floor(sqrt(count))`,
    /// `n2 = floor(count / n1)`.
    ///
    /// The factorization is approximate: `n1 * n2` can fall short of
    /// `count` (e.g. `Count(7)` resolves to a 2x3 grid of 6 elements).
    Count(usize),
    /// An explicit `(n1, n2)` element grid.
    Shape(usize, usize),
}

impl GridSpec {
    /// Resolves the spec into an `(n1, n2)` pair, each at least 1.
    #[must_use]
    pub fn resolve(self) -> (usize, usize) {
        match self {
            Self::Count(count) => {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                #[allow(clippy::cast_precision_loss)]
                let n1 = ((count as f64).sqrt().floor() as usize).max(1);
                (n1, (count / n1).max(1))
            }
            Self::Shape(n1, n2) => (n1.max(1), n2.max(1)),
        }
    }
}

/// A partial update to a surface sensor; omitted fields keep their values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceUpdate {
    /// New world-frame position.
    pub position: Option<Point3<f64>>,
    /// New orientation angle, degrees.
    pub angle: Option<f64>,
    /// New orientation axis.
    pub axis: Option<Vector3<f64>>,
    /// New sampling footprint.
    pub extent: Option<ExtentSpec>,
    /// New element grid.
    pub grid: Option<GridSpec>,
}

/// A rectangular planar grid of virtual sample points reporting the mean
/// field over its footprint.
///
/// The grid itself is never stored: sample positions, angles and axes are
/// recomputed from the sensor's transform, grid shape and extent on every
/// access, so reads can never observe stale geometry.
///
/// If either grid dimension is 1 the extent collapses to zero in both
/// axes and the sensor degenerates to a single sample at its centroid.
///
/// # Example
///
/// ```
/// use field_array::{ExtentSpec, GridSpec, SurfaceSensor};
///
/// let sensor = SurfaceSensor::new(GridSpec::Shape(3, 3), ExtentSpec::Uniform(0.2));
/// assert_eq!(sensor.sample_count(), 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSensor {
    frame: RigidFrame,
    grid: (usize, usize),
    extent: (f64, f64),
}

impl Default for SurfaceSensor {
    fn default() -> Self {
        Self::new(GridSpec::Shape(3, 3), ExtentSpec::PerAxis(0.2, 0.2))
    }
}

impl SurfaceSensor {
    /// Creates a sensor at the origin with the given grid and extent.
    #[must_use]
    pub fn new(grid: GridSpec, extent: ExtentSpec) -> Self {
        Self::with_frame(grid, extent, RigidFrame::default())
    }

    /// Creates a sensor with an explicit placement.
    #[must_use]
    pub fn with_frame(grid: GridSpec, extent: ExtentSpec, frame: RigidFrame) -> Self {
        let mut sensor = Self {
            frame,
            grid: (1, 1),
            extent: (0.0, 0.0),
        };
        sensor.update(SurfaceUpdate {
            extent: Some(extent),
            grid: Some(grid),
            ..SurfaceUpdate::default()
        });
        sensor
    }

    /// Applies a partial update; omitted fields keep their current values.
    ///
    /// Position, angle and axis are written directly (no delta rotation is
    /// performed). A grid with either dimension equal to 1 collapses the
    /// stored extent to `(0, 0)`, even when only the extent changed.
    pub fn update(&mut self, update: SurfaceUpdate) {
        if let Some(position) = update.position {
            self.frame.position = position;
        }
        if let Some(angle) = update.angle {
            self.frame.angle = angle;
        }
        if let Some(axis) = update.axis {
            self.frame.axis = axis;
        }
        if let Some(extent) = update.extent {
            self.extent = extent.resolve();
        }
        if let Some(grid) = update.grid {
            self.grid = grid.resolve();
        }
        if self.grid.0 == 1 || self.grid.1 == 1 {
            self.extent = (0.0, 0.0);
        }
    }

    /// The sensor's rigid placement.
    #[must_use]
    pub const fn frame(&self) -> &RigidFrame {
        &self.frame
    }

    /// World-frame position of the sensor center.
    #[must_use]
    pub const fn position(&self) -> Point3<f64> {
        self.frame.position
    }

    /// Orientation angle in degrees.
    #[must_use]
    pub const fn angle(&self) -> f64 {
        self.frame.angle
    }

    /// Orientation axis.
    #[must_use]
    pub const fn axis(&self) -> Vector3<f64> {
        self.frame.axis
    }

    /// Element grid shape `(n1, n2)`.
    #[must_use]
    pub const fn grid(&self) -> (usize, usize) {
        self.grid
    }

    /// Sampling footprint `(width, height)`.
    #[must_use]
    pub const fn extent(&self) -> (f64, f64) {
        self.extent
    }

    /// Number of sample points.
    #[must_use]
    pub const fn sample_count(&self) -> usize {
        self.grid.0 * self.grid.1
    }

    /// Translates the sensor; orientation is unchanged.
    pub fn translate(&mut self, displacement: &Vector3<f64>) {
        self.frame.translate(displacement);
    }

    /// Rotates the sensor about the resolved anchor.
    pub fn rotate(&mut self, angle_deg: f64, axis: &Vector3<f64>, anchor: Anchor) {
        self.frame.rotate(angle_deg, axis, anchor);
    }

    /// Generates the sample grid from the sensor's current state.
    ///
    /// Points span `[-w/2, w/2] x [-h/2, h/2]` in the local XY plane
    /// (x-major order, local z = 0), rotated by the sensor's (angle, axis)
    /// about the local origin and translated to its position. Every sample
    /// carries the sensor's own orientation.
    #[must_use]
    pub fn samples(&self) -> SampleBatch {
        let (n1, n2) = self.grid;
        let (w, h) = self.extent;
        let count = n1 * n2;

        let mut positions = Vec::with_capacity(count);
        for i in 0..n1 {
            for j in 0..n2 {
                let local = Vector3::new(grid_coord(i, n1, w), grid_coord(j, n2, h), 0.0);
                let offset = rotate_vector(&local, self.frame.angle, &self.frame.axis);
                positions.push(self.frame.position + offset);
            }
        }

        SampleBatch {
            positions,
            angles: vec![self.frame.angle; count],
            axes: vec![self.frame.axis; count],
        }
    }

    /// World-frame positions of the sample points.
    #[must_use]
    pub fn sample_positions(&self) -> Vec<Point3<f64>> {
        self.samples().positions
    }

    /// The aggregated per-sample field batch.
    ///
    /// # Errors
    ///
    /// Source query failures propagate.
    pub fn field_samples(&self, sources: &[&dyn FieldSource]) -> ArrayResult<FieldSamples> {
        self.samples().aggregate(sources)
    }

    /// The arithmetic mean field over the sensor's footprint.
    ///
    /// Returns a single-value batch carrying any notices raised while
    /// aggregating the samples.
    ///
    /// # Errors
    ///
    /// Source query failures propagate.
    pub fn mean_field(&self, sources: &[&dyn FieldSource]) -> ArrayResult<FieldSamples> {
        let samples = self.field_samples(sources)?;
        Ok(FieldSamples {
            values: vec![samples.mean()],
            notices: samples.notices,
        })
    }
}

/// Coordinate of element `i` on an `n`-element axis spanning
/// `[-extent/2, extent/2]`; a single element sits at the center.
fn grid_coord(i: usize, n: usize, extent: f64) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let t = i as f64 / (n - 1) as f64;
    extent * (t - 0.5)
}

impl fmt::Display for SurfaceSensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SurfaceSensor")?;
        writeln!(f, "  elements: n1={} n2={}", self.grid.0, self.grid.1)?;
        writeln!(
            f,
            "  dimension: x={:.2} y={:.2}",
            self.extent.0, self.extent.1
        )?;
        writeln!(
            f,
            "  position: x={:.2} y={:.2} z={:.2}",
            self.frame.position.x, self.frame.position.y, self.frame.position.z
        )?;
        writeln!(f, "  angle: {:.2} deg", self.frame.angle)?;
        write!(
            f,
            "  axis: x={:.2} y={:.2} z={:.2}",
            self.frame.axis.x, self.frame.axis.y, self.frame.axis.z
        )
    }
}
