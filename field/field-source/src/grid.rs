//! Regular-grid trilinear interpolation.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::error::{SourceError, SourceResult};

/// What a grid interpolator does with queries outside its domain.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum BoundsPolicy {
    /// Fail the query with [`SourceError::OutOfBounds`].
    Error,
    /// Return the supplied constant for any out-of-domain query.
    Fill(f64),
    /// Extend the interpolant linearly from the nearest edge cell.
    #[default]
    Extrapolate,
}

/// A scalar field sampled on a 3-D rectilinear grid, queried by trilinear
/// interpolation.
///
/// Axes must be strictly increasing but need not be uniformly spaced.
/// Values are stored x-major: `values[(ix * ny + iy) * nz + iz]`. An axis
/// with a single coordinate is degenerate; the interpolant is constant
/// along it.
///
/// # Example
///
/// ```
/// use field_source::{BoundsPolicy, RegularGrid3};
/// use nalgebra::Point3;
///
/// // f(x, y, z) = x on a 2x2x2 unit cell.
/// let grid = RegularGrid3::new(
///     vec![0.0, 1.0],
///     vec![0.0, 1.0],
///     vec![0.0, 1.0],
///     vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0],
///     BoundsPolicy::Extrapolate,
/// )
/// .unwrap();
///
/// let v = grid.value_at(&Point3::new(0.25, 0.5, 0.5)).unwrap();
/// assert!((v - 0.25).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegularGrid3 {
    xs: Vec<f64>,
    ys: Vec<f64>,
    zs: Vec<f64>,
    values: Vec<f64>,
    policy: BoundsPolicy,
}

impl RegularGrid3 {
    /// Creates an interpolator over the given axes and x-major values.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MalformedTable`] if an axis is empty or not
    /// strictly increasing, or if `values.len()` does not equal
    /// `xs.len() * ys.len() * zs.len()`.
    pub fn new(
        xs: Vec<f64>,
        ys: Vec<f64>,
        zs: Vec<f64>,
        values: Vec<f64>,
        policy: BoundsPolicy,
    ) -> SourceResult<Self> {
        for (name, axis) in [("x", &xs), ("y", &ys), ("z", &zs)] {
            if axis.is_empty() {
                return Err(SourceError::malformed(format!("{name} axis is empty")));
            }
            if axis.windows(2).any(|w| w[1] <= w[0]) {
                return Err(SourceError::malformed(format!(
                    "{name} axis is not strictly increasing"
                )));
            }
        }
        if values.len() != xs.len() * ys.len() * zs.len() {
            return Err(SourceError::malformed(format!(
                "expected {} grid values, found {}",
                xs.len() * ys.len() * zs.len(),
                values.len()
            )));
        }

        Ok(Self {
            xs,
            ys,
            zs,
            values,
            policy,
        })
    }

    /// Grid shape as `(nx, ny, nz)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.xs.len(), self.ys.len(), self.zs.len())
    }

    /// The out-of-domain policy.
    #[must_use]
    pub const fn policy(&self) -> BoundsPolicy {
        self.policy
    }

    /// Whether a point lies within the grid's domain on every axis.
    #[must_use]
    pub fn contains(&self, p: &Point3<f64>) -> bool {
        axis_contains(&self.xs, p.x) && axis_contains(&self.ys, p.y) && axis_contains(&self.zs, p.z)
    }

    /// Interpolates the grid at a point.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::OutOfBounds`] for an out-of-domain point
    /// under [`BoundsPolicy::Error`].
    #[allow(clippy::similar_names)]
    pub fn value_at(&self, p: &Point3<f64>) -> SourceResult<f64> {
        if !self.contains(p) {
            match self.policy {
                BoundsPolicy::Error => {
                    return Err(SourceError::OutOfBounds {
                        x: p.x,
                        y: p.y,
                        z: p.z,
                    });
                }
                BoundsPolicy::Fill(fill) => return Ok(fill),
                BoundsPolicy::Extrapolate => {}
            }
        }

        let (ix, tx) = axis_cell(&self.xs, p.x);
        let (iy, ty) = axis_cell(&self.ys, p.y);
        let (iz, tz) = axis_cell(&self.zs, p.z);

        let (ny, nz) = (self.ys.len(), self.zs.len());
        let ix1 = (ix + 1).min(self.xs.len() - 1);
        let iy1 = (iy + 1).min(ny - 1);
        let iz1 = (iz + 1).min(nz - 1);

        let v = |ix: usize, iy: usize, iz: usize| self.values[(ix * ny + iy) * nz + iz];

        let c000 = v(ix, iy, iz);
        let c100 = v(ix1, iy, iz);
        let c010 = v(ix, iy1, iz);
        let c110 = v(ix1, iy1, iz);
        let c001 = v(ix, iy, iz1);
        let c101 = v(ix1, iy, iz1);
        let c011 = v(ix, iy1, iz1);
        let c111 = v(ix1, iy1, iz1);

        let c00 = c000 + tx * (c100 - c000);
        let c10 = c010 + tx * (c110 - c010);
        let c01 = c001 + tx * (c101 - c001);
        let c11 = c011 + tx * (c111 - c011);

        let c0 = c00 + ty * (c10 - c00);
        let c1 = c01 + ty * (c11 - c01);

        Ok(c0 + tz * (c1 - c0))
    }
}

fn axis_contains(coords: &[f64], q: f64) -> bool {
    coords.first().is_some_and(|&lo| q >= lo) && coords.last().is_some_and(|&hi| q <= hi)
}

/// Locates the interpolation cell for `q` on one axis.
///
/// Returns the lower cell index and the fractional offset within the cell.
/// Outside the domain the edge cell is used and the offset runs past
/// `[0, 1]`, which extends the interpolant linearly. A degenerate axis
/// pins the offset to zero.
fn axis_cell(coords: &[f64], q: f64) -> (usize, f64) {
    let n = coords.len();
    if n == 1 {
        return (0, 0.0);
    }

    let upper = coords.partition_point(|&c| c <= q);
    let i = upper.clamp(1, n - 1) - 1;
    let t = (q - coords[i]) / (coords[i + 1] - coords[i]);
    (i, t)
}
