//! Tabulated magnetic field sources with trilinear grid interpolation.
//!
//! This crate turns a scattered `(x, y, z, Bx, By, Bz)` sample table into a
//! queryable field source, as an alternative to analytic magnet models:
//!
//! # Tables
//!
//! - [`FieldTable`] - Sorted sample table from a file, records, or raw rows
//! - [`DownsampledPoint`] - Coarse `(x, y, z, |B|)` visualization samples
//!
//! # Interpolation
//!
//! - [`RegularGrid3`] - Trilinear interpolation over rectilinear axes
//! - [`BoundsPolicy`] - Fail, fill with a constant, or extrapolate outside
//!   the sampled domain
//!
//! # Sources
//!
//! - [`DiscreteFieldSource`] - A placed, orientable source built from a
//!   complete rectilinear sample grid
//! - [`FieldSource`] - The batch-query protocol every source exposes and
//!   every sensor consumes
//!
//! # Example
//!
//! ```
//! use field_source::{BoundsPolicy, DiscreteFieldSource, FieldSource, FieldTable, SourcePlacement};
//! use nalgebra::Point3;
//!
//! let mut rows = Vec::new();
//! for i in 0..3 {
//!     for j in 0..3 {
//!         for k in 0..3 {
//!             let (x, y, z) = (f64::from(i), f64::from(j), f64::from(k));
//!             rows.push([x, y, z, 0.0, 0.0, 2.0 * z]);
//!         }
//!     }
//! }
//! let table = FieldTable::from_rows(&rows).unwrap();
//! let source = DiscreteFieldSource::from_table(
//!     &table,
//!     SourcePlacement::default(),
//!     BoundsPolicy::Extrapolate,
//! )
//! .unwrap();
//!
//! let b = source.field(&[Point3::new(1.0, 1.0, 0.5)]).unwrap();
//! assert!((b[0].z - 1.0).abs() < 1e-12);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod discrete;
mod error;
mod grid;
mod table;

pub use discrete::{DiscreteFieldSource, SourcePlacement};
pub use error::{SourceError, SourceResult};
pub use grid::{BoundsPolicy, RegularGrid3};
pub use table::{DownsampledPoint, FieldRecord, FieldTable};

use nalgebra::{Point3, Vector3};

/// The query protocol every field source exposes.
///
/// Given a batch of world-frame positions, a source returns one world-frame
/// field vector per position, index-aligned with the input. Sensors consume
/// sources through this trait and never own them; sources are passed in per
/// query.
pub trait FieldSource {
    /// Evaluates the field at each position.
    ///
    /// # Errors
    ///
    /// Implementations report their own failure modes; the discrete source
    /// fails on out-of-domain queries under [`BoundsPolicy::Error`].
    fn field(&self, positions: &[Point3<f64>]) -> SourceResult<Vec<Vector3<f64>>>;
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        BoundsPolicy, DiscreteFieldSource, FieldSource, FieldTable, SourceError, SourcePlacement,
    };
}
