//! Composable rigid sensor geometries with batched field aggregation.
//!
//! This crate models collections of field sample points as rigid,
//! hierarchical geometries that can be moved and rotated as a unit, and
//! reduces batched field queries over them:
//!
//! # Sensor Trees
//!
//! - [`SensorNode`] - Tagged variant over every member kind
//! - [`SensorCollection`] - Ordered, flattenable tree under one transform
//!
//! # Surface Sensors
//!
//! - [`SurfaceSensor`] - Planar grid of virtual samples, mean-field readout
//! - [`SurfaceUpdate`], [`ExtentSpec`], [`GridSpec`] - Partial updates
//!
//! # Arrays
//!
//! - [`CircularSensorArray`] - Fixed ring of identical surface sensors
//! - [`ArrayLayout`] - Partial ring layout updates
//!
//! # Aggregation
//!
//! - [`aggregate_field`] - Superpose sources over an oriented batch
//! - [`FieldSamples`], [`Notice`] - Values plus structured diagnostics
//!
//! # Example
//!
//! ```
//! use field_array::SensorCollection;
//! use field_types::{Anchor, PointSensor};
//! use nalgebra::{Point3, Vector3};
//!
//! let mut rig = SensorCollection::new();
//! rig.add(PointSensor::at(Point3::new(1.0, 0.0, 0.0)));
//! rig.add(PointSensor::at(Point3::new(-1.0, 0.0, 0.0)));
//!
//! // The rig moves as one rigid body.
//! rig.rotate(90.0, &Vector3::z(), Anchor::OwnPosition);
//! assert!((rig[0].position().y - 1.0).abs() < 1e-9);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod aggregate;
mod circular;
mod collection;
mod diagnostics;
mod error;
mod surface;

pub use aggregate::{AngleBatch, AxisBatch, SampleBatch, aggregate_field};
pub use circular::{ArrayLayout, CircularSensorArray};
pub use collection::{SensorCollection, SensorNode};
pub use diagnostics::{FieldSamples, Notice};
pub use error::{ArrayError, ArrayResult};
pub use surface::{ExtentSpec, GridSpec, SurfaceSensor, SurfaceUpdate};

use field_source::FieldSource;
use field_types::PointSensor;

/// Reads the field a single point sensor measures in its own frame.
///
/// A convenience wrapper around [`aggregate_field`] for the one-sample
/// case.
///
/// # Errors
///
/// Source query failures propagate.
pub fn sensor_field(
    sensor: &PointSensor,
    sources: &[&dyn FieldSource],
) -> ArrayResult<FieldSamples> {
    aggregate_field(
        sources,
        &[sensor.position()],
        &AngleBatch::Uniform(sensor.angle()),
        &AxisBatch::Uniform(sensor.axis()),
    )
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        ArrayLayout, CircularSensorArray, ExtentSpec, FieldSamples, GridSpec, Notice, SampleBatch,
        SensorCollection, SensorNode, SurfaceSensor, SurfaceUpdate, aggregate_field, sensor_field,
    };
}
