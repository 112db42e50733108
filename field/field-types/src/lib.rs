//! Rigid-body geometric primitives for magnetic field sampling.
//!
//! This crate provides the building blocks shared by every sensor and source
//! in the workspace:
//!
//! # Rigid Frames
//!
//! - [`RigidFrame`] - Position plus a single (angle, axis) orientation pair
//! - [`Anchor`] - Explicit rotation anchor (a fixed point, or the frame's
//!   own position resolved at call time)
//!
//! # Rotation Math
//!
//! - [`rotate_vector`] - Axis-angle (Rodrigues) rotation of a vector
//! - [`rotate_point_about`] - Rotation of a point about an anchor
//! - [`axis_angle`] - Unit quaternion for an (angle, axis) pair
//!
//! # Sensors
//!
//! - [`PointSensor`] - A single rigidly-placed field query point
//!
//! # Conventions
//!
//! Angles are degrees throughout the public API. Rotation axes need not be
//! unit length; they are normalized internally, and a near-zero axis is
//! treated as the identity rotation.
//!
//! # Example
//!
//! ```
//! use field_types::{Anchor, RigidFrame};
//! use nalgebra::{Point3, Vector3};
//!
//! let mut frame = RigidFrame::at(Point3::new(1.0, 0.0, 0.0));
//! frame.rotate(90.0, &Vector3::z(), Anchor::Point(Point3::origin()));
//!
//! assert!((frame.position.y - 1.0).abs() < 1e-12);
//! assert!((frame.angle - 90.0).abs() < 1e-12);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod point;
mod rigid;
mod rotation;

pub use point::PointSensor;
pub use rigid::{Anchor, RigidFrame};
pub use rotation::{AXIS_EPSILON, axis_angle, rotate_point_about, rotate_vector};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{Anchor, PointSensor, RigidFrame, rotate_point_about, rotate_vector};
}
