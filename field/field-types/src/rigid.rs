//! Rigid coordinate frames.

use nalgebra::{Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::rotation::{axis_angle, rotate_point_about};

/// The fixed point a rotation is performed about.
///
/// Replaces an implicit "defaults to my own position" convention with an
/// explicit value. `OwnPosition` resolves to the rotated object's position
/// at call time, so repeated rotations track a moving object.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Anchor {
    /// Rotate about the object's own current position.
    #[default]
    OwnPosition,
    /// Rotate about a fixed world-frame point.
    Point(Point3<f64>),
}

/// A rigid coordinate frame: position plus a single (angle, axis)
/// orientation pair.
///
/// The orientation is always stored as one angle (degrees) and one axis,
/// never as a matrix or quaternion field. [`RigidFrame::rotate`] composes
/// the incoming rotation with the stored one through unit quaternions
/// internally and writes the result back as a single pair, so sequential
/// rotations behave like sequential axis-angle applications.
///
/// # Example
///
/// ```
/// use field_types::{Anchor, RigidFrame};
/// use nalgebra::{Point3, Vector3};
///
/// let mut frame = RigidFrame::at(Point3::origin());
/// frame.translate(&Vector3::new(0.0, 2.0, 0.0));
/// frame.rotate(90.0, &Vector3::z(), Anchor::OwnPosition);
///
/// // Rotating about the frame's own position leaves it in place.
/// assert!((frame.position - Point3::new(0.0, 2.0, 0.0)).norm() < 1e-12);
/// assert!((frame.angle - 90.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidFrame {
    /// World-frame position.
    pub position: Point3<f64>,
    /// Orientation angle in degrees.
    pub angle: f64,
    /// Orientation axis. Need not be unit length; rotation normalizes it.
    pub axis: Vector3<f64>,
}

impl Default for RigidFrame {
    fn default() -> Self {
        Self::at(Point3::origin())
    }
}

impl RigidFrame {
    /// Creates a frame with an explicit orientation.
    #[must_use]
    pub const fn new(position: Point3<f64>, angle: f64, axis: Vector3<f64>) -> Self {
        Self {
            position,
            angle,
            axis,
        }
    }

    /// Creates an unrotated frame at `position` (angle 0 about +Z).
    #[must_use]
    pub fn at(position: Point3<f64>) -> Self {
        Self::new(position, 0.0, Vector3::z())
    }

    /// The orientation as a unit quaternion.
    #[must_use]
    pub fn orientation(&self) -> UnitQuaternion<f64> {
        axis_angle(self.angle, &self.axis)
    }

    /// Resolves an [`Anchor`] against this frame's current position.
    #[must_use]
    pub fn resolve_anchor(&self, anchor: Anchor) -> Point3<f64> {
        match anchor {
            Anchor::OwnPosition => self.position,
            Anchor::Point(p) => p,
        }
    }

    /// Translates the frame; orientation is unchanged.
    pub fn translate(&mut self, displacement: &Vector3<f64>) {
        self.position += displacement;
    }

    /// Rotates the frame by `angle_deg` degrees about the axis through the
    /// resolved anchor.
    ///
    /// The position is rotated about the anchor and the orientation is
    /// composed with the incoming rotation. The composed orientation is
    /// stored back as a single (angle, axis) pair; the identity comes back
    /// as angle 0 about +Z.
    pub fn rotate(&mut self, angle_deg: f64, axis: &Vector3<f64>, anchor: Anchor) {
        let anchor = self.resolve_anchor(anchor);
        self.position = rotate_point_about(&self.position, angle_deg, axis, &anchor);

        let composed = axis_angle(angle_deg, axis) * self.orientation();
        match composed.axis_angle() {
            Some((axis, angle_rad)) => {
                self.angle = angle_rad.to_degrees();
                self.axis = axis.into_inner();
            }
            None => {
                self.angle = 0.0;
                self.axis = Vector3::z();
            }
        }
    }
}
