//! Point sensors.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::rigid::{Anchor, RigidFrame};

/// A single rigidly-placed field query point.
///
/// The leaf of every sensor hierarchy: it samples the field at exactly one
/// position and reports it in its own measurement frame.
///
/// # Example
///
/// ```
/// use field_types::{Anchor, PointSensor};
/// use nalgebra::{Point3, Vector3};
///
/// let mut sensor = PointSensor::at(Point3::new(1.0, 0.0, 0.0));
/// sensor.rotate(90.0, &Vector3::z(), Anchor::Point(Point3::origin()));
/// assert!((sensor.position().y - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointSensor {
    /// Rigid placement of the sensing point.
    pub frame: RigidFrame,
}

impl PointSensor {
    /// Creates a sensor with an explicit orientation.
    #[must_use]
    pub const fn new(position: Point3<f64>, angle: f64, axis: Vector3<f64>) -> Self {
        Self {
            frame: RigidFrame::new(position, angle, axis),
        }
    }

    /// Creates an unrotated sensor at `position`.
    #[must_use]
    pub fn at(position: Point3<f64>) -> Self {
        Self {
            frame: RigidFrame::at(position),
        }
    }

    /// World-frame position of the sensing point.
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

    /// Translates the sensor; orientation is unchanged.
    pub fn translate(&mut self, displacement: &Vector3<f64>) {
        self.frame.translate(displacement);
    }

    /// Rotates the sensor about the resolved anchor.
    pub fn rotate(&mut self, angle_deg: f64, axis: &Vector3<f64>, anchor: Anchor) {
        self.frame.rotate(angle_deg, axis, anchor);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_sensor_sits_at_origin() {
        let sensor = PointSensor::default();
        assert_eq!(sensor.position(), Point3::origin());
        assert_eq!(sensor.angle(), 0.0);
    }

    #[test]
    fn translate_moves_position() {
        let mut sensor = PointSensor::at(Point3::new(1.0, 1.0, 0.0));
        sensor.translate(&Vector3::new(0.0, 0.0, 5.0));
        assert_eq!(sensor.position(), Point3::new(1.0, 1.0, 5.0));
    }

    #[test]
    fn rotate_about_own_position_is_in_place() {
        let mut sensor = PointSensor::at(Point3::new(2.0, 3.0, 4.0));
        sensor.rotate(120.0, &Vector3::new(1.0, 1.0, 1.0), Anchor::OwnPosition);
        assert_relative_eq!(
            (sensor.position() - Point3::new(2.0, 3.0, 4.0)).norm(),
            0.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(sensor.angle(), 120.0, epsilon = 1e-9);
    }

    #[test]
    fn serialization_round_trip() {
        let sensor = PointSensor::new(Point3::new(0.5, 0.0, -1.0), 10.0, Vector3::x());
        let json = serde_json::to_string(&sensor).unwrap();
        let parsed: PointSensor = serde_json::from_str(&json).unwrap();
        assert_eq!(sensor, parsed);
    }
}
