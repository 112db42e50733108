//! Axis-angle rotation math.
//!
//! Rotations throughout the workspace are expressed as a scalar angle in
//! degrees plus a rotation axis. The axis need not be unit length; it is
//! normalized here, and an axis below [`AXIS_EPSILON`] yields the identity
//! rotation.

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};

/// Axes with a norm below this threshold are treated as degenerate and
/// produce the identity rotation.
pub const AXIS_EPSILON: f64 = 1e-12;

/// Rotates a vector by `angle_deg` degrees about `axis` using the Rodrigues
/// formula.
///
/// A near-zero axis returns the vector unchanged.
///
/// # Example
///
/// ```
/// use field_types::rotate_vector;
/// use nalgebra::Vector3;
///
/// let rotated = rotate_vector(&Vector3::x(), 90.0, &Vector3::z());
/// assert!((rotated - Vector3::y()).norm() < 1e-12);
/// ```
#[must_use]
pub fn rotate_vector(v: &Vector3<f64>, angle_deg: f64, axis: &Vector3<f64>) -> Vector3<f64> {
    let norm = axis.norm();
    if norm < AXIS_EPSILON {
        return *v;
    }

    let k = axis / norm;
    let (s, c) = angle_deg.to_radians().sin_cos();

    v * c + k.cross(v) * s + k * (k.dot(v)) * (1.0 - c)
}

/// Rotates a point by `angle_deg` degrees about the axis through `anchor`.
///
/// # Example
///
/// ```
/// use field_types::rotate_point_about;
/// use nalgebra::{Point3, Vector3};
///
/// let anchor = Point3::new(1.0, 0.0, 0.0);
/// let p = rotate_point_about(&Point3::new(2.0, 0.0, 0.0), 180.0, &Vector3::z(), &anchor);
/// assert!((p - Point3::origin()).norm() < 1e-12);
/// ```
#[must_use]
pub fn rotate_point_about(
    p: &Point3<f64>,
    angle_deg: f64,
    axis: &Vector3<f64>,
    anchor: &Point3<f64>,
) -> Point3<f64> {
    anchor + rotate_vector(&(p - anchor), angle_deg, axis)
}

/// Builds the unit quaternion for an (angle, axis) pair.
///
/// A near-zero axis yields the identity quaternion.
#[must_use]
pub fn axis_angle(angle_deg: f64, axis: &Vector3<f64>) -> UnitQuaternion<f64> {
    Unit::try_new(*axis, AXIS_EPSILON).map_or_else(UnitQuaternion::identity, |axis| {
        UnitQuaternion::from_axis_angle(&axis, angle_deg.to_radians())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rotate_vector_quarter_turn() {
        let r = rotate_vector(&Vector3::x(), 90.0, &Vector3::z());
        assert_relative_eq!(r.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(r.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(r.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rotate_vector_unnormalized_axis() {
        // The axis is normalized internally, so scaling it changes nothing.
        let a = rotate_vector(&Vector3::x(), 30.0, &Vector3::new(0.0, 0.0, 1.0));
        let b = rotate_vector(&Vector3::x(), 30.0, &Vector3::new(0.0, 0.0, 7.5));
        assert_relative_eq!((a - b).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rotate_vector_zero_axis_is_identity() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        let r = rotate_vector(&v, 45.0, &Vector3::zeros());
        assert_eq!(r, v);
    }

    #[test]
    fn rotate_vector_preserves_norm() {
        let v = Vector3::new(1.0, -2.0, 0.5);
        let r = rotate_vector(&v, 123.4, &Vector3::new(1.0, 1.0, -1.0));
        assert_relative_eq!(r.norm(), v.norm(), epsilon = 1e-12);
    }

    #[test]
    fn rotate_point_about_anchor() {
        let anchor = Point3::new(0.0, 1.0, 0.0);
        let p = rotate_point_about(&Point3::new(1.0, 1.0, 0.0), 90.0, &Vector3::z(), &anchor);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn axis_angle_matches_rodrigues() {
        let axis = Vector3::new(1.0, 2.0, 3.0);
        let q = axis_angle(72.0, &axis);
        let v = Vector3::new(-1.0, 0.5, 2.0);
        let via_quat = q * v;
        let via_rodrigues = rotate_vector(&v, 72.0, &axis);
        assert_relative_eq!((via_quat - via_rodrigues).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn axis_angle_degenerate_axis() {
        let q = axis_angle(90.0, &Vector3::zeros());
        assert_eq!(q, UnitQuaternion::identity());
    }
}
