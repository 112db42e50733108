//! Circular arrays of surface sensors.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use field_source::FieldSource;
use field_types::Anchor;

use crate::aggregate::SampleBatch;
use crate::collection::{SensorCollection, SensorNode};
use crate::diagnostics::FieldSamples;
use crate::error::{ArrayError, ArrayResult};
use crate::surface::{ExtentSpec, GridSpec, SurfaceSensor, SurfaceUpdate};

/// A partial layout update for a circular array; omitted fields keep their
/// stored values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ArrayLayout {
    /// New circle radius.
    pub radius: Option<f64>,
    /// New angle of the first sensor, degrees.
    pub start_angle: Option<f64>,
    /// New footprint shared by every element sensor.
    pub elem_extent: Option<ExtentSpec>,
    /// New element grid shared by every element sensor.
    pub elem_grid: Option<GridSpec>,
}

/// A fixed-count ring of identical surface sensors.
///
/// `n` sensors are spaced evenly over `[start_angle, start_angle + 360)`
/// degrees (the wrap point excluded) on a circle of the stored radius,
/// each facing +Z with local angle 0. The sensor count is fixed at
/// construction; [`set_layout`](Self::set_layout) repositions the existing
/// sensors, never adds or removes any.
///
/// # Example
///
/// ```
/// use field_array::{CircularSensorArray, ExtentSpec, GridSpec};
///
/// let array = CircularSensorArray::new(
///     4,
///     2.0,
///     0.0,
///     ExtentSpec::Uniform(0.2),
///     GridSpec::Shape(3, 3),
/// )
/// .unwrap();
///
/// let first = array.sensors().next().unwrap();
/// assert!((first.position().x - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularSensorArray {
    collection: SensorCollection,
    radius: f64,
    start_angle: f64,
    elem_extent: (f64, f64),
    elem_grid: (usize, usize),
}

impl CircularSensorArray {
    /// Creates an array of `num_sensors` surface sensors on a circle.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::NoSensors`] if `num_sensors` is zero.
    pub fn new(
        num_sensors: usize,
        radius: f64,
        start_angle: f64,
        elem_extent: ExtentSpec,
        elem_grid: GridSpec,
    ) -> ArrayResult<Self> {
        if num_sensors == 0 {
            return Err(ArrayError::NoSensors);
        }

        // Distinct placeholder positions keep the members distinguishable
        // until the layout places them; set_layout overwrites them all.
        let mut collection = SensorCollection::new();
        for k in 0..num_sensors {
            #[allow(clippy::cast_precision_loss)]
            let placeholder = Point3::new(k as f64, 0.0, 0.0);
            let mut sensor = SurfaceSensor::new(elem_grid, elem_extent);
            sensor.update(SurfaceUpdate {
                position: Some(placeholder),
                ..SurfaceUpdate::default()
            });
            collection.add(sensor);
        }

        let mut array = Self {
            collection,
            radius,
            start_angle,
            elem_extent: elem_extent.resolve(),
            elem_grid: elem_grid.resolve(),
        };
        array.apply_layout();
        Ok(array)
    }

    /// Applies a partial layout update and repositions every sensor.
    ///
    /// Sensors are re-placed in construction order at angles
    /// `start_angle + k * 360 / n`, at the stored radius, with angle 0
    /// about +Z and the stored element extent and grid.
    pub fn set_layout(&mut self, layout: ArrayLayout) {
        if let Some(radius) = layout.radius {
            self.radius = radius;
        }
        if let Some(start_angle) = layout.start_angle {
            self.start_angle = start_angle;
        }
        if let Some(extent) = layout.elem_extent {
            self.elem_extent = extent.resolve();
        }
        if let Some(grid) = layout.elem_grid {
            self.elem_grid = grid.resolve();
        }
        self.apply_layout();
    }

    fn apply_layout(&mut self) {
        let radius = self.radius;
        let start = self.start_angle;
        let (w, h) = self.elem_extent;
        let (n1, n2) = self.elem_grid;
        #[allow(clippy::cast_precision_loss)]
        let step = 360.0 / self.collection.len() as f64;

        for (k, node) in self.collection.children_mut().iter_mut().enumerate() {
            if let SensorNode::Surface(sensor) = node {
                #[allow(clippy::cast_precision_loss)]
                let theta = (start + k as f64 * step).to_radians();
                sensor.update(SurfaceUpdate {
                    position: Some(Point3::new(
                        radius * theta.cos(),
                        radius * theta.sin(),
                        0.0,
                    )),
                    angle: Some(0.0),
                    axis: Some(Vector3::z()),
                    extent: Some(ExtentSpec::PerAxis(w, h)),
                    grid: Some(GridSpec::Shape(n1, n2)),
                });
            }
        }
    }

    /// The underlying collection.
    #[must_use]
    pub const fn collection(&self) -> &SensorCollection {
        &self.collection
    }

    /// Iterates over the member sensors in construction order.
    pub fn sensors(&self) -> impl Iterator<Item = &SurfaceSensor> {
        self.collection.iter().filter_map(|node| match node {
            SensorNode::Surface(sensor) => Some(sensor),
            _ => None,
        })
    }

    /// Number of sensors on the circle.
    #[must_use]
    pub fn num_sensors(&self) -> usize {
        self.collection.len()
    }

    /// Circle radius.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Angle of the first sensor, degrees.
    #[must_use]
    pub const fn start_angle(&self) -> f64 {
        self.start_angle
    }

    /// Footprint shared by the element sensors.
    #[must_use]
    pub const fn elem_extent(&self) -> (f64, f64) {
        self.elem_extent
    }

    /// Element grid shared by the element sensors.
    #[must_use]
    pub const fn elem_grid(&self) -> (usize, usize) {
        self.elem_grid
    }

    /// Translates the whole array rigidly.
    pub fn translate(&mut self, displacement: &Vector3<f64>) {
        self.collection.translate(displacement);
    }

    /// Rotates the whole array rigidly about the resolved anchor.
    pub fn rotate(&mut self, angle_deg: f64, axis: &Vector3<f64>, anchor: Anchor) {
        self.collection.rotate(angle_deg, axis, anchor);
    }

    /// Gathers the full batch of element samples.
    #[must_use]
    pub fn gather_batch(&self) -> SampleBatch {
        self.collection.gather_batch()
    }

    /// Aggregates the field over every element sample.
    ///
    /// # Errors
    ///
    /// Source query failures propagate.
    pub fn field_at(&self, sources: &[&dyn FieldSource]) -> ArrayResult<FieldSamples> {
        self.collection.field_at(sources)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad_array() -> CircularSensorArray {
        CircularSensorArray::new(
            4,
            2.0,
            0.0,
            ExtentSpec::Uniform(0.2),
            GridSpec::Shape(3, 3),
        )
        .unwrap()
    }

    #[test]
    fn places_sensors_on_the_circle() {
        let array = quad_array();
        let positions: Vec<_> = array.sensors().map(SurfaceSensor::position).collect();
        let expected = [
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(-2.0, 0.0, 0.0),
            Point3::new(0.0, -2.0, 0.0),
        ];
        assert_eq!(positions.len(), 4);
        for (got, want) in positions.iter().zip(&expected) {
            assert_relative_eq!((got - want).norm(), 0.0, epsilon = 1e-12);
        }
        for sensor in array.sensors() {
            assert_eq!(sensor.angle(), 0.0);
            assert_eq!(sensor.axis(), Vector3::z());
        }
    }

    #[test]
    fn start_angle_offsets_the_ring() {
        let mut array = quad_array();
        array.set_layout(ArrayLayout {
            start_angle: Some(180.0),
            ..ArrayLayout::default()
        });
        let first = array.sensors().next().unwrap();
        assert_relative_eq!(first.position().x, -2.0, epsilon = 1e-12);
        assert_relative_eq!(first.position().y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn set_layout_keeps_omitted_parameters() {
        let mut array = quad_array();
        array.set_layout(ArrayLayout {
            radius: Some(5.0),
            ..ArrayLayout::default()
        });
        assert_eq!(array.radius(), 5.0);
        assert_eq!(array.start_angle(), 0.0);
        assert_eq!(array.elem_grid(), (3, 3));

        let first = array.sensors().next().unwrap();
        assert_relative_eq!(first.position().x, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn set_layout_never_changes_the_count() {
        let mut array = quad_array();
        array.set_layout(ArrayLayout {
            radius: Some(1.0),
            elem_grid: Some(GridSpec::Shape(2, 2)),
            ..ArrayLayout::default()
        });
        assert_eq!(array.num_sensors(), 4);
        assert!(array.sensors().all(|s| s.grid() == (2, 2)));
    }

    #[test]
    fn zero_sensors_is_rejected() {
        let result = CircularSensorArray::new(
            0,
            1.0,
            0.0,
            ExtentSpec::Uniform(0.2),
            GridSpec::Shape(3, 3),
        );
        assert!(matches!(result, Err(ArrayError::NoSensors)));
    }

    #[test]
    fn single_sensor_ring() {
        let array = CircularSensorArray::new(
            1,
            3.0,
            90.0,
            ExtentSpec::Uniform(0.2),
            GridSpec::Shape(2, 2),
        )
        .unwrap();
        let first = array.sensors().next().unwrap();
        assert_relative_eq!(first.position().x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(first.position().y, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn gathers_all_element_samples() {
        let array = quad_array();
        assert_eq!(array.gather_batch().len(), 4 * 9);
    }

    #[test]
    fn rigid_motion_moves_the_ring_together() {
        let mut array = quad_array();
        array.translate(&Vector3::new(0.0, 0.0, 4.0));
        for sensor in array.sensors() {
            assert_relative_eq!(sensor.position().z, 4.0, epsilon = 1e-12);
        }

        array.rotate(90.0, &Vector3::z(), Anchor::OwnPosition);
        let first = array.sensors().next().unwrap();
        assert_relative_eq!(first.position().x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(first.position().y, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn serialization_round_trip() {
        let array = quad_array();
        let json = serde_json::to_string(&array).unwrap();
        let parsed: CircularSensorArray = serde_json::from_str(&json).unwrap();
        assert_eq!(array, parsed);
    }
}
