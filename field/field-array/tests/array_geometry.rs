//! End-to-end tests: discrete sources queried through sensor geometries.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};

use field_array::{
    AngleBatch, AxisBatch, CircularSensorArray, ExtentSpec, GridSpec, Notice, SensorCollection,
    SurfaceSensor, SurfaceUpdate, aggregate_field, sensor_field,
};
use field_source::{BoundsPolicy, DiscreteFieldSource, FieldTable, SourcePlacement};
use field_types::{Anchor, PointSensor, rotate_vector};

/// A 4x4x4 table over [0, 3]^3 carrying the linear field
/// B = (2x, 3y, -z). Trilinear interpolation reproduces a linear field
/// exactly, inside the grid and extrapolated beyond it.
fn linear_source(offset: Vector3<f64>) -> DiscreteFieldSource {
    let mut rows = Vec::new();
    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                let (x, y, z) = (f64::from(i), f64::from(j), f64::from(k));
                rows.push([x, y, z, 2.0 * x, 3.0 * y, -z]);
            }
        }
    }
    let table = FieldTable::from_rows(&rows).unwrap();
    DiscreteFieldSource::from_table(
        &table,
        SourcePlacement {
            offset,
            ..SourcePlacement::default()
        },
        BoundsPolicy::Extrapolate,
    )
    .unwrap()
}

/// The linear field of an unmoved source, evaluated directly.
fn expected_field(p: &Point3<f64>) -> Vector3<f64> {
    Vector3::new(2.0 * p.x, 3.0 * p.y, -p.z)
}

#[test]
fn collection_reads_match_direct_source_queries() {
    let source = linear_source(Vector3::zeros());
    let points = [
        Point3::new(0.5, 1.0, 2.0),
        Point3::new(2.5, 2.5, 0.5),
        Point3::new(1.0, 0.0, 3.0),
    ];

    let mut collection = SensorCollection::new();
    for p in &points {
        collection.add(PointSensor::at(*p));
    }

    let samples = collection.field_at(&[&source]).unwrap();
    assert!(samples.is_clean());
    assert_eq!(samples.values.len(), 3);
    for (value, p) in samples.values.iter().zip(&points) {
        assert_relative_eq!((value - expected_field(p)).norm(), 0.0, epsilon = 1e-12);
    }
}

#[test]
fn superposition_across_sources() {
    let a = linear_source(Vector3::zeros());
    let b = linear_source(Vector3::new(1.0, -1.0, 0.0));

    let mut collection = SensorCollection::new();
    collection.add(PointSensor::at(Point3::new(1.5, 1.5, 1.5)));
    collection.add(PointSensor::at(Point3::new(0.5, 2.0, 1.0)));

    let both = collection.field_at(&[&a, &b]).unwrap();
    let only_a = collection.field_at(&[&a]).unwrap();
    let only_b = collection.field_at(&[&b]).unwrap();

    for ((sum, va), vb) in both
        .values
        .iter()
        .zip(&only_a.values)
        .zip(&only_b.values)
    {
        assert_relative_eq!((sum - (va + vb)).norm(), 0.0, epsilon = 1e-12);
    }
}

#[test]
fn rotated_point_sensor_reads_in_its_own_frame() {
    let source = linear_source(Vector3::zeros());
    let p = Point3::new(2.0, 1.0, 1.0);
    let sensor = PointSensor::new(p, 90.0, Vector3::z());

    let samples = sensor_field(&sensor, &[&source]).unwrap();
    assert!(samples.is_clean());

    let expected = rotate_vector(&expected_field(&p), -90.0, &Vector3::z());
    assert_relative_eq!((samples.values[0] - expected).norm(), 0.0, epsilon = 1e-12);
}

#[test]
fn surface_mean_of_a_linear_field_is_the_center_value() {
    let source = linear_source(Vector3::zeros());
    let mut sensor = SurfaceSensor::new(GridSpec::Shape(5, 5), ExtentSpec::Uniform(1.0));
    sensor.update(SurfaceUpdate {
        position: Some(Point3::new(1.5, 1.5, 1.5)),
        ..SurfaceUpdate::default()
    });

    let mean = sensor.mean_field(&[&source]).unwrap();
    assert!(mean.is_clean());
    assert_relative_eq!(
        (mean.values[0] - expected_field(&Point3::new(1.5, 1.5, 1.5))).norm(),
        0.0,
        epsilon = 1e-12
    );
}

#[test]
fn rigid_geometry_survives_collection_motion() {
    let mut collection = SensorCollection::new();
    collection.add(PointSensor::at(Point3::new(1.0, 0.0, 0.0)));
    collection.add(SurfaceSensor::new(
        GridSpec::Shape(3, 3),
        ExtentSpec::Uniform(0.5),
    ));

    let gap = |c: &SensorCollection| (c[0].position() - c[1].position()).norm();
    let before = gap(&collection);

    collection.translate(&Vector3::new(2.0, -1.0, 0.5));
    collection.rotate(63.0, &Vector3::new(1.0, 0.0, 2.0), Anchor::OwnPosition);
    collection.rotate(120.0, &Vector3::y(), Anchor::Point(Point3::origin()));

    assert_relative_eq!(gap(&collection), before, epsilon = 1e-9);
}

#[test]
fn collection_rotation_round_trip_restores_samples() {
    let mut collection = SensorCollection::new();
    collection.add(SurfaceSensor::new(
        GridSpec::Shape(2, 2),
        ExtentSpec::Uniform(1.0),
    ));
    collection.add(PointSensor::at(Point3::new(0.0, 2.0, 0.0)));

    let before = collection.gather_batch();
    let axis = Vector3::new(1.0, 2.0, 3.0);
    collection.rotate(77.0, &axis, Anchor::Point(Point3::new(1.0, 1.0, 1.0)));
    collection.rotate(-77.0, &axis, Anchor::Point(Point3::new(1.0, 1.0, 1.0)));
    let after = collection.gather_batch();

    for (b, a) in before.positions.iter().zip(&after.positions) {
        assert_relative_eq!((a - b).norm(), 0.0, epsilon = 1e-9);
    }
    for (b, a) in before.angles.iter().zip(&after.angles) {
        assert_relative_eq!(a, b, epsilon = 1e-9);
    }
}

#[test]
fn circular_array_reads_the_field_at_each_station() {
    let source = linear_source(Vector3::zeros());
    let mut array = CircularSensorArray::new(
        4,
        1.0,
        0.0,
        ExtentSpec::Uniform(0.1),
        GridSpec::Shape(3, 3),
    )
    .unwrap();
    // Center the ring inside the sampled domain.
    array.translate(&Vector3::new(1.5, 1.5, 1.5));

    let samples = array.field_at(&[&source]).unwrap();
    assert!(samples.is_clean());
    assert_eq!(samples.values.len(), 4 * 9);

    // Per-station mean equals the linear field at the station center.
    for (station, sensor) in array.sensors().enumerate() {
        let chunk = &samples.values[station * 9..(station + 1) * 9];
        let mean = chunk.iter().sum::<Vector3<f64>>() / 9.0;
        let expected = expected_field(&sensor.position());
        assert_relative_eq!((mean - expected).norm(), 0.0, epsilon = 1e-12);
    }
}

#[test]
fn uniform_angle_broadcast_warns_but_matches() {
    let source = linear_source(Vector3::zeros());
    let positions: Vec<_> = (0..5).map(|i| Point3::new(f64::from(i) * 0.5, 1.0, 1.0)).collect();

    let shimmed = aggregate_field(
        &[&source],
        &positions,
        &AngleBatch::Uniform(30.0),
        &AxisBatch::PerSample(vec![Vector3::z(); 5]),
    )
    .unwrap();
    let explicit = aggregate_field(
        &[&source],
        &positions,
        &AngleBatch::PerSample(vec![30.0; 5]),
        &AxisBatch::PerSample(vec![Vector3::z(); 5]),
    )
    .unwrap();

    assert_eq!(shimmed.values, explicit.values);
    assert!(explicit.is_clean());
    assert_eq!(
        shimmed.notices,
        vec![Notice::AngleBroadcast {
            provided: 1,
            expected: 5
        }]
    );
}

#[test]
fn moved_and_rotated_source_behaves_rigidly() {
    // Reading a moved source at a correspondingly moved point must match
    // reading the unmoved source at the original point, with the field
    // vector rotated along.
    let plain = linear_source(Vector3::zeros());
    let table_point = Point3::new(2.0, 1.0, 1.0);
    let reference = plain.field_at(&table_point).unwrap();

    let mut rows = Vec::new();
    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                let (x, y, z) = (f64::from(i), f64::from(j), f64::from(k));
                rows.push([x, y, z, 2.0 * x, 3.0 * y, -z]);
            }
        }
    }
    let table = FieldTable::from_rows(&rows).unwrap();
    let placed = DiscreteFieldSource::from_table(
        &table,
        SourcePlacement {
            offset: Vector3::new(4.0, 0.0, 0.0),
            angle: 90.0,
            axis: Vector3::z(),
        },
        BoundsPolicy::Extrapolate,
    )
    .unwrap();

    // The table point, carried through the same placement: rotate its
    // offset from the centroid, then translate.
    let center = Point3::new(1.5, 1.5, 1.5);
    let world = placed.position() + rotate_vector(&(table_point - center), 90.0, &Vector3::z());
    let moved = placed.field_at(&world).unwrap();

    let expected = rotate_vector(&reference, 90.0, &Vector3::z());
    assert_relative_eq!((moved - expected).norm(), 0.0, epsilon = 1e-12);
}

#[test]
fn empty_source_list_returns_the_placeholder() {
    let collection = SensorCollection::from_nodes([PointSensor::at(Point3::origin())]);
    let samples = collection.field_at(&[]).unwrap();
    assert_eq!(samples.values, vec![Vector3::zeros()]);
    assert_eq!(samples.notices, vec![Notice::NoSources]);
}
