//! Sensor collections: ordered, flattenable trees of sensors sharing one
//! rigid-body transform.

use std::fmt;
use std::ops::{Add, Index, Sub};

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use field_source::FieldSource;
use field_types::{Anchor, PointSensor, RigidFrame};

use crate::aggregate::SampleBatch;
use crate::diagnostics::FieldSamples;
use crate::error::ArrayResult;
use crate::surface::SurfaceSensor;

/// A member of a sensor collection.
///
/// The tagged variant over every sensor kind a collection can hold; the
/// shared capability surface (`position`, `angle`, `axis`, `translate`,
/// `rotate`, gathering) dispatches on it rather than on downcasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SensorNode {
    /// A single query point.
    Point(PointSensor),
    /// A planar grid of sample points.
    Surface(SurfaceSensor),
    /// A nested collection. Collections passed to [`SensorCollection::add`]
    /// are flattened away, so this variant only appears in nodes built by
    /// hand.
    Collection(SensorCollection),
}

impl SensorNode {
    /// World-frame position of the node.
    #[must_use]
    pub fn position(&self) -> Point3<f64> {
        match self {
            Self::Point(p) => p.position(),
            Self::Surface(s) => s.position(),
            Self::Collection(c) => c.position(),
        }
    }

    /// Orientation angle in degrees.
    #[must_use]
    pub fn angle(&self) -> f64 {
        match self {
            Self::Point(p) => p.angle(),
            Self::Surface(s) => s.angle(),
            Self::Collection(c) => c.angle(),
        }
    }

    /// Orientation axis.
    #[must_use]
    pub fn axis(&self) -> Vector3<f64> {
        match self {
            Self::Point(p) => p.axis(),
            Self::Surface(s) => s.axis(),
            Self::Collection(c) => c.axis(),
        }
    }

    /// Translates the node; orientation is unchanged.
    pub fn translate(&mut self, displacement: &Vector3<f64>) {
        match self {
            Self::Point(p) => p.translate(displacement),
            Self::Surface(s) => s.translate(displacement),
            Self::Collection(c) => c.translate(displacement),
        }
    }

    /// Rotates the node about the resolved anchor.
    pub fn rotate(&mut self, angle_deg: f64, axis: &Vector3<f64>, anchor: Anchor) {
        match self {
            Self::Point(p) => p.rotate(angle_deg, axis, anchor),
            Self::Surface(s) => s.rotate(angle_deg, axis, anchor),
            Self::Collection(c) => c.rotate(angle_deg, axis, anchor),
        }
    }

    /// Number of field samples the node contributes to a gathered batch.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        match self {
            Self::Point(_) => 1,
            Self::Surface(s) => s.sample_count(),
            Self::Collection(c) => c.children.iter().map(Self::sample_count).sum(),
        }
    }

    /// Appends the node's samples to a gathered batch.
    fn gather(&self, batch: &mut SampleBatch) {
        match self {
            Self::Point(p) => {
                batch.positions.push(p.position());
                batch.angles.push(p.angle());
                batch.axes.push(p.axis());
            }
            Self::Surface(s) => {
                let samples = s.samples();
                batch.positions.extend(samples.positions);
                batch.angles.extend(samples.angles);
                batch.axes.extend(samples.axes);
            }
            Self::Collection(c) => {
                for child in &c.children {
                    child.gather(batch);
                }
            }
        }
    }
}

impl From<PointSensor> for SensorNode {
    fn from(sensor: PointSensor) -> Self {
        Self::Point(sensor)
    }
}

impl From<SurfaceSensor> for SensorNode {
    fn from(sensor: SurfaceSensor) -> Self {
        Self::Surface(sensor)
    }
}

impl From<SensorCollection> for SensorNode {
    fn from(collection: SensorCollection) -> Self {
        Self::Collection(collection)
    }
}

/// An ordered, flattenable tree of sensors under one rigid transform.
///
/// Every geometric operation applied to the collection propagates to all
/// descendants, so the relative geometry between children is preserved;
/// the collection's own transform tracks its nominal anchor point.
/// Membership changes only through [`add`](Self::add) and
/// [`remove`](Self::remove).
///
/// # Example
///
/// ```
/// use field_array::SensorCollection;
/// use field_types::PointSensor;
/// use nalgebra::{Point3, Vector3};
///
/// let mut collection = SensorCollection::new();
/// collection.add(PointSensor::at(Point3::new(1.0, 0.0, 0.0)));
/// collection.add(PointSensor::at(Point3::new(-1.0, 0.0, 0.0)));
///
/// collection.translate(&Vector3::new(0.0, 0.0, 2.0));
/// assert_eq!(collection[0].position(), Point3::new(1.0, 0.0, 2.0));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorCollection {
    frame: RigidFrame,
    children: Vec<SensorNode>,
}

impl SensorCollection {
    /// Creates an empty collection anchored at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty collection with an explicit transform.
    #[must_use]
    pub fn with_frame(frame: RigidFrame) -> Self {
        Self {
            frame,
            children: Vec::new(),
        }
    }

    /// Creates a collection at the origin holding the given members.
    #[must_use]
    pub fn from_nodes<I, N>(nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<SensorNode>,
    {
        let mut collection = Self::new();
        collection.add_all(nodes);
        collection
    }

    /// Adds a member.
    ///
    /// A collection argument is flattened: its children are absorbed
    /// recursively instead of nesting the collection itself. A node equal
    /// to an existing child is skipped, so adding is idempotent.
    pub fn add(&mut self, item: impl Into<SensorNode>) {
        match item.into() {
            SensorNode::Collection(collection) => {
                for child in collection.children {
                    self.add(child);
                }
            }
            node => {
                if !self.children.contains(&node) {
                    self.children.push(node);
                }
            }
        }
    }

    /// Adds several members, with the same flattening and deduplication
    /// as [`add`](Self::add).
    pub fn add_all<I, N>(&mut self, items: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<SensorNode>,
    {
        for item in items {
            self.add(item);
        }
    }

    /// Removes a member.
    ///
    /// A collection argument is flattened: each of its children is removed.
    /// Removing a node that is not present is a no-op.
    pub fn remove(&mut self, item: &SensorNode) {
        match item {
            SensorNode::Collection(collection) => {
                for child in &collection.children {
                    self.remove(child);
                }
            }
            node => {
                if let Some(index) = self.children.iter().position(|c| c == node) {
                    self.children.remove(index);
                }
            }
        }
    }

    /// The collection's own rigid transform.
    #[must_use]
    pub const fn frame(&self) -> &RigidFrame {
        &self.frame
    }

    /// The members, in insertion order.
    #[must_use]
    pub fn children(&self) -> &[SensorNode] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [SensorNode] {
        &mut self.children
    }

    /// Number of direct members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the collection has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterates over the members.
    pub fn iter(&self) -> std::slice::Iter<'_, SensorNode> {
        self.children.iter()
    }

    /// World-frame position of the collection's anchor.
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

    /// Translates the collection and every descendant by the same vector.
    pub fn translate(&mut self, displacement: &Vector3<f64>) {
        self.frame.translate(displacement);
        for child in &mut self.children {
            child.translate(displacement);
        }
    }

    /// Rotates the collection and every descendant about the resolved
    /// anchor.
    ///
    /// The anchor defaults to the collection's position at call time and
    /// is resolved once, so all descendants rotate about the same fixed
    /// point and their relative geometry is preserved.
    pub fn rotate(&mut self, angle_deg: f64, axis: &Vector3<f64>, anchor: Anchor) {
        let anchor = self.frame.resolve_anchor(anchor);
        self.frame.rotate(angle_deg, axis, Anchor::Point(anchor));
        for child in &mut self.children {
            child.rotate(angle_deg, axis, Anchor::Point(anchor));
        }
    }

    /// Moves the collection so its anchor sits at `position`.
    ///
    /// Defined as a rigid translation by the difference from the current
    /// position, so every descendant moves along.
    pub fn set_position(&mut self, position: Point3<f64>) {
        let displacement = position - self.frame.position;
        self.translate(&displacement);
    }

    /// Rotates the collection (about its own position) so its orientation
    /// angle becomes `angle_deg` about the current axis.
    pub fn set_angle(&mut self, angle_deg: f64) {
        let delta = angle_deg - self.frame.angle;
        let axis = self.frame.axis;
        self.rotate(delta, &axis, Anchor::OwnPosition);
    }

    /// Re-expresses the current orientation angle about a new axis.
    ///
    /// Un-rotates by the current angle about the old axis, then re-rotates
    /// by the same angle about `axis`; both rotations anchor on the
    /// collection's position. The order is semantic — descendants swing
    /// through world space, which a direct field write would miss.
    pub fn set_axis(&mut self, axis: Vector3<f64>) {
        let angle = self.frame.angle;
        let old_axis = self.frame.axis;
        self.rotate(-angle, &old_axis, Anchor::OwnPosition);
        self.rotate(angle, &axis, Anchor::OwnPosition);
    }

    /// Gathers the full recursive batch of descendant samples.
    ///
    /// Depth-first over the children: point sensors contribute one sample,
    /// surface sensors their whole grid, nested collections recurse. The
    /// batch is flat and index-aligned.
    #[must_use]
    pub fn gather_batch(&self) -> SampleBatch {
        let mut batch = SampleBatch::default();
        for child in &self.children {
            child.gather(&mut batch);
        }
        batch
    }

    /// Positions of the direct children (one per child, not recursive).
    #[must_use]
    pub fn child_positions(&self) -> Vec<Point3<f64>> {
        self.children.iter().map(SensorNode::position).collect()
    }

    /// Orientation angles of the direct children.
    #[must_use]
    pub fn child_angles(&self) -> Vec<f64> {
        self.children.iter().map(SensorNode::angle).collect()
    }

    /// Orientation axes of the direct children.
    #[must_use]
    pub fn child_axes(&self) -> Vec<Vector3<f64>> {
        self.children.iter().map(SensorNode::axis).collect()
    }

    /// Aggregates the field over every descendant sample.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::EmptyBatch`](crate::ArrayError::EmptyBatch)
    /// if the collection holds no samples while sources are supplied;
    /// source query failures propagate.
    pub fn field_at(&self, sources: &[&dyn FieldSource]) -> ArrayResult<FieldSamples> {
        self.gather_batch().aggregate(sources)
    }
}

impl Index<usize> for SensorCollection {
    type Output = SensorNode;

    fn index(&self, index: usize) -> &Self::Output {
        &self.children[index]
    }
}

impl<'a> IntoIterator for &'a SensorCollection {
    type Item = &'a SensorNode;
    type IntoIter = std::slice::Iter<'a, SensorNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}

/// Union of two member sets into a new collection anchored at the origin.
impl<N: Into<SensorNode>> Add<N> for SensorCollection {
    type Output = Self;

    fn add(self, rhs: N) -> Self {
        let mut out = Self::new();
        out.add_all(self.children);
        SensorCollection::add(&mut out, rhs);
        out
    }
}

/// Difference of two member sets into a new collection anchored at the
/// origin.
impl<N: Into<SensorNode>> Sub<N> for SensorCollection {
    type Output = Self;

    fn sub(self, rhs: N) -> Self {
        let mut out = Self::new();
        out.add_all(self.children);
        out.remove(&rhs.into());
        out
    }
}

impl fmt::Display for SensorCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SensorCollection")?;
        writeln!(f, "  children: n={}", self.children.len())?;
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
