//! Field sample tables.
//!
//! A [`FieldTable`] holds scattered `(x, y, z, Bx, By, Bz)` samples, sorted
//! lexicographically by position. It can be built from an ASCII file, a
//! record list, or a raw numeric array; the column order is a documented
//! caller contract in all three cases.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{SourceError, SourceResult};

/// One field sample: a position and the field vector measured there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldRecord {
    /// X coordinate of the sample position.
    pub x: f64,
    /// Y coordinate of the sample position.
    pub y: f64,
    /// Z coordinate of the sample position.
    pub z: f64,
    /// X component of the field.
    pub bx: f64,
    /// Y component of the field.
    pub by: f64,
    /// Z component of the field.
    pub bz: f64,
}

impl FieldRecord {
    /// Creates a record from its six columns.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64, bx: f64, by: f64, bz: f64) -> Self {
        Self {
            x,
            y,
            z,
            bx,
            by,
            bz,
        }
    }

    /// Sample position.
    #[must_use]
    pub const fn position(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }

    /// Field vector at the sample position.
    #[must_use]
    pub const fn field(&self) -> Vector3<f64> {
        Vector3::new(self.bx, self.by, self.bz)
    }

    /// Field magnitude at the sample position.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.field().norm()
    }
}

/// A coarse `(x, y, z, |B|)` sample kept for lightweight visualization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DownsampledPoint {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
    /// Field magnitude.
    pub magnitude: f64,
}

/// An owned table of field samples, sorted by `(x, y, z)`.
///
/// # Column Contract
///
/// Input columns must be ordered `x, y, z, Bx, By, Bz`. The table cannot
/// detect swapped columns; feeding it reordered data silently corrupts
/// every downstream field value.
///
/// # Example
///
/// ```
/// use field_source::{FieldRecord, FieldTable};
///
/// let table = FieldTable::from_rows(&[
///     [1.0, 0.0, 0.0, 0.1, 0.0, 0.0],
///     [0.0, 0.0, 0.0, 0.2, 0.0, 0.0],
/// ])
/// .unwrap();
///
/// // Rows are sorted by position on construction.
/// assert_eq!(table.records()[0].x, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldTable {
    records: Vec<FieldRecord>,
}

impl FieldTable {
    /// Builds a table from records, sorting them by `(x, y, z)`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::EmptyTable`] if `records` is empty.
    pub fn from_records(mut records: Vec<FieldRecord>) -> SourceResult<Self> {
        if records.is_empty() {
            return Err(SourceError::EmptyTable);
        }
        records.sort_by(|a, b| {
            a.x.total_cmp(&b.x)
                .then_with(|| a.y.total_cmp(&b.y))
                .then_with(|| a.z.total_cmp(&b.z))
        });
        Ok(Self { records })
    }

    /// Builds a table from raw `[x, y, z, bx, by, bz]` rows.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::EmptyTable`] if `rows` is empty.
    pub fn from_rows(rows: &[[f64; 6]]) -> SourceResult<Self> {
        Self::from_records(
            rows.iter()
                .map(|r| FieldRecord::new(r[0], r[1], r[2], r[3], r[4], r[5]))
                .collect(),
        )
    }

    /// Loads a table from an ASCII file.
    ///
    /// Values may be comma- or whitespace-separated, six per row. Blank
    /// lines and `#`/`//` comments are skipped, as is a single leading
    /// header row of column names.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a data row cannot be
    /// parsed, or no rows remain.
    pub fn load<P: AsRef<Path>>(path: P) -> SourceResult<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut records = Vec::new();
        let mut header_allowed = true;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
                continue;
            }

            match parse_record(index + 1, line) {
                Ok(record) => {
                    records.push(record);
                    header_allowed = false;
                }
                // The first non-comment line may be a header of column names.
                Err(_) if header_allowed => header_allowed = false,
                Err(err) => return Err(err),
            }
        }

        Self::from_records(records)
    }

    /// The sorted records.
    #[must_use]
    pub fn records(&self) -> &[FieldRecord] {
        &self.records
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no rows (never true after construction).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Minimum and maximum corners of the spatial bounding box.
    #[must_use]
    pub fn bounds(&self) -> (Point3<f64>, Point3<f64>) {
        let mut min = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for r in &self.records {
            min.x = min.x.min(r.x);
            min.y = min.y.min(r.y);
            min.z = min.z.min(r.z);
            max.x = max.x.max(r.x);
            max.y = max.y.max(r.y);
            max.z = max.z.max(r.z);
        }
        (min, max)
    }

    /// Size of the spatial bounding box.
    #[must_use]
    pub fn extent(&self) -> Vector3<f64> {
        let (min, max) = self.bounds();
        max - min
    }

    /// Centroid of the spatial bounding box.
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        let (min, max) = self.bounds();
        nalgebra::center(&min, &max)
    }

    /// Unique sorted X coordinates.
    #[must_use]
    pub fn unique_x(&self) -> Vec<f64> {
        unique_sorted(self.records.iter().map(|r| r.x))
    }

    /// Unique sorted Y coordinates.
    #[must_use]
    pub fn unique_y(&self) -> Vec<f64> {
        unique_sorted(self.records.iter().map(|r| r.y))
    }

    /// Unique sorted Z coordinates.
    #[must_use]
    pub fn unique_z(&self) -> Vec<f64> {
        unique_sorted(self.records.iter().map(|r| r.z))
    }

    /// Selects a coarse subset of the table for visualization.
    ///
    /// For each spatial axis, every k-th unique coordinate is kept, with
    /// `k = max(1, unique_count / target_per_axis)`; rows survive when all
    /// three of their coordinates are kept. The result carries field
    /// magnitudes, not components, and plays no part in field computation.
    #[must_use]
    pub fn downsample(&self, target_per_axis: usize) -> Vec<DownsampledPoint> {
        let target = target_per_axis.max(1);
        let keep_x = stride_select(&self.unique_x(), target);
        let keep_y = stride_select(&self.unique_y(), target);
        let keep_z = stride_select(&self.unique_z(), target);

        self.records
            .iter()
            .filter(|r| {
                contains_coord(&keep_x, r.x)
                    && contains_coord(&keep_y, r.y)
                    && contains_coord(&keep_z, r.z)
            })
            .map(|r| DownsampledPoint {
                x: r.x,
                y: r.y,
                z: r.z,
                magnitude: r.magnitude(),
            })
            .collect()
    }
}

/// Parses one six-column data row.
fn parse_record(line: usize, text: &str) -> SourceResult<FieldRecord> {
    let columns: Vec<&str> = if text.contains(',') {
        text.split(',').map(str::trim).collect()
    } else {
        text.split_whitespace().collect()
    };

    if columns.len() != 6 {
        return Err(SourceError::parse_row(
            line,
            format!("expected 6 columns, found {}", columns.len()),
        ));
    }

    let mut values = [0.0_f64; 6];
    for (value, column) in values.iter_mut().zip(&columns) {
        *value = column
            .parse()
            .map_err(|_| SourceError::parse_row(line, format!("invalid number: {column:?}")))?;
    }

    Ok(FieldRecord::new(
        values[0], values[1], values[2], values[3], values[4], values[5],
    ))
}

fn unique_sorted(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut v: Vec<f64> = values.collect();
    v.sort_by(f64::total_cmp);
    v.dedup();
    v
}

fn stride_select(coords: &[f64], target: usize) -> Vec<f64> {
    let stride = (coords.len() / target).max(1);
    coords.iter().copied().step_by(stride).collect()
}

fn contains_coord(coords: &[f64], value: f64) -> bool {
    coords.binary_search_by(|c| c.total_cmp(&value)).is_ok()
}
