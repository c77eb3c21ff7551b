//! Planar geometry used by candidate generation and transposition tests.
//!
//! Coordinates are projected (e.g. equal-area meters), so everything is `f64`.
//! Polygons are immutable values: translating one returns a new polygon.
use std::fmt::Write as _;

use glam::DVec2;

use crate::error::{Error, Result};

pub mod edge_index;
pub mod polygon;

pub use edge_index::{EdgeIndex, PointLocation};
pub use polygon::{Polygon, Ring};

/// A projected 2D location.
pub type Coordinate = DVec2;

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
    pub min: DVec2,
    pub max: DVec2,
}

impl Envelope {
    /// Smallest envelope covering all `points`, or `None` when empty.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a DVec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        Some(Self { min, max })
    }

    pub fn width(&self) -> f64 {
        (self.max.x - self.min.x).abs()
    }

    pub fn height(&self) -> f64 {
        (self.max.y - self.min.y).abs()
    }

    /// Inclusive bounds test.
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// True if `other` lies inside these bounds, edges included.
    pub fn covers(&self, other: &Envelope) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }

    pub fn intersects(&self, other: &Envelope) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

/// Ordered collection of coordinates (candidate placements, fishnets, cell centers).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CoordinateList {
    pub coordinates: Vec<Coordinate>,
}

impl CoordinateList {
    pub fn new() -> Self {
        Self {
            coordinates: Vec::new(),
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            coordinates: Vec::with_capacity(cap),
        }
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    pub fn push(&mut self, c: Coordinate) {
        self.coordinates.push(c);
    }

    pub fn get(&self, index: usize) -> Option<Coordinate> {
        self.coordinates.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coordinate> {
        self.coordinates.iter()
    }

    /// Returns every coordinate shifted by `offset`.
    pub fn offset(&self, offset: DVec2) -> Self {
        self.coordinates.iter().map(|c| *c + offset).collect()
    }

    /// Keeps only the coordinates strictly inside `polygon`, preserving order.
    pub fn clipped_to(&self, polygon: &Polygon) -> Self {
        self.coordinates
            .iter()
            .copied()
            .filter(|c| polygon.contains_point(*c))
            .collect()
    }

    /// Renders the list as an `x,y` table with a header row.
    pub fn to_csv(&self) -> String {
        let mut out = String::with_capacity(8 + self.coordinates.len() * 24);
        out.push_str("x,y\n");
        for c in &self.coordinates {
            let _ = writeln!(out, "{},{}", c.x, c.y);
        }
        out
    }

    /// Parses an `x,y` table. The first row is a header; blank lines are ignored.
    pub fn from_csv(text: &str) -> Result<Self> {
        let mut list = CoordinateList::new();
        for (i, line) in text.lines().enumerate().skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split(',');
            let x = parse_field(fields.next(), i + 1)?;
            let y = parse_field(fields.next(), i + 1)?;
            list.push(DVec2::new(x, y));
        }
        Ok(list)
    }
}

fn parse_field(field: Option<&str>, line: usize) -> Result<f64> {
    let raw = field.ok_or_else(|| Error::InvalidConfig(format!("row {line}: missing column")))?;
    raw.trim()
        .parse::<f64>()
        .map_err(|e| Error::InvalidConfig(format!("row {line}: '{raw}': {e}")))
}

impl FromIterator<Coordinate> for CoordinateList {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self {
            coordinates: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Coordinate>> for CoordinateList {
    fn from(coordinates: Vec<Coordinate>) -> Self {
        Self { coordinates }
    }
}

impl Extend<Coordinate> for CoordinateList {
    fn extend<I: IntoIterator<Item = Coordinate>>(&mut self, iter: I) {
        self.coordinates.extend(iter);
    }
}
