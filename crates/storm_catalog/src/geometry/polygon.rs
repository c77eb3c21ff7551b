//! Immutable polygons with point and polygon containment.
//!
//! A [`Polygon`] is an exterior [`Ring`] plus zero or more holes. Rings are stored open
//! (the closing vertex is implied). Point predicates treat the boundary as outside;
//! polygon containment follows OGC `Contains` and lets the inner polygon touch it.
use glam::DVec2;

use crate::error::{Error, Result};
use crate::geometry::{EdgeIndex, Envelope};

/// A closed ring of vertices, stored without the repeated closing vertex.
#[derive(Clone, Debug, PartialEq)]
pub struct Ring {
    points: Vec<DVec2>,
}

impl Ring {
    /// Builds a ring, dropping an explicit closing vertex if present.
    pub fn new(mut points: Vec<DVec2>) -> Result<Self> {
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            return Err(Error::Geometry(format!(
                "ring needs at least 3 distinct vertices, got {}",
                points.len()
            )));
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(Error::Geometry("ring has a non-finite vertex".into()));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates edges `(a, b)` including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    pub fn translated(&self, offset: DVec2) -> Ring {
        Ring {
            points: self.points.iter().map(|p| *p + offset).collect(),
        }
    }

    pub fn envelope(&self) -> Envelope {
        // Rings always hold at least three vertices.
        Envelope::from_points(&self.points).unwrap_or(Envelope {
            min: DVec2::ZERO,
            max: DVec2::ZERO,
        })
    }

    /// True if no two non-adjacent edges touch.
    pub fn is_simple(&self) -> bool {
        let n = self.points.len();
        let edges: Vec<_> = self.edges().collect();
        for i in 0..n {
            for j in (i + 1)..n {
                let adjacent = j == i + 1 || (i == 0 && j == n - 1);
                if adjacent {
                    // Adjacent edges may only share their common vertex.
                    let (a0, a1) = edges[i];
                    let (b0, b1) = edges[j];
                    let shared = if j == i + 1 { a1 } else { a0 };
                    let other_a = if j == i + 1 { a0 } else { a1 };
                    let other_b = if j == i + 1 { b1 } else { b0 };
                    if (on_segment(other_b, a0, a1) && other_b != shared)
                        || (on_segment(other_a, b0, b1) && other_a != shared)
                    {
                        return false;
                    }
                    continue;
                }
                if segments_touch(edges[i].0, edges[i].1, edges[j].0, edges[j].1) {
                    return false;
                }
            }
        }
        true
    }

    /// Even-odd crossing test; the result is unspecified for points on an edge.
    fn crossings_contain(&self, p: DVec2) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    fn on_boundary(&self, p: DVec2) -> bool {
        self.edges().any(|(a, b)| on_segment(p, a, b))
    }
}

/// A polygon with one exterior ring and optional holes.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    exterior: Ring,
    holes: Vec<Ring>,
}

impl Polygon {
    pub fn new(exterior: Ring, holes: Vec<Ring>) -> Self {
        Self { exterior, holes }
    }

    /// Builds a hole-free polygon from raw vertices.
    pub fn from_points(points: Vec<DVec2>) -> Result<Self> {
        Ok(Self::new(Ring::new(points)?, Vec::new()))
    }

    /// Axis-aligned rectangle spanning `min..max`.
    pub fn rectangle(min: DVec2, max: DVec2) -> Self {
        Self {
            exterior: Ring {
                points: vec![
                    min,
                    DVec2::new(max.x, min.y),
                    max,
                    DVec2::new(min.x, max.y),
                ],
            },
            holes: Vec::new(),
        }
    }

    pub fn exterior(&self) -> &Ring {
        &self.exterior
    }

    pub fn holes(&self) -> &[Ring] {
        &self.holes
    }

    /// Iterates the exterior ring followed by every hole.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.exterior).chain(self.holes.iter())
    }

    pub fn envelope(&self) -> Envelope {
        self.exterior.envelope()
    }

    /// Returns a copy with every vertex of every ring shifted by `offset`.
    pub fn translated(&self, offset: DVec2) -> Polygon {
        Polygon {
            exterior: self.exterior.translated(offset),
            holes: self.holes.iter().map(|h| h.translated(offset)).collect(),
        }
    }

    /// True if every ring is simple.
    pub fn is_simple(&self) -> bool {
        self.rings().all(Ring::is_simple)
    }

    /// Fails with [`Error::Geometry`] unless every ring is simple.
    pub fn validate(&self, name: &str) -> Result<()> {
        if !self.is_simple() {
            return Err(Error::Geometry(format!("{name} is not a simple polygon")));
        }
        Ok(())
    }

    /// Strict interior test: points on any ring are outside.
    pub fn contains_point(&self, p: DVec2) -> bool {
        if !self.envelope().contains(p) {
            return false;
        }
        if self.rings().any(|r| r.on_boundary(p)) {
            return false;
        }
        self.exterior.crossings_contain(p) && !self.holes.iter().any(|h| h.crossings_contain(p))
    }

    /// OGC `Contains`: no point of `other` lies outside `self`, though `other` may touch
    /// the boundary from inside.
    ///
    /// Builds an [`EdgeIndex`] for both polygons; index them once with
    /// [`EdgeIndex::contains`] when testing many placements.
    pub fn contains(&self, other: &Polygon) -> bool {
        if !self.envelope().covers(&other.envelope()) {
            return false;
        }
        EdgeIndex::new(self).contains(&EdgeIndex::new(other), DVec2::ZERO)
    }
}

#[inline]
pub(crate) fn cross(o: DVec2, a: DVec2, b: DVec2) -> f64 {
    (a - o).perp_dot(b - o)
}

pub(crate) fn on_segment(p: DVec2, a: DVec2, b: DVec2) -> bool {
    cross(a, b, p) == 0.0
        && p.x >= a.x.min(b.x)
        && p.x <= a.x.max(b.x)
        && p.y >= a.y.min(b.y)
        && p.y <= a.y.max(b.y)
}

/// True if the segments cross at a single point interior to both.
pub(crate) fn crosses_properly(a0: DVec2, a1: DVec2, b0: DVec2, b1: DVec2) -> bool {
    let d1 = cross(b0, b1, a0);
    let d2 = cross(b0, b1, a1);
    let d3 = cross(a0, a1, b0);
    let d4 = cross(a0, a1, b1);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

/// True if segments `a0a1` and `b0b1` share at least one point.
fn segments_touch(a0: DVec2, a1: DVec2, b0: DVec2, b1: DVec2) -> bool {
    if crosses_properly(a0, a1, b0, b1) {
        return true;
    }
    on_segment(a0, b0, b1)
        || on_segment(a1, b0, b1)
        || on_segment(b0, a0, a1)
        || on_segment(b1, a0, a1)
}
