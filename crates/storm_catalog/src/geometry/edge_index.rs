//! Grid-bucketed edge index for point location and polygon containment.
//!
//! Edges of every ring are binned into a uniform grid laid over the polygon's envelope,
//! so a query only visits edges whose cells overlap the query box. Queries against a
//! translated copy take the offset as an argument; indexed geometry is never moved.
use glam::DVec2;

use crate::geometry::polygon::{cross, crosses_properly, on_segment};
use crate::geometry::{Envelope, Polygon};

/// Upper bound on grid cells along each axis.
const MAX_CELLS_PER_AXIS: usize = 1024;

/// Where a point lies relative to a polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointLocation {
    Interior,
    Boundary,
    Exterior,
}

#[derive(Clone, Copy, Debug)]
struct Edge {
    a: DVec2,
    b: DVec2,
}

impl Edge {
    fn envelope(&self) -> Envelope {
        Envelope {
            min: self.a.min(self.b),
            max: self.a.max(self.b),
        }
    }
}

/// Edges of a polygon's rings, bucketed by grid cell.
#[derive(Clone, Debug)]
pub struct EdgeIndex {
    envelope: Envelope,
    /// Exterior ring edges first, then every hole's.
    edges: Vec<Edge>,
    exterior_len: usize,
    side: usize,
    cell: DVec2,
    cells: Vec<Vec<usize>>,
}

impl EdgeIndex {
    pub fn new(polygon: &Polygon) -> Self {
        let edges: Vec<Edge> = polygon
            .rings()
            .flat_map(|ring| ring.edges().map(|(a, b)| Edge { a, b }))
            .collect();
        let envelope = polygon.envelope();
        let side = ((edges.len() as f64).sqrt().ceil() as usize).clamp(1, MAX_CELLS_PER_AXIS);
        let cell = DVec2::new(
            (envelope.width() / side as f64).max(f64::MIN_POSITIVE),
            (envelope.height() / side as f64).max(f64::MIN_POSITIVE),
        );

        let mut index = Self {
            envelope,
            exterior_len: polygon.exterior().len(),
            edges,
            side,
            cell,
            cells: vec![Vec::new(); side * side],
        };
        for id in 0..index.edges.len() {
            let (c0, c1, r0, r1) = index.cell_span(index.edges[id].envelope());
            for row in r0..=r1 {
                for col in c0..=c1 {
                    index.cells[row * side + col].push(id);
                }
            }
        }
        index
    }

    pub fn envelope(&self) -> Envelope {
        self.envelope
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Locates `p` relative to the indexed polygon, holes included.
    pub fn locate(&self, p: DVec2) -> PointLocation {
        self.locate_with(p, &mut Vec::new())
    }

    /// OGC `Contains`: whether the indexed polygon contains `other` moved by `offset`.
    ///
    /// `other` may touch the boundary from inside. It is rejected as soon as any part of
    /// its exterior ring leaves the closure of this polygon, or when a hole of this
    /// polygon lies in its interior.
    pub fn contains(&self, other: &EdgeIndex, offset: DVec2) -> bool {
        let moved = Envelope {
            min: other.envelope.min + offset,
            max: other.envelope.max + offset,
        };
        if !self.envelope.covers(&moved) {
            return false;
        }

        let mut scratch = Vec::new();
        let mut cuts = Vec::new();
        let mut shared = Vec::new();
        for edge in &other.edges[..other.exterior_len] {
            let (a, b) = (edge.a + offset, edge.b + offset);
            if self.locate_with(a, &mut scratch) == PointLocation::Exterior {
                return false;
            }
            let len2 = (b - a).length_squared();
            if len2 == 0.0 {
                continue;
            }

            // Split the edge wherever it meets this boundary; each piece must stay covered.
            self.candidates(Edge { a, b }.envelope(), &mut scratch);
            cuts.clear();
            cuts.extend([0.0, 1.0]);
            shared.clear();
            for &id in &scratch {
                let Edge { a: c, b: d } = self.edges[id];
                if crosses_properly(a, b, c, d) {
                    return false;
                }
                let tc = on_segment(c, a, b).then(|| (c - a).dot(b - a) / len2);
                let td = on_segment(d, a, b).then(|| (d - a).dot(b - a) / len2);
                cuts.extend(tc.into_iter().chain(td));
                if cross(a, b, c) == 0.0 && cross(a, b, d) == 0.0 {
                    let t0 = (c - a).dot(b - a) / len2;
                    let t1 = (d - a).dot(b - a) / len2;
                    shared.push((t0.min(t1), t0.max(t1)));
                }
            }
            cuts.sort_unstable_by(f64::total_cmp);
            cuts.dedup();

            for pair in cuts.windows(2) {
                let t = (pair[0] + pair[1]) * 0.5;
                if pair[1] <= pair[0] || shared.iter().any(|&(lo, hi)| lo <= t && t <= hi) {
                    continue;
                }
                if self.locate_with(a + (b - a) * t, &mut scratch) == PointLocation::Exterior {
                    return false;
                }
            }
        }

        let mut other_scratch = Vec::new();
        for edge in &self.edges[self.exterior_len..] {
            for p in [edge.a, (edge.a + edge.b) * 0.5] {
                if other.locate_with(p - offset, &mut other_scratch) == PointLocation::Interior {
                    return false;
                }
            }
        }
        true
    }

    fn locate_with(&self, p: DVec2, scratch: &mut Vec<usize>) -> PointLocation {
        if !self.envelope.contains(p) {
            return PointLocation::Exterior;
        }
        self.candidates(Envelope { min: p, max: p }, scratch);
        if scratch.iter().any(|&id| on_segment(p, self.edges[id].a, self.edges[id].b)) {
            return PointLocation::Boundary;
        }

        // Even-odd count along a ray towards +x.
        let ray = Envelope {
            min: p,
            max: DVec2::new(self.envelope.max.x, p.y),
        };
        self.candidates(ray, scratch);
        let mut inside = false;
        for &id in scratch.iter() {
            let Edge { a, b } = self.edges[id];
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
        if inside {
            PointLocation::Interior
        } else {
            PointLocation::Exterior
        }
    }

    /// Ids of edges whose envelope intersects `query`, sorted and unique.
    fn candidates(&self, query: Envelope, out: &mut Vec<usize>) {
        out.clear();
        if !self.envelope.intersects(&query) {
            return;
        }
        let (c0, c1, r0, r1) = self.cell_span(query);
        for row in r0..=r1 {
            for col in c0..=c1 {
                out.extend_from_slice(&self.cells[row * self.side + col]);
            }
        }
        out.sort_unstable();
        out.dedup();
        out.retain(|&id| self.edges[id].envelope().intersects(&query));
    }

    /// Inclusive column and row ranges covered by `env`, clamped to the grid.
    fn cell_span(&self, env: Envelope) -> (usize, usize, usize, usize) {
        let last = self.side - 1;
        let col = |x: f64| {
            let t = ((x - self.envelope.min.x) / self.cell.x).floor();
            (t.max(0.0) as usize).min(last)
        };
        let row = |y: f64| {
            let t = ((y - self.envelope.min.y) / self.cell.y).floor();
            (t.max(0.0) as usize).min(last)
        };
        (col(env.min.x), col(env.max.x), row(env.min.y), row(env.max.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Ring;

    fn circle(center: DVec2, radius: f64, n: usize) -> Polygon {
        let points = (0..n)
            .map(|i| {
                let a = i as f64 / n as f64 * core::f64::consts::TAU;
                center + DVec2::new(a.cos(), a.sin()) * radius
            })
            .collect();
        Polygon::from_points(points).expect("valid circle")
    }

    /// Square domain with a V-shaped notch cut down from the top between x = 3 and x = 9.
    fn notched() -> Polygon {
        Polygon::from_points(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(12.0, 0.0),
            DVec2::new(12.0, 10.0),
            DVec2::new(10.0, 10.0),
            DVec2::new(9.0, 5.0),
            DVec2::new(6.0, 2.0),
            DVec2::new(3.0, 5.0),
            DVec2::new(2.0, 10.0),
            DVec2::new(0.0, 10.0),
        ])
        .expect("valid polygon")
    }

    #[test]
    fn locate_distinguishes_interior_boundary_and_holes() {
        let hole = Ring::new(vec![
            DVec2::new(4.0, 4.0),
            DVec2::new(6.0, 4.0),
            DVec2::new(6.0, 6.0),
            DVec2::new(4.0, 6.0),
        ])
        .expect("valid hole");
        let square = Polygon::rectangle(DVec2::ZERO, DVec2::splat(10.0));
        let index = EdgeIndex::new(&Polygon::new(square.exterior().clone(), vec![hole]));

        assert_eq!(index.locate(DVec2::new(1.0, 1.0)), PointLocation::Interior);
        assert_eq!(index.locate(DVec2::new(0.0, 3.0)), PointLocation::Boundary);
        assert_eq!(index.locate(DVec2::new(4.0, 5.0)), PointLocation::Boundary);
        assert_eq!(index.locate(DVec2::new(5.0, 5.0)), PointLocation::Exterior);
        assert_eq!(index.locate(DVec2::new(11.0, 5.0)), PointLocation::Exterior);
    }

    #[test]
    fn shared_edges_are_contained() {
        let domain = EdgeIndex::new(&Polygon::rectangle(DVec2::ZERO, DVec2::splat(100.0)));
        let inner = EdgeIndex::new(&Polygon::rectangle(
            DVec2::new(0.0, 20.0),
            DVec2::new(50.0, 60.0),
        ));
        assert!(domain.contains(&inner, DVec2::ZERO));
        assert!(domain.contains(&inner, DVec2::new(50.0, 40.0)));
        assert!(!domain.contains(&inner, DVec2::new(-1.0, 0.0)));
        assert!(!domain.contains(&inner, DVec2::new(50.5, 0.0)));
        assert!(domain.contains(&domain, DVec2::ZERO));
    }

    #[test]
    fn shared_diagonal_edge_is_contained() {
        let triangle = Polygon::from_points(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(0.0, 10.0),
        ])
        .expect("valid triangle");
        let wedge = Polygon::from_points(vec![
            DVec2::new(2.0, 2.0),
            DVec2::new(8.0, 2.0),
            DVec2::new(2.0, 8.0),
        ])
        .expect("valid wedge");
        assert!(EdgeIndex::new(&triangle).contains(&EdgeIndex::new(&wedge), DVec2::ZERO));
    }

    #[test]
    fn edge_leaving_through_vertices_is_rejected() {
        // The top edge runs along y = 5 through both notch corners, crossing no edge
        // properly, yet its middle lies inside the notch.
        let triangle = Polygon::from_points(vec![
            DVec2::new(1.0, 5.0),
            DVec2::new(6.0, 1.0),
            DVec2::new(11.0, 5.0),
        ])
        .expect("valid triangle");
        let domain = EdgeIndex::new(&notched());
        assert!(!domain.contains(&EdgeIndex::new(&triangle), DVec2::ZERO));

        let strip = Polygon::rectangle(DVec2::new(1.0, 1.0), DVec2::new(11.0, 1.5));
        assert!(domain.contains(&EdgeIndex::new(&strip), DVec2::ZERO));
        assert!(!domain.contains(&EdgeIndex::new(&strip), DVec2::new(0.0, 1.0)));
    }

    #[test]
    fn offset_queries_match_translated_polygons() {
        let domain = circle(DVec2::ZERO, 100.0, 400);
        let watershed = circle(DVec2::new(10.0, 0.0), 20.0, 150);
        let domain_index = EdgeIndex::new(&domain);
        let watershed_index = EdgeIndex::new(&watershed);
        for k in 0..40 {
            let offset = DVec2::new(k as f64 * 2.5, k as f64 * -1.5);
            let moved = EdgeIndex::new(&watershed.translated(offset));
            assert_eq!(
                domain_index.contains(&watershed_index, offset),
                domain_index.contains(&moved, DVec2::ZERO),
                "offset {offset}"
            );
        }
        assert!(domain_index.contains(&watershed_index, DVec2::ZERO));
        assert!(!domain_index.contains(&watershed_index, DVec2::new(75.0, 0.0)));
    }

    #[test]
    fn dense_rings_are_bucketed() {
        let domain = EdgeIndex::new(&circle(DVec2::ZERO, 1000.0, 4000));
        let watershed = EdgeIndex::new(&circle(DVec2::ZERO, 200.0, 4000));
        assert_eq!(domain.edge_count(), 4000);
        assert_eq!(domain.side, 64);
        assert!(domain.contains(&watershed, DVec2::new(300.0, 300.0)));
        assert!(!domain.contains(&watershed, DVec2::new(900.0, 0.0)));
    }
}
