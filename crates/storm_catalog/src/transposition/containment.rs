//! Polygon-containment transposition test.
use glam::DVec2;

use crate::error::Result;
use crate::geometry::{Coordinate, EdgeIndex, Polygon};
use crate::transposition::{StormCenter, TranspositionTest};

/// Accepts a placement when the watershed, moved by the storm's offset, lies inside the
/// transposition domain.
///
/// The watershed is translated by `P - C`; the domain is never moved. The watershed may
/// touch the domain boundary from inside. No raster data is needed, so this is much
/// cheaper than [`crate::transposition::RasterDepthTest`] at the cost of ignoring actual
/// rainfall depth.
#[derive(Clone, Debug)]
pub struct ContainmentTest {
    watershed: Polygon,
    domain: Polygon,
    watershed_edges: EdgeIndex,
    domain_edges: EdgeIndex,
}

impl ContainmentTest {
    /// Both polygons must be simple; a bad boundary is fatal before any storm runs.
    pub fn try_new(watershed: Polygon, domain: Polygon) -> Result<Self> {
        watershed.validate("watershed boundary")?;
        domain.validate("transposition domain")?;
        Ok(Self {
            watershed_edges: EdgeIndex::new(&watershed),
            domain_edges: EdgeIndex::new(&domain),
            watershed,
            domain,
        })
    }

    pub fn watershed(&self) -> &Polygon {
        &self.watershed
    }

    pub fn domain(&self) -> &Polygon {
        &self.domain
    }

    /// Whether the watershed moved by `offset` stays inside the domain.
    pub fn accepts_offset(&self, offset: DVec2) -> bool {
        self.domain_edges.contains(&self.watershed_edges, offset)
    }

    pub fn is_valid(&self, storm: &StormCenter, candidate: Coordinate) -> bool {
        self.accepts_offset(storm.offset_to(candidate))
    }
}

impl TranspositionTest for ContainmentTest {
    fn test_storm(&self, storm: &StormCenter, candidates: &[Coordinate]) -> Result<Vec<bool>> {
        Ok(candidates
            .iter()
            .map(|c| self.is_valid(storm, *c))
            .collect())
    }
}
