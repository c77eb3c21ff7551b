//! Raster-depth transposition test.
use glam::DVec2;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::{Coordinate, CoordinateList, Polygon};
use crate::raster::{DepthRaster, RasterCatalog};
use crate::sampling::UniformGridSampling;
use crate::transposition::{StormCenter, TranspositionTest};

/// Accepts a placement when the storm's depth field, moved onto it, still rains on the
/// study area without leaving the raster.
///
/// Moving the storm by `offset` is equivalent to reading its raster at every study-area
/// cell center shifted by `-offset`. A placement is valid iff at least one queried depth
/// exceeds `threshold` and no query is out of range or no-data.
pub struct RasterDepthTest {
    rasters: RasterCatalog,
    study_cells: CoordinateList,
    threshold: f64,
}

impl RasterDepthTest {
    /// Samples the study area at `cell_spacing` to build the query grid.
    pub fn try_new(
        rasters: RasterCatalog,
        study_area: &Polygon,
        cell_spacing: f64,
        threshold: f64,
    ) -> Result<Self> {
        study_area.validate("study area")?;
        let cells = UniformGridSampling::try_new(cell_spacing)?.grid_points(study_area);
        Self::with_cells(rasters, cells, threshold)
    }

    /// Uses an explicit list of study-area cell centers.
    pub fn with_cells(
        rasters: RasterCatalog,
        study_cells: CoordinateList,
        threshold: f64,
    ) -> Result<Self> {
        if study_cells.is_empty() {
            return Err(Error::InvalidConfig("study area produced no cell centers".into()));
        }
        if !threshold.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "acceptance depth threshold must be finite, got {threshold}"
            )));
        }
        debug!("Raster depth test over {} study cells.", study_cells.len());
        Ok(Self {
            rasters,
            study_cells,
            threshold,
        })
    }

    pub fn study_cells(&self) -> &CoordinateList {
        &self.study_cells
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Evaluates one offset against an already resolved raster.
    pub fn accepts_offset(&self, raster: &dyn DepthRaster, offset: DVec2) -> bool {
        let mut has_precipitation = false;
        for cell in self.study_cells.iter() {
            match raster.depth_at(*cell - offset) {
                None => return false,
                Some(depth) if depth > self.threshold => has_precipitation = true,
                Some(_) => {}
            }
        }
        has_precipitation
    }
}

impl TranspositionTest for RasterDepthTest {
    fn test_storm(&self, storm: &StormCenter, candidates: &[Coordinate]) -> Result<Vec<bool>> {
        let raster = self.rasters.get(&storm.start_date)?;
        Ok(candidates
            .iter()
            .map(|c| self.accepts_offset(raster.as_ref(), storm.offset_to(*c)))
            .collect())
    }
}

impl std::fmt::Debug for RasterDepthTest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterDepthTest")
            .field("rasters", &self.rasters)
            .field("study_cells", &self.study_cells.len())
            .field("threshold", &self.threshold)
            .finish()
    }
}
