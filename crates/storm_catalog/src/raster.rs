//! Gridded precipitation depth rasters and their lookup by storm start date.
//!
//! Validity testing only needs point queries, so rasters are consumed through the
//! [`DepthRaster`] trait. [`GridRaster`] is an in-memory implementation over a regular
//! lower-left-anchored grid; other sources plug in by implementing the trait.
use std::collections::HashMap;
use std::sync::Arc;

use glam::DVec2;

use crate::error::{Error, Result};

/// Point query against a storm's depth field.
///
/// Returns `None` for locations outside the raster or for no-data cells.
pub trait DepthRaster: Send + Sync {
    fn depth_at(&self, p: DVec2) -> Option<f64>;
}

/// Regular grid of depths with row 0 at the bottom edge.
#[derive(Clone, Debug)]
pub struct GridRaster {
    /// Lower-left corner of cell `(0, 0)`.
    pub origin: DVec2,
    pub cell_size: f64,
    pub width: usize,
    pub height: usize,
    pub data: Vec<f64>,
    /// Sentinel marking missing cells. NaN cells are always missing.
    pub nodata: Option<f64>,
}

impl GridRaster {
    /// Creates a raster from row-major `data` (bottom row first).
    pub fn try_new(
        origin: DVec2,
        cell_size: f64,
        width: usize,
        height: usize,
        data: Vec<f64>,
    ) -> Result<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "raster cell size must be > 0, got {cell_size}"
            )));
        }
        if data.len() != width * height {
            return Err(Error::InvalidConfig(format!(
                "raster of {width}x{height} cells needs {} values, got {}",
                width * height,
                data.len()
            )));
        }
        Ok(Self {
            origin,
            cell_size,
            width,
            height,
            data,
            nodata: None,
        })
    }

    /// Builds a raster by evaluating `f` at every cell center.
    pub fn from_fn(
        origin: DVec2,
        cell_size: f64,
        width: usize,
        height: usize,
        f: impl Fn(DVec2) -> f64,
    ) -> Result<Self> {
        let mut data = Vec::with_capacity(width * height);
        for iy in 0..height {
            for ix in 0..width {
                let center = origin
                    + DVec2::new((ix as f64 + 0.5) * cell_size, (iy as f64 + 0.5) * cell_size);
                data.push(f(center));
            }
        }
        Self::try_new(origin, cell_size, width, height, data)
    }

    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = Some(nodata);
        self
    }

    /// Cell indices containing `p`, or `None` when outside the grid.
    pub fn index_of(&self, p: DVec2) -> Option<(usize, usize)> {
        let local = (p - self.origin) / self.cell_size;
        if !local.is_finite() || local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let (ix, iy) = (local.x.floor() as usize, local.y.floor() as usize);
        (ix < self.width && iy < self.height).then_some((ix, iy))
    }
}

impl DepthRaster for GridRaster {
    fn depth_at(&self, p: DVec2) -> Option<f64> {
        let (ix, iy) = self.index_of(p)?;
        let v = self.data[iy * self.width + ix];
        if v.is_nan() || self.nodata == Some(v) {
            None
        } else {
            Some(v)
        }
    }
}

/// Depth rasters keyed by storm start date (`YYYYMMDD`).
#[non_exhaustive]
#[derive(Default)]
pub struct RasterCatalog {
    rasters: HashMap<String, Arc<dyn DepthRaster>>,
}

impl RasterCatalog {
    pub fn new() -> Self {
        Self {
            rasters: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rasters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rasters.is_empty()
    }

    /// Registers a raster under a storm start date.
    pub fn register<R>(&mut self, start_date: impl Into<String>, raster: R)
    where
        R: DepthRaster + 'static,
    {
        self.rasters.insert(start_date.into(), Arc::new(raster));
    }

    /// Registers a shared raster under a storm start date.
    pub fn register_arc(&mut self, start_date: impl Into<String>, raster: Arc<dyn DepthRaster>) {
        self.rasters.insert(start_date.into(), raster);
    }

    pub fn contains(&self, start_date: &str) -> bool {
        self.rasters.contains_key(start_date)
    }

    /// Raster for `start_date`; a miss is a lookup error.
    pub fn get(&self, start_date: &str) -> Result<Arc<dyn DepthRaster>> {
        self.rasters
            .get(start_date)
            .cloned()
            .ok_or_else(|| Error::MissingRaster {
                key: start_date.to_owned(),
            })
    }
}

impl std::fmt::Debug for RasterCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&String> = self.rasters.keys().collect();
        keys.sort_unstable();
        f.debug_struct("RasterCatalog").field("dates", &keys).finish()
    }
}
