//! Uniform grid candidate sampling.
use glam::DVec2;
use mint::Vector2;
use rand::RngCore;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::{CoordinateList, Polygon};
use crate::sampling::CandidateSampling;

/// Regular grid of points at `spacing`, kept where they fall strictly inside the polygon.
#[derive(Debug, Clone)]
pub struct UniformGridSampling {
    /// Distance between neighbouring grid points in projected units.
    pub spacing: f64,
}

impl UniformGridSampling {
    pub fn new(spacing: f64) -> Self {
        Self { spacing }
    }

    /// Like [`UniformGridSampling::new`] but rejects non-positive or non-finite spacing.
    pub fn try_new(spacing: f64) -> Result<Self> {
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "grid spacing must be > 0, got {spacing}"
            )));
        }
        Ok(Self { spacing })
    }

    /// Scans the polygon's envelope row by row, top to bottom and left to right.
    ///
    /// Rows start half a step above the envelope's top edge and step down by `spacing`;
    /// columns start half a step right of its left edge. The number of rows and columns is
    /// `floor(extent / spacing)` along each axis.
    pub fn grid_points(&self, polygon: &Polygon) -> CoordinateList {
        let s = self.spacing;
        if !s.is_finite() || s <= 0.0 {
            return CoordinateList::new();
        }

        let env = polygon.envelope();
        let x_steps = (env.width() / s).floor() as usize;
        let y_steps = (env.height() / s).floor() as usize;

        let mut out = CoordinateList::new();
        let mut y = env.max.y + s * 0.5;
        for _ in 0..y_steps {
            let mut x = env.min.x + s * 0.5;
            for _ in 0..x_steps {
                let p = DVec2::new(x, y);
                if polygon.contains_point(p) {
                    out.push(p);
                }
                x += s;
            }
            y -= s;
        }

        debug!(
            "Determined {} grid placements from {}x{} cells.",
            out.len(),
            x_steps,
            y_steps
        );
        out
    }
}

impl CandidateSampling for UniformGridSampling {
    fn generate(&self, domain: &Polygon, _rng: &mut dyn RngCore) -> Vec<Vector2<f64>> {
        self.grid_points(domain)
            .coordinates
            .into_iter()
            .map(Into::into)
            .collect()
    }
}
