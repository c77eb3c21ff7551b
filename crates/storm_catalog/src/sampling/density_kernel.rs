//! Radial density-kernel candidate sampling around storm origins.
//!
//! Each origin scatters `count` points from an isotropic bivariate normal. The kernel
//! width is chosen so that `radius` is the `1 - alpha` quantile of the radial distance:
//! for a bivariate normal the radial distance is Rayleigh distributed, giving
//! `sigma = radius / sqrt(-2 ln alpha)`. The combined cloud is clipped to the domain.
use glam::DVec2;
use mint::Vector2;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::fishnet::FishnetMap;
use crate::geometry::{CoordinateList, Polygon};
use crate::sampling::{rand01, CandidateSampling};
use crate::seeds::{derive_seed, SeedPurpose};
use crate::transposition::StormCenter;

/// Key of the fishnet built from every storm regardless of type.
pub const ALL_STORMS_FISHNET: &str = "all_normal_scramble";

/// Gaussian point clouds around storm origins.
#[derive(Debug, Clone)]
pub struct DensityKernelSampling {
    /// Native storm centers the clouds are scattered around.
    pub origins: Vec<DVec2>,
    /// Tail probability outside `radius`, in (0, 1).
    pub alpha: f64,
    /// Radial distance holding `1 - alpha` of the scatter.
    pub radius: f64,
    /// Points generated per origin before clipping.
    pub count: usize,
}

impl DensityKernelSampling {
    /// Creates a kernel sampler with no origins.
    pub fn try_new(alpha: f64, radius: f64, count: usize) -> Result<Self> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "alpha must lie in (0, 1), got {alpha}"
            )));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "radius must be > 0, got {radius}"
            )));
        }
        Ok(Self {
            origins: Vec::new(),
            alpha,
            radius,
            count,
        })
    }

    /// Sets the origins (builder-style).
    pub fn with_origins(mut self, origins: Vec<DVec2>) -> Self {
        self.origins = origins;
        self
    }

    /// Standard deviation of each axis of the kernel.
    pub fn sigma(&self) -> f64 {
        self.radius / (-2.0 * self.alpha.ln()).sqrt()
    }

    /// Scatters `count` points around `origin` from a generator seeded with `seed`.
    pub fn scatter(&self, origin: DVec2, seed: u64) -> CoordinateList {
        let mut rng = StdRng::seed_from_u64(seed);
        let sigma = self.sigma();
        let mut out = CoordinateList::with_capacity(self.count);
        for _ in 0..self.count {
            let (nx, ny) = box_muller_pair(&mut rng);
            out.push(origin + DVec2::new(nx, ny) * sigma);
        }
        out
    }

    /// Scatters around every origin and clips the cloud to `domain`.
    ///
    /// Origin `i` uses `derive_seed(base, DensityKernel, i)`, so reordering or adding
    /// origins leaves the clouds of the others unchanged.
    pub fn cloud(&self, domain: &Polygon, base_seed: u64) -> CoordinateList {
        let mut master = CoordinateList::with_capacity(self.origins.len() * self.count);
        for (i, origin) in self.origins.iter().enumerate() {
            let seed = derive_seed(base_seed, SeedPurpose::DensityKernel, i as u64);
            master.extend(self.scatter(*origin, seed).coordinates);
        }
        let clipped = master.clipped_to(domain);
        debug!(
            "Density kernel kept {} of {} points inside the domain.",
            clipped.len(),
            master.len()
        );
        clipped
    }
}

impl CandidateSampling for DensityKernelSampling {
    fn generate(&self, domain: &Polygon, rng: &mut dyn RngCore) -> Vec<Vector2<f64>> {
        if self.count == 0 || self.origins.is_empty() {
            return Vec::new();
        }
        let base = rng.next_u64();
        self.cloud(domain, base)
            .coordinates
            .into_iter()
            .map(Into::into)
            .collect()
    }
}

/// Builds one density fishnet per storm type. Types with no matching storm get no entry.
///
/// A storm belongs to a type when its name contains the type label. Each type's cloud is
/// seeded from `derive_seed(seed, DensityKernel, type_index)`.
pub fn storm_type_density_fishnets(
    storms: &[StormCenter],
    storm_types: &[String],
    kernel: &DensityKernelSampling,
    domain: &Polygon,
    seed: u64,
) -> FishnetMap {
    let mut fishnets = FishnetMap::new();
    for (ti, storm_type) in storm_types.iter().enumerate() {
        let origins: Vec<DVec2> = storms
            .iter()
            .filter(|s| s.name.contains(storm_type.as_str()))
            .map(|s| s.center)
            .collect();
        if origins.is_empty() {
            info!("No storms of type '{}'; skipping fishnet.", storm_type);
            continue;
        }
        let sampler = kernel.clone().with_origins(origins);
        let type_seed = derive_seed(seed, SeedPurpose::DensityKernel, ti as u64);
        let fishnet = sampler.cloud(domain, type_seed);
        info!(
            "Storm type '{}': {} kernel placements from {} storms.",
            storm_type,
            fishnet.len(),
            sampler.origins.len()
        );
        fishnets.insert(storm_type.clone(), fishnet);
    }
    fishnets
}

/// Builds a single density fishnet from every storm, keyed [`ALL_STORMS_FISHNET`].
pub fn all_storms_density_fishnet(
    storms: &[StormCenter],
    kernel: &DensityKernelSampling,
    domain: &Polygon,
    seed: u64,
) -> FishnetMap {
    let origins = storms.iter().map(|s| s.center).collect();
    let fishnet = kernel.clone().with_origins(origins).cloud(domain, seed);
    let mut fishnets = FishnetMap::new();
    fishnets.insert(ALL_STORMS_FISHNET, fishnet);
    fishnets
}

fn box_muller_pair(rng: &mut dyn RngCore) -> (f64, f64) {
    let u1 = (1.0 - rand01(rng)).clamp(f64::MIN_POSITIVE, 1.0);
    let u2 = rand01(rng);

    let r = (-2.0 * u1.ln()).sqrt();
    let theta = 2.0 * core::f64::consts::PI * u2;

    (r * theta.cos(), r * theta.sin())
}
