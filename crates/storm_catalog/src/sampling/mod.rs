//! Candidate placement generation inside a polygon.
//!
//! This module defines the [`CandidateSampling`] trait and the two strategies used to
//! propose storm placements before they are tested for admissibility: an exhaustive
//! [`UniformGridSampling`] and a storm-centred [`DensityKernelSampling`].
use mint::Vector2;
use rand::RngCore;

use crate::geometry::Polygon;

pub mod density_kernel;
pub mod uniform_grid;

pub use density_kernel::{storm_type_density_fishnets, DensityKernelSampling};
pub use uniform_grid::UniformGridSampling;

/// Trait for candidate placement generation.
pub trait CandidateSampling: Send + Sync {
    fn generate(&self, domain: &Polygon, rng: &mut dyn RngCore) -> Vec<Vector2<f64>>;
}

/// Generate a random float in the range [0, 1) with 53 bits of precision.
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f64 {
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Draw an index uniformly from `0..n`. `n` must be non-zero.
///
/// Uses the widening-multiply range reduction on one `u64` draw, so each call consumes
/// exactly one value from the stream.
#[inline]
pub(crate) fn uniform_index(rng: &mut dyn RngCore, n: usize) -> usize {
    debug_assert!(n > 0, "uniform_index needs a non-empty range");
    ((u128::from(rng.next_u64()) * n as u128) >> 64) as usize
}

#[cfg(test)]
pub(crate) mod test_rng {
    use rand::RngCore;

    /// Returns the same value on every draw.
    pub struct FixedRng {
        pub value: u64,
    }

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            (self.value >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.value
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 8];
            }
        }
    }
}
