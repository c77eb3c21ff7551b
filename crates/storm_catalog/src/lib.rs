#![forbid(unsafe_code)]
//! storm_catalog: Deterministic stochastic storm transposition and event catalog sampling.
//!
//! Modules:
//! - sampling: candidate placements (uniform grid, storm-centred density kernel)
//! - transposition: raster-depth and polygon-containment validity tests, bounded-pool validator
//! - catalog: per-event Monte Carlo sampling of storm, placement, date, and scenario
//! - distribution, seeds, blocks, fishnet, raster, geometry: inputs and building blocks
//!
//! For examples and docs, see README.
pub mod blocks;
pub mod catalog;
pub mod distribution;
pub mod error;
pub mod fishnet;
pub mod geometry;
pub mod raster;
pub mod sampling;
pub mod seeds;
pub mod transposition;

/// Convenient re-exports for common types. Import with `use storm_catalog::prelude::*;`.
pub mod prelude {
    pub use crate::blocks::Block;
    pub use crate::catalog::{
        write_catalog_csv, CatalogConfig, CatalogEvent, EventResult, EventSampler, EventSink,
        FishnetKeyMode, FnSink, MultiSink, PeriodOfRecord, VecSink, YearSelection,
    };
    pub use crate::distribution::{DiscreteEmpiricalDistribution, SeasonalDistributions};
    pub use crate::error::{Error, Result};
    pub use crate::fishnet::{table_key, FishnetMap};
    pub use crate::geometry::{
        Coordinate, CoordinateList, EdgeIndex, Envelope, PointLocation, Polygon, Ring,
    };
    pub use crate::raster::{DepthRaster, GridRaster, RasterCatalog};
    pub use crate::sampling::density_kernel::{all_storms_density_fishnet, ALL_STORMS_FISHNET};
    pub use crate::sampling::{
        storm_type_density_fishnets, CandidateSampling, DensityKernelSampling,
        UniformGridSampling,
    };
    pub use crate::seeds::{derive_seed, draw_child_seed, NestedSeeds, SeedPurpose, SeedSet};
    pub use crate::transposition::{
        ChannelSink, ContainmentTest, FailurePolicy, FnResultSink, LocationInfo, LocationLedger,
        RasterDepthTest, StormCenter, StormFailure, StormResultSink, StormValidation,
        TranspositionTest, TranspositionValidator, ValidationReport, ValidatorConfig,
        LEDGER_SHUFFLE_SEED,
    };
}
