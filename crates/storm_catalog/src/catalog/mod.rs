//! Monte Carlo event catalog sampling.
//!
//! For every event number of every block, an [`EventSampler`] seeds a fresh generator
//! from the event's [`SeedSet`](crate::seeds::SeedSet) and draws a storm, a calibration
//! scenario, a placement from the storm's fishnet, a seasonal day of year, and a year
//! inside the period of record. The result is one [`EventResult`] per event.
pub mod config;
pub mod events;
pub mod record;
pub mod sampler;

pub use config::{
    CatalogConfig, FishnetKeyMode, PeriodOfRecord, YearSelection, DATE_FORMAT,
    DEFAULT_MAX_YEAR_DRAWS, DEFAULT_STORM_TYPE_FIELD,
};
pub use events::{CatalogEvent, EventSink, FnSink, MultiSink, VecSink};
pub use record::{basin_path, write_catalog_csv, EventResult, CATALOG_CSV_HEADER};
pub use sampler::{date_from_day_of_year, storm_type_of, EventSampler};
