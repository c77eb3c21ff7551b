#![forbid(unsafe_code)]
//! Shared helpers for the storm_catalog example binaries.
use std::fs;
use std::path::Path;

use glam::DVec2;
use storm_catalog::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber. `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// A 300 x 240 km transposition domain with a notch cut out of its eastern edge.
pub fn demo_domain() -> anyhow::Result<Polygon> {
    Ok(Polygon::from_points(vec![
        DVec2::new(0.0, 0.0),
        DVec2::new(300_000.0, 0.0),
        DVec2::new(300_000.0, 100_000.0),
        DVec2::new(220_000.0, 120_000.0),
        DVec2::new(300_000.0, 140_000.0),
        DVec2::new(300_000.0, 240_000.0),
        DVec2::new(0.0, 240_000.0),
    ])?)
}

/// A small pentagonal watershed near the domain's center.
pub fn demo_watershed() -> anyhow::Result<Polygon> {
    Ok(Polygon::from_points(vec![
        DVec2::new(120_000.0, 100_000.0),
        DVec2::new(160_000.0, 95_000.0),
        DVec2::new(170_000.0, 130_000.0),
        DVec2::new(140_000.0, 150_000.0),
        DVec2::new(115_000.0, 130_000.0),
    ])?)
}

/// Storm centers spread over the domain, named `{date}_72hr_precip_{type}_{n}`.
pub fn demo_storms() -> Vec<StormCenter> {
    const CENTERS: [(f64, f64, &str); 6] = [
        (60_000.0, 60_000.0, "19790412_72hr_precip_ST1_01"),
        (90_000.0, 180_000.0, "19860721_72hr_precip_ST2_02"),
        (150_000.0, 120_000.0, "19900315_72hr_precip_ST1_03"),
        (200_000.0, 200_000.0, "19951002_72hr_precip_ST3_04"),
        (240_000.0, 40_000.0, "20010609_72hr_precip_ST2_05"),
        (260_000.0, 190_000.0, "20150528_72hr_precip_ST1_06"),
    ];
    CENTERS
        .iter()
        .map(|&(x, y, name)| StormCenter::from_storm_name(name, DVec2::new(x, y)))
        .collect()
}

/// Writes `contents` to `path`, logging where it went.
pub fn write_output(path: impl AsRef<Path>, contents: &str) -> anyhow::Result<()> {
    let path = path.as_ref();
    fs::write(path, contents)?;
    info!("Wrote {}.", path.display());
    Ok(())
}
