mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, SamplingMode};
use glam::DVec2;
use storm_catalog::blocks::Block;
use storm_catalog::catalog::{CatalogConfig, EventSampler, FishnetKeyMode, PeriodOfRecord};
use storm_catalog::distribution::{DiscreteEmpiricalDistribution, SeasonalDistributions};
use storm_catalog::fishnet::FishnetMap;
use storm_catalog::geometry::CoordinateList;
use storm_catalog::seeds::SeedSet;

const EVENT_COUNTS: [usize; 3] = [1_000, 10_000, 100_000];
const STORM_TYPES: [&str; 3] = ["ST1", "ST2", "ST3"];

struct Inputs {
    storms: Vec<String>,
    fishnets: FishnetMap,
    distributions: SeasonalDistributions,
}

fn inputs() -> Inputs {
    let storms = (0..300)
        .map(|i| format!("19{:02}0601_72hr_precip_{}_{i:03}.dss", 50 + i % 50, STORM_TYPES[i % 3]))
        .collect();
    let mut fishnets = FishnetMap::new();
    let mut distributions = SeasonalDistributions::new();
    for st in STORM_TYPES {
        let coords: CoordinateList = (0..5_000)
            .map(|k| DVec2::new((k % 100) as f64 * 2_000.0, (k / 100) as f64 * 2_000.0))
            .collect();
        fishnets.insert(st, coords);
        let bins: Vec<u32> = (1..=365).step_by(7).collect();
        let n = bins.len();
        let cdf: Vec<f64> = (1..=n).map(|i| i as f64 / n as f64).collect();
        distributions.insert(
            st,
            DiscreteEmpiricalDistribution::new(bins, cdf).expect("valid distribution"),
        );
    }
    Inputs {
        storms,
        fishnets,
        distributions,
    }
}

fn catalog_benches(c: &mut Criterion) {
    let inputs = inputs();
    let por = PeriodOfRecord::parse("19500101", "20201231").expect("valid period");
    let scenarios = (1..=6).map(|i| format!("cal{i}")).collect();
    let config = CatalogConfig::new("/basins", "trinity", por, scenarios)
        .with_fishnet_key(FishnetKeyMode::StormType);
    let sampler = EventSampler::try_new(
        config,
        &inputs.storms,
        &inputs.fishnets,
        &inputs.distributions,
    )
    .expect("valid sampler");

    let mut group = c.benchmark_group("catalog");
    group.sampling_mode(SamplingMode::Flat);
    for &n in &EVENT_COUNTS {
        let seeds: Vec<SeedSet> = (0..n as i64)
            .map(|i| SeedSet::new(i.wrapping_mul(0x9E37_79B9), i / 1_000, 1))
            .collect();
        let blocks: Vec<Block> = (0..n / 1_000)
            .map(|b| Block::new(1, b as i32 + 1, b as i64 * 1_000 + 1, 1_000))
            .collect();
        group.throughput(common::elements_throughput(n));

        group.bench_with_input(BenchmarkId::new("sequential", n), &n, |b, _| {
            b.iter(|| {
                let events = sampler.run(&blocks, &seeds).expect("samples");
                black_box(events.len());
            });
        });
        group.bench_with_input(BenchmarkId::new("parallel", n), &n, |b, _| {
            b.iter(|| {
                let events = sampler.run_parallel(&blocks, &seeds).expect("samples");
                black_box(events.len());
            });
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = common::long_run_criterion();
    targets = catalog_benches
}
criterion_main!(benches);
