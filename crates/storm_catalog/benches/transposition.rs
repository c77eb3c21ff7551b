mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec2;
use storm_catalog::geometry::{EdgeIndex, Polygon};
use storm_catalog::raster::{GridRaster, RasterCatalog};
use storm_catalog::sampling::UniformGridSampling;
use storm_catalog::transposition::{
    ContainmentTest, RasterDepthTest, StormCenter, TranspositionValidator, ValidatorConfig,
};

const STORM_COUNTS: [usize; 3] = [4, 16, 64];
const POOL_SIZES: [usize; 3] = [1, 4, 7];
const RING_VERTICES: [usize; 3] = [250, 1_000, 4_000];

fn watershed() -> Polygon {
    Polygon::from_points(vec![
        DVec2::new(180_000.0, 180_000.0),
        DVec2::new(230_000.0, 175_000.0),
        DVec2::new(240_000.0, 220_000.0),
        DVec2::new(200_000.0, 235_000.0),
        DVec2::new(175_000.0, 210_000.0),
    ])
    .expect("valid watershed")
}

fn domain() -> Polygon {
    Polygon::rectangle(DVec2::ZERO, DVec2::splat(400_000.0))
}

fn storms(n: usize) -> Vec<StormCenter> {
    (0..n)
        .map(|i| {
            let t = i as f64 / n as f64;
            StormCenter::new(
                format!("storm_{i:03}"),
                DVec2::new(100_000.0 + 200_000.0 * t, 300_000.0 - 150_000.0 * t),
                "20000101",
            )
        })
        .collect()
}

fn containment_benches(c: &mut Criterion) {
    let candidates = UniformGridSampling::new(8_000.0).grid_points(&domain());
    let mut group = c.benchmark_group("transposition/containment");

    for &pool_size in &POOL_SIZES {
        for &n in &STORM_COUNTS {
            let test = ContainmentTest::try_new(watershed(), domain()).expect("valid polygons");
            let validator = TranspositionValidator::try_new(
                test,
                ValidatorConfig::new().with_pool_size(pool_size),
            )
            .expect("pool builds");
            let storms = storms(n);
            group.throughput(common::elements_throughput(n * candidates.len()));

            group.bench_with_input(
                BenchmarkId::new(format!("pool_{pool_size}"), n),
                &n,
                |b, _| {
                    b.iter(|| {
                        let report = validator.validate(&storms, &candidates).expect("valid");
                        black_box(report.valid_count());
                    });
                },
            );
        }
    }

    group.finish();
}

fn circle(center: DVec2, radius: f64, n: usize) -> Polygon {
    let points = (0..n)
        .map(|i| {
            let a = i as f64 / n as f64 * std::f64::consts::TAU;
            center + DVec2::new(a.cos(), a.sin()) * radius
        })
        .collect();
    Polygon::from_points(points).expect("valid circle")
}

fn dense_boundary_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("transposition/dense_boundaries");
    let offsets: Vec<DVec2> = (0..100)
        .map(|i| DVec2::new((i % 10) as f64 * 50_000.0, (i / 10) as f64 * 50_000.0))
        .collect();

    for &n in &RING_VERTICES {
        let domain = EdgeIndex::new(&circle(DVec2::splat(200_000.0), 400_000.0, n));
        let watershed = EdgeIndex::new(&circle(DVec2::splat(200_000.0), 60_000.0, n));
        group.throughput(common::elements_throughput(offsets.len()));

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let accepted = offsets
                    .iter()
                    .filter(|o| domain.contains(&watershed, **o))
                    .count();
                black_box(accepted);
            });
        });
    }

    group.finish();
}

fn raster_depth_benches(c: &mut Criterion) {
    let candidates = UniformGridSampling::new(16_000.0).grid_points(&domain());
    let mut rasters = RasterCatalog::new();
    let raster = GridRaster::from_fn(DVec2::ZERO, 4_000.0, 100, 100, |p| {
        let d = p.distance(DVec2::splat(200_000.0));
        (50.0 - d / 4_000.0).max(0.0)
    })
    .expect("valid raster");
    rasters.register("20000101", raster);
    let test = RasterDepthTest::try_new(rasters, &watershed(), 4_000.0, 1.0).expect("valid test");
    let validator =
        TranspositionValidator::try_new(test, ValidatorConfig::default()).expect("pool builds");

    let mut group = c.benchmark_group("transposition/raster_depth");
    for &n in &STORM_COUNTS {
        let storms = storms(n);
        group.throughput(common::elements_throughput(n * candidates.len()));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let report = validator.validate(&storms, &candidates).expect("valid");
                black_box(report.ledger.len());
            });
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = containment_benches, dense_boundary_benches, raster_depth_benches
}
criterion_main!(benches);
