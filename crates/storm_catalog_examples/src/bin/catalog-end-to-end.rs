use std::fs::File;
use std::io::BufWriter;

use storm_catalog::prelude::*;
use storm_catalog_examples::{demo_domain, demo_storms, demo_watershed, init_tracing};
use tracing::info;

const SEASONALITY: &str = "\
bin_start,cumulative_probability
1,0.05
91,0.35
152,0.75
244,0.95
335,1.0
";

const EVENTS_PER_BLOCK: i32 = 250;
const BLOCKS: i32 = 4;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let domain = demo_domain()?;
    let storms = demo_storms();

    // Placement: uniform grid, filtered down to placements that keep the watershed in the domain.
    let candidates = UniformGridSampling::try_new(10_000.0)?.grid_points(&domain);
    let test = ContainmentTest::try_new(demo_watershed()?, domain)?;
    let report = TranspositionValidator::try_new(test, ValidatorConfig::default())?
        .validate(&storms, &candidates)?;
    let fishnets: FishnetMap = report
        .storm_map
        .iter()
        .map(|(name, valid)| (name.clone(), valid.clone()))
        .collect();

    let seasonal = DiscreteEmpiricalDistribution::from_csv(SEASONALITY)?;
    let distributions = ["ST1", "ST2", "ST3"]
        .into_iter()
        .fold(SeasonalDistributions::new(), |d, st| d.with(st, seasonal.clone()));

    let por = PeriodOfRecord::parse("19790101", "20191231")?;
    let config = CatalogConfig::new(
        "/models/basins",
        "demo",
        por,
        vec!["cal1".into(), "cal2".into(), "cal3".into()],
    );

    let names: Vec<String> = storms.iter().map(|s| s.name.clone()).collect();
    let sampler = EventSampler::try_new(config, &names, &fishnets, &distributions)?;

    let blocks: Vec<Block> = (0..BLOCKS)
        .map(|b| Block::new(1, b + 1, i64::from(b * EVENTS_PER_BLOCK) + 1, EVENTS_PER_BLOCK))
        .collect();
    // One seed set short, so the final event is reported as skipped.
    let seeds: Vec<SeedSet> = (1..i64::from(BLOCKS * EVENTS_PER_BLOCK))
        .map(|e| SeedSet::new(e * 7_919, e / i64::from(EVENTS_PER_BLOCK), 1))
        .collect();

    let mut log = FnSink::new(|event| match event {
        CatalogEvent::EventsSkipped {
            block_index,
            first,
            last,
            ..
        } => info!("Block {}: events {}..={} skipped.", block_index, first, last),
        CatalogEvent::RunFinished {
            event_count,
            skipped,
        } => info!("Sampled {} events, skipped {}.", event_count, skipped),
        _ => {}
    });
    let mut recorded = VecSink::new();
    let mut sinks = MultiSink::with_sinks(vec![
        &mut log as &mut dyn EventSink,
        &mut recorded as &mut dyn EventSink,
    ]);
    let results = sampler.run_with_events(&blocks, &seeds, &mut sinks)?;
    drop(sinks);
    info!("Recorded {} progress events.", recorded.len());

    let parallel = sampler.run_parallel(&blocks, &seeds)?;
    anyhow::ensure!(parallel == results, "parallel run diverged from sequential run");

    let out = BufWriter::new(File::create("catalog-end-to-end.csv")?);
    write_catalog_csv(out, &results)?;
    info!("Wrote catalog-end-to-end.csv.");
    Ok(())
}
