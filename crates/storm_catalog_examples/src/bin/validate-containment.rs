use std::thread;

use crossbeam_channel::unbounded;
use storm_catalog::prelude::*;
use storm_catalog_examples::{demo_domain, demo_storms, demo_watershed, init_tracing, write_output};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let domain = demo_domain()?;
    let candidates = UniformGridSampling::try_new(10_000.0)?.grid_points(&domain);
    let storms = demo_storms();

    let test = ContainmentTest::try_new(demo_watershed()?, domain)?;
    let config = ValidatorConfig::new().with_failure_policy(FailurePolicy::KeepPartial);
    let validator = TranspositionValidator::try_new(test, config)?;

    // Per-storm results stream to a reporter thread while the pool works.
    let (tx, rx) = unbounded::<StormValidation>();
    let reporter = thread::spawn(move || {
        for done in rx {
            info!(
                "{}: {} of {} placements valid in {:?}.",
                done.storm_name,
                done.valid.len(),
                done.locations.len(),
                done.elapsed
            );
        }
    });
    let sink = ChannelSink::new(tx);
    let report = validator.validate_with_sink(&storms, &candidates, &sink)?;
    drop(sink);
    reporter
        .join()
        .map_err(|_| anyhow::anyhow!("reporter thread panicked"))?;

    for failure in &report.failures {
        info!("{} failed: {}.", failure.storm_name, failure.error);
    }
    info!(
        "{} of {} decisions valid.",
        report.valid_count(),
        report.ledger.len()
    );

    write_output(
        "validate-containment-ledger.csv",
        &report.ledger.shuffled(LEDGER_SHUFFLE_SEED).to_csv(),
    )?;
    Ok(())
}
