use rand::rngs::StdRng;
use rand::SeedableRng;
use storm_catalog::prelude::*;
use storm_catalog_examples::{demo_domain, demo_storms, init_tracing, write_output};
use tracing::info;

const SEED: u64 = 20_240_917;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let domain = demo_domain()?;
    let storms = demo_storms();

    // 95% of each storm's cloud falls within 40 km of its center.
    let kernel = DensityKernelSampling::try_new(0.05, 40_000.0, 500)?;
    info!("Kernel sigma: {:.0} m.", kernel.sigma());

    let storm_types: Vec<String> = ["ST1", "ST2", "ST3"].map(String::from).to_vec();
    let by_type = storm_type_density_fishnets(&storms, &storm_types, &kernel, &domain, SEED);
    for (key, fishnet) in by_type.iter() {
        write_output(format!("fishnet-density-{key}.csv"), &fishnet.to_csv())?;
    }

    let pooled = all_storms_density_fishnet(&storms, &kernel, &domain, SEED);
    let fishnet = pooled.get(ALL_STORMS_FISHNET)?;
    write_output(format!("fishnet-density-{ALL_STORMS_FISHNET}.csv"), &fishnet.to_csv())?;

    // Both strategies behind the same trait, drawing from one generator.
    let origins = storms.iter().map(|s| s.center).collect();
    let grid: Box<dyn CandidateSampling> = Box::new(UniformGridSampling::new(10_000.0));
    let cloud: Box<dyn CandidateSampling> = Box::new(kernel.with_origins(origins));
    let strategies = [("grid", grid), ("kernel", cloud)];
    let mut rng = StdRng::seed_from_u64(SEED);
    for (label, strategy) in &strategies {
        let placements = strategy.generate(&domain, &mut rng);
        info!("{} strategy: {} placements.", label, placements.len());
    }

    Ok(())
}
