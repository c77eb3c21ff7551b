use storm_catalog::prelude::*;
use storm_catalog_examples::{demo_domain, init_tracing, write_output};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let domain = demo_domain()?;

    // Coarse to fine; the notch removes points from the eastern columns.
    for spacing in [20_000.0, 10_000.0, 5_000.0] {
        let fishnet = UniformGridSampling::try_new(spacing)?.grid_points(&domain);
        info!("Spacing {} m: {} placements.", spacing, fishnet.len());
        write_output(
            format!("fishnet-uniform-grid-{}km.csv", spacing / 1_000.0),
            &fishnet.to_csv(),
        )?;
    }

    Ok(())
}
