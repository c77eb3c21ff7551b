use std::time::Duration;

use criterion::{Criterion, Throughput};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

/// Catalog runs take tens of milliseconds per iteration at the largest sizes.
pub const LONG_RUN_SAMPLE_SIZE: usize = 10;
pub const LONG_RUN_MEASUREMENT_TIME: Duration = Duration::from_secs(8);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

#[allow(dead_code)]
pub fn long_run_criterion() -> Criterion {
    default_criterion()
        .sample_size(LONG_RUN_SAMPLE_SIZE)
        .measurement_time(LONG_RUN_MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}
