//! Bounded-pool driver that validates every storm against every candidate.
//!
//! Storms are independent, so each runs as one task on a fixed-size rayon pool. A task
//! hands its finished [`StormValidation`] to a [`StormResultSink`] before returning; the
//! collect at the end of [`TranspositionValidator::validate_with_sink`] waits for every
//! task, so aggregated results are only read once all storms are done.
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::geometry::CoordinateList;
use crate::transposition::{LocationInfo, LocationLedger, StormCenter, TranspositionTest};

/// Default number of storms validated concurrently.
pub const DEFAULT_POOL_SIZE: usize = 7;

/// What to do when some storms fail to validate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Return the first failure once all tasks have finished.
    #[default]
    Abort,
    /// Return the report of the storms that succeeded, listing the failures.
    KeepPartial,
}

/// Configuration for [`TranspositionValidator`].
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct ValidatorConfig {
    /// Maximum number of storms validated at once.
    pub pool_size: usize,
    pub failure_policy: FailurePolicy,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            failure_policy: FailurePolicy::Abort,
        }
    }
}

impl ValidatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the worker pool size.
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Sets the failure policy.
    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.pool_size == 0 {
            return Err(Error::InvalidConfig("pool_size must be > 0".into()));
        }
        Ok(())
    }
}

/// Outcome for a single storm.
#[derive(Clone, Debug)]
pub struct StormValidation {
    pub storm_name: String,
    /// Candidates accepted for this storm, in candidate order.
    pub valid: CoordinateList,
    /// One entry per candidate.
    pub locations: Vec<LocationInfo>,
    pub elapsed: Duration,
}

impl StormValidation {
    fn from_flags(
        storm: &StormCenter,
        candidates: &CoordinateList,
        flags: &[bool],
        elapsed: Duration,
    ) -> Self {
        let mut valid = CoordinateList::new();
        let mut locations = Vec::with_capacity(candidates.len());
        for (candidate, is_valid) in candidates.iter().zip(flags) {
            if *is_valid {
                valid.push(*candidate);
            }
            locations.push(LocationInfo::new(storm.name.clone(), *candidate, *is_valid));
        }
        Self {
            storm_name: storm.name.clone(),
            valid,
            locations,
            elapsed,
        }
    }
}

/// A storm whose validation failed.
#[derive(Debug)]
pub struct StormFailure {
    pub storm_name: String,
    pub error: Error,
}

/// Aggregated output of a validation run.
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Valid placements per storm name.
    pub storm_map: BTreeMap<String, CoordinateList>,
    /// Every (storm, candidate) decision in storm order, then candidate order.
    pub ledger: LocationLedger,
    /// Storms that could not be evaluated. Empty unless the policy keeps partial results.
    pub failures: Vec<StormFailure>,
}

impl ValidationReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total number of valid placements over all storms.
    pub fn valid_count(&self) -> usize {
        self.storm_map.values().map(CoordinateList::len).sum()
    }
}

/// Receives each storm's result as soon as its task finishes.
///
/// Called concurrently from pool threads, in completion order.
pub trait StormResultSink: Send + Sync {
    fn accept(&self, result: &StormValidation);
}

/// A no-op sink.
impl StormResultSink for () {
    #[inline]
    fn accept(&self, _result: &StormValidation) {}
}

/// Forwards results to a closure.
pub struct FnResultSink<F>
where
    F: Fn(&StormValidation) + Send + Sync,
{
    f: F,
}

impl<F> FnResultSink<F>
where
    F: Fn(&StormValidation) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> StormResultSink for FnResultSink<F>
where
    F: Fn(&StormValidation) + Send + Sync,
{
    #[inline]
    fn accept(&self, result: &StormValidation) {
        (self.f)(result);
    }
}

/// Sends a copy of every result over a channel.
pub struct ChannelSink {
    pub tx: Sender<StormValidation>,
}

impl ChannelSink {
    pub fn new(tx: Sender<StormValidation>) -> Self {
        Self { tx }
    }
}

impl StormResultSink for ChannelSink {
    #[inline]
    fn accept(&self, result: &StormValidation) {
        // A dropped receiver only means nobody is listening.
        let _ = self.tx.send(result.clone());
    }
}

/// Runs a [`TranspositionTest`] for many storms on a bounded worker pool.
pub struct TranspositionValidator<T: TranspositionTest> {
    test: T,
    config: ValidatorConfig,
    pool: ThreadPool,
}

impl<T: TranspositionTest> TranspositionValidator<T> {
    pub fn try_new(test: T, config: ValidatorConfig) -> Result<Self> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.pool_size)
            .thread_name(|i| format!("transposition-{i}"))
            .build()?;
        Ok(Self { test, config, pool })
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn test(&self) -> &T {
        &self.test
    }

    /// Validates every storm against `candidates`.
    pub fn validate(
        &self,
        storms: &[StormCenter],
        candidates: &CoordinateList,
    ) -> Result<ValidationReport> {
        self.validate_with_sink(storms, candidates, &())
    }

    /// Like [`TranspositionValidator::validate`], also streaming per-storm results to `sink`.
    pub fn validate_with_sink(
        &self,
        storms: &[StormCenter],
        candidates: &CoordinateList,
        sink: &dyn StormResultSink,
    ) -> Result<ValidationReport> {
        info!(
            "Validating {} storms against {} candidates on {} workers.",
            storms.len(),
            candidates.len(),
            self.config.pool_size
        );
        let started = Instant::now();

        let outcomes: Vec<std::result::Result<StormValidation, StormFailure>> =
            self.pool.install(|| {
                storms
                    .par_iter()
                    .map(|storm| self.validate_storm(storm, candidates, sink))
                    .collect()
            });

        let mut report = ValidationReport {
            ledger: LocationLedger::with_capacity(storms.len() * candidates.len()),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome {
                Ok(v) => {
                    report.ledger.extend(v.locations);
                    report.storm_map.insert(v.storm_name, v.valid);
                }
                Err(failure) => report.failures.push(failure),
            }
        }

        info!(
            "Validated {} storms in {:.2?}: {} valid placements, {} failures.",
            report.storm_map.len(),
            started.elapsed(),
            report.valid_count(),
            report.failures.len()
        );

        if self.config.failure_policy == FailurePolicy::Abort && !report.failures.is_empty() {
            let first = report.failures.swap_remove(0);
            return Err(first.error);
        }
        Ok(report)
    }

    fn validate_storm(
        &self,
        storm: &StormCenter,
        candidates: &CoordinateList,
        sink: &dyn StormResultSink,
    ) -> std::result::Result<StormValidation, StormFailure> {
        let start = Instant::now();
        let checked = self
            .test
            .test_storm(storm, &candidates.coordinates)
            .and_then(|flags| {
                if flags.len() == candidates.len() {
                    Ok(flags)
                } else {
                    Err(Error::Other(format!(
                        "test returned {} flags for {} candidates",
                        flags.len(),
                        candidates.len()
                    )))
                }
            });
        let flags = match checked {
            Ok(flags) => flags,
            Err(error) => {
                warn!("Storm '{}' failed validation: {}.", storm.name, error);
                return Err(StormFailure {
                    storm_name: storm.name.clone(),
                    error,
                });
            }
        };
        let result = StormValidation::from_flags(storm, candidates, &flags, start.elapsed());
        info!(
            "Found {} valid placements for storm '{}' in {:.2?}.",
            result.valid.len(),
            storm.name,
            result.elapsed
        );
        sink.accept(&result);
        Ok(result)
    }
}
