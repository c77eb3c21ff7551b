//! Per-event Monte Carlo sampling of storm, placement, date, and scenario.
use chrono::{Days, NaiveDate};
use rand::RngCore;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::blocks::Block;
use crate::catalog::config::CatalogConfig;
use crate::catalog::events::{CatalogEvent, EventSink};
use crate::catalog::record::{basin_path, EventResult};
use crate::distribution::SeasonalDistributions;
use crate::error::{Error, Result};
use crate::fishnet::{table_key, FishnetMap};
use crate::sampling::{rand01, uniform_index};
use crate::seeds::SeedSet;

/// Storm type of `storm_name`: field `field` of its file stem split on `_`.
pub fn storm_type_of(storm_name: &str, field: usize) -> Result<String> {
    table_key(storm_name)
        .split('_')
        .nth(field)
        .map(str::to_owned)
        .ok_or_else(|| Error::StormNameConvention {
            name: storm_name.to_owned(),
            index: field,
        })
}

/// Calendar date of `day_of_year` in `year`, counting Jan 1 as day 1.
///
/// Days past the end of the year roll into the next one.
pub fn date_from_day_of_year(year: i32, day_of_year: u32) -> Result<NaiveDate> {
    let out_of_range = || Error::Other(format!("day {day_of_year} of {year} is out of range"));
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(out_of_range)?;
    let date = match day_of_year {
        0 => jan1.checked_sub_days(Days::new(1)),
        d => jan1.checked_add_days(Days::new(u64::from(d - 1))),
    };
    date.ok_or_else(out_of_range)
}

/// Turns event seeds into event records.
///
/// Sampling an event touches nothing but its own generator and read-only inputs, so
/// events can be produced in any order or in parallel with identical results.
pub struct EventSampler<'a> {
    pub config: CatalogConfig,
    pub storms: &'a [String],
    pub fishnets: &'a FishnetMap,
    pub distributions: &'a SeasonalDistributions,
}

impl<'a> EventSampler<'a> {
    pub fn try_new(
        config: CatalogConfig,
        storms: &'a [String],
        fishnets: &'a FishnetMap,
        distributions: &'a SeasonalDistributions,
    ) -> Result<Self> {
        config.validate()?;
        if storms.is_empty() {
            return Err(Error::InvalidConfig("storm list is empty".into()));
        }
        Ok(Self {
            config,
            storms,
            fishnets,
            distributions,
        })
    }

    /// Samples one event from its seed set.
    ///
    /// Draws from the event generator in a fixed order: storm, calibration scenario,
    /// placement, day of year, then year.
    pub fn sample_event(&self, event_number: i64, seeds: &SeedSet) -> Result<EventResult> {
        let mut rng = seeds.event_rng();
        self.sample_with(event_number, &mut rng)
    }

    fn sample_with(&self, event_number: i64, rng: &mut dyn RngCore) -> Result<EventResult> {
        let storm_path = &self.storms[uniform_index(rng, self.storms.len())];
        let storm_type = storm_type_of(storm_path, self.config.storm_type_field)?;

        let scenarios = &self.config.calibration_events;
        let scenario = &scenarios[uniform_index(rng, scenarios.len())];

        let key = self
            .config
            .fishnet_key
            .resolve(table_key(storm_path), &storm_type);
        let fishnet = self.fishnets.get(&key)?;
        if fishnet.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "fishnet '{key}' has no placements"
            )));
        }
        let placement = fishnet.coordinates[uniform_index(rng, fishnet.len())];

        let distribution = self.distributions.get(&storm_type)?;
        let day_of_year = distribution.sample(rand01(rng));

        let year = self
            .config
            .year_selection
            .select(&self.config.por, day_of_year, rng)?;
        let storm_date = date_from_day_of_year(year, day_of_year)?;

        Ok(EventResult {
            event_number,
            storm_path: storm_path.clone(),
            x: placement.x,
            y: placement.y,
            storm_type,
            storm_date,
            basin_path: basin_path(
                &self.config.basin_root_directory,
                storm_date,
                &self.config.basin_name,
                scenario,
            ),
        })
    }

    /// Samples every event of every block sequentially.
    pub fn run(&self, blocks: &[Block], seeds: &[SeedSet]) -> Result<Vec<EventResult>> {
        self.run_with_events(blocks, seeds, &mut ())
    }

    /// Like [`EventSampler::run`], reporting progress to `sink`.
    ///
    /// Every block is checked before sampling starts. Any failure aborts the run and
    /// discards the events sampled so far.
    pub fn run_with_events(
        &self,
        blocks: &[Block],
        seeds: &[SeedSet],
        sink: &mut dyn EventSink,
    ) -> Result<Vec<EventResult>> {
        let plan = EventPlan::new(blocks, seeds.len())?;
        sink.send(CatalogEvent::RunStarted {
            block_count: blocks.len(),
            eligible_events: plan.eligible.len(),
        });
        for span in &plan.skipped {
            sink.send(CatalogEvent::EventsSkipped {
                realization_index: span.realization_index,
                block_index: span.block_index,
                first: span.first,
                last: span.last,
                seed_count: seeds.len(),
            });
        }
        plan.log_start(blocks.len(), seeds.len());

        let mut results = Vec::with_capacity(plan.eligible.len());
        for &event_number in &plan.eligible {
            let result = self.sample_event(event_number, seed_for(seeds, event_number))?;
            sink.send(CatalogEvent::EventSampled {
                result: result.clone(),
            });
            results.push(result);
        }

        sink.send(CatalogEvent::RunFinished {
            event_count: results.len(),
            skipped: plan.skipped_count(),
        });
        info!("Sampled {} catalog events.", results.len());
        Ok(results)
    }

    /// Samples every event on the rayon pool. Output is in event-number order and equal
    /// to [`EventSampler::run`].
    pub fn run_parallel(&self, blocks: &[Block], seeds: &[SeedSet]) -> Result<Vec<EventResult>> {
        let plan = EventPlan::new(blocks, seeds.len())?;
        plan.log_start(blocks.len(), seeds.len());

        let results: Vec<EventResult> = plan
            .eligible
            .par_iter()
            .map(|en| self.sample_event(*en, seed_for(seeds, *en)))
            .collect::<Result<_>>()?;

        info!("Sampled {} catalog events in parallel.", results.len());
        Ok(results)
    }
}

/// Event numbers of one block that have no seed set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SkippedSpan {
    realization_index: i32,
    block_index: i32,
    first: i64,
    last: i64,
}

/// Event numbers to sample, and the spans left out for lack of a seed set.
struct EventPlan {
    eligible: Vec<i64>,
    skipped: Vec<SkippedSpan>,
}

impl EventPlan {
    /// Validates every block, then splits each one at the available seed range `1..=seed_count`.
    fn new(blocks: &[Block], seed_count: usize) -> Result<Self> {
        for block in blocks {
            block.validate()?;
        }
        let max = i64::try_from(seed_count).unwrap_or(i64::MAX);
        let mut eligible = Vec::new();
        let mut skipped = Vec::new();
        for block in blocks.iter().filter(|b| b.event_count > 0) {
            let (start, end) = (block.event_start, block.event_end);
            let span = |first, last| SkippedSpan {
                realization_index: block.realization_index,
                block_index: block.block_index,
                first,
                last,
            };
            if start < 1 {
                skipped.push(span(start, end.min(0)));
            }
            let (lo, hi) = (start.max(1), end.min(max));
            if lo <= hi {
                eligible.extend(lo..=hi);
            }
            if end > max {
                skipped.push(span(start.max(max + 1), end));
            }
        }
        Ok(Self { eligible, skipped })
    }

    fn skipped_count(&self) -> usize {
        self.skipped
            .iter()
            .map(|s| (s.last - s.first + 1) as usize)
            .sum()
    }

    fn log_start(&self, blocks: usize, seeds: usize) {
        info!("Sampling {} events from {} blocks.", self.eligible.len(), blocks);
        if self.skipped.is_empty() {
            debug!("Every event number has a seed set.");
        } else {
            warn!(
                "Skipping {} event numbers in {} spans beyond the {} available seed sets.",
                self.skipped_count(),
                self.skipped.len(),
                seeds
            );
        }
    }
}

/// Seed set of an eligible event number.
#[inline]
fn seed_for(seeds: &[SeedSet], event_number: i64) -> &SeedSet {
    &seeds[(event_number - 1) as usize]
}
