//! Catalog configuration: period of record, fishnet keying, and year selection.
use chrono::{Datelike, NaiveDate};
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sampling::uniform_index;

/// Format of period-of-record dates and of `storm_date` in catalog output.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Field of a `date_duration_datatype_stormtype_rank` storm name holding the storm type.
pub const DEFAULT_STORM_TYPE_FIELD: usize = 3;

/// Draw budget for [`YearSelection::Rejection`] when none is given.
pub const DEFAULT_MAX_YEAR_DRAWS: u32 = 10_000;

/// Calendar window from which storm years are drawn. Both ends are inclusive.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeriodOfRecord {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodOfRecord {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidConfig(format!(
                "period of record starts after it ends ({start} > {end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Parses `YYYYMMDD` bounds.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// Whether a storm on `day_of_year` of `year` falls inside the period.
    ///
    /// Interior years accept any day. The first year needs `day_of_year` on or after the
    /// start's ordinal day, the last year on or before the end's; a single-year period
    /// needs both.
    pub fn accepts(&self, year: i32, day_of_year: u32) -> bool {
        if year < self.start.year() || year > self.end.year() {
            return false;
        }
        let after_start = year > self.start.year() || day_of_year >= self.start.ordinal();
        let before_end = year < self.end.year() || day_of_year <= self.end.ordinal();
        after_start && before_end
    }

    /// Every year in which `day_of_year` is accepted, ascending.
    pub fn admissible_years(&self, day_of_year: u32) -> Vec<i32> {
        (self.start.year()..=self.end.year())
            .filter(|y| self.accepts(*y, day_of_year))
            .collect()
    }

    /// Number of calendar years touched by the period.
    pub fn year_span(&self) -> usize {
        (self.end.year() - self.start.year()) as usize + 1
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|source| Error::InvalidDate {
        value: value.to_owned(),
        source,
    })
}

/// How the fishnet for a sampled storm is looked up.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FishnetKeyMode {
    /// The storm's file stem, with `st` normalized to `ST`.
    #[default]
    StormName,
    /// The storm type, with `st` normalized to `ST`.
    StormType,
    /// A fixed key used for every storm.
    Override(String),
}

impl FishnetKeyMode {
    /// `"name"` and `"type"` select the derived keys; anything else is used verbatim.
    pub fn parse(value: &str) -> Self {
        match value {
            "name" => FishnetKeyMode::StormName,
            "type" => FishnetKeyMode::StormType,
            other => FishnetKeyMode::Override(other.to_owned()),
        }
    }

    /// Fishnet key for a storm whose file stem is `storm_stem`.
    pub fn resolve(&self, storm_stem: &str, storm_type: &str) -> String {
        match self {
            FishnetKeyMode::StormName => storm_stem.replace("st", "ST"),
            FishnetKeyMode::StormType => storm_type.replace("st", "ST"),
            FishnetKeyMode::Override(key) => key.clone(),
        }
    }
}

/// How the calendar year of an event is chosen once its day of year is known.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum YearSelection {
    /// Compute the admissible years and draw one uniformly. One draw per event.
    #[default]
    Admissible,
    /// Redraw a uniform year until it is admissible, up to `max_draws` times.
    Rejection { max_draws: u32 },
}

impl YearSelection {
    /// Chooses a year for `day_of_year`, consuming draws from the event stream.
    pub fn select(
        &self,
        por: &PeriodOfRecord,
        day_of_year: u32,
        rng: &mut dyn RngCore,
    ) -> Result<i32> {
        let unsatisfiable = || Error::Unsatisfiable {
            day_of_year,
            start: por.start,
            end: por.end,
        };
        match *self {
            YearSelection::Admissible => {
                let years = por.admissible_years(day_of_year);
                if years.is_empty() {
                    return Err(unsatisfiable());
                }
                Ok(years[uniform_index(rng, years.len())])
            }
            YearSelection::Rejection { max_draws } => {
                let span = por.year_span();
                for _ in 0..max_draws {
                    let guess = por.start.year() + uniform_index(rng, span) as i32;
                    if por.accepts(guess, day_of_year) {
                        return Ok(guess);
                    }
                }
                Err(unsatisfiable())
            }
        }
    }
}

/// Everything the event sampler needs besides its lookup tables.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct CatalogConfig {
    /// Root prefix of generated basin paths.
    pub basin_root_directory: String,
    pub basin_name: String,
    pub por: PeriodOfRecord,
    /// Antecedent-condition scenario names; one is drawn per event.
    pub calibration_events: Vec<String>,
    pub fishnet_key: FishnetKeyMode,
    /// Index of the storm type among the `_`-separated fields of a storm name.
    pub storm_type_field: usize,
    pub year_selection: YearSelection,
}

impl CatalogConfig {
    pub fn new(
        basin_root_directory: impl Into<String>,
        basin_name: impl Into<String>,
        por: PeriodOfRecord,
        calibration_events: Vec<String>,
    ) -> Self {
        Self {
            basin_root_directory: basin_root_directory.into(),
            basin_name: basin_name.into(),
            por,
            calibration_events,
            fishnet_key: FishnetKeyMode::default(),
            storm_type_field: DEFAULT_STORM_TYPE_FIELD,
            year_selection: YearSelection::default(),
        }
    }

    /// Sets how fishnets are keyed.
    pub fn with_fishnet_key(mut self, fishnet_key: FishnetKeyMode) -> Self {
        self.fishnet_key = fishnet_key;
        self
    }

    /// Sets which name field holds the storm type.
    pub fn with_storm_type_field(mut self, storm_type_field: usize) -> Self {
        self.storm_type_field = storm_type_field;
        self
    }

    /// Sets the year selection method.
    pub fn with_year_selection(mut self, year_selection: YearSelection) -> Self {
        self.year_selection = year_selection;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.calibration_events.is_empty() {
            return Err(Error::InvalidConfig(
                "calibration_events must name at least one scenario".into(),
            ));
        }
        if self.basin_name.is_empty() {
            return Err(Error::InvalidConfig("basin_name must not be empty".into()));
        }
        if self.por.start > self.por.end {
            return Err(Error::InvalidConfig(
                "period of record starts after it ends".into(),
            ));
        }
        if let YearSelection::Rejection { max_draws: 0 } = self.year_selection {
            return Err(Error::InvalidConfig(
                "rejection year selection needs max_draws > 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::sampling::test_rng::FixedRng;

    fn por(start: &str, end: &str) -> PeriodOfRecord {
        PeriodOfRecord::parse(start, end).expect("valid period")
    }

    #[test]
    fn parse_reports_bad_dates() {
        assert!(matches!(
            PeriodOfRecord::parse("1990-01-01", "20201231"),
            Err(Error::InvalidDate { value, .. }) if value == "1990-01-01"
        ));
        assert!(matches!(
            PeriodOfRecord::parse("20201231", "19900101"),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn boundary_years_respect_ordinal_days() {
        // 1990-03-15 is day 74; 1992-03-10 is day 70 (leap year).
        let p = por("19900315", "19920310");
        assert_eq!(p.admissible_years(100), vec![1990, 1991]);
        assert_eq!(p.admissible_years(60), vec![1991, 1992]);
        assert_eq!(p.admissible_years(74), vec![1990, 1991]);
        assert_eq!(p.admissible_years(70), vec![1991, 1992]);
        assert!(!p.accepts(1989, 200));
        assert!(!p.accepts(1993, 200));
    }

    #[test]
    fn single_year_period_needs_both_bounds() {
        let p = por("20000601", "20000630");
        assert!(p.admissible_years(10).is_empty());
        assert!(p.admissible_years(200).is_empty());
        // 2000-06-15 is day 167.
        assert_eq!(p.admissible_years(167), vec![2000]);
    }

    #[test]
    fn admissible_selection_draws_once() {
        let p = por("19900101", "19991231");
        let mut lo = FixedRng { value: 0 };
        let mut hi = FixedRng { value: u64::MAX };
        assert_eq!(YearSelection::Admissible.select(&p, 50, &mut lo).expect("ok"), 1990);
        assert_eq!(YearSelection::Admissible.select(&p, 50, &mut hi).expect("ok"), 1999);
    }

    #[test]
    fn both_methods_stay_inside_the_period() {
        let p = por("19900315", "19920310");
        let mut rng = StdRng::seed_from_u64(17);
        let methods = [
            YearSelection::Admissible,
            YearSelection::Rejection {
                max_draws: DEFAULT_MAX_YEAR_DRAWS,
            },
        ];
        for method in methods {
            for _ in 0..200 {
                let year = method.select(&p, 100, &mut rng).expect("satisfiable");
                assert!(year == 1990 || year == 1991);
            }
        }
    }

    #[test]
    fn unsatisfiable_day_is_an_error_not_a_hang() {
        let p = por("20000601", "20000630");
        let mut rng = StdRng::seed_from_u64(1);
        for method in [
            YearSelection::Admissible,
            YearSelection::Rejection { max_draws: 50 },
        ] {
            assert!(matches!(
                method.select(&p, 10, &mut rng),
                Err(Error::Unsatisfiable { day_of_year: 10, .. })
            ));
        }
    }

    #[test]
    fn fishnet_key_modes() {
        assert_eq!(FishnetKeyMode::parse("name"), FishnetKeyMode::StormName);
        assert_eq!(FishnetKeyMode::parse("type"), FishnetKeyMode::StormType);
        assert_eq!(
            FishnetKeyMode::parse("all_normal_scramble"),
            FishnetKeyMode::Override("all_normal_scramble".into())
        );

        let stem = "19990101_24hr_precip_st2_01";
        assert_eq!(
            FishnetKeyMode::StormName.resolve(stem, "st2"),
            "19990101_24hr_precip_ST2_01"
        );
        assert_eq!(FishnetKeyMode::StormType.resolve(stem, "st2"), "ST2");
        assert_eq!(
            FishnetKeyMode::Override("grid".into()).resolve(stem, "st2"),
            "grid"
        );
    }

    #[test]
    fn config_validation() {
        let p = por("19900101", "20201231");
        let ok = CatalogConfig::new("/basins", "trinity", p, vec!["cal1".into()]);
        assert!(ok.validate().is_ok());
        assert_eq!(ok.storm_type_field, DEFAULT_STORM_TYPE_FIELD);

        let no_scenarios = CatalogConfig::new("/basins", "trinity", p, Vec::new());
        assert!(no_scenarios.validate().is_err());

        let zero_draws = ok
            .clone()
            .with_year_selection(YearSelection::Rejection { max_draws: 0 });
        assert!(zero_draws.validate().is_err());
    }
}
