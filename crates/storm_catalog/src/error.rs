//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias.
//! Variants cover invalid configuration, lookups that miss (fishnets, seasonal
//! distributions, rasters), storm naming violations, geometry failures, unsatisfiable
//! date sampling, worker pool setup, IO, and generic errors.
use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid date '{value}': {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("malformed distribution row {line}: {reason}")]
    MalformedDistribution { line: usize, reason: String },

    #[error("could not find fishnet '{key}' in fishnet map")]
    MissingFishnet { key: String },

    #[error("could not find the seasonal distribution for type '{storm_type}'")]
    MissingDistribution { storm_type: String },

    #[error("storm name '{name}' has no field {index} when split on '_'")]
    StormNameConvention { name: String, index: usize },

    #[error("missing raster '{key}'")]
    MissingRaster { key: String },

    #[error("geometry error: {0}")]
    Geometry(String),

    #[error("day of year {day_of_year} never falls inside the period of record {start}..={end}")]
    Unsatisfiable {
        day_of_year: u32,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error(transparent)]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        matches!(err, Error::Other(_))
            .then_some(())
            .expect("expected Other variant");
    }

    #[test]
    fn lookup_errors_name_the_missing_key() {
        let err = Error::MissingFishnet { key: "ST9".into() };
        assert_eq!(err.to_string(), "could not find fishnet 'ST9' in fishnet map");

        let err = Error::MissingDistribution {
            storm_type: "ST4".into(),
        };
        assert!(err.to_string().contains("ST4"));
    }

    #[test]
    fn unsatisfiable_reports_period_bounds() {
        let err = Error::Unsatisfiable {
            day_of_year: 10,
            start: NaiveDate::from_ymd_opt(2000, 6, 1).expect("valid date"),
            end: NaiveDate::from_ymd_opt(2000, 6, 30).expect("valid date"),
        };
        let msg = err.to_string();
        assert!(msg.contains("2000-06-01"));
        assert!(msg.contains("2000-06-30"));
    }
}
