//! Event records and catalog CSV output.
use std::io;

use chrono::NaiveDate;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::catalog::config::DATE_FORMAT;
use crate::error::Result;

/// Header row of a catalog CSV.
pub const CATALOG_CSV_HEADER: &str = "event_number,storm_path,x,y,storm_type,storm_date,basin_path";

/// A fully specified simulated event.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct EventResult {
    pub event_number: i64,
    /// Storm name as listed in the storm catalog.
    pub storm_path: String,
    pub x: f64,
    pub y: f64,
    pub storm_type: String,
    #[cfg_attr(feature = "serde", serde(with = "compact_date"))]
    pub storm_date: NaiveDate,
    /// `{root}/{YYYY-MM-DD}_{basin}_{scenario}`.
    pub basin_path: String,
}

impl EventResult {
    /// The storm date as `YYYYMMDD`.
    pub fn storm_date_compact(&self) -> String {
        self.storm_date.format(DATE_FORMAT).to_string()
    }

    /// One CSV row, without a trailing newline.
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{}",
            self.event_number,
            self.storm_path,
            self.x,
            self.y,
            self.storm_type,
            self.storm_date_compact(),
            self.basin_path
        )
    }
}

/// Basin model path for an event: `{root}/{YYYY-MM-DD}_{basin}_{scenario}`.
pub fn basin_path(root: &str, date: NaiveDate, basin_name: &str, scenario: &str) -> String {
    format!("{root}/{}_{basin_name}_{scenario}", date.format("%Y-%m-%d"))
}

/// Writes `results` as a catalog CSV with a header row.
pub fn write_catalog_csv<W: io::Write>(mut out: W, results: &[EventResult]) -> Result<()> {
    writeln!(out, "{CATALOG_CSV_HEADER}")?;
    for r in results {
        writeln!(out, "{}", r.to_csv_row())?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(feature = "serde")]
mod compact_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::catalog::config::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}
