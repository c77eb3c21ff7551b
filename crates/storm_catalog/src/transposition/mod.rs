//! Storm transposition validity testing.
//!
//! A storm with native center `C` is moved to a candidate placement `P` by the offset
//! `P - C`. A [`TranspositionTest`] decides whether that move is admissible; the
//! [`TranspositionValidator`] runs a test for every storm and candidate on a bounded
//! worker pool and collects valid placements plus a full audit ledger.
//!
//! Two tests are provided:
//! - [`RasterDepthTest`] queries the storm's depth raster under the study area.
//! - [`ContainmentTest`] checks the translated watershed stays inside the transposition
//!   domain.
use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::Coordinate;

pub mod containment;
pub mod ledger;
pub mod raster_depth;
pub mod validator;

pub use containment::ContainmentTest;
pub use ledger::{LocationLedger, LEDGER_SHUFFLE_SEED};
pub use raster_depth::RasterDepthTest;
pub use validator::{
    ChannelSink, FailurePolicy, FnResultSink, StormFailure, StormResultSink, StormValidation,
    TranspositionValidator, ValidationReport, ValidatorConfig,
};

/// A historical storm and where it was observed.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct StormCenter {
    pub name: String,
    /// Native storm center in the working projection.
    pub center: Coordinate,
    /// Start date (`YYYYMMDD`), the key of the storm's depth raster.
    pub start_date: String,
}

impl StormCenter {
    pub fn new(name: impl Into<String>, center: DVec2, start_date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            center,
            start_date: start_date.into(),
        }
    }

    /// Builds a storm whose start date is the leading `_` field of its name,
    /// e.g. `19990101` for `19990101_24hr_precip_ST2_01`.
    pub fn from_storm_name(name: impl Into<String>, center: DVec2) -> Self {
        let name = name.into();
        let start_date = name.split('_').next().unwrap_or_default().to_owned();
        Self {
            name,
            center,
            start_date,
        }
    }

    /// Offset that moves this storm onto `candidate`.
    #[inline]
    pub fn offset_to(&self, candidate: DVec2) -> DVec2 {
        candidate - self.center
    }
}

/// Validity of one storm at one candidate placement.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct LocationInfo {
    pub storm_name: String,
    pub coordinate: Coordinate,
    pub is_valid: bool,
}

impl LocationInfo {
    pub fn new(storm_name: impl Into<String>, coordinate: Coordinate, is_valid: bool) -> Self {
        Self {
            storm_name: storm_name.into(),
            coordinate,
            is_valid,
        }
    }
}

/// Decides which candidate placements of a storm are admissible.
pub trait TranspositionTest: Send + Sync {
    /// Validity of every candidate for `storm`, in candidate order.
    ///
    /// An `Err` means the storm itself could not be evaluated (for example its raster
    /// is missing); per-candidate problems are reported as `false`.
    fn test_storm(&self, storm: &StormCenter, candidates: &[Coordinate]) -> Result<Vec<bool>>;
}

impl<T: TranspositionTest + ?Sized> TranspositionTest for Box<T> {
    fn test_storm(&self, storm: &StormCenter, candidates: &[Coordinate]) -> Result<Vec<bool>> {
        (**self).test_storm(storm, candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_date_comes_from_the_leading_name_field() {
        let storm = StormCenter::from_storm_name("19990101_24hr_precip_ST2_01", DVec2::ZERO);
        assert_eq!(storm.start_date, "19990101");
        assert_eq!(storm.name, "19990101_24hr_precip_ST2_01");
    }

    #[test]
    fn offset_points_from_center_to_candidate() {
        let storm = StormCenter::new("s", DVec2::new(10.0, 20.0), "20000101");
        assert_eq!(storm.offset_to(DVec2::new(15.0, 5.0)), DVec2::new(5.0, -15.0));
        assert_eq!(storm.offset_to(storm.center), DVec2::ZERO);
    }
}
