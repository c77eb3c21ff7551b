//! Blocks of consecutive event numbers.
use std::ops::RangeInclusive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An inclusive range of event numbers belonging to one realization block.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Block {
    pub realization_index: i32,
    pub block_index: i32,
    #[cfg_attr(feature = "serde", serde(rename = "block_event_count"))]
    pub event_count: i32,
    #[cfg_attr(feature = "serde", serde(rename = "block_event_start"))]
    pub event_start: i64,
    #[cfg_attr(feature = "serde", serde(rename = "block_event_end"))]
    pub event_end: i64,
}

impl Block {
    pub fn new(
        realization_index: i32,
        block_index: i32,
        event_start: i64,
        event_count: i32,
    ) -> Self {
        Self {
            realization_index,
            block_index,
            event_count,
            event_start,
            event_end: event_start + i64::from(event_count) - 1,
        }
    }

    /// Event numbers covered by this block; empty when the block has no events.
    pub fn event_numbers(&self) -> RangeInclusive<i64> {
        if self.event_count > 0 {
            self.event_start..=self.event_end
        } else {
            // An empty inclusive range.
            1..=0
        }
    }

    /// Checks `event_end == event_start + event_count - 1` for non-empty blocks.
    pub fn validate(&self) -> Result<()> {
        if self.event_count < 0 {
            return Err(Error::InvalidConfig(format!(
                "block {}/{} has negative event count {}",
                self.realization_index, self.block_index, self.event_count
            )));
        }
        let expected_end = self.event_start + i64::from(self.event_count) - 1;
        if self.event_count > 0 && self.event_end != expected_end {
            return Err(Error::InvalidConfig(format!(
                "block {}/{} spans {}..={} but claims {} events",
                self.realization_index,
                self.block_index,
                self.event_start,
                self.event_end,
                self.event_count
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_derives_inclusive_end() {
        let block = Block::new(1, 3, 11, 5);
        assert_eq!(block.event_end, 15);
        assert_eq!(block.event_numbers().collect::<Vec<_>>(), vec![11, 12, 13, 14, 15]);
        assert!(block.validate().is_ok());
    }

    #[test]
    fn empty_block_yields_no_events() {
        let block = Block {
            realization_index: 1,
            block_index: 2,
            event_count: 0,
            event_start: 16,
            event_end: 15,
        };
        assert_eq!(block.event_numbers().count(), 0);
        assert!(block.validate().is_ok());
    }

    #[test]
    fn validate_rejects_inconsistent_span() {
        let block = Block {
            realization_index: 1,
            block_index: 1,
            event_count: 3,
            event_start: 1,
            event_end: 5,
        };
        assert!(matches!(block.validate(), Err(Error::InvalidConfig(_))));
    }
}
