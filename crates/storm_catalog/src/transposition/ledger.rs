//! Audit ledger of every storm and candidate validity decision.
use std::fmt::Write as _;

use crate::sampling::uniform_index;
use crate::seeds::rng_from_seed;
use crate::transposition::LocationInfo;

/// Seed used when shuffling exported ledgers.
pub const LEDGER_SHUFFLE_SEED: i64 = 945_631;

/// One [`LocationInfo`] per (storm, candidate) pair.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocationLedger {
    pub entries: Vec<LocationInfo>,
}

impl LocationLedger {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            entries: Vec::with_capacity(cap),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, info: LocationInfo) {
        self.entries.push(info);
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocationInfo> {
        self.entries.iter()
    }

    /// Number of entries marked valid.
    pub fn valid_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_valid).count()
    }

    /// A copy in a seeded random order, so audits sampled from the top of the file are
    /// not dominated by the first storms.
    ///
    /// Builds the permutation with the inside-out Fisher-Yates shuffle.
    pub fn shuffled(&self, seed: i64) -> Self {
        let n = self.entries.len();
        let mut rng = rng_from_seed(seed);
        let mut order = vec![0usize; n];
        for i in 0..n {
            let j = uniform_index(&mut rng, i + 1);
            if i != j {
                order[i] = order[j];
            }
            order[j] = i;
        }
        order.into_iter().map(|i| self.entries[i].clone()).collect()
    }

    /// Renders `StormName,X,Y,IsValid` rows with a header.
    pub fn to_csv(&self) -> String {
        let mut out = String::with_capacity(24 + self.entries.len() * 48);
        out.push_str("StormName,X,Y,IsValid\n");
        for e in &self.entries {
            let _ = writeln!(
                out,
                "{},{},{},{}",
                e.storm_name, e.coordinate.x, e.coordinate.y, e.is_valid
            );
        }
        out
    }
}

impl FromIterator<LocationInfo> for LocationLedger {
    fn from_iter<I: IntoIterator<Item = LocationInfo>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Extend<LocationInfo> for LocationLedger {
    fn extend<I: IntoIterator<Item = LocationInfo>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;

    fn ledger(n: usize) -> LocationLedger {
        (0..n)
            .map(|i| {
                LocationInfo::new(
                    format!("storm{}", i / 3),
                    DVec2::new(i as f64, 0.5),
                    i % 2 == 0,
                )
            })
            .collect()
    }

    #[test]
    fn csv_has_header_and_one_row_per_entry() {
        let csv = ledger(2).to_csv();
        assert_eq!(
            csv,
            "StormName,X,Y,IsValid\nstorm0,0,0.5,true\nstorm0,1,0.5,false\n"
        );
    }

    #[test]
    fn shuffle_is_a_seeded_permutation() {
        let original = ledger(50);
        let a = original.shuffled(LEDGER_SHUFFLE_SEED);
        let b = original.shuffled(LEDGER_SHUFFLE_SEED);
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
        assert_ne!(a, original);

        let mut xs: Vec<i64> = a.iter().map(|e| e.coordinate.x as i64).collect();
        xs.sort_unstable();
        assert_eq!(xs, (0..50).collect::<Vec<_>>());
        assert_eq!(a.valid_count(), original.valid_count());
    }

    #[test]
    fn empty_ledger_shuffles_to_empty() {
        assert!(LocationLedger::new().shuffled(1).is_empty());
    }
}
