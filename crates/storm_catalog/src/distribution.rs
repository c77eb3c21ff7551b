//! Discrete empirical distributions for seasonal date sampling.
//!
//! A [`DiscreteEmpiricalDistribution`] maps a uniform draw to a bin start (a day of year)
//! by inverse-CDF lookup. [`SeasonalDistributions`] holds one distribution per storm type.
use std::collections::HashMap;

use crate::error::{Error, Result};

/// Inverse-CDF lookup over ordered `(bin_start, cumulative_probability)` pairs.
#[derive(Clone, Debug, PartialEq)]
pub struct DiscreteEmpiricalDistribution {
    bin_starts: Vec<u32>,
    cumulative_probability: Vec<f64>,
}

impl DiscreteEmpiricalDistribution {
    /// Creates a distribution after checking that the two columns line up, bin starts
    /// ascend, and probabilities are finite, within `[0, 1]` and non-decreasing.
    pub fn new(bin_starts: Vec<u32>, cumulative_probability: Vec<f64>) -> Result<Self> {
        if bin_starts.is_empty() {
            return Err(Error::InvalidConfig(
                "distribution needs at least one bin".into(),
            ));
        }
        if bin_starts.len() != cumulative_probability.len() {
            return Err(Error::InvalidConfig(format!(
                "distribution has {} bin starts but {} probabilities",
                bin_starts.len(),
                cumulative_probability.len()
            )));
        }
        if bin_starts.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::InvalidConfig(
                "distribution bin starts must be strictly ascending".into(),
            ));
        }
        if cumulative_probability
            .iter()
            .any(|p| !p.is_finite() || *p < 0.0 || *p > 1.0)
        {
            return Err(Error::InvalidConfig(
                "cumulative probabilities must lie in [0, 1]".into(),
            ));
        }
        if cumulative_probability.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::InvalidConfig(
                "cumulative probabilities must be non-decreasing".into(),
            ));
        }
        Ok(Self {
            bin_starts,
            cumulative_probability,
        })
    }

    /// Parses a two-column `bin_start,cumulative_probability` table.
    ///
    /// The first line is a header. Blank lines are skipped; any other row that does not
    /// parse fails the whole table with [`Error::MalformedDistribution`] naming the
    /// 1-based line number.
    pub fn from_csv(text: &str) -> Result<Self> {
        let mut starts = Vec::new();
        let mut probs = Vec::new();
        for (i, line) in text.lines().enumerate().skip(1) {
            let line_no = i + 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split(',');
            let (Some(start), Some(prob)) = (fields.next(), fields.next()) else {
                return Err(Error::MalformedDistribution {
                    line: line_no,
                    reason: "expected two columns".into(),
                });
            };
            let start = start
                .trim()
                .parse::<u32>()
                .map_err(|e| Error::MalformedDistribution {
                    line: line_no,
                    reason: format!("bin start '{start}': {e}"),
                })?;
            let prob = prob
                .trim()
                .parse::<f64>()
                .map_err(|e| Error::MalformedDistribution {
                    line: line_no,
                    reason: format!("probability '{prob}': {e}"),
                })?;
            starts.push(start);
            probs.push(prob);
        }
        Self::new(starts, probs)
    }

    pub fn bin_starts(&self) -> &[u32] {
        &self.bin_starts
    }

    pub fn cumulative_probability(&self) -> &[f64] {
        &self.cumulative_probability
    }

    /// Returns the first bin start whose cumulative probability reaches `u`.
    ///
    /// Draws at or below the first cumulative probability short-circuit to the first bin.
    /// If no bin reaches `u` the last bin start is returned.
    pub fn sample(&self, u: f64) -> u32 {
        if u <= self.cumulative_probability[0] {
            return self.bin_starts[0];
        }
        self.cumulative_probability
            .iter()
            .position(|p| *p >= u)
            .map(|i| self.bin_starts[i])
            .unwrap_or(self.bin_starts[self.bin_starts.len() - 1])
    }
}

/// Seasonal distributions keyed by storm type.
#[derive(Clone, Debug, Default)]
pub struct SeasonalDistributions {
    by_type: HashMap<String, DiscreteEmpiricalDistribution>,
}

impl SeasonalDistributions {
    pub fn new() -> Self {
        Self {
            by_type: HashMap::new(),
        }
    }

    pub fn insert(
        &mut self,
        storm_type: impl Into<String>,
        distribution: DiscreteEmpiricalDistribution,
    ) -> Option<DiscreteEmpiricalDistribution> {
        self.by_type.insert(storm_type.into(), distribution)
    }

    /// Builder-style [`SeasonalDistributions::insert`].
    pub fn with(
        mut self,
        storm_type: impl Into<String>,
        distribution: DiscreteEmpiricalDistribution,
    ) -> Self {
        self.insert(storm_type, distribution);
        self
    }

    /// Looks up the distribution for `storm_type`.
    pub fn get(&self, storm_type: &str) -> Result<&DiscreteEmpiricalDistribution> {
        self.by_type
            .get(storm_type)
            .ok_or_else(|| Error::MissingDistribution {
                storm_type: storm_type.to_owned(),
            })
    }

    pub fn contains(&self, storm_type: &str) -> bool {
        self.by_type.contains_key(storm_type)
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

impl FromIterator<(String, DiscreteEmpiricalDistribution)> for SeasonalDistributions {
    fn from_iter<I: IntoIterator<Item = (String, DiscreteEmpiricalDistribution)>>(
        iter: I,
    ) -> Self {
        Self {
            by_type: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_bin() -> DiscreteEmpiricalDistribution {
        DiscreteEmpiricalDistribution::new(vec![1, 180], vec![0.5, 1.0]).expect("valid")
    }

    #[test]
    fn draws_at_or_below_first_probability_return_first_bin() {
        let dist = two_bin();
        for u in [0.0, 0.1, 0.25, 0.5] {
            assert_eq!(dist.sample(u), 1);
        }
    }

    #[test]
    fn sample_returns_first_bin_reaching_the_draw() {
        let dist = DiscreteEmpiricalDistribution::new(
            vec![10, 100, 200, 300],
            vec![0.1, 0.4, 0.4, 1.0],
        )
        .expect("valid");
        assert_eq!(dist.sample(0.05), 10);
        assert_eq!(dist.sample(0.11), 100);
        assert_eq!(dist.sample(0.4), 100);
        assert_eq!(dist.sample(0.41), 300);
        assert_eq!(dist.sample(1.0), 300);
    }

    #[test]
    fn sample_falls_back_to_last_bin_when_probabilities_fall_short() {
        let dist = DiscreteEmpiricalDistribution::new(vec![5, 6], vec![0.2, 0.9]).expect("valid");
        assert_eq!(dist.sample(0.95), 6);
    }

    #[test]
    fn new_rejects_inconsistent_columns() {
        assert!(DiscreteEmpiricalDistribution::new(vec![], vec![]).is_err());
        assert!(DiscreteEmpiricalDistribution::new(vec![1, 2], vec![1.0]).is_err());
        assert!(DiscreteEmpiricalDistribution::new(vec![2, 1], vec![0.5, 1.0]).is_err());
        assert!(DiscreteEmpiricalDistribution::new(vec![1, 2], vec![0.6, 0.5]).is_err());
        assert!(DiscreteEmpiricalDistribution::new(vec![1, 2], vec![0.5, 1.5]).is_err());
    }

    #[test]
    fn from_csv_parses_rows_after_header() {
        let dist = DiscreteEmpiricalDistribution::from_csv(
            "bin_start,cumulative_probability\r\n1,0.25\r\n91,0.5\r\n\r\n182,1.0\r\n",
        )
        .expect("parses");
        assert_eq!(dist.bin_starts(), &[1, 91, 182]);
        assert_eq!(dist.cumulative_probability(), &[0.25, 0.5, 1.0]);
    }

    #[test]
    fn from_csv_fails_fast_on_first_malformed_row() {
        let err = DiscreteEmpiricalDistribution::from_csv("start,p\n1,0.5\nabc,0.7\n200,1.0\n")
            .unwrap_err();
        assert!(matches!(err, Error::MalformedDistribution { line: 3, .. }));

        let err = DiscreteEmpiricalDistribution::from_csv("start,p\n1,0.5\n2\n").unwrap_err();
        assert!(matches!(err, Error::MalformedDistribution { line: 3, .. }));

        let err = DiscreteEmpiricalDistribution::from_csv("start,p\n1,half\n").unwrap_err();
        assert!(matches!(err, Error::MalformedDistribution { line: 2, .. }));
    }

    #[test]
    fn lookup_by_storm_type() {
        let dists = SeasonalDistributions::new().with("ST2", two_bin());
        assert!(dists.get("ST2").is_ok());
        assert!(matches!(
            dists.get("ST3"),
            Err(Error::MissingDistribution { ref storm_type }) if storm_type == "ST3"
        ));
    }
}
