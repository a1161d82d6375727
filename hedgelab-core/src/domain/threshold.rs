//! Rehedge thresholds.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::error::HedgeError;

/// Relative price move (as a fraction) that triggers a rehedge.
///
/// Always finite and strictly positive, which makes the total order below a
/// plain numeric order and lets thresholds key a `BTreeMap`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold(f64);

impl Threshold {
    pub fn new(value: f64) -> Result<Self, HedgeError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(HedgeError::invalid(format!(
                "threshold must be finite and positive, got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Threshold {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Threshold {}

impl PartialOrd for Threshold {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Threshold {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for Threshold {
    type Error = HedgeError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Threshold> for f64 {
    fn from(t: Threshold) -> Self {
        t.0
    }
}

/// Sorted, deduplicated set of thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThresholdSet(Vec<Threshold>);

impl ThresholdSet {
    /// Validate every value, then sort ascending and drop duplicates.
    pub fn new(values: &[f64]) -> Result<Self, HedgeError> {
        let mut thresholds = values
            .iter()
            .map(|&v| Threshold::new(v))
            .collect::<Result<Vec<_>, _>>()?;
        thresholds.sort();
        thresholds.dedup();
        Ok(Self(thresholds))
    }

    pub fn iter(&self) -> impl Iterator<Item = Threshold> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[Threshold] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Threshold> for ThresholdSet {
    fn from_iter<I: IntoIterator<Item = Threshold>>(iter: I) -> Self {
        let mut thresholds: Vec<Threshold> = iter.into_iter().collect();
        thresholds.sort();
        thresholds.dedup();
        Self(thresholds)
    }
}
