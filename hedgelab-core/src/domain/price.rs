//! PriceSeries — the close-price path every simulation runs over.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HedgeError;

/// A single close-price sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// Ordered, immutable sequence of price samples.
///
/// Construction guarantees a non-empty series with strictly increasing
/// timestamps and finite, strictly positive prices. Nothing mutates it
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, HedgeError> {
        if points.is_empty() {
            return Err(HedgeError::invalid("price series is empty"));
        }
        for (i, p) in points.iter().enumerate() {
            if !p.price.is_finite() || p.price <= 0.0 {
                return Err(HedgeError::invalid(format!(
                    "price at index {i} ({}) must be finite and positive, got {}",
                    p.timestamp, p.price
                )));
            }
        }
        if let Some(i) = points
            .windows(2)
            .position(|w| w[1].timestamp <= w[0].timestamp)
        {
            return Err(HedgeError::invalid(format!(
                "timestamps must be strictly increasing: {} follows {} at index {}",
                points[i + 1].timestamp,
                points[i].timestamp,
                i + 1
            )));
        }
        Ok(Self { points })
    }

    /// Build a series from `(timestamp, price)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, HedgeError>
    where
        I: IntoIterator<Item = (DateTime<Utc>, f64)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(timestamp, price)| PricePoint { timestamp, price })
                .collect(),
        )
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> &PricePoint {
        &self.points[0]
    }

    pub fn last(&self) -> &PricePoint {
        &self.points[self.points.len() - 1]
    }

    pub fn initial_price(&self) -> f64 {
        self.first().price
    }

    pub fn final_price(&self) -> f64 {
        self.last().price
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.price)
    }

    /// Spacing between the first two samples, if there are at least two.
    pub fn sampling_interval(&self) -> Option<Duration> {
        match self.points.as_slice() {
            [a, b, ..] => Some(b.timestamp - a.timestamp),
            _ => None,
        }
    }
}

impl TryFrom<Vec<PricePoint>> for PriceSeries {
    type Error = HedgeError;

    fn try_from(points: Vec<PricePoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<PriceSeries> for Vec<PricePoint> {
    fn from(series: PriceSeries) -> Self {
        series.points
    }
}
