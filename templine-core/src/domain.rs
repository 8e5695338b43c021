//! Domain types: series metadata, yearly data points, and the parsed response.

use serde::{Deserialize, Serialize};

/// Descriptive metadata for a loaded series. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesMeta {
    /// Human-readable dataset name. Older payloads omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    /// Reference period the anomalies are measured against (e.g. "1951-1980").
    pub baseline: String,
    /// Unit label (e.g. "°C").
    pub unit: String,
    pub start_year: i32,
    pub end_year: i32,
}

/// A single yearly observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub year: i32,
    /// Anomaly value. Payloads that only carry years decode to 0.0.
    #[serde(default)]
    pub value: f64,
}

impl DataPoint {
    pub fn new(year: i32, value: f64) -> Self {
        Self { year, value }
    }
}

/// Body of `GET /api/temperature/historical`.
///
/// `series` is in chronological order; the order of the payload is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    pub meta: SeriesMeta,
    pub series: Vec<DataPoint>,
}

impl HistoricalSeries {
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Year of the first point, used as the initial current year.
    pub fn first_year(&self) -> Option<i32> {
        self.series.first().map(|p| p.year)
    }

    /// The first `n` points (fewer if the series is shorter).
    pub fn preview(&self, n: usize) -> &[DataPoint] {
        &self.series[..n.min(self.series.len())]
    }

    /// Minimum and maximum finite value, or `None` for an empty series.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.series
            .iter()
            .map(|p| p.value)
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
