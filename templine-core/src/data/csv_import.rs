//! GISTEMP CSV import.
//!
//! Accepts two layouts:
//! - NASA wide format: `Year` plus the annual `J-D` column (monthly columns ignored)
//! - tidy format: `year,value`
//!
//! NASA files start with a title line before the header, so the header is the
//! first record that names a recognised column pair. Rows with non-numeric
//! cells (`***` marks missing months) are dropped, the rest sorted by year and
//! cut to the instrumental record starting in 1880.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::provider::{LoadError, SeriesProvider};
use crate::domain::{DataPoint, HistoricalSeries, SeriesMeta};

/// First year of the instrumental record kept on import.
pub const MIN_YEAR: i32 = 1880;

pub const GISTEMP_DATASET: &str = "NASA GISTEMP annual temperature anomaly";
pub const GISTEMP_BASELINE: &str = "1951-1980";
pub const GISTEMP_UNIT: &str = "°C";

/// Column pairs recognised as (year, annual value).
const LAYOUTS: [(&str, &str); 2] = [("Year", "J-D"), ("year", "value")];

/// Loads the series from a CSV file on disk.
pub struct CsvProvider {
    path: PathBuf,
}

impl CsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SeriesProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self) -> Result<HistoricalSeries, LoadError> {
        let file = File::open(&self.path).map_err(|e| LoadError::Io {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        let series = parse_annual(file)?;
        info!(path = %self.path.display(), points = series.len(), "CSV imported");
        Ok(series)
    }
}

/// Parse annual anomalies from any CSV reader.
pub fn parse_annual<R: Read>(reader: R) -> Result<HistoricalSeries, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut columns: Option<(usize, usize)> = None;
    let mut points = Vec::new();
    let mut dropped = 0usize;

    for record in rdr.records() {
        let record = record.map_err(|e| LoadError::Format(e.to_string()))?;

        let Some((year_col, value_col)) = columns else {
            columns = find_layout(&record);
            continue;
        };

        let year = record.get(year_col).and_then(parse_year);
        let value = record.get(value_col).and_then(parse_number);
        match (year, value) {
            (Some(year), Some(value)) => points.push(DataPoint::new(year, value)),
            _ => dropped += 1,
        }
    }

    if columns.is_none() {
        return Err(LoadError::Format(
            "expected (Year,J-D) or (year,value) columns".into(),
        ));
    }

    points.sort_by_key(|p| p.year);
    points.retain(|p| p.year >= MIN_YEAR);
    debug!(kept = points.len(), dropped, "parsed annual rows");

    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Err(LoadError::Empty { min_year: MIN_YEAR });
    };

    Ok(HistoricalSeries {
        meta: SeriesMeta {
            dataset: Some(GISTEMP_DATASET.to_string()),
            baseline: GISTEMP_BASELINE.to_string(),
            unit: GISTEMP_UNIT.to_string(),
            start_year: first.year,
            end_year: last.year,
        },
        series: points,
    })
}

fn find_layout(record: &csv::StringRecord) -> Option<(usize, usize)> {
    LAYOUTS.iter().find_map(|(year, value)| {
        let y = record.iter().position(|c| c == *year)?;
        let v = record.iter().position(|c| c == *value)?;
        Some((y, v))
    })
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_year(cell: &str) -> Option<i32> {
    let v = parse_number(cell)?;
    if v < i32::MIN as f64 || v > i32::MAX as f64 {
        return None;
    }
    Some(v.trunc() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nasa_wide_format_with_title_line() {
        let csv = "Land-Ocean: Global Means\n\
                   Year,Jan,Feb,J-D,D-N\n\
                   1881,-.20,-.14,-.09,-.10\n\
                   1880,-.18,-.24,-.17,***\n";
        let series = parse_annual(csv.as_bytes()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.series[0], DataPoint::new(1880, -0.17));
        assert_eq!(series.meta.start_year, 1880);
        assert_eq!(series.meta.end_year, 1881);
        assert_eq!(series.meta.baseline, GISTEMP_BASELINE);
    }

    #[test]
    fn drops_missing_values_and_early_years() {
        let csv = "year,value\n1879,0.1\n1880,***\n1881,0.2\n1882.0,0.3\n";
        let series = parse_annual(csv.as_bytes()).unwrap();
        let years: Vec<i32> = series.series.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![1881, 1882]);
    }

    #[test]
    fn unknown_header_is_a_format_error() {
        let csv = "date,temp\n2000-01-01,1.0\n";
        assert!(matches!(parse_annual(csv.as_bytes()), Err(LoadError::Format(_))));
    }

    #[test]
    fn nothing_after_1880_is_empty() {
        let csv = "year,value\n1850,0.1\n";
        match parse_annual(csv.as_bytes()) {
            Err(LoadError::Empty { min_year }) => assert_eq!(min_year, MIN_YEAR),
            other => panic!("expected empty error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let provider = CsvProvider::new("/nonexistent/gistemp.csv");
        assert!(matches!(provider.fetch(), Err(LoadError::Io { .. })));
    }
}
