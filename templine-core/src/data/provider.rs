//! Series provider trait and structured load errors.
//!
//! The SeriesProvider trait abstracts over where the series comes from (the
//! local HTTP API or a GISTEMP CSV on disk) so front-ends can swap sources and
//! tests can substitute fixtures.

use std::path::PathBuf;

use thiserror::Error;

use super::csv_import::CsvProvider;
use super::http::HttpProvider;
use crate::domain::HistoricalSeries;

/// Fallback text when an error carries no message of its own.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Structured error types for loading a series.
///
/// Displayable in both CLI and TUI contexts.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{0}")]
    Transport(String),

    #[error("API error: {code} {reason}")]
    Status { code: u16, reason: String },

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("cannot read {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("CSV format not recognized: {0}")]
    Format(String),

    #[error("no data found in the requested range (>= {min_year})")]
    Empty { min_year: i32 },
}

impl LoadError {
    /// Message shown to the user in the error state.
    pub fn user_message(&self) -> String {
        let msg = self.to_string();
        if msg.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            msg
        }
    }

    /// HTTP status code, when the failure came from the server.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LoadError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// A source of one historical series.
pub trait SeriesProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the whole series. Called once per front-end lifetime.
    fn fetch(&self) -> Result<HistoricalSeries, LoadError>;
}

/// Where to load the series from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesSource {
    Http { url: String },
    Csv { path: PathBuf },
}

impl SeriesSource {
    /// Build the provider for this source.
    pub fn provider(&self) -> Result<Box<dyn SeriesProvider>, LoadError> {
        Ok(match self {
            SeriesSource::Http { url } => Box::new(HttpProvider::new(url.clone())?),
            SeriesSource::Csv { path } => Box::new(CsvProvider::new(path.clone())),
        })
    }

    /// Short label for status lines.
    pub fn describe(&self) -> String {
        match self {
            SeriesSource::Http { url } => url.clone(),
            SeriesSource::Csv { path } => path.display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message_carries_code_and_reason() {
        let err = LoadError::Status {
            code: 500,
            reason: "Internal Server Error".into(),
        };
        assert_eq!(err.user_message(), "API error: 500 Internal Server Error");
        assert_eq!(err.status_code(), Some(500));
    }

    #[test]
    fn empty_transport_message_falls_back_to_unknown() {
        let err = LoadError::Transport(String::new());
        assert_eq!(err.user_message(), UNKNOWN_ERROR);
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn transport_message_is_preferred() {
        let err = LoadError::Transport("connection refused".into());
        assert_eq!(err.user_message(), "connection refused");
    }

    #[test]
    fn describe_source() {
        let http = SeriesSource::Http {
            url: "http://localhost:8000/api/temperature/historical".into(),
        };
        assert!(http.describe().ends_with("/historical"));
        let csv = SeriesSource::Csv {
            path: PathBuf::from("data/gistemp.csv"),
        };
        assert!(csv.describe().contains("gistemp.csv"));
    }
}
