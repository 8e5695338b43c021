//! Load status holder — tracks the one fetch of a front-end's lifetime.

use tracing::{info, warn};

use super::provider::{LoadError, SeriesProvider};
use crate::domain::HistoricalSeries;

/// Tri-state load status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Loading,
    Error(String),
    Ready,
}

impl LoadStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LoadStatus::Loading => "loading",
            LoadStatus::Error(_) => "error",
            LoadStatus::Ready => "ready",
        }
    }
}

/// Holds the status and, once ready, the loaded series.
///
/// Fire-once: after the first `finish`, later results are ignored.
#[derive(Debug, Default)]
pub struct DataLoader {
    status: LoadStatus,
    data: Option<HistoricalSeries>,
    finished: bool,
}

impl DataLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn data(&self) -> Option<&HistoricalSeries> {
        self.data.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Mark the load as in flight.
    pub fn begin(&mut self) {
        if !self.finished {
            self.status = LoadStatus::Loading;
        }
    }

    /// Record the outcome. Returns the initial current year on success.
    pub fn finish(&mut self, result: Result<HistoricalSeries, LoadError>) -> Option<i32> {
        if self.finished {
            warn!("ignoring load result after the first one");
            return None;
        }
        self.finished = true;

        match result {
            Ok(series) => {
                let first = series.first_year();
                info!(points = series.len(), "load ready");
                self.data = Some(series);
                self.status = LoadStatus::Ready;
                first
            }
            Err(e) => {
                let message = e.user_message();
                warn!(error = %message, "load failed");
                self.data = None;
                self.status = LoadStatus::Error(message);
                None
            }
        }
    }

    /// Run the provider once and record the outcome.
    pub fn load(&mut self, provider: &dyn SeriesProvider) -> Option<i32> {
        self.begin();
        let result = provider.fetch();
        self.finish(result)
    }

    /// Take the loaded series out, e.g. to hand it to the playback controller.
    pub fn take_data(&mut self) -> Option<HistoricalSeries> {
        self.data.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DataPoint, SeriesMeta};

    struct Fixed(Result<HistoricalSeries, u16>);

    impl SeriesProvider for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn fetch(&self) -> Result<HistoricalSeries, LoadError> {
            match &self.0 {
                Ok(s) => Ok(s.clone()),
                Err(code) => Err(LoadError::Status {
                    code: *code,
                    reason: "Internal Server Error".into(),
                }),
            }
        }
    }

    fn series(years: &[i32]) -> HistoricalSeries {
        HistoricalSeries {
            meta: SeriesMeta {
                dataset: None,
                baseline: "1951-1980".into(),
                unit: "°C".into(),
                start_year: years.first().copied().unwrap_or(0),
                end_year: years.last().copied().unwrap_or(0),
            },
            series: years.iter().map(|&y| DataPoint::new(y, 0.0)).collect(),
        }
    }

    #[test]
    fn starts_loading() {
        let loader = DataLoader::new();
        assert_eq!(loader.status(), &LoadStatus::Loading);
        assert!(loader.data().is_none());
    }

    #[test]
    fn success_sets_ready_and_first_year() {
        let mut loader = DataLoader::new();
        let first = loader.load(&Fixed(Ok(series(&[2000, 2001]))));
        assert_eq!(first, Some(2000));
        assert_eq!(loader.status(), &LoadStatus::Ready);
        assert_eq!(loader.data().unwrap().len(), 2);
    }

    #[test]
    fn empty_series_is_ready_without_year() {
        let mut loader = DataLoader::new();
        assert_eq!(loader.load(&Fixed(Ok(series(&[])))), None);
        assert_eq!(loader.status(), &LoadStatus::Ready);
    }

    #[test]
    fn http_500_sets_error_with_code() {
        let mut loader = DataLoader::new();
        assert_eq!(loader.load(&Fixed(Err(500))), None);
        match loader.status() {
            LoadStatus::Error(msg) => assert!(msg.contains("500")),
            other => panic!("expected error, got {other:?}"),
        }
        assert!(loader.data().is_none());
    }

    #[test]
    fn second_result_is_ignored() {
        let mut loader = DataLoader::new();
        loader.load(&Fixed(Err(500)));
        assert_eq!(loader.load(&Fixed(Ok(series(&[2000])))), None);
        assert_eq!(loader.status().label(), "error");
        assert!(loader.is_finished());
    }
}
