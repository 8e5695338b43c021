//! Application state — single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread communicates via channels; the
//! playback controller is ticked from the event loop.

use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use tracing::warn;

use templine_core::data::{DataLoader, LoadError, LoadStatus, SeriesSource};
use templine_core::domain::HistoricalSeries;
use templine_core::playback::{IntervalScheduler, PlaybackController, PlaybackEvent};
use templine_core::Config;

use crate::worker::{WorkerCommand, WorkerResponse};

/// Longest the event loop blocks on input before redrawing (~20 FPS).
pub const FRAME_BUDGET: Duration = Duration::from_millis(50);

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
}

/// Top-level application state.
pub struct AppState {
    pub running: bool,

    pub source: SeriesSource,
    pub loader: DataLoader,
    pub playback: PlaybackController<IntervalScheduler>,
    pub preview_len: usize,
    pub loaded_at: Option<NaiveDateTime>,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub overlay: Overlay,
}

impl AppState {
    pub fn new(
        config: &Config,
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
    ) -> Self {
        Self {
            running: true,
            source: config.source(),
            loader: DataLoader::new(),
            playback: PlaybackController::new(IntervalScheduler::new(), config.timing()),
            preview_len: config.preview_len,
            loaded_at: None,
            worker_tx,
            worker_rx,
            status_message: None,
            overlay: Overlay::None,
        }
    }

    /// Ask the worker for the series. Only the first request of a session counts.
    pub fn request_load(&mut self) {
        if self.loader.is_finished() {
            return;
        }
        self.loader.begin();
        let cmd = WorkerCommand::Load {
            source: self.source.clone(),
        };
        if self.worker_tx.send(cmd).is_err() {
            self.apply_load(Err(LoadError::Transport("worker is not running".into())));
            return;
        }
        self.set_status(format!("Loading {}", self.source.describe()));
    }

    /// Record the fetch outcome and seed playback from it.
    pub fn apply_load(&mut self, result: Result<HistoricalSeries, LoadError>) {
        if self.loader.is_finished() {
            return;
        }
        self.loader.finish(result);

        match self.loader.status().clone() {
            LoadStatus::Ready => {
                let points = self
                    .loader
                    .data()
                    .map(|d| d.series.clone())
                    .unwrap_or_default();
                let count = points.len();
                self.playback.replace_series(points);
                self.loaded_at = Some(chrono::Local::now().naive_local());
                if count == 0 {
                    self.set_warning("Loaded an empty series; playback disabled");
                } else {
                    self.set_status(format!("Loaded {count} points"));
                }
            }
            LoadStatus::Error(message) => {
                self.playback.replace_series(Vec::new());
                self.status_message = Some((message, StatusLevel::Error));
            }
            LoadStatus::Loading => {}
        }
    }

    /// Drain worker responses without blocking.
    pub fn drain_worker(&mut self) {
        while let Ok(resp) = self.worker_rx.try_recv() {
            match resp {
                WorkerResponse::Loaded { source, result } => {
                    if source != self.source {
                        warn!(source = %source.describe(), "ignoring result for another source");
                        continue;
                    }
                    self.apply_load(result);
                }
            }
        }
    }

    /// Deliver a due playback tick.
    pub fn on_frame(&mut self, now: Instant) {
        if let Some(event) = self.playback.pump(now) {
            self.report(event);
        }
    }

    /// How long to wait for input: the frame budget, or less if a tick is due sooner.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.playback
            .until_next_tick(now)
            .map_or(FRAME_BUDGET, |d| d.min(FRAME_BUDGET))
    }

    pub fn play(&mut self) {
        if let Some(event) = self.playback.play() {
            self.report(event);
        }
    }

    pub fn pause(&mut self) {
        if let Some(event) = self.playback.pause() {
            self.report(event);
        }
    }

    pub fn toggle(&mut self) {
        if let Some(event) = self.playback.toggle() {
            self.report(event);
        }
    }

    /// Loaded series, once ready.
    pub fn data(&self) -> Option<&HistoricalSeries> {
        self.loader.data()
    }

    /// Stop playback and the worker; called once on exit.
    pub fn shutdown(&mut self) {
        self.playback.teardown();
        let _ = self.worker_tx.send(WorkerCommand::Shutdown);
        self.running = false;
    }

    fn report(&mut self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::Started { year, step } => {
                self.set_status(format!("Playing from {year} ({} ms/year)", step.as_millis()));
            }
            PlaybackEvent::Advanced { .. } => {}
            PlaybackEvent::Finished => {
                let last = self
                    .playback
                    .current_year()
                    .map(|y| y.to_string())
                    .unwrap_or_default();
                self.set_status(format!("Playback finished at {last}"));
            }
            PlaybackEvent::Paused => {
                let at = self
                    .playback
                    .current_year()
                    .map(|y| y.to_string())
                    .unwrap_or_default();
                self.set_status(format!("Paused at {at}"));
            }
        }
    }

    /// Set an info status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    /// Set a warning status message.
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use templine_core::domain::{DataPoint, SeriesMeta};

    fn app() -> (AppState, mpsc::Receiver<WorkerCommand>) {
        let (tx, cmd_rx) = mpsc::channel();
        let (_resp_tx, rx) = mpsc::channel();
        (AppState::new(&Config::default(), tx, rx), cmd_rx)
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
            series: years.iter().map(|&y| DataPoint::new(y, 0.1)).collect(),
        }
    }

    #[test]
    fn request_load_sends_one_command() {
        let (mut app, cmd_rx) = app();
        app.request_load();
        assert!(matches!(cmd_rx.try_recv(), Ok(WorkerCommand::Load { .. })));
        assert_eq!(app.loader.status(), &LoadStatus::Loading);

        app.apply_load(Ok(series(&[2000])));
        app.request_load();
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn ready_seeds_current_year() {
        let (mut app, _cmd_rx) = app();
        app.apply_load(Ok(series(&[1880, 1881])));
        assert_eq!(app.playback.current_year(), Some(1880));
        assert!(app.playback.can_play());
        assert!(app.loaded_at.is_some());
    }

    #[test]
    fn failure_disables_playback() {
        let (mut app, _cmd_rx) = app();
        app.apply_load(Err(LoadError::Status {
            code: 500,
            reason: "Internal Server Error".into(),
        }));
        assert!(!app.playback.can_play());
        let (msg, level) = app.status_message.clone().unwrap();
        assert!(msg.contains("500"));
        assert_eq!(level, StatusLevel::Error);
        app.play();
        assert!(!app.playback.is_playing());
    }

    #[test]
    fn poll_timeout_shrinks_while_playing() {
        let (mut app, _cmd_rx) = app();
        app.apply_load(Ok(series(&(1880..2880).collect::<Vec<_>>())));
        let now = Instant::now();
        assert_eq!(app.poll_timeout(now), FRAME_BUDGET);
        app.play();
        // 1000 points over 20 s: 20 ms per step.
        assert!(app.poll_timeout(Instant::now()) <= Duration::from_millis(20));
    }

    #[test]
    fn shutdown_stops_playback() {
        let (mut app, cmd_rx) = app();
        app.apply_load(Ok(series(&[2000, 2001])));
        app.play();
        app.shutdown();
        assert!(!app.playback.is_playing());
        assert!(!app.playback.scheduler().is_active());
        assert!(matches!(cmd_rx.try_recv(), Ok(WorkerCommand::Shutdown)));
    }
}
