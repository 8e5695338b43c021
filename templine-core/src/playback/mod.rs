//! Playback controller — steps a current-year cursor through a loaded series.
//!
//! State machine:
//! - `Stopped` (initial, no timer)
//! - `Playing` (exactly one recurring timer)
//!
//! `play` starts at the first point and schedules a timer whose interval spreads
//! the whole series over a fixed duration. Each tick advances the cursor; the
//! tick that runs past the last point pauses instead of updating. `pause` is
//! idempotent. Dropping the controller cancels any active timer.

pub mod scheduler;

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::domain::DataPoint;

pub use scheduler::{IntervalScheduler, Scheduler, TimerId};
// Test helpers.
pub use scheduler::{RecordingScheduler, TimerLog};

/// Duration a full playback is spread over.
pub const DEFAULT_TOTAL_DURATION: Duration = Duration::from_millis(20_000);

/// Floor for the per-step interval.
pub const MIN_STEP: Duration = Duration::from_millis(10);

/// Per-step interval: `max(min_step, floor(total / len))` in whole milliseconds.
///
/// There is no upper clamp, so a one-point series waits the full duration.
/// Returns `None` for an empty series.
pub fn step_interval(total: Duration, len: usize, min_step: Duration) -> Option<Duration> {
    if len == 0 {
        return None;
    }
    let per_step_ms = total.as_millis() / len as u128;
    let step = Duration::from_millis(u64::try_from(per_step_ms).unwrap_or(u64::MAX));
    Some(step.max(min_step))
}

/// Timing parameters for playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackTiming {
    pub total_duration: Duration,
    pub min_step: Duration,
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self {
            total_duration: DEFAULT_TOTAL_DURATION,
            min_step: MIN_STEP,
        }
    }
}

/// Which state the machine is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Stopped,
    Playing,
}

/// Observable playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackState {
    pub current_year: Option<i32>,
    pub playing: bool,
    pub cursor: usize,
}

/// What a controller operation changed, for renderers that react to updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    Started { year: i32, step: Duration },
    Advanced { year: i32 },
    Finished,
    Paused,
}

/// Owns the playback state and the timer that drives it.
pub struct PlaybackController<S: Scheduler> {
    series: Vec<DataPoint>,
    state: PlaybackState,
    timer: Option<TimerId>,
    scheduler: S,
    timing: PlaybackTiming,
}

impl<S: Scheduler> PlaybackController<S> {
    /// Controller with no series loaded yet.
    pub fn new(scheduler: S, timing: PlaybackTiming) -> Self {
        Self {
            series: Vec::new(),
            state: PlaybackState::default(),
            timer: None,
            scheduler,
            timing,
        }
    }

    /// Controller for an already loaded series; the current year starts at its first point.
    pub fn with_series(scheduler: S, timing: PlaybackTiming, series: Vec<DataPoint>) -> Self {
        let mut controller = Self::new(scheduler, timing);
        controller.replace_series(series);
        controller
    }

    /// Install a new series: stops playback, resets state, and seeds the
    /// current year from the first point. Returns that year.
    pub fn replace_series(&mut self, series: Vec<DataPoint>) -> Option<i32> {
        self.cancel_timer();
        self.state = PlaybackState {
            current_year: series.first().map(|p| p.year),
            ..PlaybackState::default()
        };
        self.series = series;
        debug!(points = self.series.len(), "series installed");
        self.state.current_year
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_year(&self) -> Option<i32> {
        self.state.current_year
    }

    /// Point under the cursor while a year is shown.
    pub fn current_point(&self) -> Option<&DataPoint> {
        let year = self.state.current_year?;
        self.series
            .get(self.state.cursor)
            .filter(|p| p.year == year)
            .or_else(|| self.series.iter().find(|p| p.year == year))
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing
    }

    pub fn phase(&self) -> PlaybackPhase {
        if self.state.playing {
            PlaybackPhase::Playing
        } else {
            PlaybackPhase::Stopped
        }
    }

    pub fn series(&self) -> &[DataPoint] {
        &self.series
    }

    pub fn timing(&self) -> PlaybackTiming {
        self.timing
    }

    /// Active timer, if playing.
    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Play is enabled when stopped with a non-empty series.
    pub fn can_play(&self) -> bool {
        !self.state.playing && !self.series.is_empty()
    }

    /// Pause is enabled while playing.
    pub fn can_pause(&self) -> bool {
        self.state.playing
    }

    /// Interval `play` would use for the loaded series.
    pub fn step(&self) -> Option<Duration> {
        step_interval(
            self.timing.total_duration,
            self.series.len(),
            self.timing.min_step,
        )
    }

    /// Start playback from the first point. No-op when empty or already playing.
    pub fn play(&mut self) -> Option<PlaybackEvent> {
        if self.state.playing {
            return None;
        }
        let step = self.step()?;
        let year = self.series[0].year;

        self.state.playing = true;
        self.state.cursor = 0;
        self.state.current_year = Some(year);
        self.timer = Some(self.scheduler.start(step));

        info!(year, step_ms = step.as_millis() as u64, points = self.series.len(), "playback started");
        Some(PlaybackEvent::Started { year, step })
    }

    /// Stop playback and cancel the timer. Safe to call when stopped.
    pub fn pause(&mut self) -> Option<PlaybackEvent> {
        let was_playing = self.state.playing;
        self.state.playing = false;
        self.cancel_timer();
        if was_playing {
            debug!(cursor = self.state.cursor, "playback paused");
            Some(PlaybackEvent::Paused)
        } else {
            None
        }
    }

    /// Toggle between play and pause.
    pub fn toggle(&mut self) -> Option<PlaybackEvent> {
        if self.state.playing {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Handle one timer tick. Ticks from timers other than the active one are ignored.
    pub fn tick(&mut self, id: TimerId) -> Option<PlaybackEvent> {
        if !self.state.playing || self.timer != Some(id) {
            return None;
        }

        self.state.cursor += 1;
        if self.state.cursor >= self.series.len() {
            self.pause();
            info!("playback finished");
            return Some(PlaybackEvent::Finished);
        }

        let year = self.series[self.state.cursor].year;
        self.state.current_year = Some(year);
        Some(PlaybackEvent::Advanced { year })
    }

    /// Cancel any active timer. Called on disposal.
    pub fn teardown(&mut self) {
        self.state.playing = false;
        self.cancel_timer();
    }

    fn cancel_timer(&mut self) {
        if let Some(id) = self.timer.take() {
            self.scheduler.cancel(id);
        }
    }
}

impl PlaybackController<IntervalScheduler> {
    /// Deliver the tick due at `now`, if any.
    pub fn pump(&mut self, now: Instant) -> Option<PlaybackEvent> {
        let id = self.scheduler.due(now)?;
        self.tick(id)
    }

    /// How long the event loop may block before the next tick is due.
    pub fn until_next_tick(&self, now: Instant) -> Option<Duration> {
        self.scheduler.until_next(now)
    }
}

impl<S: Scheduler> Drop for PlaybackController<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
