//! Repeating-timer abstraction used by the playback controller.
//!
//! A scheduler hands out `TimerId`s for recurring timers and cancels them.
//! It never calls back into the controller; the owner of the event loop asks
//! which timer is due and forwards the tick. That keeps every tick on the
//! loop's thread and makes overlapping ticks impossible.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::debug;

/// Handle for one recurring timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Start/cancel a recurring timer.
pub trait Scheduler {
    /// Start a timer that fires every `every` until cancelled.
    fn start(&mut self, every: Duration) -> TimerId;

    /// Cancel a timer. Unknown or already-cancelled ids are ignored.
    fn cancel(&mut self, id: TimerId);
}

#[derive(Debug, Clone, Copy)]
struct ActiveTimer {
    id: TimerId,
    every: Duration,
    next_due: Instant,
}

/// Deadline-based scheduler polled from an event loop.
///
/// Holds at most one active timer. Missed deadlines are not replayed in a
/// burst: a late tick fires once and the next deadline restarts from `now`.
#[derive(Debug, Default)]
pub struct IntervalScheduler {
    next_id: u64,
    active: Option<ActiveTimer>,
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a timer whose first deadline is `now + every`.
    pub fn start_at(&mut self, now: Instant, every: Duration) -> TimerId {
        if let Some(old) = self.active.take() {
            debug!(timer = old.id.0, "replacing active timer");
        }
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.active = Some(ActiveTimer {
            id,
            every,
            next_due: now + every,
        });
        id
    }

    /// Return the timer if its deadline has passed, and schedule its next one.
    ///
    /// Yields at most one tick per call.
    pub fn due(&mut self, now: Instant) -> Option<TimerId> {
        let timer = self.active.as_mut()?;
        if now < timer.next_due {
            return None;
        }
        timer.next_due += timer.every;
        if timer.next_due <= now {
            timer.next_due = now + timer.every;
        }
        Some(timer.id)
    }

    /// Time until the next deadline, or `None` when idle.
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        self.active
            .map(|t| t.next_due.saturating_duration_since(now))
    }

    /// Deadline of the active timer.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.active.map(|t| t.next_due)
    }

    /// Interval of the active timer.
    pub fn interval(&self) -> Option<Duration> {
        self.active.map(|t| t.every)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

impl Scheduler for IntervalScheduler {
    fn start(&mut self, every: Duration) -> TimerId {
        self.start_at(Instant::now(), every)
    }

    fn cancel(&mut self, id: TimerId) {
        if self.active.is_some_and(|t| t.id == id) {
            self.active = None;
        }
    }
}

/// Everything a `RecordingScheduler` has seen.
#[derive(Debug, Default, Clone)]
pub struct TimerLog {
    pub started: Vec<(TimerId, Duration)>,
    pub cancelled: Vec<TimerId>,
    pub active: Vec<TimerId>,
}

/// Test helper: a scheduler that only records calls. Ticks are delivered by hand.
///
/// Front-ends drive playback with [`IntervalScheduler`]; this one exists so
/// tests (in this crate and downstream) can assert on timer starts and
/// cancellations without a clock. The log is shared so it stays readable
/// after the controller that owns the scheduler has been dropped.
///
/// ```
/// use templine_core::domain::DataPoint;
/// use templine_core::playback::{PlaybackController, PlaybackTiming, RecordingScheduler};
///
/// let sched = RecordingScheduler::new();
/// let log = sched.log();
/// {
///     let series = vec![DataPoint::new(2000, 0.4), DataPoint::new(2001, 0.5)];
///     let mut ctl = PlaybackController::with_series(sched, PlaybackTiming::default(), series);
///     ctl.play();
///     assert_eq!(log.borrow().active.len(), 1);
/// }
/// assert!(log.borrow().active.is_empty());
/// assert_eq!(log.borrow().started.len(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct RecordingScheduler {
    next_id: u64,
    log: Rc<RefCell<TimerLog>>,
}

impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the call log.
    pub fn log(&self) -> Rc<RefCell<TimerLog>> {
        Rc::clone(&self.log)
    }
}

impl Scheduler for RecordingScheduler {
    fn start(&mut self, every: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let mut log = self.log.borrow_mut();
        log.started.push((id, every));
        log.active.push(id);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        let mut log = self.log.borrow_mut();
        log.cancelled.push(id);
        log.active.retain(|a| *a != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_fires_once_per_deadline() {
        let mut sched = IntervalScheduler::new();
        let t0 = Instant::now();
        let id = sched.start_at(t0, Duration::from_millis(100));

        assert_eq!(sched.due(t0), None);
        assert_eq!(sched.due(t0 + Duration::from_millis(99)), None);
        assert_eq!(sched.due(t0 + Duration::from_millis(100)), Some(id));
        assert_eq!(sched.due(t0 + Duration::from_millis(100)), None);
        assert_eq!(
            sched.next_deadline(),
            Some(t0 + Duration::from_millis(200))
        );
    }

    #[test]
    fn late_poll_does_not_burst() {
        let mut sched = IntervalScheduler::new();
        let t0 = Instant::now();
        let id = sched.start_at(t0, Duration::from_millis(10));

        let late = t0 + Duration::from_millis(55);
        assert_eq!(sched.due(late), Some(id));
        assert_eq!(sched.due(late), None);
        assert_eq!(sched.until_next(late), Some(Duration::from_millis(10)));
    }

    #[test]
    fn cancel_stops_ticks() {
        let mut sched = IntervalScheduler::new();
        let t0 = Instant::now();
        let id = sched.start_at(t0, Duration::from_millis(10));
        sched.cancel(id);
        assert!(!sched.is_active());
        assert_eq!(sched.due(t0 + Duration::from_secs(1)), None);
        assert_eq!(sched.until_next(t0), None);
    }

    #[test]
    fn cancel_of_stale_id_keeps_current_timer() {
        let mut sched = IntervalScheduler::new();
        let t0 = Instant::now();
        let old = sched.start_at(t0, Duration::from_millis(10));
        let new = sched.start_at(t0, Duration::from_millis(20));
        assert_ne!(old, new);
        sched.cancel(old);
        assert!(sched.is_active());
        assert_eq!(sched.interval(), Some(Duration::from_millis(20)));
    }

    #[test]
    fn recording_scheduler_tracks_active_timers() {
        let mut sched = RecordingScheduler::new();
        let log = sched.log();
        let id = sched.start(Duration::from_millis(5));
        assert_eq!(log.borrow().active, vec![id]);
        sched.cancel(id);
        assert!(log.borrow().active.is_empty());
        assert_eq!(log.borrow().cancelled, vec![id]);
    }
}
