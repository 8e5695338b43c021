//! Property tests for playback invariants.
//!
//! Uses proptest to verify:
//! 1. Step interval — one timer at `max(10, floor(20000 / N))` ms
//! 2. Exhaustion — exactly N ticks after play leave the controller stopped
//! 3. Cursor validity — the cursor indexes the series whenever playing
//! 4. Pause idempotence — any interleaving of pauses leaves no active timer

use std::time::Duration;

use proptest::prelude::*;
use templine_core::domain::DataPoint;
use templine_core::playback::{
    PlaybackController, PlaybackEvent, PlaybackPhase, PlaybackTiming, RecordingScheduler,
};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_series() -> impl Strategy<Value = Vec<DataPoint>> {
    (1880i32..2000, 1usize..400).prop_map(|(start, len)| {
        (0..len)
            .map(|i| DataPoint::new(start + i as i32, i as f64 * 0.01))
            .collect()
    })
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Play,
    Pause,
    Tick,
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![Just(Op::Play), Just(Op::Pause), Just(Op::Tick), Just(Op::Tick)],
        0..200,
    )
}

// ── 1. Step interval ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn play_schedules_one_timer_at_expected_interval(series in arb_series()) {
        let n = series.len() as u64;
        let sched = RecordingScheduler::new();
        let log = sched.log();
        let mut ctl = PlaybackController::with_series(sched, PlaybackTiming::default(), series);

        ctl.play();
        ctl.play();

        let log = log.borrow();
        prop_assert_eq!(log.started.len(), 1);
        let expected = Duration::from_millis((20_000 / n).max(10));
        prop_assert_eq!(log.started[0].1, expected);
    }
}

// ── 2. Exhaustion after N ticks ──────────────────────────────────────

proptest! {
    #[test]
    fn n_ticks_stop_playback(series in arb_series()) {
        let years: Vec<i32> = series.iter().map(|p| p.year).collect();
        let sched = RecordingScheduler::new();
        let log = sched.log();
        let mut ctl = PlaybackController::with_series(sched, PlaybackTiming::default(), series);

        ctl.play();
        let id = ctl.timer().unwrap();
        let mut seen = vec![ctl.current_year().unwrap()];

        for i in 1..=years.len() {
            match ctl.tick(id) {
                Some(PlaybackEvent::Advanced { year }) => {
                    prop_assert!(i < years.len());
                    seen.push(year);
                }
                Some(PlaybackEvent::Finished) => {
                    prop_assert_eq!(i, years.len());
                }
                other => {
                    prop_assert!(false, "unexpected tick result {:?}", other);
                }
            }
        }

        prop_assert_eq!(seen, years);
        prop_assert_eq!(ctl.phase(), PlaybackPhase::Stopped);
        prop_assert!(log.borrow().active.is_empty());
        prop_assert_eq!(ctl.tick(id), None);
    }
}

// ── 3 & 4. Random interleavings ──────────────────────────────────────

proptest! {
    #[test]
    fn interleavings_keep_invariants(series in arb_series(), ops in arb_ops()) {
        let len = series.len();
        let sched = RecordingScheduler::new();
        let log = sched.log();
        let mut ctl = PlaybackController::with_series(sched, PlaybackTiming::default(), series);

        for op in ops {
            match op {
                Op::Play => { ctl.play(); }
                Op::Pause => { ctl.pause(); }
                Op::Tick => {
                    if let Some(id) = ctl.timer() {
                        ctl.tick(id);
                    }
                }
            }

            let state = ctl.state();
            if state.playing {
                prop_assert!(state.cursor < len);
                prop_assert_eq!(log.borrow().active.len(), 1);
            } else {
                prop_assert!(log.borrow().active.is_empty());
                prop_assert!(ctl.timer().is_none());
            }
            prop_assert!(state.current_year.is_some());
        }

        ctl.pause();
        ctl.pause();
        prop_assert!(log.borrow().active.is_empty());
    }
}

#[test]
fn teardown_while_playing_cancels_timer() {
    let sched = RecordingScheduler::new();
    let log = sched.log();
    let series = vec![DataPoint::new(2000, 0.0), DataPoint::new(2001, 0.0)];
    {
        let mut ctl = PlaybackController::with_series(sched, PlaybackTiming::default(), series);
        ctl.play();
        assert_eq!(log.borrow().active.len(), 1);
    }
    assert!(log.borrow().active.is_empty());
    assert_eq!(log.borrow().cancelled.len(), 1);
}
