//! Snapshot diffing for audio cues.
//!
//! The engine exposes plain state. `CueTracker` compares each snapshot
//! with the last one it saw and reports which cues should fire.

use crate::engine::SessionSnapshot;
use crate::types::TimerPhase;

use super::CueEvent;

/// Seconds at the end of a phase that get a countdown cue.
pub const DEFAULT_COUNTDOWN_WINDOW: u32 = 3;

/// Remembers the last observed phase and remaining seconds.
#[derive(Debug, Clone)]
pub struct CueTracker {
    last_phase: Option<TimerPhase>,
    last_remaining: Option<u32>,
    window: u32,
}

impl Default for CueTracker {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN_WINDOW)
    }
}

impl CueTracker {
    /// Creates a tracker that counts down the last `window` seconds.
    pub fn new(window: u32) -> Self {
        Self {
            last_phase: None,
            last_remaining: None,
            window,
        }
    }

    /// Countdown window in seconds.
    pub fn window(&self) -> u32 {
        self.window
    }

    /// Forgets everything seen so far. Call after a restart.
    pub fn reset(&mut self) {
        self.last_phase = None;
        self.last_remaining = None;
    }

    /// Returns the cues triggered by `snapshot`.
    ///
    /// Paused snapshots are ignored entirely. A phase change yields one
    /// `PhaseStarted`; each change of the whole-second remaining value
    /// inside the window yields one `Countdown`.
    pub fn observe(&mut self, snapshot: &SessionSnapshot) -> Vec<CueEvent> {
        let mut cues = Vec::new();
        if snapshot.is_paused() {
            return cues;
        }

        let remaining = snapshot.remaining_seconds;
        let phase = snapshot.phase();

        if self.last_phase != Some(phase) {
            self.last_phase = Some(phase);
            self.last_remaining = Some(remaining);
            cues.push(CueEvent::PhaseStarted(phase));
        }

        if self.last_remaining != Some(remaining) {
            if (1..=self.window).contains(&remaining) {
                cues.push(CueEvent::Countdown(remaining));
            }
            self.last_remaining = Some(remaining);
        }

        cues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TimerEngine;
    use crate::types::{offset_by_seconds, TimerConfiguration, Timestamp};
    use chrono::{TimeZone, Utc};

    fn at(seconds: f64) -> Timestamp {
        offset_by_seconds(Utc.timestamp_opt(0, 0).unwrap(), seconds)
    }

    fn engine(get_ready: i64, work: i64, rest: i64) -> TimerEngine {
        let mut engine = TimerEngine::new(TimerConfiguration::new(get_ready, work, rest, 1, 1));
        engine.start(at(0.0));
        engine
    }

    fn observe_at(tracker: &mut CueTracker, engine: &mut TimerEngine, t: f64) -> Vec<CueEvent> {
        engine.advance(at(t));
        tracker.observe(&engine.snapshot(at(t)).unwrap())
    }

    #[test]
    fn test_first_observation_announces_phase() {
        let mut tracker = CueTracker::default();
        let mut engine = engine(5, 10, 10);
        let cues = observe_at(&mut tracker, &mut engine, 0.0);
        assert_eq!(cues, vec![CueEvent::PhaseStarted(TimerPhase::GetReady)]);
    }

    #[test]
    fn test_countdown_fires_once_per_second() {
        let mut tracker = CueTracker::default();
        let mut engine = engine(5, 10, 10);
        observe_at(&mut tracker, &mut engine, 0.0);

        let mut fired = Vec::new();
        let mut t = 0.25;
        while t < 5.0 {
            fired.extend(observe_at(&mut tracker, &mut engine, t));
            t += 0.25;
        }

        assert_eq!(
            fired,
            vec![
                CueEvent::Countdown(3),
                CueEvent::Countdown(2),
                CueEvent::Countdown(1)
            ]
        );
    }

    #[test]
    fn test_phase_change_announced_without_countdown() {
        let mut tracker = CueTracker::default();
        let mut engine = engine(5, 10, 10);
        observe_at(&mut tracker, &mut engine, 4.5);

        let cues = observe_at(&mut tracker, &mut engine, 5.0);
        assert_eq!(cues, vec![CueEvent::PhaseStarted(TimerPhase::Work)]);
    }

    #[test]
    fn test_paused_snapshots_are_ignored() {
        let mut tracker = CueTracker::default();
        let mut engine = engine(5, 10, 10);
        observe_at(&mut tracker, &mut engine, 0.0);

        engine.pause(at(2.5));
        let cues = tracker.observe(&engine.snapshot(at(3.0)).unwrap());
        assert!(cues.is_empty());
    }

    #[test]
    fn test_reset_reannounces_phase() {
        let mut tracker = CueTracker::default();
        let mut engine = engine(5, 10, 10);
        observe_at(&mut tracker, &mut engine, 0.0);

        tracker.reset();
        engine.restart(at(1.0));
        let cues = tracker.observe(&engine.snapshot(at(1.0)).unwrap());
        assert_eq!(cues, vec![CueEvent::PhaseStarted(TimerPhase::GetReady)]);
    }

    #[test]
    fn test_zero_window_never_counts_down() {
        let mut tracker = CueTracker::new(0);
        let mut engine = engine(3, 10, 10);
        let mut fired = Vec::new();
        for step in 0..12 {
            fired.extend(observe_at(&mut tracker, &mut engine, f64::from(step) * 0.25));
        }
        assert_eq!(fired, vec![CueEvent::PhaseStarted(TimerPhase::GetReady)]);
    }
}
