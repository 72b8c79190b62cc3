//! Session engine for the interval timer.
//!
//! This module provides the phase state machine:
//! - Session start/restart (get-ready is skipped when its duration is 0)
//! - Pause/resume with a frozen remaining duration
//! - Wall-clock driven phase transitions (GetReady → Work ⇄ Rest → Complete)
//! - Skipping several phases in one call after a large time jump
//!
//! The engine never reads a clock. Every operation takes `now` and the
//! caller decides how often to call [`TimerEngine::advance`].

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::{
    offset_by_seconds, offset_by_whole_seconds, SessionState, TimerConfiguration, TimerPhase,
    Timestamp,
};

// ============================================================================
// SessionSnapshot
// ============================================================================

/// Read-only view of a session at a given instant.
///
/// This is what display, widget and audio collaborators consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Copy of the session state
    pub state: SessionState,
    /// Instant the snapshot was taken
    pub captured_at: Timestamp,
    /// Fractional seconds left in the phase
    pub remaining_time_interval: f64,
    /// Whole seconds left, rounded up
    pub remaining_seconds: u32,
    /// 0.0..=1.0 progress through the phase
    pub progress_fraction: f64,
    /// Configured length of the current phase
    pub phase_duration_seconds: i64,
    /// Configured number of sets
    pub total_sets: i64,
    /// Configured number of rounds per set
    pub total_rounds: i64,
}

impl SessionSnapshot {
    /// Current phase.
    pub fn phase(&self) -> TimerPhase {
        self.state.phase
    }

    /// Whether the session is paused.
    pub fn is_paused(&self) -> bool {
        self.state.is_paused
    }
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Owns one session and advances it against caller-supplied timestamps.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    /// Normalized configuration
    configuration: TimerConfiguration,
    /// Current session, absent until `start`
    state: Option<SessionState>,
}

impl TimerEngine {
    /// Creates an engine with no active session. The configuration is
    /// normalized here so out-of-range input never reaches the transitions.
    pub fn new(configuration: TimerConfiguration) -> Self {
        Self {
            configuration: configuration.normalized(),
            state: None,
        }
    }

    /// Rebuilds an engine around a previously captured state.
    ///
    /// Indices are clamped into the configuration's range and a completed
    /// state is pinned to the final set and round.
    pub fn restore(configuration: TimerConfiguration, mut state: SessionState) -> Self {
        let configuration = configuration.normalized();

        if state.phase.is_complete() {
            state.set_index = configuration.sets;
            state.round_index = configuration.rounds;
            state.is_paused = false;
            state.paused_remaining_seconds = None;
        } else {
            state.set_index = state.set_index.clamp(1, configuration.sets);
            state.round_index = state.round_index.clamp(1, configuration.rounds);
            if state.is_paused {
                let frozen = state.paused_remaining_seconds.unwrap_or(0.0);
                state.paused_remaining_seconds = Some(if frozen.is_finite() {
                    frozen.max(0.0)
                } else {
                    0.0
                });
            } else {
                state.paused_remaining_seconds = None;
            }
        }

        debug!(phase = %state.phase, set = state.set_index, round = state.round_index, "Session restored");

        Self {
            configuration,
            state: Some(state),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Returns the normalized configuration.
    pub fn configuration(&self) -> &TimerConfiguration {
        &self.configuration
    }

    /// Returns the current session state, if a session was started.
    pub fn state(&self) -> Option<&SessionState> {
        self.state.as_ref()
    }

    /// Returns true while a session is counting down.
    pub fn is_running(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|s| !s.is_paused && !s.phase.is_complete())
    }

    /// Returns true once the session reached `Complete`.
    pub fn is_complete(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.phase.is_complete())
    }

    /// Time left in the current phase. 0 without a session.
    pub fn remaining_time_interval(&self, now: Timestamp) -> f64 {
        self.state
            .as_ref()
            .map_or(0.0, |s| s.remaining_time_interval(now))
    }

    /// Whole seconds left in the current phase, rounded up.
    pub fn remaining_seconds(&self, now: Timestamp) -> u32 {
        self.state.as_ref().map_or(0, |s| s.remaining_seconds(now))
    }

    /// 0.0..=1.0 progress through the current phase.
    ///
    /// Completed sessions and zero-length phases report 1.0. Without a
    /// session the progress is 0.0.
    pub fn progress_fraction(&self, now: Timestamp) -> f64 {
        let Some(state) = self.state.as_ref() else {
            return 0.0;
        };
        let duration = self.configuration.duration_of(state.phase);
        if state.phase.is_complete() || duration <= 0 {
            return 1.0;
        }
        let duration = duration as f64;
        let remaining = state.remaining_time_interval(now);
        ((duration - remaining) / duration).clamp(0.0, 1.0)
    }

    /// Captures a snapshot for display collaborators.
    pub fn snapshot(&self, now: Timestamp) -> Option<SessionSnapshot> {
        let state = self.state.as_ref()?;
        Some(SessionSnapshot {
            state: state.clone(),
            captured_at: now,
            remaining_time_interval: state.remaining_time_interval(now),
            remaining_seconds: state.remaining_seconds(now),
            progress_fraction: self.progress_fraction(now),
            phase_duration_seconds: self.configuration.duration_of(state.phase),
            total_sets: self.configuration.sets,
            total_rounds: self.configuration.rounds,
        })
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Starts a fresh session, discarding any previous one.
    pub fn start(&mut self, now: Timestamp) {
        let state = self.initial_state(now);
        debug!(phase = %state.phase, "Session started");
        self.state = Some(state);
    }

    /// Resets the session to its first phase. Same as [`Self::start`].
    pub fn restart(&mut self, now: Timestamp) {
        self.start(now);
    }

    /// Freezes the remaining time of the current phase.
    ///
    /// No-op without a session, when already paused, or once complete.
    pub fn pause(&mut self, now: Timestamp) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if state.is_paused || state.phase.is_complete() {
            return;
        }

        let remaining = state.remaining_time_interval(now);
        state.is_paused = true;
        state.paused_remaining_seconds = Some(remaining);
        state.phase_end_date = now;

        debug!(phase = %state.phase, remaining, "Session paused");
    }

    /// Re-anchors the phase end to `now` plus the frozen remaining time.
    ///
    /// No-op without a session, when not paused, or once complete.
    pub fn resume(&mut self, now: Timestamp) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if !state.is_paused || state.phase.is_complete() {
            return;
        }

        let remaining = state.paused_remaining_seconds.unwrap_or(0.0).max(0.0);
        state.is_paused = false;
        state.paused_remaining_seconds = None;
        state.phase_end_date = offset_by_seconds(now, remaining);

        debug!(phase = %state.phase, remaining, "Session resumed");
    }

    /// Moves the session past every phase boundary that `now` has reached.
    ///
    /// Each boundary chains from the previous nominal end date, so phase
    /// lengths stay exact when this is called late. Calling it again with
    /// the same `now` is a no-op.
    pub fn advance(&mut self, now: Timestamp) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        if state.is_paused || state.phase.is_complete() || now < state.phase_end_date {
            return;
        }

        let mut updated = state.clone();
        let bound = self.transitions_until_complete(&updated);
        let mut consumed = 0;

        while consumed < bound
            && now >= updated.phase_end_date
            && !updated.phase.is_complete()
            && !updated.is_paused
        {
            updated = self.next_state(&updated);
            consumed += 1;
        }

        if !updated.phase.is_complete() && now >= updated.phase_end_date {
            warn!(
                phase = %updated.phase,
                set = updated.set_index,
                round = updated.round_index,
                "Transition bound exhausted; forcing completion"
            );
            updated = self.complete_state(updated.phase_end_date);
        }

        if consumed > 0 {
            debug!(
                from = %state.phase,
                to = %updated.phase,
                set = updated.set_index,
                round = updated.round_index,
                transitions = consumed,
                "Phase advanced"
            );
        }

        self.state = Some(updated);
    }

    // ── Transitions ──────────────────────────────────────────────────

    fn initial_state(&self, now: Timestamp) -> SessionState {
        let phase = if self.configuration.get_ready_seconds > 0 {
            TimerPhase::GetReady
        } else {
            TimerPhase::Work
        };
        SessionState {
            phase,
            set_index: 1,
            round_index: 1,
            phase_end_date: offset_by_whole_seconds(now, self.configuration.duration_of(phase)),
            is_paused: false,
            paused_remaining_seconds: None,
        }
    }

    /// Exact number of boundaries left between `state` and `Complete`.
    fn transitions_until_complete(&self, state: &SessionState) -> i64 {
        let total = self.configuration.total_rounds();
        let ordinal = (state.set_index - 1)
            .saturating_mul(self.configuration.rounds)
            .saturating_add(state.round_index - 1);
        let left = match state.phase {
            TimerPhase::GetReady => total.saturating_mul(2).saturating_add(1),
            TimerPhase::Work => total.saturating_sub(ordinal).saturating_mul(2),
            TimerPhase::Rest => total.saturating_sub(ordinal).saturating_mul(2) - 1,
            TimerPhase::Complete => 0,
        };
        left.max(0)
    }

    /// Applies one boundary, anchored on the previous phase's end date.
    fn next_state(&self, state: &SessionState) -> SessionState {
        let anchor = state.phase_end_date;
        match state.phase {
            TimerPhase::GetReady => {
                self.phase_state(TimerPhase::Work, state.set_index, state.round_index, anchor)
            }
            TimerPhase::Work => {
                self.phase_state(TimerPhase::Rest, state.set_index, state.round_index, anchor)
            }
            TimerPhase::Rest => {
                let mut round = state.round_index + 1;
                let mut set = state.set_index;
                if round > self.configuration.rounds {
                    round = 1;
                    set += 1;
                }
                if set > self.configuration.sets {
                    return self.complete_state(anchor);
                }
                self.phase_state(TimerPhase::Work, set, round, anchor)
            }
            TimerPhase::Complete => state.clone(),
        }
    }

    fn phase_state(
        &self,
        phase: TimerPhase,
        set_index: i64,
        round_index: i64,
        anchor: Timestamp,
    ) -> SessionState {
        SessionState {
            phase,
            set_index,
            round_index,
            phase_end_date: offset_by_whole_seconds(anchor, self.configuration.duration_of(phase)),
            is_paused: false,
            paused_remaining_seconds: None,
        }
    }

    fn complete_state(&self, anchor: Timestamp) -> SessionState {
        SessionState {
            phase: TimerPhase::Complete,
            set_index: self.configuration.sets,
            round_index: self.configuration.rounds,
            phase_end_date: anchor,
            is_paused: false,
            paused_remaining_seconds: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
