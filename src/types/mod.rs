//! Core data types for the interval timer.
//!
//! This module defines the value types shared by every layer:
//! - `TimerPhase`: the phases a session moves through
//! - `TimerConfiguration`: the validated shape of a session
//! - `SessionState`: the live state owned by the engine
//!
//! Nothing here reads the system clock. Every time-dependent read takes
//! an explicit `now`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Wall-clock instant used for phase boundaries.
pub type Timestamp = DateTime<Utc>;

// ============================================================================
// Time helpers
// ============================================================================

/// Returns `later - earlier` in fractional seconds (microsecond precision).
pub fn seconds_between(later: Timestamp, earlier: Timestamp) -> f64 {
    let delta = later.signed_duration_since(earlier);
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1_000.0,
    }
}

/// Offsets `at` by a fractional number of seconds, saturating at the
/// representable range.
pub fn offset_by_seconds(at: Timestamp, seconds: f64) -> Timestamp {
    let micros = (seconds * 1_000_000.0).round();
    let delta = if micros >= i64::MAX as f64 {
        Duration::MAX
    } else if micros <= i64::MIN as f64 {
        Duration::MIN
    } else {
        Duration::microseconds(micros as i64)
    };
    offset_by(at, delta)
}

/// Offsets `at` by a whole number of seconds.
pub fn offset_by_whole_seconds(at: Timestamp, seconds: i64) -> Timestamp {
    offset_by(at, Duration::try_seconds(seconds).unwrap_or(Duration::MAX))
}

fn offset_by(at: Timestamp, delta: Duration) -> Timestamp {
    at.checked_add_signed(delta).unwrap_or(if delta >= Duration::zero() {
        DateTime::<Utc>::MAX_UTC
    } else {
        DateTime::<Utc>::MIN_UTC
    })
}

// ============================================================================
// TimerPhase
// ============================================================================

/// One segment of a workout, or the terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerPhase {
    /// Countdown before the first work phase
    GetReady,
    /// Work interval
    Work,
    /// Rest interval
    Rest,
    /// Session finished
    Complete,
}

impl TimerPhase {
    /// Every phase, in session order.
    pub const ALL: [TimerPhase; 4] = [
        TimerPhase::GetReady,
        TimerPhase::Work,
        TimerPhase::Rest,
        TimerPhase::Complete,
    ];

    /// Returns the serialized name of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::GetReady => "getReady",
            TimerPhase::Work => "work",
            TimerPhase::Rest => "rest",
            TimerPhase::Complete => "complete",
        }
    }

    /// Human-readable name, as shown on lock-screen surfaces.
    pub fn display_name(&self) -> &'static str {
        match self {
            TimerPhase::GetReady => "Get Ready",
            TimerPhase::Work => "Work",
            TimerPhase::Rest => "Rest",
            TimerPhase::Complete => "Complete",
        }
    }

    /// Short title for compact surfaces.
    pub fn compact_title(&self) -> &'static str {
        match self {
            TimerPhase::GetReady => "GR",
            TimerPhase::Work => "W",
            TimerPhase::Rest => "R",
            TimerPhase::Complete => "Done",
        }
    }

    /// Upper-case label used by the run screen.
    pub fn label(&self) -> &'static str {
        match self {
            TimerPhase::GetReady => "GET READY",
            TimerPhase::Work => "WORK",
            TimerPhase::Rest => "REST",
            TimerPhase::Complete => "COMPLETE",
        }
    }

    /// Returns true for the terminal phase.
    pub fn is_complete(&self) -> bool {
        matches!(self, TimerPhase::Complete)
    }
}

impl std::fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TimerConfiguration
// ============================================================================

/// The shape of a session: durations per phase and set/round counts.
///
/// Raw values may be anything; call [`TimerConfiguration::normalized`]
/// before use. The engine does so on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerConfiguration {
    /// Get-ready duration in seconds (0 skips the phase)
    pub get_ready_seconds: i64,
    /// Work duration in seconds
    pub work_seconds: i64,
    /// Rest duration in seconds
    pub rest_seconds: i64,
    /// Number of sets (outer repetition)
    pub sets: i64,
    /// Number of rounds per set
    pub rounds: i64,
}

impl Default for TimerConfiguration {
    fn default() -> Self {
        Self {
            get_ready_seconds: 10,
            work_seconds: 60,
            rest_seconds: 60,
            sets: 1,
            rounds: 4,
        }
    }
}

impl TimerConfiguration {
    /// Longest allowed phase, just under 24 hours.
    pub const MAX_DURATION_SECONDS: i64 = 86_399;
    /// Largest allowed set or round count.
    pub const MAX_SETS_ROUNDS: i64 = 99;

    /// Creates a configuration from raw values without clamping.
    pub fn new(
        get_ready_seconds: i64,
        work_seconds: i64,
        rest_seconds: i64,
        sets: i64,
        rounds: i64,
    ) -> Self {
        Self {
            get_ready_seconds,
            work_seconds,
            rest_seconds,
            sets,
            rounds,
        }
    }

    /// Clamps every field into its valid range. Idempotent.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            get_ready_seconds: self.get_ready_seconds.clamp(0, Self::MAX_DURATION_SECONDS),
            work_seconds: self.work_seconds.clamp(0, Self::MAX_DURATION_SECONDS),
            rest_seconds: self.rest_seconds.clamp(0, Self::MAX_DURATION_SECONDS),
            sets: self.sets.clamp(1, Self::MAX_SETS_ROUNDS),
            rounds: self.rounds.clamp(1, Self::MAX_SETS_ROUNDS),
        }
    }

    /// Returns true if every field is already within range.
    pub fn is_normalized(&self) -> bool {
        *self == self.normalized()
    }

    /// Duration of `phase` in whole seconds. `Complete` lasts 0.
    pub fn duration_of(&self, phase: TimerPhase) -> i64 {
        match phase {
            TimerPhase::GetReady => self.get_ready_seconds,
            TimerPhase::Work => self.work_seconds,
            TimerPhase::Rest => self.rest_seconds,
            TimerPhase::Complete => 0,
        }
    }

    /// Total work/rest pairs in the session.
    pub fn total_rounds(&self) -> i64 {
        self.sets.saturating_mul(self.rounds)
    }

    /// Number of phase boundaries between `start` and `complete`:
    /// one out of get-ready, then two per round.
    pub fn max_transitions(&self) -> i64 {
        self.total_rounds().saturating_mul(2).saturating_add(1)
    }

    /// Nominal length of the whole session in seconds.
    pub fn total_duration_seconds(&self) -> i64 {
        let per_round = self.work_seconds.saturating_add(self.rest_seconds);
        self.get_ready_seconds
            .saturating_add(per_round.saturating_mul(self.total_rounds()))
    }
}

// ============================================================================
// SessionState
// ============================================================================

/// Live state of a single session.
///
/// While paused, `phase_end_date` only marks the pause instant and
/// `paused_remaining_seconds` carries the frozen time left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Current phase
    pub phase: TimerPhase,
    /// 1-based set index
    pub set_index: i64,
    /// 1-based round index within the set
    pub round_index: i64,
    /// Instant the current phase naturally ends
    pub phase_end_date: Timestamp,
    /// Whether the session is paused
    pub is_paused: bool,
    /// Frozen time left in the phase, only while paused
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_remaining_seconds: Option<f64>,
}

impl SessionState {
    /// Time left in the current phase, never negative.
    pub fn remaining_time_interval(&self, now: Timestamp) -> f64 {
        if self.is_paused {
            return self.paused_remaining_seconds.unwrap_or(0.0).max(0.0);
        }
        seconds_between(self.phase_end_date, now).max(0.0)
    }

    /// Whole seconds left, rounded up.
    pub fn remaining_seconds(&self, now: Timestamp) -> u32 {
        let remaining = self.remaining_time_interval(now).ceil();
        if remaining >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            remaining as u32
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
