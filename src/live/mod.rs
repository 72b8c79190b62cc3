//! Live activity surface contract.
//!
//! Lock-screen and status-bar surfaces render a session without owning
//! it. This module builds the value they consume and decides when it has
//! to be pushed:
//!
//! - `LiveActivityAttributes`: fixed per session (id, totals, deep link)
//! - `LiveActivityContent`: the changing part, built from `SessionState`
//! - `LiveActivityTracker`: polled by the driver, yields start/update/end

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::engine::TimerEngine;
use crate::types::{seconds_between, SessionState, TimerConfiguration, TimerPhase, Timestamp};

/// URL scheme that reopens the run screen for a session.
pub const DEEP_LINK_SCHEME: &str = "gympulsetimer";

/// Builds the deep link for a live activity session.
pub fn deep_link_url(session_id: &str) -> String {
    format!("{DEEP_LINK_SCHEME}://session?id={session_id}")
}

// ============================================================================
// LiveActivityAttributes
// ============================================================================

/// Static attributes of a live activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveActivityAttributes {
    pub session_id: String,
    pub total_sets: i64,
    pub total_rounds: i64,
    pub deep_link_url: String,
}

impl LiveActivityAttributes {
    pub fn new(session_id: impl Into<String>, configuration: &TimerConfiguration) -> Self {
        let session_id = session_id.into();
        Self {
            deep_link_url: deep_link_url(&session_id),
            session_id,
            total_sets: configuration.sets,
            total_rounds: configuration.rounds,
        }
    }
}

// ============================================================================
// LiveActivityContent
// ============================================================================

/// Dynamic content of a live activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveActivityContent {
    pub phase: TimerPhase,
    pub phase_end_date: Timestamp,
    pub phase_duration_seconds: i64,
    pub set_index: i64,
    pub round_index: i64,
    pub is_paused: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_remaining_seconds: Option<f64>,
}

impl LiveActivityContent {
    pub fn from_session(state: &SessionState, configuration: &TimerConfiguration) -> Self {
        Self {
            phase: state.phase,
            phase_end_date: state.phase_end_date,
            phase_duration_seconds: configuration.duration_of(state.phase),
            set_index: state.set_index,
            round_index: state.round_index,
            is_paused: state.is_paused,
            paused_remaining_seconds: if state.is_paused {
                state.paused_remaining_seconds
            } else {
                None
            },
        }
    }

    /// Fractional seconds left as seen by the surface.
    pub fn remaining_time_interval(&self, now: Timestamp) -> f64 {
        if self.is_paused {
            return self.paused_remaining_seconds.unwrap_or(0.0).max(0.0);
        }
        seconds_between(self.phase_end_date, now).max(0.0)
    }

    /// Whole seconds left, rounded up.
    pub fn remaining_seconds(&self, now: Timestamp) -> u32 {
        self.remaining_time_interval(now).ceil().min(f64::from(u32::MAX)) as u32
    }

    /// 0.0..=1.0 progress through the phase.
    pub fn progress(&self, now: Timestamp) -> f64 {
        if self.phase.is_complete() || self.phase_duration_seconds <= 0 {
            return 1.0;
        }
        let duration = self.phase_duration_seconds as f64;
        ((duration - self.remaining_time_interval(now)) / duration).clamp(0.0, 1.0)
    }

    /// One-line summary, e.g. `Set 1/2 · Round 3/4`.
    pub fn summary(&self, attributes: &LiveActivityAttributes) -> String {
        format!(
            "Set {}/{} · Round {}/{}",
            self.set_index, attributes.total_sets, self.round_index, attributes.total_rounds
        )
    }
}

// ============================================================================
// LiveActivityTracker
// ============================================================================

/// A change the surface has to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum LiveActivityUpdate {
    /// Present a new activity
    Start {
        attributes: LiveActivityAttributes,
        content: LiveActivityContent,
    },
    /// Replace the activity content
    Update { content: LiveActivityContent },
    /// Dismiss the activity, optionally showing final content
    End { content: Option<LiveActivityContent> },
}

/// Tracks what a surface last received for one session.
#[derive(Debug, Clone)]
pub struct LiveActivityTracker {
    attributes: LiveActivityAttributes,
    last: Option<LiveActivityContent>,
    ended: bool,
}

impl LiveActivityTracker {
    /// Creates a tracker with a fresh session id.
    pub fn new(configuration: &TimerConfiguration) -> Self {
        Self::with_session_id(Uuid::new_v4().to_string(), configuration)
    }

    pub fn with_session_id(session_id: impl Into<String>, configuration: &TimerConfiguration) -> Self {
        Self {
            attributes: LiveActivityAttributes::new(session_id, configuration),
            last: None,
            ended: false,
        }
    }

    pub fn attributes(&self) -> &LiveActivityAttributes {
        &self.attributes
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Compares the engine state with what was last pushed.
    ///
    /// Returns `None` when nothing changed or the activity already ended.
    pub fn sync(&mut self, engine: &TimerEngine) -> Option<LiveActivityUpdate> {
        if self.ended {
            return None;
        }
        let state = engine.state()?;
        let content = LiveActivityContent::from_session(state, engine.configuration());

        if content.phase.is_complete() {
            return self.end_with(Some(content));
        }
        if self.last.as_ref() == Some(&content) {
            return None;
        }

        let update = if self.last.is_none() {
            LiveActivityUpdate::Start {
                attributes: self.attributes.clone(),
                content: content.clone(),
            }
        } else {
            LiveActivityUpdate::Update {
                content: content.clone(),
            }
        };
        self.last = Some(content);
        Some(update)
    }

    /// Ends the activity, e.g. when the user stops the session early.
    pub fn end(&mut self, engine: &TimerEngine) -> Option<LiveActivityUpdate> {
        if self.ended {
            return None;
        }
        let content = engine
            .state()
            .map(|s| LiveActivityContent::from_session(s, engine.configuration()));
        self.end_with(content)
    }

    /// Re-arms the tracker after a restart.
    ///
    /// An activity that is still presented keeps receiving `Update`s; only
    /// an ended one is started again on the next sync.
    pub fn reset(&mut self) {
        if self.ended {
            self.last = None;
            self.ended = false;
        }
    }

    fn end_with(&mut self, content: Option<LiveActivityContent>) -> Option<LiveActivityUpdate> {
        self.ended = true;
        self.last = None;
        debug!(session_id = %self.attributes.session_id, "Live activity ended");
        Some(LiveActivityUpdate::End { content })
    }
}
