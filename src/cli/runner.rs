//! Foreground session driver.
//!
//! `SessionRunner` owns the engine and its collaborators and is driven by
//! explicit timestamps, so it can be tested without a clock. `run_session`
//! feeds it wall-clock ticks and keyboard commands until the session
//! completes or the user stops it.

use std::io::BufRead;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cues::{CuePlayer, CueTracker};
use crate::engine::{SessionSnapshot, TimerEngine};
use crate::live::LiveActivityTracker;
use crate::types::{TimerConfiguration, Timestamp};

use super::display::Display;

// ============================================================================
// Commands
// ============================================================================

/// Keyboard commands accepted while a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerCommand {
    TogglePause,
    Restart,
    Quit,
}

impl RunnerCommand {
    /// Parses one line of input (`p`, `r`, `q` or the full word).
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "p" | "pause" | "resume" => Some(Self::TogglePause),
            "r" | "restart" => Some(Self::Restart),
            "q" | "quit" | "stop" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every phase ran to the end.
    Completed,
    /// The user quit or pressed Ctrl-C.
    Stopped,
}

// ============================================================================
// SessionRunner
// ============================================================================

/// Engine plus the cue and live activity collaborators.
pub struct SessionRunner<P: CuePlayer> {
    engine: TimerEngine,
    cues: CueTracker,
    player: P,
    live: LiveActivityTracker,
}

impl<P: CuePlayer> SessionRunner<P> {
    pub fn new(configuration: TimerConfiguration, player: P, countdown_window: u32) -> Self {
        let engine = TimerEngine::new(configuration);
        let live = LiveActivityTracker::new(engine.configuration());
        Self {
            engine,
            cues: CueTracker::new(countdown_window),
            player,
            live,
        }
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn live(&self) -> &LiveActivityTracker {
        &self.live
    }

    /// Starts the session and processes the first tick.
    pub fn start(&mut self, now: Timestamp) -> Option<SessionSnapshot> {
        self.engine.start(now);
        info!(
            total_seconds = self.engine.configuration().total_duration_seconds(),
            "Session started"
        );
        self.tick(now)
    }

    /// Advances the engine to `now`, plays due cues and syncs the live
    /// activity. Returns the resulting snapshot.
    pub fn tick(&mut self, now: Timestamp) -> Option<SessionSnapshot> {
        self.engine.advance(now);
        let snapshot = self.engine.snapshot(now)?;

        for cue in self.cues.observe(&snapshot) {
            if let Err(e) = self.player.play(&cue) {
                warn!(error = %e, cue = ?cue, "Failed to play cue");
            }
        }
        if let Some(update) = self.live.sync(&self.engine) {
            debug!(update = ?update, "Live activity update");
        }

        Some(snapshot)
    }

    /// Pauses a running session or resumes a paused one. Returns whether
    /// the pause state changed; completed sessions are left alone.
    pub fn toggle_pause(&mut self, now: Timestamp) -> bool {
        let was_paused = self.engine.state().is_some_and(|s| s.is_paused);
        if was_paused {
            self.engine.resume(now);
        } else {
            self.engine.pause(now);
        }
        match (was_paused, self.engine.state().is_some_and(|s| s.is_paused)) {
            (true, false) => info!("Session resumed"),
            (false, true) => info!("Session paused"),
            _ => {
                debug!("Pause toggle ignored");
                return false;
            }
        }
        true
    }

    /// Applies a keyboard command. Returns `Some` when the session should end.
    pub fn handle(&mut self, command: RunnerCommand, now: Timestamp) -> Option<RunOutcome> {
        match command {
            RunnerCommand::TogglePause => {
                self.toggle_pause(now);
                None
            }
            RunnerCommand::Restart => {
                self.engine.restart(now);
                self.cues.reset();
                self.live.reset();
                info!("Session restarted");
                None
            }
            RunnerCommand::Quit => {
                if let Some(update) = self.live.end(&self.engine) {
                    debug!(update = ?update, "Live activity update");
                }
                info!("Session stopped");
                Some(RunOutcome::Stopped)
            }
        }
    }
}

// ============================================================================
// Driver
// ============================================================================

/// Reads commands from stdin on a dedicated thread.
///
/// The channel closes at end of input; the session keeps running.
///
/// # Errors
///
/// Returns an error if the thread cannot be spawned.
pub fn spawn_stdin_reader() -> std::io::Result<mpsc::UnboundedReceiver<RunnerCommand>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::Builder::new()
        .name("stdin-commands".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                match RunnerCommand::parse(&line) {
                    Some(command) => {
                        if tx.send(command).is_err() {
                            break;
                        }
                    }
                    None => debug!(input = %line.trim(), "Ignoring unknown command"),
                }
            }
        })?;
    Ok(rx)
}

/// Runs a session in the foreground until it completes or is stopped.
pub async fn run_session<P: CuePlayer>(
    mut runner: SessionRunner<P>,
    tick_interval: Duration,
    mut commands: mpsc::UnboundedReceiver<RunnerCommand>,
) -> RunOutcome {
    Display::show_session_start(runner.engine().configuration());
    if let Some(snapshot) = runner.start(Utc::now()) {
        Display::show_status_line(&snapshot);
    }

    let mut ticker = interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut ctrl_c_armed = true;
    let mut commands_open = true;

    let outcome = loop {
        if runner.engine().is_complete() {
            break RunOutcome::Completed;
        }

        tokio::select! {
            _ = ticker.tick() => {
                if let Some(snapshot) = runner.tick(Utc::now()) {
                    Display::show_status_line(&snapshot);
                }
            }
            command = commands.recv(), if commands_open => {
                match command {
                    Some(command) => {
                        let now = Utc::now();
                        if let Some(outcome) = runner.handle(command, now) {
                            break outcome;
                        }
                        if let Some(snapshot) = runner.tick(now) {
                            Display::show_status_line(&snapshot);
                        }
                    }
                    None => {
                        debug!("Command input closed");
                        commands_open = false;
                    }
                }
            }
            result = &mut ctrl_c, if ctrl_c_armed => {
                match result {
                    Ok(()) => {
                        if let Some(outcome) = runner.handle(RunnerCommand::Quit, Utc::now()) {
                            break outcome;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to listen for Ctrl-C");
                        ctrl_c_armed = false;
                    }
                }
            }
        }
    };

    match outcome {
        RunOutcome::Completed => Display::show_complete(),
        RunOutcome::Stopped => Display::show_stopped(),
    }
    outcome
}

// ============================================================================
// Tests
// ============================================================================
