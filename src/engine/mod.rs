//! Session engine module for the interval timer.
//!
//! This module contains the phase state machine:
//! - `timer`: `TimerEngine` with start/pause/resume/restart/advance and
//!   the `SessionSnapshot` read by display collaborators

pub mod timer;

pub use timer::{SessionSnapshot, TimerEngine};
