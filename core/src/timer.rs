//! Tick driven clocks used by both engines.
//!
//! Engines never sleep or read a wall clock. A host scheduler calls `on_tick` on the engine at
//! [`TICKS_PER_SECOND`], and the engine advances its [`RoundTimer`]s from there. Cancelling a timer
//! is idempotent and a cancelled timer never produces another event.

use core::time::Duration;
use serde::{Deserialize, Serialize};

pub const TICKS_PER_SECOND: u32 = 20;

/// Wall-clock length of one tick.
pub const TICK: Duration = Duration::from_millis(1000 / TICKS_PER_SECOND as u64);

/// Number of whole ticks covering `ms` milliseconds, rounded up.
pub const fn ms_to_ticks(ms: u32) -> u32 {
    ms.div_ceil(1000 / TICKS_PER_SECOND)
}

/// Opaque identity of a timer, fresh for every timer an engine starts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken(u64);

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct TokenSource {
    next: u64,
}

impl TokenSource {
    pub(crate) fn issue(&mut self) -> TimerToken {
        self.next = self.next.wrapping_add(1);
        TimerToken(self.next)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
enum TimerMode {
    Progress { total_ticks: u32 },
    Countdown { seconds: u32 },
    Stopwatch,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
enum TimerState {
    Running,
    Finished,
    Cancelled,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TimerEvent {
    /// Nothing observable happened on this tick.
    Idle,
    /// Fractional progress of a fixed-duration timer, strictly below 1.0.
    Progress(f32),
    /// Fixed-duration timer reached 1.0.
    Completed,
    /// A countdown second elapsed with `remaining` seconds left.
    Second { remaining: u32 },
    /// Countdown reached zero.
    Expired,
    /// A stopwatch second elapsed.
    Elapsed { secs: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTimer {
    token: TimerToken,
    mode: TimerMode,
    ticks: u32,
    state: TimerState,
}

impl RoundTimer {
    fn new(token: TimerToken, mode: TimerMode) -> Self {
        Self {
            token,
            mode,
            ticks: 0,
            state: TimerState::Running,
        }
    }

    /// Emits progress from 0.0 to 1.0 over `duration_ms`.
    pub fn progress(token: TimerToken, duration_ms: u32) -> Self {
        Self::new(
            token,
            TimerMode::Progress {
                total_ticks: ms_to_ticks(duration_ms),
            },
        )
    }

    /// Counts whole seconds down from `seconds`.
    pub fn countdown(token: TimerToken, seconds: u32) -> Self {
        Self::new(token, TimerMode::Countdown { seconds })
    }

    /// Counts whole seconds up without end.
    pub fn stopwatch(token: TimerToken) -> Self {
        Self::new(token, TimerMode::Stopwatch)
    }

    pub fn token(&self) -> TimerToken {
        self.token
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.state, TimerState::Cancelled)
    }

    pub fn cancel(&mut self) {
        if !self.is_cancelled() {
            log::trace!("timer {:?} cancelled", self.token);
            self.state = TimerState::Cancelled;
        }
    }

    pub fn progress_fraction(&self) -> f32 {
        match self.mode {
            TimerMode::Progress { total_ticks } if total_ticks > 0 => {
                (self.ticks as f32 / total_ticks as f32).min(1.0)
            }
            TimerMode::Progress { .. } => 1.0,
            _ => 0.0,
        }
    }

    pub fn remaining_secs(&self) -> u32 {
        match self.mode {
            TimerMode::Countdown { seconds } => {
                seconds.saturating_sub(self.ticks / TICKS_PER_SECOND)
            }
            _ => 0,
        }
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.ticks / TICKS_PER_SECOND
    }

    pub fn tick(&mut self) -> TimerEvent {
        if !self.is_running() {
            return TimerEvent::Idle;
        }

        self.ticks = self.ticks.saturating_add(1);

        match self.mode {
            TimerMode::Progress { total_ticks } => {
                if self.ticks >= total_ticks {
                    self.state = TimerState::Finished;
                    TimerEvent::Completed
                } else {
                    TimerEvent::Progress(self.progress_fraction())
                }
            }
            TimerMode::Countdown { seconds } => {
                if seconds == 0 {
                    self.state = TimerState::Finished;
                    return TimerEvent::Expired;
                }
                if self.ticks % TICKS_PER_SECOND != 0 {
                    return TimerEvent::Idle;
                }
                match self.remaining_secs() {
                    0 => {
                        self.state = TimerState::Finished;
                        TimerEvent::Expired
                    }
                    remaining => TimerEvent::Second { remaining },
                }
            }
            TimerMode::Stopwatch => {
                if self.ticks % TICKS_PER_SECOND == 0 {
                    TimerEvent::Elapsed {
                        secs: self.elapsed_secs(),
                    }
                } else {
                    TimerEvent::Idle
                }
            }
        }
    }
}

/// Converts wall-clock time into whole ticks for a host scheduler, carrying the remainder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickPacer {
    carry: Duration,
}

impl TickPacer {
    pub const fn new() -> Self {
        Self {
            carry: Duration::ZERO,
        }
    }

    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let total = self.carry + elapsed;
        let ticks: u32 = (total.as_nanos() / TICK.as_nanos())
            .try_into()
            .unwrap_or(u32::MAX);
        self.carry = total.saturating_sub(TICK.saturating_mul(ticks));
        ticks
    }
}
