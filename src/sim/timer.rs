//! Pausable cooperative timer
//!
//! Cooldowns and respawn delays must freeze with the game and resume from
//! the exact point of pause. The timer is an explicit state machine
//! advanced by the same `dt` as the rest of the simulation: no wall
//! clock, no host scheduler, fully deterministic under test.
//!
//! Progress is discrete: the duration is split into [`TIMER_STEPS`] fixed
//! steps, so completion lands within one step width of the requested
//! duration. Cancellation is simply dropping (or overwriting) the timer;
//! a cancelled timer never reports completion.

/// Number of discrete steps a duration is divided into.
pub const TIMER_STEPS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Running,
    Paused,
    Done,
}

/// A countdown that can be paused and resumed without losing progress.
#[derive(Debug, Clone)]
pub struct PausableTimer {
    step_ms: f64,
    steps_left: u32,
    acc_ms: f64,
    phase: Phase,
}

impl PausableTimer {
    /// Start a running countdown over `duration_ms`.
    pub fn new(duration_ms: f64) -> Self {
        Self {
            step_ms: (duration_ms / TIMER_STEPS as f64).ceil().max(1.0),
            steps_left: TIMER_STEPS,
            acc_ms: 0.0,
            phase: Phase::Running,
        }
    }

    /// Advance by the frame delta. Returns `true` exactly once: on the
    /// call that consumes the final step. Paused and completed timers
    /// ignore the delta entirely.
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        self.acc_ms += dt_ms;
        while self.acc_ms >= self.step_ms && self.steps_left > 0 {
            self.acc_ms -= self.step_ms;
            self.steps_left -= 1;
        }
        if self.steps_left == 0 {
            self.phase = Phase::Done;
            true
        } else {
            false
        }
    }

    /// Halt progress. Returns whether a transition happened; pausing an
    /// already-paused (or completed) timer is a no-op.
    pub fn pause(&mut self) -> bool {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
            true
        } else {
            false
        }
    }

    /// Continue from the exact point of pause. No-op unless paused.
    pub fn resume(&mut self) -> bool {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
            true
        } else {
            false
        }
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Un-paused time still required to complete (ms).
    pub fn remaining_ms(&self) -> f64 {
        (self.steps_left as f64 * self.step_ms - self.acc_ms).max(0.0)
    }
}
