//! Per-pose repeating countdown.
//!
//! DESIGN
//! ======
//! While running the timer owns one scheduled task at `deadline`. When that
//! task is handed back through [`PoseTimer::fire`] the timer counts an
//! expiry and immediately re-arms at full length, so `Running -> expired ->
//! Running` happens inside a single call. Pausing cancels the task and
//! freezes `deadline - now`; resuming schedules exactly that remainder.
//!
//! A reset (redo, go back, manual skip) restarts at full length without
//! counting an expiry and leaves a paused timer paused.

use std::time::Duration;

use super::TimerError;
use crate::scheduler::{Scheduler, TaskId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoseTimerState {
    Idle,
    Running,
    Paused,
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Idle,
    Running { deadline: Duration, task: TaskId },
    Paused { remaining: Duration },
}

#[derive(Debug)]
pub struct PoseTimer {
    duration: Duration,
    phase: Phase,
    expirations: u64,
}

impl PoseTimer {
    /// # Errors
    ///
    /// Returns [`TimerError::ZeroDuration`] for `secs == 0`.
    pub fn new(secs: u32) -> Result<Self, TimerError> {
        Self::with_duration(Duration::from_secs(u64::from(secs)))
    }

    /// # Errors
    ///
    /// Returns [`TimerError::ZeroDuration`] for a zero duration.
    pub fn with_duration(duration: Duration) -> Result<Self, TimerError> {
        if duration.is_zero() {
            return Err(TimerError::ZeroDuration);
        }
        Ok(Self { duration, phase: Phase::Idle, expirations: 0 })
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub fn state(&self) -> PoseTimerState {
        match self.phase {
            Phase::Idle => PoseTimerState::Idle,
            Phase::Running { .. } => PoseTimerState::Running,
            Phase::Paused { .. } => PoseTimerState::Paused,
        }
    }

    /// Number of expiries since construction.
    #[must_use]
    pub fn expirations(&self) -> u64 {
        self.expirations
    }

    /// Start (or restart) a full countdown.
    pub fn start<S: Scheduler>(&mut self, sched: &mut S) {
        self.disarm(sched);
        self.arm(self.duration, sched);
    }

    pub fn pause<S: Scheduler>(&mut self, sched: &mut S) {
        if let Phase::Running { deadline, task } = self.phase {
            sched.cancel(task);
            let remaining = deadline.saturating_sub(sched.now());
            self.phase = Phase::Paused { remaining };
        }
    }

    pub fn resume<S: Scheduler>(&mut self, sched: &mut S) {
        if let Phase::Paused { remaining } = self.phase {
            self.arm(remaining, sched);
        }
    }

    /// Back to full length without counting an expiry.
    pub fn reset<S: Scheduler>(&mut self, sched: &mut S) {
        match self.phase {
            Phase::Idle => {}
            Phase::Running { task, .. } => {
                sched.cancel(task);
                self.arm(self.duration, sched);
            }
            Phase::Paused { .. } => {
                self.phase = Phase::Paused { remaining: self.duration };
            }
        }
    }

    /// Switch to a new per-pose length and restart the countdown with it.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::ZeroDuration`] for `secs == 0`; the timer is
    /// left untouched.
    pub fn set_duration<S: Scheduler>(&mut self, secs: u32, sched: &mut S) -> Result<(), TimerError> {
        if secs == 0 {
            return Err(TimerError::ZeroDuration);
        }
        self.duration = Duration::from_secs(u64::from(secs));
        self.reset(sched);
        Ok(())
    }

    /// Cancel any pending wake-up and go idle.
    pub fn stop<S: Scheduler>(&mut self, sched: &mut S) {
        self.disarm(sched);
        self.phase = Phase::Idle;
    }

    /// Handle a due task. Returns `true` when it was this timer's live task:
    /// the pose expired and the countdown has restarted at full length.
    pub fn fire<S: Scheduler>(&mut self, task: TaskId, sched: &mut S) -> bool {
        match self.phase {
            Phase::Running { task: live, .. } if live == task => {
                self.expirations += 1;
                self.arm(self.duration, sched);
                true
            }
            _ => false,
        }
    }

    /// Whether `task` is the wake-up this timer is waiting on.
    #[must_use]
    pub fn owns(&self, task: TaskId) -> bool {
        matches!(self.phase, Phase::Running { task: live, .. } if live == task)
    }

    #[must_use]
    pub fn remaining(&self, now: Duration) -> Duration {
        match self.phase {
            Phase::Idle => self.duration,
            Phase::Running { deadline, .. } => deadline.saturating_sub(now),
            Phase::Paused { remaining } => remaining,
        }
    }

    /// Remaining whole seconds, rounded up, as a countdown display shows it.
    #[must_use]
    pub fn remaining_secs(&self, now: Duration) -> u64 {
        let remaining = self.remaining(now);
        let secs = remaining.as_secs();
        if remaining.subsec_nanos() > 0 { secs + 1 } else { secs }
    }

    fn arm<S: Scheduler>(&mut self, delay: Duration, sched: &mut S) {
        let task = sched.schedule(delay);
        self.phase = Phase::Running { deadline: sched.now() + delay, task };
    }

    fn disarm<S: Scheduler>(&mut self, sched: &mut S) {
        if let Phase::Running { task, .. } = self.phase {
            sched.cancel(task);
        }
    }
}

#[cfg(test)]
#[path = "pose_test.rs"]
mod tests;
