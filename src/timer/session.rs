//! One-shot countdown over the whole session.
//!
//! DESIGN
//! ======
//! `remaining` is only rewritten on pause, so it always holds the time
//! left as of `last_resume`. Pausing subtracts the span since then;
//! resuming schedules exactly what is left. The end is reported at most
//! once; after that, or after a cancel, every call is a no-op.

use std::time::Duration;

use super::TimerError;
use crate::scheduler::{Scheduler, TaskId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionTimerState {
    Running,
    Paused,
    Ended,
    Cancelled,
}

#[derive(Debug)]
pub struct SessionTimer {
    total: Duration,
    remaining: Duration,
    last_resume: Duration,
    task: Option<TaskId>,
    state: SessionTimerState,
}

impl SessionTimer {
    /// Start counting down `total` from the scheduler's current time.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::ZeroDuration`] for a zero `total`.
    pub fn start<S: Scheduler>(total: Duration, sched: &mut S) -> Result<Self, TimerError> {
        if total.is_zero() {
            return Err(TimerError::ZeroDuration);
        }
        Ok(Self {
            total,
            remaining: total,
            last_resume: sched.now(),
            task: Some(sched.schedule(total)),
            state: SessionTimerState::Running,
        })
    }

    #[must_use]
    pub fn state(&self) -> SessionTimerState {
        self.state
    }

    #[must_use]
    pub fn total(&self) -> Duration {
        self.total
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        matches!(self.state, SessionTimerState::Ended | SessionTimerState::Cancelled)
    }

    pub fn pause<S: Scheduler>(&mut self, sched: &mut S) {
        if self.state != SessionTimerState::Running {
            return;
        }
        self.remaining = self.remaining.saturating_sub(sched.now().saturating_sub(self.last_resume));
        self.disarm(sched);
        self.state = SessionTimerState::Paused;
    }

    pub fn resume<S: Scheduler>(&mut self, sched: &mut S) {
        if self.state != SessionTimerState::Paused {
            return;
        }
        self.last_resume = sched.now();
        self.task = Some(sched.schedule(self.remaining));
        self.state = SessionTimerState::Running;
    }

    /// Handle a due task. Returns `true` exactly once, when `task` is the
    /// live end-of-session wake-up.
    pub fn fire(&mut self, task: TaskId) -> bool {
        if self.state != SessionTimerState::Running || self.task != Some(task) {
            return false;
        }
        self.task = None;
        self.remaining = Duration::ZERO;
        self.state = SessionTimerState::Ended;
        true
    }

    #[must_use]
    pub fn owns(&self, task: TaskId) -> bool {
        self.state == SessionTimerState::Running && self.task == Some(task)
    }

    /// Stop without reporting an end.
    pub fn cancel<S: Scheduler>(&mut self, sched: &mut S) {
        if self.is_over() {
            return;
        }
        if self.state == SessionTimerState::Running {
            self.remaining = self.remaining.saturating_sub(sched.now().saturating_sub(self.last_resume));
        }
        self.disarm(sched);
        self.state = SessionTimerState::Cancelled;
    }

    #[must_use]
    pub fn remaining(&self, now: Duration) -> Duration {
        match self.state {
            SessionTimerState::Running => self.remaining.saturating_sub(now.saturating_sub(self.last_resume)),
            _ => self.remaining,
        }
    }

    /// Running time consumed so far; paused spans do not count.
    #[must_use]
    pub fn elapsed(&self, now: Duration) -> Duration {
        self.total.saturating_sub(self.remaining(now))
    }

    fn disarm<S: Scheduler>(&mut self, sched: &mut S) {
        if let Some(task) = self.task.take() {
            sched.cancel(task);
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
