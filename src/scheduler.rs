//! Scheduling port — deferred wake-ups on a monotonic clock.
//!
//! DESIGN
//! ======
//! Timers never sleep. They ask a `Scheduler` for a wake-up after some
//! delay and get back a `TaskId`; when the task comes due, whoever drives
//! the clock hands the id back to the timer, which ignores ids it no longer
//! owns. Time is a `Duration` since the clock's origin.
//!
//! `TimerQueue` is the one implementation: a virtual clock that only moves
//! when told to. Tests advance it directly; the runtime driver advances it
//! to match `tokio::time::Instant`.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

/// Handle for one scheduled wake-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

pub trait Scheduler {
    /// Current time since the clock origin.
    fn now(&self) -> Duration;

    /// Arrange for a wake-up `delay` from now.
    fn schedule(&mut self, delay: Duration) -> TaskId;

    /// Drop a pending wake-up. Returns whether it was still pending.
    fn cancel(&mut self, task: TaskId) -> bool;
}

// =============================================================================
// TIMER QUEUE
// =============================================================================

#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    /// Ordered by deadline, then by scheduling order.
    due: BTreeSet<(Duration, TaskId)>,
    deadlines: HashMap<TaskId, Duration>,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.due.first().map(|&(deadline, _)| deadline)
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.due.len()
    }

    #[must_use]
    pub fn is_pending(&self, task: TaskId) -> bool {
        self.deadlines.contains_key(&task)
    }

    /// Remove the earliest task due at or before `until`, moving the clock
    /// to its deadline. Tasks sharing a deadline come out in the order they
    /// were scheduled.
    pub fn pop_due(&mut self, until: Duration) -> Option<TaskId> {
        let &(deadline, task) = self.due.first()?;
        if deadline > until {
            return None;
        }
        self.due.remove(&(deadline, task));
        self.deadlines.remove(&task);
        self.now = self.now.max(deadline);
        Some(task)
    }

    /// Move the clock forward to `until`. Never moves backwards and does not
    /// fire anything; drain with [`pop_due`](Self::pop_due) first.
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

impl Scheduler for TimerQueue {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule(&mut self, delay: Duration) -> TaskId {
        let task = TaskId(self.next_id);
        self.next_id += 1;
        let deadline = self.now + delay;
        self.due.insert((deadline, task));
        self.deadlines.insert(task, deadline);
        task
    }

    fn cancel(&mut self, task: TaskId) -> bool {
        match self.deadlines.remove(&task) {
            Some(deadline) => self.due.remove(&(deadline, task)),
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod tests;
