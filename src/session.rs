//! Session orchestration — one running stretch session.
//!
//! DESIGN
//! ======
//! A `Session` owns everything that lives for one session: the config, the
//! history, the two timers and a seeded RNG. It is the only writer of
//! history; the selector just reads it.
//!
//! Nothing here sleeps or calls back. Due tasks come in through
//! [`Session::dispatch`] and user actions through the control methods; each
//! returns the events it caused so a driver can render them.
//!
//! When both timers come due at the same instant, whichever task was
//! scheduled first is dispatched first. The session timer wins if it ends
//! the session: ending stops the pose timer, so its task turns stale.
//!
//! If the selector has nothing to offer mid-session, the current pose stays
//! on screen and its timer keeps cycling.

use std::time::Duration;

use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::{ConfigError, SessionConfig, Speed};
use crate::history::SessionHistory;
use crate::pose::Pose;
use crate::scheduler::{Scheduler, TaskId, TimerQueue};
use crate::selector::{PoseSelector, SelectionRule};
use crate::timer::{PoseTimer, SessionTimer};

/// What moved the session to a new pose.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Start,
    Timer,
    Skip,
    Back,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    TimeElapsed,
    NoEligiblePose,
    Abandoned,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// A pose is now on screen. `rule` is `None` when navigating back.
    PoseShown { pose_id: String, rule: Option<SelectionRule>, cause: Transition },
    Paused,
    Resumed,
    Ended { reason: EndReason },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub poses_shown: usize,
    /// Running time; paused spans excluded.
    pub elapsed: Duration,
    pub reason: Option<EndReason>,
}

// =============================================================================
// SESSION
// =============================================================================

pub struct Session {
    config: SessionConfig,
    selector: PoseSelector,
    rng: StdRng,
    history: SessionHistory,
    current: Option<String>,
    pose_timer: PoseTimer,
    session_timer: SessionTimer,
    paused: bool,
    ended: Option<EndReason>,
    poses_shown: usize,
}

impl Session {
    /// Validate `config`, show the first pose and start both timers.
    ///
    /// Returns the session together with its opening events. A session with
    /// nothing eligible to show is returned already ended with
    /// [`EndReason::NoEligiblePose`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the config has a zero pose or session
    /// length.
    pub fn start<S: Scheduler>(
        config: SessionConfig,
        selector: PoseSelector,
        rng: StdRng,
        sched: &mut S,
    ) -> Result<(Self, Vec<SessionEvent>), ConfigError> {
        config.validate()?;
        let session_timer =
            SessionTimer::start(config.session_duration(), sched).map_err(|_| ConfigError::ZeroSessionDuration)?;
        let pose_timer = PoseTimer::new(config.pose_duration_secs).map_err(|_| ConfigError::ZeroPoseDuration)?;

        let mut session = Self {
            config,
            selector,
            rng,
            history: SessionHistory::new(),
            current: None,
            pose_timer,
            session_timer,
            paused: false,
            ended: None,
            poses_shown: 0,
        };

        info!(
            mode = ?session.config.mode,
            posture = %session.config.posture,
            pose_secs = session.config.pose_duration_secs,
            minutes = session.config.duration_mins,
            preset = session.config.preset_id.as_deref().unwrap_or("-"),
            "session started"
        );

        let Some(shown) = session.advance(Transition::Start) else {
            let ended = session.finish(EndReason::NoEligiblePose, sched);
            return Ok((session, vec![ended]));
        };
        session.pose_timer.start(sched);
        Ok((session, vec![shown]))
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    #[must_use]
    pub fn current_pose_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    #[must_use]
    pub fn current_pose(&self) -> Option<&Pose> {
        self.current.as_deref().and_then(|id| self.selector.catalog().get(id))
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.ended.is_some()
    }

    #[must_use]
    pub fn end_reason(&self) -> Option<EndReason> {
        self.ended
    }

    #[must_use]
    pub fn pose_remaining_secs(&self, now: Duration) -> u64 {
        self.pose_timer.remaining_secs(now)
    }

    #[must_use]
    pub fn session_remaining(&self, now: Duration) -> Duration {
        self.session_timer.remaining(now)
    }

    #[must_use]
    pub fn summary(&self, now: Duration) -> SessionSummary {
        SessionSummary {
            poses_shown: self.poses_shown,
            elapsed: self.session_timer.elapsed(now),
            reason: self.ended,
        }
    }

    // -------------------------------------------------------------------------
    // Timer tasks
    // -------------------------------------------------------------------------

    /// Route a due task to whichever timer owns it. Stale tasks and tasks
    /// arriving after the end produce nothing.
    pub fn dispatch<S: Scheduler>(&mut self, task: TaskId, sched: &mut S) -> Vec<SessionEvent> {
        if self.ended.is_some() {
            return Vec::new();
        }
        if self.session_timer.fire(task) {
            return vec![self.finish(EndReason::TimeElapsed, sched)];
        }
        if self.pose_timer.fire(task, sched) {
            return self.advance(Transition::Timer).into_iter().collect();
        }
        debug!(?task, "ignoring stale timer task");
        Vec::new()
    }

    /// Fire everything due on `queue` up to `until`, then move its clock
    /// there.
    pub fn run_until(&mut self, queue: &mut TimerQueue, until: Duration) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Some(task) = queue.pop_due(until) {
            events.extend(self.dispatch(task, queue));
        }
        queue.advance_to(until);
        events
    }

    // -------------------------------------------------------------------------
    // Controls
    // -------------------------------------------------------------------------

    /// Move on to the next pose now. The pose countdown restarts; a paused
    /// session stays paused.
    pub fn skip<S: Scheduler>(&mut self, sched: &mut S) -> Option<SessionEvent> {
        if self.ended.is_some() {
            return None;
        }
        let shown = self.advance(Transition::Skip)?;
        self.pose_timer.reset(sched);
        Some(shown)
    }

    /// Return to the previous pose. A no-op with fewer than two poses shown.
    pub fn go_back<S: Scheduler>(&mut self, sched: &mut S) -> Option<SessionEvent> {
        if self.ended.is_some() {
            return None;
        }
        let previous = self.history.go_back()?;
        debug!(pose = %previous, "going back");
        self.current = Some(previous.clone());
        self.pose_timer.reset(sched);
        Some(SessionEvent::PoseShown { pose_id: previous, rule: None, cause: Transition::Back })
    }

    /// Restart the current pose's countdown. Returns whether it restarted.
    pub fn redo<S: Scheduler>(&mut self, sched: &mut S) -> bool {
        if self.ended.is_some() {
            return false;
        }
        self.pose_timer.reset(sched);
        true
    }

    pub fn pause<S: Scheduler>(&mut self, sched: &mut S) -> Option<SessionEvent> {
        if self.ended.is_some() || self.paused {
            return None;
        }
        self.pose_timer.pause(sched);
        self.session_timer.pause(sched);
        self.paused = true;
        info!(remaining_secs = self.session_timer.remaining(sched.now()).as_secs(), "session paused");
        Some(SessionEvent::Paused)
    }

    pub fn resume<S: Scheduler>(&mut self, sched: &mut S) -> Option<SessionEvent> {
        if self.ended.is_some() || !self.paused {
            return None;
        }
        self.session_timer.resume(sched);
        self.pose_timer.resume(sched);
        self.paused = false;
        info!("session resumed");
        Some(SessionEvent::Resumed)
    }

    /// Apply an external pause flag to both timers.
    pub fn set_paused<S: Scheduler>(&mut self, paused: bool, sched: &mut S) -> Option<SessionEvent> {
        if paused { self.pause(sched) } else { self.resume(sched) }
    }

    /// Change seconds per pose; the current pose restarts at the new length.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroPoseDuration`] for `secs == 0`.
    pub fn set_pose_duration<S: Scheduler>(&mut self, secs: u32, sched: &mut S) -> Result<(), ConfigError> {
        self.pose_timer
            .set_duration(secs, sched)
            .map_err(|_| ConfigError::ZeroPoseDuration)?;
        self.config.pose_duration_secs = secs;
        info!(pose_secs = secs, "pose duration changed");
        Ok(())
    }

    /// # Errors
    ///
    /// Never fails for the fixed speed presets; see
    /// [`set_pose_duration`](Self::set_pose_duration).
    pub fn set_speed<S: Scheduler>(&mut self, speed: Speed, sched: &mut S) -> Result<(), ConfigError> {
        self.set_pose_duration(speed.pose_secs(), sched)
    }

    /// End the session early and forget its history.
    pub fn abandon<S: Scheduler>(&mut self, sched: &mut S) -> Option<SessionEvent> {
        if self.ended.is_some() {
            return None;
        }
        let ended = self.finish(EndReason::Abandoned, sched);
        self.history.clear();
        Some(ended)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn advance(&mut self, cause: Transition) -> Option<SessionEvent> {
        let Some(selection) = self
            .selector
            .select(&self.config, self.current.as_deref(), &self.history, &mut self.rng)
        else {
            debug!(?cause, current = ?self.current, "no pose available");
            return None;
        };
        let pose_id = selection.pose.id.clone();
        let rule = selection.rule;

        self.history.append(pose_id.clone());
        self.current = Some(pose_id.clone());
        self.poses_shown += 1;
        debug!(pose = %pose_id, ?rule, ?cause, shown = self.poses_shown, "pose shown");
        Some(SessionEvent::PoseShown { pose_id, rule: Some(rule), cause })
    }

    fn finish<S: Scheduler>(&mut self, reason: EndReason, sched: &mut S) -> SessionEvent {
        self.pose_timer.stop(sched);
        self.session_timer.cancel(sched);
        self.ended = Some(reason);
        info!(
            ?reason,
            poses_shown = self.poses_shown,
            elapsed_secs = self.session_timer.elapsed(sched.now()).as_secs(),
            "session ended"
        );
        SessionEvent::Ended { reason }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
