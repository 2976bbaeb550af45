//! Countdown timers driven by the scheduling port.
//!
//! ARCHITECTURE
//! ============
//! Two independent timers run per session:
//!
//! - `PoseTimer` repeats: at zero it reports an expiry and restarts at full
//!   length for the next pose.
//! - `SessionTimer` is one-shot: it reports the end of the session once and
//!   never again.
//!
//! Both keep a deadline while running and a frozen remainder while paused,
//! so pause/resume cycles neither lose nor double-count time.

pub mod pose;
pub mod session;

pub use pose::{PoseTimer, PoseTimerState};
pub use session::{SessionTimer, SessionTimerState};

/// Rejected timer lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TimerError {
    #[error("timer duration must be greater than zero")]
    ZeroDuration,
}
