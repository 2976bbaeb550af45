//! Real-time driver for a session.
//!
//! DESIGN
//! ======
//! The session runs on a virtual clock (`TimerQueue`). This loop pins that
//! clock to `tokio::time::Instant`: the moment `run` starts maps to the
//! queue's current time, and every wake-up sets the queue to the real
//! elapsed time before anything is dispatched.
//!
//! Three things wake the loop: the queue's next deadline, a one-second
//! display tick, and user commands. Commands are applied after catching the
//! clock up, so a skip issued at 14.9s never races a pose ending at 15s.
//!
//! TRADE-OFFS
//! ==========
//! When the command channel closes the loop keeps running on timers alone.
//! A session that is paused at that point can never resume, so it is
//! abandoned instead.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::config::Speed;
use crate::scheduler::{Scheduler, TimerQueue};
use crate::session::{Session, SessionEvent, SessionSummary};

const TICK: Duration = Duration::from_secs(1);

// =============================================================================
// COMMANDS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Pause,
    Resume,
    Toggle,
    Skip,
    Back,
    Redo,
    Speed(Speed),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCommandError {
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("speed needs one of still, slow, flow")]
    MissingSpeed,
    #[error(transparent)]
    Speed(#[from] crate::pose::ParseTagError),
}

impl FromStr for Command {
    type Err = ParseCommandError;

    /// Parses one terminal line. A blank line toggles pause.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Self::Toggle);
        };
        match head.to_ascii_lowercase().as_str() {
            "p" | "pause" => Ok(Self::Pause),
            "r" | "resume" => Ok(Self::Resume),
            "t" | "toggle" => Ok(Self::Toggle),
            "n" | "next" | "skip" => Ok(Self::Skip),
            "b" | "back" => Ok(Self::Back),
            "redo" => Ok(Self::Redo),
            "s" | "speed" => {
                let speed = words.next().ok_or(ParseCommandError::MissingSpeed)?;
                Ok(Self::Speed(speed.parse()?))
            }
            "q" | "quit" | "end" => Ok(Self::Quit),
            _ => Err(ParseCommandError::Unknown(s.trim().to_owned())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pause => f.write_str("pause"),
            Self::Resume => f.write_str("resume"),
            Self::Toggle => f.write_str("toggle"),
            Self::Skip => f.write_str("skip"),
            Self::Back => f.write_str("back"),
            Self::Redo => f.write_str("redo"),
            Self::Speed(speed) => write!(f, "speed {speed:?}"),
            Self::Quit => f.write_str("quit"),
        }
    }
}

// =============================================================================
// VIEW
// =============================================================================

/// Receives everything the loop wants shown.
pub trait SessionView {
    fn on_event(&mut self, session: &Session, event: &SessionEvent, now: Duration);

    /// Once a second while the session is live.
    fn on_tick(&mut self, _session: &Session, _now: Duration) {}
}

// =============================================================================
// LOOP
// =============================================================================

/// Drive `session` in real time until it ends. `opening` are the events
/// returned by [`Session::start`].
pub async fn run<V: SessionView>(
    mut session: Session,
    mut queue: TimerQueue,
    opening: Vec<SessionEvent>,
    mut commands: mpsc::Receiver<Command>,
    view: &mut V,
) -> SessionSummary {
    let origin = Instant::now();
    let base = queue.now();
    let clock = |at: Instant| base + at.duration_since(origin);

    render(view, &session, &opening, base);

    let mut ticker = tokio::time::interval(TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut commands_open = true;

    while !session.is_ended() {
        let wake = queue.next_deadline().map(|d| origin + d.saturating_sub(base));

        tokio::select! {
            () = sleep_until(wake) => {
                let now = clock(Instant::now());
                let events = session.run_until(&mut queue, now);
                render(view, &session, &events, now);
            }
            _ = ticker.tick() => {
                let now = clock(Instant::now());
                let events = session.run_until(&mut queue, now);
                render(view, &session, &events, now);
                if !session.is_ended() {
                    view.on_tick(&session, now);
                }
            }
            maybe = commands.recv(), if commands_open => {
                let now = clock(Instant::now());
                let mut events = session.run_until(&mut queue, now);
                match maybe {
                    Some(command) => events.extend(apply(&mut session, &mut queue, command)),
                    None => {
                        debug!("command channel closed");
                        commands_open = false;
                        if session.is_paused() {
                            events.extend(session.abandon(&mut queue));
                        }
                    }
                }
                render(view, &session, &events, now);
            }
        }
    }

    session.summary(queue.now())
}

/// Apply one command. The queue's clock must already be current.
pub fn apply(session: &mut Session, queue: &mut TimerQueue, command: Command) -> Vec<SessionEvent> {
    debug!(%command, "command");
    let event = match command {
        Command::Pause => session.pause(queue),
        Command::Resume => session.resume(queue),
        Command::Toggle => {
            let paused = !session.is_paused();
            session.set_paused(paused, queue)
        }
        Command::Skip => session.skip(queue),
        Command::Back => session.go_back(queue),
        Command::Redo => {
            session.redo(queue);
            None
        }
        Command::Speed(speed) => {
            if let Err(error) = session.set_speed(speed, queue) {
                warn!(%error, "speed change rejected");
            }
            None
        }
        Command::Quit => session.abandon(queue),
    };
    event.into_iter().collect()
}

fn render<V: SessionView>(view: &mut V, session: &Session, events: &[SessionEvent], now: Duration) {
    for event in events {
        view.on_event(session, event, now);
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
