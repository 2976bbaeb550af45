//! Desk yoga session engine.
//!
//! ARCHITECTURE
//! ============
//! - `catalog`, `preset`: static content (poses, curated sequences).
//! - `config`: what the user asked for in one session.
//! - `selector`: picks the next pose from config, history and entitlement.
//! - `history`: poses shown so far, owned by the session.
//! - `timer`, `scheduler`: pausable countdowns over a virtual clock.
//! - `session`: ties the above into one state machine.
//! - `runner`: drives a session in real time under tokio.
//! - `store`, `entitlement`: local preferences and unlock state.

pub mod catalog;
pub mod config;
pub mod entitlement;
pub mod history;
pub mod pose;
pub mod preset;
pub mod runner;
pub mod scheduler;
pub mod selector;
pub mod session;
pub mod store;
pub mod timer;

pub use catalog::{Catalog, CatalogError};
pub use config::{ConfigError, Mode, PosturePreference, SessionConfig, Speed};
pub use entitlement::Entitlement;
pub use history::SessionHistory;
pub use pose::{FocusArea, Pose, PoseTags, Posture, Side, Visibility};
pub use preset::{FreeTier, Preset, PresetTable};
pub use scheduler::{Scheduler, TaskId, TimerQueue};
pub use selector::{PoseSelector, Selection, SelectionRule};
pub use session::{EndReason, Session, SessionEvent, SessionSummary, Transition};
pub use store::{JsonFileStore, KvStore, MemoryStore, Preferences, StoreError};
