//! Session configuration.
//!
//! DESIGN
//! ======
//! A `SessionConfig` is built once by the caller (from CLI flags or a
//! preset) and stays immutable for the session. It carries the filters the
//! selector applies plus the two timer lengths. Nothing here reads ambient
//! state; validation is explicit and rejects zero durations instead of
//! clamping them.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::pose::{FocusArea, ParseTagError, Pose, Posture, Visibility};

const DEFAULT_DURATION_MINS: u32 = 5;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("pose duration must be at least 1 second")]
    ZeroPoseDuration,
    #[error("session duration must be at least 1 minute")]
    ZeroSessionDuration,
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
}

// =============================================================================
// ENUMS
// =============================================================================

/// Why the user is stretching. Informational only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "meeting")]
    Meeting,
    #[serde(rename = "pomodoro")]
    Pomodoro,
    #[default]
    #[serde(rename = "just stretch")]
    JustStretch,
}

impl FromStr for Mode {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "meeting" => Ok(Self::Meeting),
            "pomodoro" => Ok(Self::Pomodoro),
            "just stretch" | "stretch" => Ok(Self::JustStretch),
            _ => Err(ParseTagError { kind: "mode", value: s.to_owned() }),
        }
    }
}

/// Posture filter; `Any` accepts both sitting and standing poses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PosturePreference {
    Any,
    #[default]
    Sitting,
    Standing,
}

impl PosturePreference {
    #[must_use]
    pub fn accepts(self, posture: Posture) -> bool {
        match self {
            Self::Any => true,
            Self::Sitting => posture == Posture::Sitting,
            Self::Standing => posture == Posture::Standing,
        }
    }
}

impl From<Posture> for PosturePreference {
    fn from(posture: Posture) -> Self {
        match posture {
            Posture::Sitting => Self::Sitting,
            Posture::Standing => Self::Standing,
        }
    }
}

impl FromStr for PosturePreference {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("any") {
            return Ok(Self::Any);
        }
        s.parse::<Posture>().map(Self::from)
    }
}

impl fmt::Display for PosturePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Any => "any",
            Self::Sitting => "sitting",
            Self::Standing => "standing",
        })
    }
}

/// Named pose pace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Still,
    #[default]
    Slow,
    Flow,
}

impl Speed {
    /// Seconds each pose is held at this pace.
    #[must_use]
    pub fn pose_secs(self) -> u32 {
        match self {
            Self::Still => 45,
            Self::Slow => 30,
            Self::Flow => 15,
        }
    }
}

impl FromStr for Speed {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "still" => Ok(Self::Still),
            "slow" => Ok(Self::Slow),
            "flow" => Ok(Self::Flow),
            _ => Err(ParseTagError { kind: "speed", value: s.to_owned() }),
        }
    }
}

// =============================================================================
// SESSION CONFIG
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub posture: PosturePreference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<Visibility>,
    #[serde(default, rename = "focus_area", skip_serializing_if = "Option::is_none")]
    pub focus_area: Option<FocusArea>,
    /// Seconds per pose.
    #[serde(rename = "poseDuration")]
    pub pose_duration_secs: u32,
    /// Total session length in minutes.
    #[serde(rename = "duration")]
    pub duration_mins: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_id: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            posture: PosturePreference::default(),
            camera: None,
            focus_area: None,
            pose_duration_secs: Speed::default().pose_secs(),
            duration_mins: DEFAULT_DURATION_MINS,
            preset_id: None,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn with_posture(mut self, posture: PosturePreference) -> Self {
        self.posture = posture;
        self
    }

    #[must_use]
    pub fn with_camera(mut self, camera: Visibility) -> Self {
        self.camera = Some(camera);
        self
    }

    #[must_use]
    pub fn with_focus_area(mut self, area: FocusArea) -> Self {
        self.focus_area = Some(area);
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: Speed) -> Self {
        self.pose_duration_secs = speed.pose_secs();
        self
    }

    #[must_use]
    pub fn with_pose_duration_secs(mut self, secs: u32) -> Self {
        self.pose_duration_secs = secs;
        self
    }

    #[must_use]
    pub fn with_duration_mins(mut self, mins: u32) -> Self {
        self.duration_mins = mins;
        self
    }

    #[must_use]
    pub fn with_preset(mut self, preset_id: impl Into<String>) -> Self {
        self.preset_id = Some(preset_id.into());
        self
    }

    /// Reject configurations the timers cannot run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroPoseDuration`] or
    /// [`ConfigError::ZeroSessionDuration`] for zero lengths.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pose_duration_secs == 0 {
            return Err(ConfigError::ZeroPoseDuration);
        }
        if self.duration_mins == 0 {
            return Err(ConfigError::ZeroSessionDuration);
        }
        Ok(())
    }

    /// Whether `pose` passes the posture, camera and focus-area filters.
    #[must_use]
    pub fn accepts(&self, pose: &Pose) -> bool {
        if !self.posture.accepts(pose.tags.allowed_posture) {
            return false;
        }
        if let Some(camera) = self.camera
            && pose.tags.visibility != camera
        {
            return false;
        }
        if let Some(area) = self.focus_area
            && !pose.targets(area)
        {
            return false;
        }
        true
    }

    #[must_use]
    pub fn pose_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.pose_duration_secs))
    }

    #[must_use]
    pub fn session_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration_mins) * 60)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
