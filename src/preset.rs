//! Presets and the free-tier sequence.
//!
//! DESIGN
//! ======
//! A preset is a named, pre-configured session. It may carry an explicit
//! ordered pose sequence; when it does, the selector cycles through it
//! instead of picking at random. The free tier is a single curated
//! sequence shown to users without full access, whatever their settings.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, Mode, PosturePreference, SessionConfig, Speed};
use crate::pose::{FocusArea, Visibility};

/// Curated pose ids for users without full access.
pub const FREE_TIER_SEQUENCE: &[&str] = &[
    "seated-upward-salute",
    "seated-cat-cow",
    "seated-cow-cat",
    "seated-crescent-moon",
    "shoulder-roll",
];

// =============================================================================
// PRESET
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub config: SessionConfig,
    /// Explicit ordered pose ids; empty means filtered random selection.
    #[serde(default)]
    pub pose_sequence: Vec<String>,
}

impl Preset {
    /// The preset's config tagged with its own id.
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        self.config.clone().with_preset(self.id.clone())
    }
}

// =============================================================================
// PRESET TABLE
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct PresetTable {
    presets: Vec<Preset>,
}

impl PresetTable {
    #[must_use]
    pub fn new(presets: Vec<Preset>) -> Self {
        Self { presets }
    }

    /// Parse a JSON array of presets.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed input.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(raw)?))
    }

    /// Problem-driven presets offered on the home screen.
    #[must_use]
    pub fn builtin() -> Self {
        let sitting_off = |area| {
            SessionConfig {
                mode: Mode::JustStretch,
                posture: PosturePreference::Sitting,
                camera: Some(Visibility::CameraOff),
                focus_area: Some(area),
                ..SessionConfig::default()
            }
            .with_speed(Speed::Slow)
            .with_duration_mins(5)
        };
        Self::new(vec![
            Preset {
                id: "mouse-hand-relief".into(),
                name: "Mouse Hand Relief".into(),
                description: "Ease tension from clicking and scrolling".into(),
                config: sitting_off(FocusArea::Wrists),
                pose_sequence: Vec::new(),
            },
            Preset {
                id: "tech-neck-reset".into(),
                name: "Tech Neck Reset".into(),
                description: "Release tension from screen time".into(),
                config: sitting_off(FocusArea::Neck),
                pose_sequence: Vec::new(),
            },
        ])
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    /// Session config for a preset id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPreset`] if no preset has that id.
    pub fn config_for(&self, id: &str) -> Result<SessionConfig, ConfigError> {
        self.get(id)
            .map(Preset::session_config)
            .ok_or_else(|| ConfigError::UnknownPreset(id.to_owned()))
    }

    /// The preset's explicit sequence, only when it is non-empty.
    #[must_use]
    pub fn sequence(&self, id: &str) -> Option<&[String]> {
        self.get(id)
            .map(|p| p.pose_sequence.as_slice())
            .filter(|seq| !seq.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

// =============================================================================
// FREE TIER
// =============================================================================

/// Fixed pose sequence for users without full access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FreeTier {
    sequence: Vec<String>,
}

impl FreeTier {
    #[must_use]
    pub fn new(sequence: Vec<String>) -> Self {
        Self { sequence }
    }

    #[must_use]
    pub fn sequence(&self) -> &[String] {
        &self.sequence
    }
}

impl Default for FreeTier {
    fn default() -> Self {
        Self::new(FREE_TIER_SEQUENCE.iter().map(|&id| id.to_owned()).collect())
    }
}

#[cfg(test)]
#[path = "preset_test.rs"]
mod tests;
