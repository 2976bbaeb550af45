//! Pose records and their eligibility tags.
//!
//! DESIGN
//! ======
//! A `Pose` is an immutable catalog entry. Only `id`, `side` and `tags`
//! matter to selection; `name`, `instructions` and `image` are carried for
//! display. Tag enums serialize with the spellings used by the bundled pose
//! data (`"camera on"`, `"sitting"`, ...).
//!
//! Sided poses come in mirrored pairs that share a base id: `eagle-left`
//! and `eagle-right` both have base id `eagle`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// A tag string did not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseTagError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseTagError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self { kind, value: value.to_owned() }
    }
}

// =============================================================================
// TAGS
// =============================================================================

/// Which side of the body an asymmetric pose works.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Id suffix carried by poses on this side.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Left => "-left",
            Self::Right => "-right",
        }
    }
}

impl FromStr for Side {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(ParseTagError::new("side", s)),
        }
    }
}

/// Physical posture a pose is valid for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Posture {
    Sitting,
    Standing,
}

impl FromStr for Posture {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sitting" | "seated" => Ok(Self::Sitting),
            "standing" => Ok(Self::Standing),
            _ => Err(ParseTagError::new("posture", s)),
        }
    }
}

impl fmt::Display for Posture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sitting => "sitting",
            Self::Standing => "standing",
        })
    }
}

/// Whether a pose is suitable while on camera.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    #[serde(rename = "camera on")]
    CameraOn,
    #[serde(rename = "camera off")]
    CameraOff,
}

impl FromStr for Visibility {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "camera on" | "on" => Ok(Self::CameraOn),
            "camera off" | "off" => Ok(Self::CameraOff),
            _ => Err(ParseTagError::new("camera visibility", s)),
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CameraOn => "camera on",
            Self::CameraOff => "camera off",
        })
    }
}

/// Body area a pose targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusArea {
    #[serde(alias = "wrist")]
    Wrists,
    Neck,
    Hips,
    Back,
    Chest,
    Shoulders,
}

impl FromStr for FocusArea {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wrist" | "wrists" => Ok(Self::Wrists),
            "neck" => Ok(Self::Neck),
            "hips" | "hip" => Ok(Self::Hips),
            "back" => Ok(Self::Back),
            "chest" => Ok(Self::Chest),
            "shoulders" | "shoulder" => Ok(Self::Shoulders),
            _ => Err(ParseTagError::new("focus area", s)),
        }
    }
}

impl fmt::Display for FocusArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Wrists => "wrists",
            Self::Neck => "neck",
            Self::Hips => "hips",
            Self::Back => "back",
            Self::Chest => "chest",
            Self::Shoulders => "shoulders",
        })
    }
}

/// Eligibility tags consulted by the selector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoseTags {
    pub allowed_posture: Posture,
    pub visibility: Visibility,
    /// Empty means a general pose.
    #[serde(default)]
    pub focus_areas: Vec<FocusArea>,
}

// =============================================================================
// POSE
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pose {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    pub tags: PoseTags,
}

impl Pose {
    /// Id with any trailing `-left`/`-right` removed.
    #[must_use]
    pub fn base_id(&self) -> &str {
        strip_side_suffix(&self.id)
    }

    /// Id of the mirrored counterpart, if this pose has a side.
    #[must_use]
    pub fn sibling_id(&self) -> Option<String> {
        let side = self.side?;
        Some(format!("{}{}", self.base_id(), side.opposite().suffix()))
    }

    #[must_use]
    pub fn targets(&self, area: FocusArea) -> bool {
        self.tags.focus_areas.contains(&area)
    }

    #[must_use]
    pub fn is_general(&self) -> bool {
        self.tags.focus_areas.is_empty()
    }
}

fn strip_side_suffix(id: &str) -> &str {
    id.strip_suffix(Side::Right.suffix())
        .or_else(|| id.strip_suffix(Side::Left.suffix()))
        .unwrap_or(id)
}

#[cfg(test)]
#[path = "pose_test.rs"]
mod tests;

#[cfg(test)]
pub(crate) mod test_helpers {
    use super::*;

    /// Build a pose with the given tags; `side` is derived from the id suffix.
    #[must_use]
    pub fn pose(id: &str, posture: Posture, visibility: Visibility, areas: &[FocusArea]) -> Pose {
        let side = if id.ends_with(Side::Left.suffix()) {
            Some(Side::Left)
        } else if id.ends_with(Side::Right.suffix()) {
            Some(Side::Right)
        } else {
            None
        };
        Pose {
            id: id.to_owned(),
            name: id.replace('-', " "),
            instructions: String::new(),
            image: String::new(),
            side,
            tags: PoseTags { allowed_posture: posture, visibility, focus_areas: areas.to_vec() },
        }
    }

    /// Standing, camera-off pose with no focus areas.
    #[must_use]
    pub fn standing(id: &str) -> Pose {
        pose(id, Posture::Standing, Visibility::CameraOff, &[])
    }

    /// Sitting, camera-off pose with no focus areas.
    #[must_use]
    pub fn sitting(id: &str) -> Pose {
        pose(id, Posture::Sitting, Visibility::CameraOff, &[])
    }
}
