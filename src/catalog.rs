//! Pose catalog — the immutable list of poses a session draws from.
//!
//! DESIGN
//! ======
//! The catalog is built once at startup (bundled poses or a JSON file) and
//! shared read-only behind an `Arc`. Lookups go through an id index. Two
//! checks run at construction so the pairing rule can trust the data: ids
//! are unique, and a sided pose's id ends in its own side suffix. Together
//! they mean a sided pose has at most one mirrored sibling.

use std::collections::HashMap;
use std::path::Path;

use crate::config::SessionConfig;
use crate::pose::{FocusArea, Pose, PoseTags, Posture, Side, Visibility};

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate pose id '{0}'")]
    DuplicateId(String),
    #[error("pose '{id}' has side {side:?} but its id does not end in '{}'", side.suffix())]
    SideSuffixMismatch { id: String, side: Side },
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// CATALOG
// =============================================================================

#[derive(Debug, Clone)]
pub struct Catalog {
    poses: Vec<Pose>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, validating ids and side suffixes.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] or
    /// [`CatalogError::SideSuffixMismatch`] for malformed data.
    pub fn new(poses: Vec<Pose>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(poses.len());
        for (i, pose) in poses.iter().enumerate() {
            if let Some(side) = pose.side
                && !pose.id.ends_with(side.suffix())
            {
                return Err(CatalogError::SideSuffixMismatch { id: pose.id.clone(), side });
            }
            if index.insert(pose.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateId(pose.id.clone()));
            }
        }
        Ok(Self { poses, index })
    }

    /// Parse a JSON array of poses.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid JSON or invalid pose data.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let poses: Vec<Pose> = serde_json::from_str(raw)?;
        Self::new(poses)
    }

    /// Load a JSON catalog from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&raw)?;
        tracing::info!(path = %path.display(), poses = catalog.len(), "loaded pose catalog");
        Ok(catalog)
    }

    /// The bundled desk-yoga catalog.
    #[must_use]
    pub fn builtin() -> Self {
        let poses = builtin_poses();
        let index = poses.iter().enumerate().map(|(i, p)| (p.id.clone(), i)).collect();
        Self { poses, index }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Pose> {
        self.index.get(id).map(|&i| &self.poses[i])
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn poses(&self) -> &[Pose] {
        &self.poses
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// The mirrored counterpart of a sided pose.
    #[must_use]
    pub fn sibling(&self, pose: &Pose) -> Option<&Pose> {
        let id = pose.sibling_id()?;
        self.get(&id)
    }

    /// Poses passing the config's posture, camera and focus filters, in
    /// catalog order.
    #[must_use]
    pub fn eligible(&self, config: &SessionConfig) -> Vec<&Pose> {
        self.poses.iter().filter(|p| config.accepts(p)).collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// =============================================================================
// BUNDLED POSES
// =============================================================================

struct Entry {
    id: &'static str,
    name: &'static str,
    instructions: &'static str,
    image: &'static str,
    posture: Posture,
    visibility: Visibility,
    areas: &'static [FocusArea],
}

const BUILTIN: &[Entry] = &[
    // seated
    Entry {
        id: "seated-upward-salute",
        name: "Seated Upward Salute",
        instructions: "Sit tall. Inhale and sweep both arms overhead, palms facing. Lengthen through the fingertips.",
        image: "poses/seated/seated_upward_salute.png",
        posture: Posture::Sitting,
        visibility: Visibility::CameraOff,
        areas: &[FocusArea::Shoulders, FocusArea::Back],
    },
    Entry {
        id: "seated-cat-cow",
        name: "Seated Cat-Cow",
        instructions: "Hands on knees. Exhale and round the spine, chin toward chest.",
        image: "poses/seated/seated_cat_cow.png",
        posture: Posture::Sitting,
        visibility: Visibility::CameraOff,
        areas: &[FocusArea::Back],
    },
    Entry {
        id: "seated-cow-cat",
        name: "Seated Cow-Cat",
        instructions: "Hands on knees. Inhale, lift the chest and arch the back, gaze slightly up.",
        image: "poses/seated/seated_cow_cat.png",
        posture: Posture::Sitting,
        visibility: Visibility::CameraOff,
        areas: &[FocusArea::Back, FocusArea::Chest],
    },
    Entry {
        id: "seated-crescent-moon",
        name: "Seated Crescent Moon",
        instructions: "Sit tall. Inhale arms up. Exhale lean gently to one side, keeping both sit bones grounded.",
        image: "poses/seated/seated_crescent_moon.png",
        posture: Posture::Sitting,
        visibility: Visibility::CameraOff,
        areas: &[FocusArea::Neck],
    },
    Entry {
        id: "shoulder-roll",
        name: "Shoulder Roll",
        instructions: "Lift the shoulders to the ears, roll them back and down. Repeat slowly.",
        image: "poses/seated/shoulder_roll.png",
        posture: Posture::Sitting,
        visibility: Visibility::CameraOn,
        areas: &[FocusArea::Shoulders, FocusArea::Neck],
    },
    Entry {
        id: "seated-pigeon-right",
        name: "Seated Pigeon (Right)",
        instructions: "Sit tall. Lay your right ankle on your left knee. Breathe.",
        image: "poses/seated/seated_pigeon.png",
        posture: Posture::Sitting,
        visibility: Visibility::CameraOff,
        areas: &[FocusArea::Hips],
    },
    Entry {
        id: "seated-pigeon-left",
        name: "Seated Pigeon (Left)",
        instructions: "Sit tall. Lay your left ankle on your right knee. Breathe.",
        image: "poses/seated/seated_pigeon.png",
        posture: Posture::Sitting,
        visibility: Visibility::CameraOff,
        areas: &[FocusArea::Hips],
    },
    Entry {
        id: "seated-twist-right",
        name: "Seated Twist (Right)",
        instructions: "Left hand to right knee, right hand behind you. Turn from the ribs.",
        image: "poses/seated/seated_twist.png",
        posture: Posture::Sitting,
        visibility: Visibility::CameraOff,
        areas: &[FocusArea::Back],
    },
    Entry {
        id: "seated-twist-left",
        name: "Seated Twist (Left)",
        instructions: "Right hand to left knee, left hand behind you. Turn from the ribs.",
        image: "poses/seated/seated_twist.png",
        posture: Posture::Sitting,
        visibility: Visibility::CameraOff,
        areas: &[FocusArea::Back],
    },
    Entry {
        id: "neck-tilt-right",
        name: "Neck Tilt (Right)",
        instructions: "Drop the right ear toward the right shoulder. Keep the left shoulder heavy.",
        image: "poses/seated/neck_tilt.png",
        posture: Posture::Sitting,
        visibility: Visibility::CameraOn,
        areas: &[FocusArea::Neck],
    },
    Entry {
        id: "neck-tilt-left",
        name: "Neck Tilt (Left)",
        instructions: "Drop the left ear toward the left shoulder. Keep the right shoulder heavy.",
        image: "poses/seated/neck_tilt.png",
        posture: Posture::Sitting,
        visibility: Visibility::CameraOn,
        areas: &[FocusArea::Neck],
    },
    Entry {
        id: "wrist-circles",
        name: "Wrist Circles",
        instructions: "Interlace the fingers and draw slow circles with both wrists. Switch direction halfway.",
        image: "poses/seated/wrist_circles.png",
        posture: Posture::Sitting,
        visibility: Visibility::CameraOn,
        areas: &[FocusArea::Wrists],
    },
    Entry {
        id: "prayer-stretch",
        name: "Prayer Stretch",
        instructions: "Press the palms together at the chest and lower the hands until you feel the wrists open.",
        image: "poses/seated/prayer_stretch.png",
        posture: Posture::Sitting,
        visibility: Visibility::CameraOn,
        areas: &[FocusArea::Wrists, FocusArea::Chest],
    },
    Entry {
        id: "finger-flex",
        name: "Finger Flex",
        instructions: "Extend one arm, palm up, and gently draw the fingers back with the other hand.",
        image: "poses/seated/finger_flex.png",
        posture: Posture::Sitting,
        visibility: Visibility::CameraOff,
        areas: &[FocusArea::Wrists],
    },
    // standing
    Entry {
        id: "mountain",
        name: "Mountain",
        instructions: "Stand tall, feet hip-width apart. Arms relaxed at your sides. Breathe.",
        image: "poses/standing/mountain.png",
        posture: Posture::Standing,
        visibility: Visibility::CameraOff,
        areas: &[],
    },
    Entry {
        id: "standing-forward-fold",
        name: "Standing Forward Fold",
        instructions: "Soften the knees and hinge at the hips. Let the head hang heavy.",
        image: "poses/standing/forward_fold.png",
        posture: Posture::Standing,
        visibility: Visibility::CameraOff,
        areas: &[FocusArea::Back, FocusArea::Hips],
    },
    Entry {
        id: "chest-opener",
        name: "Chest Opener",
        instructions: "Clasp the hands behind your back and lift the chest. Draw the shoulder blades together.",
        image: "poses/standing/chest_opener.png",
        posture: Posture::Standing,
        visibility: Visibility::CameraOn,
        areas: &[FocusArea::Chest, FocusArea::Shoulders],
    },
    Entry {
        id: "eagle-right",
        name: "Eagle (Right)",
        instructions: "Cross the right arm under the left and wrap. Sink the hips slightly.",
        image: "poses/standing/eagle.png",
        posture: Posture::Standing,
        visibility: Visibility::CameraOff,
        areas: &[FocusArea::Shoulders, FocusArea::Hips],
    },
    Entry {
        id: "eagle-left",
        name: "Eagle (Left)",
        instructions: "Cross the left arm under the right and wrap. Sink the hips slightly.",
        image: "poses/standing/eagle.png",
        posture: Posture::Standing,
        visibility: Visibility::CameraOff,
        areas: &[FocusArea::Shoulders, FocusArea::Hips],
    },
];

fn builtin_poses() -> Vec<Pose> {
    BUILTIN
        .iter()
        .map(|e| Pose {
            id: e.id.to_owned(),
            name: e.name.to_owned(),
            instructions: e.instructions.to_owned(),
            image: e.image.to_owned(),
            side: side_from_id(e.id),
            tags: PoseTags {
                allowed_posture: e.posture,
                visibility: e.visibility,
                focus_areas: e.areas.to_vec(),
            },
        })
        .collect()
}

fn side_from_id(id: &str) -> Option<Side> {
    [Side::Left, Side::Right]
        .into_iter()
        .find(|side| id.ends_with(side.suffix()))
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
