//! Gesture table and selector for the arm layer.
//!
//! A gesture is a named partial pose over the arm bones. Each entry either names an
//! explicit rotation or sends the bone back to its rest rotation.

use std::collections::BTreeMap;

use glam::Quat;
use once_cell::sync::Lazy;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::bones::BoneName::{
    LeftHand, LeftLowerArm, LeftUpperArm, RightHand, RightLowerArm, RightUpperArm,
};
use crate::bones::{BoneMap, BoneName};
use crate::error::MotionResult;
use crate::math::quat_from_euler_xyz;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureTarget {
    Rest,
    Explicit(Quat),
}

#[derive(Clone, Debug, PartialEq)]
pub struct GesturePose {
    pub name: String,
    targets: BoneMap<GestureTarget>,
}

impl GesturePose {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            targets: BoneMap::new(),
        }
    }

    pub fn with(mut self, bone: BoneName, target: GestureTarget) -> Self {
        self.targets.insert(bone, target);
        self
    }

    pub fn target(&self, bone: BoneName) -> Option<GestureTarget> {
        self.targets.get(bone).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoneName, GestureTarget)> + '_ {
        self.targets.iter().map(|(b, t)| (b, *t))
    }
}

/// Authoring form: XYZ Euler triple per bone, `null` for "back to rest".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GestureSpec {
    pub name: String,
    pub bones: BTreeMap<BoneName, Option<[f32; 3]>>,
}

impl From<&GestureSpec> for GesturePose {
    fn from(spec: &GestureSpec) -> Self {
        let mut pose = GesturePose::new(spec.name.clone());
        for (bone, euler) in &spec.bones {
            if !bone.is_arm() {
                warn!(gesture = %spec.name, bone = %bone, "gesture targets a non-arm bone, ignored");
                continue;
            }
            let target = match euler {
                Some(e) => GestureTarget::Explicit(quat_from_euler_xyz(*e)),
                None => GestureTarget::Rest,
            };
            pose.targets.insert(*bone, target);
        }
        pose
    }
}

type Row = (&'static str, [(BoneName, Option<[f32; 3]>); 6]);

// Left arm: negative Z is down. Right arm: positive Z is down. Gestures lift partially
// from rest.
const DEFAULT_ROWS: [Row; 8] = [
    (
        "right-hand-explaining",
        [
            (RightUpperArm, Some([0.25, 0.15, 0.4])),
            (RightLowerArm, Some([0.2, -0.6, 0.0])),
            (RightHand, Some([0.3, 0.0, 0.0])),
            (LeftUpperArm, None),
            (LeftLowerArm, None),
            (LeftHand, None),
        ],
    ),
    (
        "left-hand-emphasizing",
        [
            (LeftUpperArm, Some([0.2, -0.1, -0.4])),
            (LeftLowerArm, Some([0.15, 0.5, 0.0])),
            (LeftHand, Some([0.2, 0.0, 0.0])),
            (RightUpperArm, None),
            (RightLowerArm, None),
            (RightHand, None),
        ],
    ),
    (
        "both-hands-open",
        [
            (LeftUpperArm, Some([0.15, -0.1, -0.45])),
            (LeftLowerArm, Some([0.1, 0.4, 0.0])),
            (LeftHand, Some([0.15, 0.0, 0.0])),
            (RightUpperArm, Some([0.15, 0.1, 0.45])),
            (RightLowerArm, Some([0.1, -0.4, 0.0])),
            (RightHand, Some([0.15, 0.0, 0.0])),
        ],
    ),
    (
        "right-hand-point",
        [
            (RightUpperArm, Some([0.3, 0.2, 0.35])),
            (RightLowerArm, Some([0.25, -0.7, 0.0])),
            (RightHand, Some([0.4, 0.0, 0.1])),
            (LeftUpperArm, None),
            (LeftLowerArm, None),
            (LeftHand, None),
        ],
    ),
    (
        "left-hand-to-chest",
        [
            (LeftUpperArm, Some([0.35, -0.25, -0.4])),
            (LeftLowerArm, Some([0.2, 0.8, 0.0])),
            (LeftHand, Some([0.1, 0.0, 0.0])),
            (RightUpperArm, None),
            (RightLowerArm, None),
            (RightHand, None),
        ],
    ),
    (
        "shrug",
        [
            (LeftUpperArm, Some([0.12, 0.0, -0.6])),
            (RightUpperArm, Some([0.12, 0.0, 0.6])),
            (LeftLowerArm, Some([0.05, 0.35, 0.0])),
            (RightLowerArm, Some([0.05, -0.35, 0.0])),
            (LeftHand, Some([0.1, 0.0, 0.0])),
            (RightHand, Some([0.1, 0.0, 0.0])),
        ],
    ),
    (
        "hands-together",
        [
            (LeftUpperArm, Some([0.25, 0.1, -0.45])),
            (RightUpperArm, Some([0.25, -0.1, 0.45])),
            (LeftLowerArm, Some([0.15, 0.55, 0.0])),
            (RightLowerArm, Some([0.15, -0.55, 0.0])),
            (LeftHand, Some([0.2, 0.0, 0.0])),
            (RightHand, Some([0.2, 0.0, 0.0])),
        ],
    ),
    (
        "wave-right",
        [
            (RightUpperArm, Some([0.15, 0.1, 0.3])),
            (RightLowerArm, Some([0.1, -0.4, 0.0])),
            (RightHand, Some([0.5, 0.15, 0.0])),
            (LeftUpperArm, None),
            (LeftLowerArm, None),
            (LeftHand, None),
        ],
    ),
];

static DEFAULT_TABLE: Lazy<GestureTable> = Lazy::new(|| {
    let specs: Vec<GestureSpec> = DEFAULT_ROWS
        .iter()
        .map(|(name, bones)| GestureSpec {
            name: (*name).to_string(),
            bones: bones.iter().copied().collect(),
        })
        .collect();
    GestureTable::from_specs(&specs)
});

/// Fixed set of gestures the selector draws from.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureTable {
    poses: Vec<GesturePose>,
}

impl Default for GestureTable {
    fn default() -> Self {
        DEFAULT_TABLE.clone()
    }
}

impl GestureTable {
    pub fn new(poses: Vec<GesturePose>) -> Self {
        Self { poses }
    }

    pub fn from_specs(specs: &[GestureSpec]) -> Self {
        Self {
            poses: specs.iter().map(GesturePose::from).collect(),
        }
    }

    /// Parse a JSON array of [`GestureSpec`].
    pub fn from_json(text: &str) -> MotionResult<Self> {
        let specs: Vec<GestureSpec> = serde_json::from_str(text)?;
        Ok(Self::from_specs(&specs))
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GesturePose> {
        self.poses.get(index)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.poses.iter().map(|p| p.name.as_str())
    }

    /// Uniform pick; `None` for an empty table.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(usize, &GesturePose)> {
        if self.poses.is_empty() {
            return None;
        }
        let i = rng.gen_range(0..self.poses.len());
        Some((i, &self.poses[i]))
    }
}
