//! Humanoid bone vocabulary and a fixed-size map keyed by it.
//!
//! Bone names follow the humanoid rig standard's camelCase spelling (`leftUpperArm`,
//! `head`, ...). Storage keyed by [`BoneName`] is a dense array, so lookups never go
//! through strings at frame time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MotionError;

/// Closed set of humanoid bones the motion layers may address.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoneName {
    Hips,
    Spine,
    Chest,
    UpperChest,
    Neck,
    Head,
    LeftEye,
    RightEye,
    Jaw,
    LeftShoulder,
    LeftUpperArm,
    LeftLowerArm,
    LeftHand,
    RightShoulder,
    RightUpperArm,
    RightLowerArm,
    RightHand,
    LeftUpperLeg,
    LeftLowerLeg,
    LeftFoot,
    LeftToes,
    RightUpperLeg,
    RightLowerLeg,
    RightFoot,
    RightToes,
}

/// Bones owned by the arm gesture layer, in write order.
pub const ARM_BONES: [BoneName; 6] = [
    BoneName::LeftUpperArm,
    BoneName::RightUpperArm,
    BoneName::LeftLowerArm,
    BoneName::RightLowerArm,
    BoneName::LeftHand,
    BoneName::RightHand,
];

impl BoneName {
    pub const COUNT: usize = 25;

    pub const ALL: [BoneName; BoneName::COUNT] = [
        BoneName::Hips,
        BoneName::Spine,
        BoneName::Chest,
        BoneName::UpperChest,
        BoneName::Neck,
        BoneName::Head,
        BoneName::LeftEye,
        BoneName::RightEye,
        BoneName::Jaw,
        BoneName::LeftShoulder,
        BoneName::LeftUpperArm,
        BoneName::LeftLowerArm,
        BoneName::LeftHand,
        BoneName::RightShoulder,
        BoneName::RightUpperArm,
        BoneName::RightLowerArm,
        BoneName::RightHand,
        BoneName::LeftUpperLeg,
        BoneName::LeftLowerLeg,
        BoneName::LeftFoot,
        BoneName::LeftToes,
        BoneName::RightUpperLeg,
        BoneName::RightLowerLeg,
        BoneName::RightFoot,
        BoneName::RightToes,
    ];

    /// Dense index into [`BoneMap`] storage.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BoneName::Hips => "hips",
            BoneName::Spine => "spine",
            BoneName::Chest => "chest",
            BoneName::UpperChest => "upperChest",
            BoneName::Neck => "neck",
            BoneName::Head => "head",
            BoneName::LeftEye => "leftEye",
            BoneName::RightEye => "rightEye",
            BoneName::Jaw => "jaw",
            BoneName::LeftShoulder => "leftShoulder",
            BoneName::LeftUpperArm => "leftUpperArm",
            BoneName::LeftLowerArm => "leftLowerArm",
            BoneName::LeftHand => "leftHand",
            BoneName::RightShoulder => "rightShoulder",
            BoneName::RightUpperArm => "rightUpperArm",
            BoneName::RightLowerArm => "rightLowerArm",
            BoneName::RightHand => "rightHand",
            BoneName::LeftUpperLeg => "leftUpperLeg",
            BoneName::LeftLowerLeg => "leftLowerLeg",
            BoneName::LeftFoot => "leftFoot",
            BoneName::LeftToes => "leftToes",
            BoneName::RightUpperLeg => "rightUpperLeg",
            BoneName::RightLowerLeg => "rightLowerLeg",
            BoneName::RightFoot => "rightFoot",
            BoneName::RightToes => "rightToes",
        }
    }

    pub fn is_arm(self) -> bool {
        ARM_BONES.contains(&self)
    }

    /// Deterministic per-bone phase used to desynchronize idle oscillators.
    #[inline]
    pub fn phase_seed(self) -> f32 {
        (self.index() as f32 + 1.0) * 1.37
    }
}

impl fmt::Display for BoneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoneName {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BoneName::ALL
            .iter()
            .copied()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| MotionError::UnknownBone(s.to_string()))
    }
}

/// Dense map from [`BoneName`] to `T`; absent bones are simply `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct BoneMap<T> {
    slots: [Option<T>; BoneName::COUNT],
}

impl<T> Default for BoneMap<T> {
    fn default() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }
}

impl<T> BoneMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, bone: BoneName) -> Option<&T> {
        self.slots[bone.index()].as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, bone: BoneName) -> Option<&mut T> {
        self.slots[bone.index()].as_mut()
    }

    #[inline]
    pub fn insert(&mut self, bone: BoneName, value: T) -> Option<T> {
        self.slots[bone.index()].replace(value)
    }

    #[inline]
    pub fn remove(&mut self, bone: BoneName) -> Option<T> {
        self.slots[bone.index()].take()
    }

    #[inline]
    pub fn contains(&self, bone: BoneName) -> bool {
        self.slots[bone.index()].is_some()
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Present entries in [`BoneName::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (BoneName, &T)> {
        BoneName::ALL
            .iter()
            .zip(self.slots.iter())
            .filter_map(|(b, s)| s.as_ref().map(|v| (*b, v)))
    }

    pub fn keys(&self) -> impl Iterator<Item = BoneName> + '_ {
        self.iter().map(|(b, _)| b)
    }
}

impl<T> FromIterator<(BoneName, T)> for BoneMap<T> {
    fn from_iter<I: IntoIterator<Item = (BoneName, T)>>(iter: I) -> Self {
        let mut map = BoneMap::new();
        for (bone, value) in iter {
            map.insert(bone, value);
        }
        map
    }
}
