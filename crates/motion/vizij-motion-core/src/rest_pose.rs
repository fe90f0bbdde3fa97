//! Rest pose: the relaxed, arms-down rotation of each controlled bone.
//!
//! Built once per installed rig and never mutated afterwards.

use glam::Quat;
use tracing::debug;

use crate::bones::{BoneMap, BoneName};
use crate::config::ArmConfig;
use crate::math::quat_from_euler_xyz;
use crate::rig::RigHandle;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RestPose {
    rotations: BoneMap<Quat>,
}

impl RestPose {
    /// Bones the rig lacks are left out of the pose.
    pub fn build<R: RigHandle + ?Sized>(rig: &R, cfg: &ArmConfig) -> Self {
        let mut rotations = BoneMap::new();
        for (bone, euler) in &cfg.rest {
            if rig.has_bone(*bone) {
                rotations.insert(*bone, quat_from_euler_xyz(*euler));
            } else {
                debug!(bone = %bone, "rest pose: rig has no such bone, skipping");
            }
        }
        debug!(bones = rotations.len(), "rest pose built");
        Self { rotations }
    }

    #[inline]
    pub fn get(&self, bone: BoneName) -> Option<Quat> {
        self.rotations.get(bone).copied()
    }

    pub fn contains(&self, bone: BoneName) -> bool {
        self.rotations.contains(bone)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoneName, Quat)> + '_ {
        self.rotations.iter().map(|(b, q)| (b, *q))
    }

    pub fn len(&self) -> usize {
        self.rotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rotations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{euler_xyz, is_unit};
    use crate::rig::InMemoryRig;

    #[test]
    fn omits_bones_the_rig_lacks() {
        let rig = InMemoryRig::new([BoneName::LeftUpperArm, BoneName::RightUpperArm, BoneName::Head]);
        let rest = RestPose::build(&rig, &ArmConfig::default());
        assert_eq!(rest.len(), 2);
        assert!(rest.contains(BoneName::LeftUpperArm));
        assert!(!rest.contains(BoneName::LeftHand));
    }

    #[test]
    fn arms_hang_with_mirrored_roll() {
        let rest = RestPose::build(&InMemoryRig::humanoid(), &ArmConfig::default());
        let l = euler_xyz(rest.get(BoneName::LeftUpperArm).unwrap());
        let r = euler_xyz(rest.get(BoneName::RightUpperArm).unwrap());
        assert!(l.z < -0.8 && r.z > 0.8);
        for (_, q) in rest.iter() {
            assert!(is_unit(q));
        }
    }
}
