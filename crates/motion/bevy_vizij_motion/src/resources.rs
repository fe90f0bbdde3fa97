use bevy::prelude::*;
use hashbrown::HashMap;
use vizij_motion_core::{BoneName, InMemoryRig, MotionEngine};

/// The engine, staging rig state in an [`InMemoryRig`] whose bind rotations come from the
/// avatar's initial transforms.
#[derive(Resource)]
pub struct MotionEngineRes(pub MotionEngine<InMemoryRig>);

/// Bound avatar: root entity, its rest height and the entity behind each bone.
#[derive(Resource, Default, Debug)]
pub struct BoneIndex {
    pub avatar: Option<Entity>,
    pub base_height: f32,
    pub bones: HashMap<BoneName, Entity>,
}

/// Seconds per engine step. `None` follows `Time::delta_seconds`.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct MotionTimestep(pub Option<f32>);
