use bevy::prelude::*;
use hashbrown::HashMap;
use vizij_motion_core::{BoneName, InMemoryRig, RigHandle};

use crate::components::{AvatarExpressions, MotionAvatar, MotionBone};
use crate::resources::{BoneIndex, MotionEngineRes, MotionTimestep};
use crate::{MotionNotification, MotionSignal};

/// Binds newly marked avatars: walks descendants, maps `Name`s to bones, records each
/// bone's current rotation as its bind rotation and installs a fresh rig in the engine.
pub fn bind_avatar_system(
    mut commands: Commands,
    avatars: Query<Entity, Added<MotionAvatar>>,
    children: Query<&Children>,
    names: Query<&Name>,
    transforms: Query<&Transform>,
    mut engine: ResMut<MotionEngineRes>,
    mut index: ResMut<BoneIndex>,
) {
    // Latest marker wins.
    let Some(root) = avatars.iter().last() else {
        return;
    };

    let mut bones: HashMap<BoneName, Entity> = HashMap::new();
    let mut stack = vec![root];
    while let Some(e) = stack.pop() {
        if let Ok(name) = names.get(e) {
            if let Ok(bone) = name.as_str().parse::<BoneName>() {
                bones.entry(bone).or_insert(e);
            }
        }
        if let Ok(cs) = children.get(e) {
            stack.extend(cs.iter().copied());
        }
    }

    let mut rig = InMemoryRig::new(bones.keys().copied());
    for (bone, entity) in &bones {
        if let Ok(tf) = transforms.get(*entity) {
            rig = rig.with_bind(*bone, tf.rotation);
        }
        commands.entity(*entity).insert(MotionBone(*bone));
    }
    commands.entity(root).insert(AvatarExpressions::default());

    info!(bones = bones.len(), "binding motion avatar");
    engine.0.install_rig(rig);
    index.avatar = Some(root);
    index.base_height = transforms.get(root).map_or(0.0, |tf| tf.translation.y);
    index.bones = bones;
}

pub fn apply_signals_system(
    mut signals: EventReader<MotionSignal>,
    mut engine: ResMut<MotionEngineRes>,
) {
    for MotionSignal(signal) in signals.read() {
        engine.0.signal(signal.clone());
    }
}

pub fn tick_engine_system(
    time: Res<Time>,
    step: Res<MotionTimestep>,
    mut engine: ResMut<MotionEngineRes>,
    mut notifications: EventWriter<MotionNotification>,
) {
    let dt = step.0.unwrap_or_else(|| time.delta_seconds());
    let report = engine.0.update(dt);
    for event in &report.events {
        notifications.send(MotionNotification(event.clone()));
    }
}

/// Copies the staged raw pose onto bone transforms, the breathing offset onto the root
/// and this frame's expression writes into [`AvatarExpressions`].
pub fn apply_pose_system(
    engine: Res<MotionEngineRes>,
    index: Res<BoneIndex>,
    mut transforms: Query<&mut Transform>,
    mut expressions: Query<&mut AvatarExpressions>,
) {
    let (Some(rig), Some(root)) = (engine.0.rig(), index.avatar) else {
        return;
    };
    for (bone, entity) in &index.bones {
        if let (Some(q), Ok(mut tf)) = (rig.raw_rotation(*bone), transforms.get_mut(*entity)) {
            tf.rotation = q;
        }
    }
    if let Ok(mut tf) = transforms.get_mut(root) {
        tf.translation.y = index.base_height + rig.root_height();
    }
    if let Ok(mut mirror) = expressions.get_mut(root) {
        for w in &engine.0.last_report().expression_writes {
            mirror.weights.insert(w.expression.clone(), w.weight);
        }
    }
}
