use bevy::prelude::*;
use hashbrown::HashMap;
use vizij_motion_core::{BoneName, Expression};

/// Marker for the root entity of an avatar. Descendants whose `Name` is a humanoid bone
/// name (`leftUpperArm`, `head`, ...) are driven by the motion engine.
///
/// Adding the marker to a new entity replaces the current avatar.
#[derive(Component, Debug, Default)]
pub struct MotionAvatar;

/// Inserted on every bound bone entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionBone(pub BoneName);

/// Mirror of the expression weights the engine has written, kept on the avatar root for
/// morph-target or UI systems to read.
#[derive(Component, Debug, Default, Clone)]
pub struct AvatarExpressions {
    pub weights: HashMap<Expression, f32>,
}

impl AvatarExpressions {
    pub fn get(&self, expression: &Expression) -> f32 {
        self.weights.get(expression).copied().unwrap_or(0.0)
    }
}
