//! Bevy integration for the Vizij motion core.
//!
//! Mark an avatar root with [`MotionAvatar`], send [`MotionSignal`]s from the conversation
//! side and the plugin keeps the avatar breathing, glancing, gesturing and lip-syncing.

use bevy::prelude::*;
use vizij_motion_core::{ControlSignal, MotionConfig, MotionEngine, MotionEvent};

pub mod components;
pub mod resources;
pub mod systems;

pub use components::{AvatarExpressions, MotionAvatar, MotionBone};
pub use resources::{BoneIndex, MotionEngineRes, MotionTimestep};

/// Control-surface request for the engine.
#[derive(Event, Debug, Clone)]
pub struct MotionSignal(pub ControlSignal);

/// Semantic event reported by the engine (gesture selected, blink started, ...).
#[derive(Event, Debug, Clone)]
pub struct MotionNotification(pub MotionEvent);

#[derive(Default)]
pub struct VizijMotionPlugin {
    pub config: MotionConfig,
}

impl Plugin for VizijMotionPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(MotionEngineRes(MotionEngine::new(self.config.clone())))
            .init_resource::<BoneIndex>()
            .init_resource::<MotionTimestep>()
            .add_event::<MotionSignal>()
            .add_event::<MotionNotification>()
            .add_systems(
                Update,
                (
                    systems::bind_avatar_system,
                    systems::apply_signals_system,
                    systems::tick_engine_system,
                    systems::apply_pose_system,
                )
                    .chain(),
            );
    }
}
