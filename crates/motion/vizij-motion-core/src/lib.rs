//! Vizij Motion Core (engine-agnostic)
//!
//! Procedural motion and facial expression for a humanoid avatar, driven only by
//! conversational signals (idle, thinking, speaking, emotion). Layers generate breathing,
//! gaze, head wander, arm gestures, blinks and lip shapes; the compositor writes them to a
//! [`RigHandle`] in a fixed order around the rig's own pose resolution.
//!
//! Adapters (Bevy) implement [`RigHandle`] or stage through [`InMemoryRig`], call
//! [`MotionEngine::update`] once per frame and mirror the [`FrameReport`].

pub mod bones;
pub mod compositor;
pub mod config;
pub mod engine;
pub mod error;
pub mod expressions;
pub mod gestures;
pub mod layers;
pub mod math;
pub mod outputs;
pub mod rest_pose;
pub mod rig;
pub mod signals;

// Re-exports for consumers (adapters)
pub use bones::{BoneMap, BoneName, ARM_BONES};
pub use compositor::{ExpressionStage, NormalizedStage, RawStage};
pub use config::{
    ArmConfig, BlinkConfig, BreathingConfig, EmotionProfile, ExpressionConfig, EyeConfig,
    HeadConfig, LipSyncConfig, MotionConfig, Span, SwayConfig,
};
pub use engine::MotionEngine;
pub use error::{MotionError, MotionResult};
pub use expressions::{Expression, ExpressionWeights, RESETTABLE};
pub use gestures::{GesturePose, GestureSpec, GestureTable, GestureTarget};
pub use outputs::{BoneWrite, ExpressionWrite, FrameReport, FrameStage, MotionEvent};
pub use rest_pose::RestPose;
pub use rig::{InMemoryRig, RigCall, RigDescription, RigHandle, RigLoader};
pub use signals::{ControlSignal, Emotion, EmotionCue};
