//! Per-frame output of the motion engine.
//!
//! A [`FrameReport`] lists the writes made to the rig this frame, in the order they were
//! made, and the semantic events raised by the layers or the control surface. Adapters use
//! it to mirror state into their host; tests use it to assert ordering.

use glam::Quat;
use serde::{Deserialize, Serialize};

use crate::bones::BoneName;
use crate::expressions::Expression;
use crate::signals::Emotion;

/// Pipeline stages in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameStage {
    Expressions,
    Normalized,
    Resolve,
    Raw,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneWrite {
    pub bone: BoneName,
    pub rotation: Quat,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpressionWrite {
    pub expression: Expression,
    pub weight: f32,
}

/// Discrete signals raised during a frame or by the control surface between frames.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum MotionEvent {
    RigInstalled { bones: usize },
    RigDisposed,
    SpeakingStarted,
    SpeakingStopped,
    GestureSelected { index: usize, name: String },
    BlinkStarted { second: bool },
    AmbientStarted { expression: Expression },
    AmbientCleared { expression: Expression },
    EmotionShown { emotion: Emotion },
    EmotionReverted { emotion: Emotion },
    NodStarted,
    NodFinished,
}

/// What one call to `MotionEngine::update` did.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub frame: u64,
    pub dt: f32,
    #[serde(default)]
    pub stages: Vec<FrameStage>,
    #[serde(default)]
    pub expression_writes: Vec<ExpressionWrite>,
    #[serde(default)]
    pub normalized_writes: Vec<BoneWrite>,
    #[serde(default)]
    pub raw_writes: Vec<BoneWrite>,
    pub root_height: Option<f32>,
    #[serde(default)]
    pub events: Vec<MotionEvent>,
}

impl FrameReport {
    #[inline]
    pub fn clear(&mut self) {
        self.frame = 0;
        self.dt = 0.0;
        self.stages.clear();
        self.expression_writes.clear();
        self.normalized_writes.clear();
        self.raw_writes.clear();
        self.root_height = None;
        self.events.clear();
    }

    #[inline]
    pub fn push_event(&mut self, event: MotionEvent) {
        self.events.push(event);
    }

    /// True when no rig was driven this frame.
    pub fn is_idle(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn raw_write(&self, bone: BoneName) -> Option<Quat> {
        self.raw_writes
            .iter()
            .rev()
            .find(|w| w.bone == bone)
            .map(|w| w.rotation)
    }

    pub fn normalized_write(&self, bone: BoneName) -> Option<Quat> {
        self.normalized_writes
            .iter()
            .rev()
            .find(|w| w.bone == bone)
            .map(|w| w.rotation)
    }

    pub fn expression_write(&self, expression: &Expression) -> Option<f32> {
        self.expression_writes
            .iter()
            .rev()
            .find(|w| &w.expression == expression)
            .map(|w| w.weight)
    }
}
