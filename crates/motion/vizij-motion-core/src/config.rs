//! Tuning constants for every motion layer.
//!
//! All fields default to the values the avatar ships with; a JSON document only needs to
//! name what it overrides.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bones::BoneName;
use crate::error::MotionResult;
use crate::expressions::Expression;
use crate::signals::Emotion;

/// Half-open range `[min, max)` used for randomized thresholds and targets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Symmetric span `[-half, half)`.
    pub fn centered(width: f32) -> Self {
        Self {
            min: -width * 0.5,
            max: width * 0.5,
        }
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }

    pub fn scaled(&self, s: f32) -> Span {
        Span::new(self.min * s, self.max * s)
    }

    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v < self.max
    }
}

/// Engine configuration. `seed` fixes the RNG for reproducible runs.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub seed: Option<u64>,
    pub arm: ArmConfig,
    pub blink: BlinkConfig,
    pub lip_sync: LipSyncConfig,
    pub head: HeadConfig,
    pub eyes: EyeConfig,
    pub sway: SwayConfig,
    pub breathing: BreathingConfig,
    pub expression: ExpressionConfig,
}

impl MotionConfig {
    pub fn from_json(text: &str) -> MotionResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmConfig {
    /// Rest rotation per bone as XYZ Euler radians. Left and right arms use opposite Z
    /// signs for "down".
    pub rest: BTreeMap<BoneName, [f32; 3]>,
    pub first_gesture_delay: f32,
    pub gesture_interval: Span,
    pub speaking_blend: f32,
    pub idle_blend: f32,
    pub idle_amplitude: [f32; 3],
    pub idle_frequency: [f32; 3],
}

impl Default for ArmConfig {
    fn default() -> Self {
        let rest = [
            (BoneName::LeftUpperArm, [0.1, 0.0, -0.85]),
            (BoneName::RightUpperArm, [0.1, 0.0, 0.85]),
            (BoneName::LeftLowerArm, [0.0, 0.25, 0.0]),
            (BoneName::RightLowerArm, [0.0, -0.25, 0.0]),
            (BoneName::LeftHand, [0.05, 0.0, 0.0]),
            (BoneName::RightHand, [0.05, 0.0, 0.0]),
        ]
        .into_iter()
        .collect();
        Self {
            rest,
            first_gesture_delay: 0.5,
            gesture_interval: Span::new(1.0, 2.5),
            speaking_blend: 0.05,
            idle_blend: 0.025,
            idle_amplitude: [0.008, 0.006, 0.008],
            idle_frequency: [0.3, 0.25, 0.35],
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    pub first_interval: Span,
    pub interval: Span,
    /// Length of one close/open pulse in seconds.
    pub duration: f32,
    pub double_probability: f64,
    /// Pause between the two pulses of a double blink.
    pub double_gap: f32,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            first_interval: Span::new(3.0, 7.0),
            interval: Span::new(2.0, 7.0),
            duration: 0.15,
            double_probability: 0.25,
            double_gap: 0.12,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LipSyncConfig {
    /// Per-frame fraction the mouth value moves toward its target.
    pub blend: f32,
    pub cadence: Span,
    /// Openness ranges one of which is picked uniformly per retarget.
    pub shapes: Vec<Span>,
    pub open_gain: f32,
    pub round_gain: f32,
}

impl Default for LipSyncConfig {
    fn default() -> Self {
        Self {
            blend: 0.25,
            cadence: Span::new(0.05, 0.17),
            shapes: vec![
                Span::new(0.3, 0.8),
                Span::new(0.0, 0.15),
                Span::new(0.15, 0.45),
            ],
            open_gain: 0.8,
            round_gain: 0.3,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadConfig {
    pub first_interval: Span,
    pub interval: Span,
    /// Full width of the pitch/yaw/roll target ranges.
    pub range: [f32; 3],
    /// Widening applied to pitch and yaw while speaking.
    pub speaking_scale: f32,
    pub smoothing: f32,
    pub nod_step: f32,
    pub nod_up: f32,
    pub nod_down: f32,
    pub nod_steps: u32,
}

impl Default for HeadConfig {
    fn default() -> Self {
        Self {
            first_interval: Span::new(2.0, 5.0),
            interval: Span::new(2.0, 6.0),
            range: [0.06, 0.1, 0.03],
            speaking_scale: 1.5,
            smoothing: 0.03,
            nod_step: 0.2,
            nod_up: 0.02,
            nod_down: -0.06,
            nod_steps: 4,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EyeConfig {
    pub first_interval: Span,
    pub interval: Span,
    pub speaking_micro_probability: f64,
    pub idle_micro_probability: f64,
    pub micro: Span,
    pub wide_x: Span,
    pub wide_y: Span,
    pub smoothing: f32,
}

impl Default for EyeConfig {
    fn default() -> Self {
        Self {
            first_interval: Span::new(1.0, 3.0),
            interval: Span::new(0.8, 3.3),
            speaking_micro_probability: 0.7,
            idle_micro_probability: 0.4,
            micro: Span::centered(0.02),
            wide_x: Span::centered(0.06),
            wide_y: Span::new(-0.012, 0.028),
            smoothing: 0.08,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SwayConfig {
    pub roll_frequency: f32,
    pub roll_amplitude: f32,
    pub pitch_frequency: f32,
    pub pitch_amplitude: f32,
}

impl Default for SwayConfig {
    fn default() -> Self {
        Self {
            roll_frequency: 0.4,
            roll_amplitude: 0.002,
            pitch_frequency: 0.3,
            pitch_amplitude: 0.001,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BreathingConfig {
    pub frequency: f32,
    pub amplitude: f32,
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            frequency: 1.2,
            amplitude: 0.003,
        }
    }
}

/// How one explicit emotion trigger behaves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmotionProfile {
    pub expression: Expression,
    pub weight: f32,
    /// Head-wander target override (pitch, yaw); `None` leaves the axis alone.
    pub nudge: [Option<f32>; 2],
    /// Seconds before the nudge is released; `None` holds it until the revert.
    pub nudge_for: Option<f32>,
    /// Seconds before the expression drops back to 0; `None` holds until cancelled.
    pub revert_after: Option<f32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressionConfig {
    pub first_interval: Span,
    pub interval: Span,
    pub ambient: Vec<Expression>,
    pub attack: f32,
    pub peak: f32,
    pub sustain: f32,
    pub sustain_base: f32,
    pub sustain_swing: f32,
    pub sustain_frequency: f32,
    pub release: f32,
    pub happy: EmotionProfile,
    pub sad: EmotionProfile,
    pub surprised: EmotionProfile,
    pub thinking: EmotionProfile,
}

impl Default for ExpressionConfig {
    fn default() -> Self {
        Self {
            first_interval: Span::new(8.0, 20.0),
            interval: Span::new(6.0, 16.0),
            ambient: vec![Expression::Relaxed, Expression::Happy],
            attack: 1.0,
            peak: 0.25,
            sustain: 2.0,
            sustain_base: 0.2,
            sustain_swing: 0.05,
            sustain_frequency: 2.0,
            release: 1.0,
            happy: EmotionProfile {
                expression: Expression::Happy,
                weight: 0.7,
                nudge: [Some(-0.06), None],
                nudge_for: Some(0.4),
                revert_after: Some(2.5),
            },
            sad: EmotionProfile {
                expression: Expression::Sad,
                weight: 0.6,
                nudge: [Some(0.05), None],
                nudge_for: None,
                revert_after: Some(2.5),
            },
            surprised: EmotionProfile {
                expression: Expression::Surprised,
                weight: 0.8,
                nudge: [Some(-0.04), None],
                nudge_for: None,
                revert_after: Some(1.8),
            },
            thinking: EmotionProfile {
                expression: Expression::Relaxed,
                weight: 0.3,
                nudge: [Some(-0.03), Some(0.06)],
                nudge_for: None,
                revert_after: None,
            },
        }
    }
}

impl ExpressionConfig {
    pub fn profile(&self, emotion: Emotion) -> &EmotionProfile {
        match emotion {
            Emotion::Happy => &self.happy,
            Emotion::Sad => &self.sad,
            Emotion::Surprised => &self.surprised,
            Emotion::Thinking => &self.thinking,
        }
    }
}
