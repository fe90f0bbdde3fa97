//! Conversational control signals.
//!
//! Hosts drive the engine either through the `MotionEngine` methods directly or by queuing
//! [`ControlSignal`] values (serde-friendly, so they can cross a process or script
//! boundary).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MotionError;
use crate::expressions::Expression;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Happy,
    Sad,
    Surprised,
    Thinking,
}

impl Emotion {
    pub const ALL: [Emotion; 4] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Surprised,
        Emotion::Thinking,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Surprised => "surprised",
            Emotion::Thinking => "thinking",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emotion::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MotionError::UnknownEmotion(s.to_string()))
    }
}

/// Reaction picked for an assistant reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmotionCue {
    Show(Emotion),
    Nod,
}

const HAPPY_CUES: [&str; 4] = ["😊", "good", "nice", "cool"];
const SAD_CUES: [&str; 3] = ["😅", "sorry", "maaf"];
const SURPRISED_CUES: [&str; 3] = ["!", "wow", "amazing"];

impl EmotionCue {
    /// Classify reply text by keyword, case-insensitively. Happy cues win over sad cues,
    /// sad over surprised; anything else gets a nod.
    pub fn from_reply(text: &str) -> EmotionCue {
        let lower = text.to_lowercase();
        let has = |cues: &[&str]| cues.iter().any(|c| lower.contains(*c));
        if has(&HAPPY_CUES[..]) {
            EmotionCue::Show(Emotion::Happy)
        } else if has(&SAD_CUES[..]) {
            EmotionCue::Show(Emotion::Sad)
        } else if has(&SURPRISED_CUES[..]) {
            EmotionCue::Show(Emotion::Surprised)
        } else {
            EmotionCue::Nod
        }
    }
}

/// One queued request to the control surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlSignal {
    StartSpeaking,
    StopSpeaking,
    SetExpression { expression: Expression, weight: f32 },
    ResetExpressions,
    ShowEmotion { emotion: Emotion },
    StopThinking,
    Nod,
    /// React to reply text via [`EmotionCue::from_reply`].
    ReactToReply { text: String },
    Dispose,
}
