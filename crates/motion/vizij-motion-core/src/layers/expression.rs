//! Expression controller: ambient micro-expressions plus held explicit emotions.
//!
//! Ambient expressions fade in, sustain with a gentle wobble and fade out. An explicit
//! emotion clears the face, suppresses ambient picks while it is held and drops back to 0
//! after its revert delay (thinking is held until [`ExpressionLayer::stop_thinking`]).

use rand::Rng;
use tracing::debug;

use crate::config::{EmotionProfile, ExpressionConfig};
use crate::expressions::{Expression, ExpressionWeights, RESETTABLE};
use crate::layers::Timer;
use crate::outputs::MotionEvent;
use crate::signals::Emotion;

/// Ambient weight at `e` seconds into the envelope; 0 once it has run out.
pub fn ambient_envelope(e: f32, cfg: &ExpressionConfig) -> f32 {
    let sustain_end = cfg.attack + cfg.sustain;
    let end = sustain_end + cfg.release;
    if e < cfg.attack {
        (cfg.peak * e / cfg.attack.max(f32::EPSILON)).min(cfg.peak)
    } else if e < sustain_end {
        cfg.sustain_base + cfg.sustain_swing * (cfg.sustain_frequency * e).sin()
    } else if e < end {
        (cfg.peak * (end - e) / cfg.release.max(f32::EPSILON)).max(0.0)
    } else {
        0.0
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Ambient {
    expression: Expression,
    elapsed: f32,
}

#[derive(Clone, Debug, PartialEq)]
struct Held {
    emotion: Emotion,
    expression: Expression,
    revert_in: Option<f32>,
}

#[derive(Clone, Debug)]
pub struct ExpressionLayer {
    timer: Timer,
    ambient: Option<Ambient>,
    held: Option<Held>,
}

impl ExpressionLayer {
    pub fn new<R: Rng + ?Sized>(cfg: &ExpressionConfig, rng: &mut R) -> Self {
        Self {
            timer: Timer::drawn(&cfg.first_interval, rng),
            ambient: None,
            held: None,
        }
    }

    /// Show an explicit emotion. Clears every resettable channel, cancels the ambient
    /// expression and supersedes any pending revert.
    pub fn trigger(
        &mut self,
        emotion: Emotion,
        profile: &EmotionProfile,
        weights: &mut ExpressionWeights,
    ) -> MotionEvent {
        weights.reset(&RESETTABLE);
        if let Some(a) = self.ambient.take() {
            weights.set(a.expression, 0.0);
        }
        weights.set(profile.expression.clone(), profile.weight);
        self.held = Some(Held {
            emotion,
            expression: profile.expression.clone(),
            revert_in: profile.revert_after,
        });
        debug!(%emotion, weight = profile.weight, "emotion shown");
        MotionEvent::EmotionShown { emotion }
    }

    /// End a held thinking expression; no-op for any other state.
    pub fn stop_thinking(&mut self, weights: &mut ExpressionWeights) -> Option<MotionEvent> {
        match &self.held {
            Some(h) if h.emotion == Emotion::Thinking => self.revert(weights),
            _ => None,
        }
    }

    fn revert(&mut self, weights: &mut ExpressionWeights) -> Option<MotionEvent> {
        let held = self.held.take()?;
        weights.set(held.expression, 0.0);
        debug!(emotion = %held.emotion, "emotion reverted");
        Some(MotionEvent::EmotionReverted {
            emotion: held.emotion,
        })
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        weights: &mut ExpressionWeights,
        cfg: &ExpressionConfig,
        rng: &mut R,
    ) -> Option<MotionEvent> {
        if let Some(held) = &mut self.held {
            if let Some(t) = &mut held.revert_in {
                *t -= dt;
                if *t <= 0.0 {
                    return self.revert(weights);
                }
            }
            return None;
        }

        if let Some(ambient) = &mut self.ambient {
            ambient.elapsed += dt;
            let w = ambient_envelope(ambient.elapsed, cfg);
            weights.set(ambient.expression.clone(), w);
            if ambient.elapsed >= cfg.attack + cfg.sustain + cfg.release {
                let expression = ambient.expression.clone();
                weights.set(expression.clone(), 0.0);
                self.ambient = None;
                self.timer.rearm(cfg.interval.draw(rng));
                return Some(MotionEvent::AmbientCleared { expression });
            }
            return None;
        }

        if self.timer.tick(dt) && !cfg.ambient.is_empty() {
            let expression = cfg.ambient[rng.gen_range(0..cfg.ambient.len())].clone();
            weights.set(expression.clone(), 0.0);
            self.ambient = Some(Ambient {
                expression: expression.clone(),
                elapsed: 0.0,
            });
            return Some(MotionEvent::AmbientStarted { expression });
        }
        None
    }

    pub fn held_emotion(&self) -> Option<Emotion> {
        self.held.as_ref().map(|h| h.emotion)
    }

    pub fn ambient_expression(&self) -> Option<&Expression> {
        self.ambient.as_ref().map(|a| &a.expression)
    }
}
