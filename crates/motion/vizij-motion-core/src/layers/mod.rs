//! Motion layers. Each layer owns its timers and values and is advanced once per frame by
//! the engine, in the stage the compositor assigns to it.

pub mod arm;
pub mod blink;
pub mod breathing;
pub mod expression;
pub mod eyes;
pub mod head;
pub mod lip_sync;
pub mod sway;

pub use arm::ArmGestureLayer;
pub use blink::BlinkLayer;
pub use breathing::BreathingLayer;
pub use expression::{ambient_envelope, ExpressionLayer};
pub use eyes::EyeSaccadeLayer;
pub use head::HeadWanderLayer;
pub use lip_sync::LipSyncLayer;
pub use sway::BodySwayLayer;

use rand::Rng;

use crate::config::Span;

/// Delta-time accumulator with a randomized trigger threshold.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Timer {
    elapsed: f32,
    threshold: f32,
}

impl Timer {
    pub fn new(threshold: f32) -> Self {
        Self {
            elapsed: 0.0,
            threshold,
        }
    }

    pub fn drawn<R: Rng + ?Sized>(span: &Span, rng: &mut R) -> Self {
        Self::new(span.draw(rng))
    }

    /// Advance by `dt`; true once the accumulated time exceeds the threshold.
    #[inline]
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        self.elapsed > self.threshold
    }

    /// Restart from zero with a new threshold.
    #[inline]
    pub fn rearm(&mut self, threshold: f32) {
        self.elapsed = 0.0;
        self.threshold = threshold;
    }

    /// Make the next `tick` fire regardless of the threshold.
    #[inline]
    pub fn force(&mut self) {
        self.elapsed = f32::INFINITY;
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_strictly_after_threshold() {
        let mut t = Timer::new(0.5);
        assert!(!t.tick(0.25));
        assert!(!t.tick(0.25));
        assert!(t.tick(0.01));
        t.rearm(1.0);
        assert_eq!(t.elapsed(), 0.0);
        assert!(!t.tick(0.5));
        t.force();
        assert!(t.tick(0.0));
    }
}
