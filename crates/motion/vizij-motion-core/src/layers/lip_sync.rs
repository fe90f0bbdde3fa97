//! Lip-sync driver: a randomized mouth-openness cadence while speaking.

use rand::Rng;

use crate::config::{LipSyncConfig, Span};
use crate::layers::Timer;
use crate::math::approach;

/// Below this the mouth is treated as closed.
const CLOSED: f32 = 1e-4;

#[derive(Clone, Debug, Default)]
pub struct LipSyncLayer {
    speaking: bool,
    value: f32,
    target: f32,
    cadence: Timer,
    active: bool,
}

impl LipSyncLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin talking; the first mouth shape is picked immediately.
    pub fn start<R: Rng + ?Sized>(&mut self, cfg: &LipSyncConfig, rng: &mut R) {
        self.speaking = true;
        self.active = true;
        self.retarget(cfg, rng);
    }

    pub fn stop(&mut self) {
        self.speaking = false;
        self.target = 0.0;
    }

    fn retarget<R: Rng + ?Sized>(&mut self, cfg: &LipSyncConfig, rng: &mut R) {
        self.target = match cfg.shapes.len() {
            0 => 0.0,
            n => cfg.shapes[rng.gen_range(0..n)].draw(rng),
        };
        self.cadence.rearm(cfg.cadence.draw(rng));
    }

    /// Advance one frame; `Some(openness)` while the mouth is moving, `None` once it has
    /// settled shut.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        cfg: &LipSyncConfig,
        rng: &mut R,
    ) -> Option<f32> {
        if !self.active {
            return None;
        }
        if self.speaking && self.cadence.tick(dt) {
            self.retarget(cfg, rng);
        }
        self.value = approach(self.value, self.target, cfg.blend);
        if !self.speaking && self.value < CLOSED {
            self.value = 0.0;
            self.active = false;
        }
        Some(self.value)
    }

    /// `(aa, oh)` weights for an openness value.
    pub fn mouth_weights(value: f32, cfg: &LipSyncConfig) -> (f32, f32) {
        (value * cfg.open_gain, value * cfg.round_gain)
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    pub fn shape_bounds(cfg: &LipSyncConfig) -> Span {
        cfg.shapes.iter().fold(Span::new(f32::MAX, f32::MIN), |acc, s| {
            Span::new(acc.min.min(s.min), acc.max.max(s.max))
        })
    }
}
