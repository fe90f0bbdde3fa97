//! Breathing: an absolute vertical bob of the avatar root.

use crate::config::BreathingConfig;

#[derive(Clone, Debug, Default)]
pub struct BreathingLayer {
    clock: f32,
}

impl BreathingLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, dt: f32) {
        self.clock += dt;
    }

    pub fn height(&self, cfg: &BreathingConfig) -> f32 {
        (cfg.frequency * self.clock).sin() * cfg.amplitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_is_bounded_sinusoid() {
        let cfg = BreathingConfig::default();
        let mut b = BreathingLayer::new();
        assert_eq!(b.height(&cfg), 0.0);
        for _ in 0..1000 {
            b.update(0.01);
            assert!(b.height(&cfg).abs() <= 0.003);
        }
        let mut q = BreathingLayer::new();
        q.update(std::f32::consts::FRAC_PI_2 / 1.2);
        assert!((q.height(&cfg) - 0.003).abs() < 1e-6);
    }
}
