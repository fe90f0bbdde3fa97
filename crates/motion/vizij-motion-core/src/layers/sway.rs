//! Body sway: a slow spine roll and pitch, added in raw space.

use glam::Vec3;

use crate::config::SwayConfig;

#[derive(Clone, Debug, Default)]
pub struct BodySwayLayer {
    clock: f32,
}

impl BodySwayLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, dt: f32) {
        self.clock += dt;
    }

    /// Spine offset (XYZ Euler) at the current clock.
    pub fn offset(&self, cfg: &SwayConfig) -> Vec3 {
        let t = self.clock;
        Vec3::new(
            (cfg.pitch_frequency * t).cos() * cfg.pitch_amplitude,
            0.0,
            (cfg.roll_frequency * t).sin() * cfg.roll_amplitude,
        )
    }
}
