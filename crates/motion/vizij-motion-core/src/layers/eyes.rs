//! Eye saccades: occasional small or wide glances applied to both eyes in raw space.

use glam::Vec3;
use rand::Rng;

use crate::config::EyeConfig;
use crate::layers::Timer;
use crate::math::approach_vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Saccade {
    Micro,
    Wide,
}

#[derive(Clone, Debug)]
pub struct EyeSaccadeLayer {
    timer: Timer,
    target: Vec3,
    current: Vec3,
    last: Option<Saccade>,
}

impl EyeSaccadeLayer {
    pub fn new<R: Rng + ?Sized>(cfg: &EyeConfig, rng: &mut R) -> Self {
        Self {
            timer: Timer::drawn(&cfg.first_interval, rng),
            target: Vec3::ZERO,
            current: Vec3::ZERO,
            last: None,
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, speaking: bool, cfg: &EyeConfig, rng: &mut R) {
        if self.timer.tick(dt) {
            self.timer.rearm(cfg.interval.draw(rng));
            let p = if speaking {
                cfg.speaking_micro_probability
            } else {
                cfg.idle_micro_probability
            };
            let kind = if rng.gen_bool(p.clamp(0.0, 1.0)) {
                Saccade::Micro
            } else {
                Saccade::Wide
            };
            let (x, y) = match kind {
                Saccade::Micro => (cfg.micro.draw(rng), cfg.micro.draw(rng)),
                Saccade::Wide => (cfg.wide_x.draw(rng), cfg.wide_y.draw(rng)),
            };
            self.target = Vec3::new(x, y, 0.0);
            self.last = Some(kind);
        }
        self.current = approach_vec3(self.current, self.target, cfg.smoothing);
    }

    /// Offset added to both resolved eye rotations.
    pub fn offset(&self) -> Vec3 {
        self.current
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn last_saccade(&self) -> Option<Saccade> {
        self.last
    }
}
