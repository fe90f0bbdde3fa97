//! Head wander: slow random retargets of a small raw-space head offset, plus the nudges
//! emotions apply and the scripted nod.

use glam::Vec3;
use rand::Rng;
use tracing::trace;

use crate::config::{HeadConfig, Span};
use crate::layers::Timer;
use crate::math::approach_vec3;
use crate::outputs::MotionEvent;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Nod {
    elapsed: f32,
    step: u32,
    saved: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Nudge {
    axes: [Option<f32>; 2],
    release_in: Option<f32>,
}

#[derive(Clone, Debug)]
pub struct HeadWanderLayer {
    timer: Timer,
    target: Vec3,
    current: Vec3,
    nudge: Option<Nudge>,
    nod: Option<Nod>,
}

impl HeadWanderLayer {
    pub fn new<R: Rng + ?Sized>(cfg: &HeadConfig, rng: &mut R) -> Self {
        Self {
            timer: Timer::drawn(&cfg.first_interval, rng),
            target: Vec3::ZERO,
            current: Vec3::ZERO,
            nudge: None,
            nod: None,
        }
    }

    /// Pin pitch and/or yaw targets. Pinned axes ignore random retargets until released,
    /// either after `hold` seconds or by [`Self::release_nudge`].
    pub fn nudge(&mut self, axes: [Option<f32>; 2], hold: Option<f32>) {
        if let Some(x) = axes[0] {
            self.target.x = x;
            if let Some(nod) = &mut self.nod {
                nod.saved = x;
            }
        }
        if let Some(y) = axes[1] {
            self.target.y = y;
        }
        self.nudge = Some(Nudge {
            axes,
            release_in: hold,
        });
    }

    /// Return pinned axes to a neutral target.
    pub fn release_nudge(&mut self) {
        if let Some(n) = self.nudge.take() {
            if n.axes[0].is_some() {
                self.target.x = 0.0;
                if let Some(nod) = &mut self.nod {
                    nod.saved = 0.0;
                }
            }
            if n.axes[1].is_some() {
                self.target.y = 0.0;
            }
        }
    }

    /// Start a nod. The pitch target alternates up/down on a fixed step and then returns
    /// to the value it had when the nod began. Nodding again restarts the steps.
    pub fn nod(&mut self) {
        let saved = self.nod.map_or(self.target.x, |n| n.saved);
        self.nod = Some(Nod {
            elapsed: 0.0,
            step: 0,
            saved,
        });
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        speaking: bool,
        cfg: &HeadConfig,
        rng: &mut R,
    ) -> Option<MotionEvent> {
        if self.timer.tick(dt) {
            self.timer.rearm(cfg.interval.draw(rng));
            self.retarget(speaking, cfg, rng);
        }

        let expired = match self.nudge.as_mut().and_then(|n| n.release_in.as_mut()) {
            Some(t) => {
                *t -= dt;
                *t <= 0.0
            }
            None => false,
        };
        if expired {
            self.release_nudge();
        }

        let event = self.step_nod(dt, cfg);
        self.current = approach_vec3(self.current, self.target, cfg.smoothing);
        event
    }

    fn retarget<R: Rng + ?Sized>(&mut self, speaking: bool, cfg: &HeadConfig, rng: &mut R) {
        let s = if speaking { cfg.speaking_scale } else { 1.0 };
        let x = Span::centered(cfg.range[0] * s).draw(rng);
        let y = Span::centered(cfg.range[1] * s).draw(rng);
        let z = Span::centered(cfg.range[2]).draw(rng);
        let pinned = self.nudge.map_or([false; 2], |n| {
            [n.axes[0].is_some(), n.axes[1].is_some()]
        });
        if !pinned[0] && self.nod.is_none() {
            self.target.x = x;
        }
        if !pinned[1] {
            self.target.y = y;
        }
        self.target.z = z;
        trace!(target = ?self.target, "head retarget");
    }

    fn step_nod(&mut self, dt: f32, cfg: &HeadConfig) -> Option<MotionEvent> {
        let nod = self.nod.as_mut()?;
        nod.elapsed += dt;
        let step_len = cfg.nod_step.max(f32::EPSILON);
        while nod.elapsed >= step_len * (nod.step + 1) as f32 {
            nod.step += 1;
            if nod.step >= cfg.nod_steps {
                self.target.x = nod.saved;
                self.nod = None;
                return Some(MotionEvent::NodFinished);
            }
            self.target.x = if nod.step % 2 == 0 {
                cfg.nod_down
            } else {
                cfg.nod_up
            };
        }
        None
    }

    /// Offset to add to the resolved head rotation, XYZ Euler radians.
    pub fn offset(&self) -> Vec3 {
        self.current
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn is_nodding(&self) -> bool {
        self.nod.is_some()
    }

    pub fn is_nudged(&self) -> bool {
        self.nudge.is_some()
    }
}
