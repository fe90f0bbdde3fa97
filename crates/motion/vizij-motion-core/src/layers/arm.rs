//! Arm gesture layer.
//!
//! Idle: goals track the rest pose plus a slow per-bone oscillation, so the arms never
//! freeze. Speaking: every 1.0–2.5 s a gesture is drawn from the table and becomes the new
//! goal immediately. Either way the current rotation slerps toward the goal every frame,
//! which makes interrupted gestures blend instead of snap.

use glam::Quat;
use rand::Rng;
use tracing::debug;

use crate::bones::{BoneMap, BoneName, ARM_BONES};
use crate::config::ArmConfig;
use crate::gestures::{GestureTable, GestureTarget};
use crate::layers::Timer;
use crate::math::{quat_from_euler_xyz, slerp_toward};
use crate::outputs::MotionEvent;
use crate::rest_pose::RestPose;

#[derive(Clone, Debug)]
pub struct ArmGestureLayer {
    current: BoneMap<Quat>,
    goal: BoneMap<Quat>,
    timer: Timer,
    clock: f32,
    selections: u64,
    last_gesture: Option<String>,
}

impl ArmGestureLayer {
    pub fn new(cfg: &ArmConfig) -> Self {
        Self {
            current: BoneMap::new(),
            goal: BoneMap::new(),
            timer: Timer::new(cfg.first_gesture_delay),
            clock: 0.0,
            selections: 0,
            last_gesture: None,
        }
    }

    /// Start over from `rest`: current and goal both equal the rest rotations.
    pub fn reset(&mut self, rest: &RestPose, cfg: &ArmConfig) {
        *self = Self::new(cfg);
        for (bone, q) in rest.iter().filter(|(b, _)| b.is_arm()) {
            self.current.insert(bone, q);
            self.goal.insert(bone, q);
        }
    }

    /// Select a gesture on the next speaking frame.
    pub fn force_selection(&mut self) {
        self.timer.force();
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        speaking: bool,
        rest: &RestPose,
        table: &GestureTable,
        cfg: &ArmConfig,
        rng: &mut R,
    ) -> Option<MotionEvent> {
        self.clock += dt;
        let fired = self.timer.tick(dt);
        let mut event = None;

        if speaking {
            if fired {
                self.timer.rearm(cfg.gesture_interval.draw(rng));
                event = self.select(rest, table, rng);
            }
        } else {
            self.set_idle_goal(rest, cfg);
        }

        let fraction = if speaking {
            cfg.speaking_blend
        } else {
            cfg.idle_blend
        };
        for bone in ARM_BONES {
            if let (Some(cur), Some(goal)) = (self.current(bone), self.goal(bone)) {
                self.current.insert(bone, slerp_toward(cur, goal, fraction));
            }
        }
        event
    }

    fn select<R: Rng + ?Sized>(
        &mut self,
        rest: &RestPose,
        table: &GestureTable,
        rng: &mut R,
    ) -> Option<MotionEvent> {
        let (index, pose) = table.choose(rng)?;
        for (bone, target) in pose.iter() {
            let Some(rest_q) = rest.get(bone) else {
                continue;
            };
            let goal = match target {
                GestureTarget::Rest => rest_q,
                GestureTarget::Explicit(q) => q,
            };
            self.goal.insert(bone, goal);
        }
        self.selections += 1;
        self.last_gesture = Some(pose.name.clone());
        debug!(gesture = %pose.name, index, "arm gesture selected");
        Some(MotionEvent::GestureSelected {
            index,
            name: pose.name.clone(),
        })
    }

    fn set_idle_goal(&mut self, rest: &RestPose, cfg: &ArmConfig) {
        let t = self.clock;
        for bone in ARM_BONES {
            if let Some(rest_q) = rest.get(bone) {
                self.goal.insert(bone, rest_q * idle_offset(bone, t, cfg));
            }
        }
    }

    pub fn current(&self, bone: BoneName) -> Option<Quat> {
        self.current.get(bone).copied()
    }

    pub fn goal(&self, bone: BoneName) -> Option<Quat> {
        self.goal.get(bone).copied()
    }

    /// Current rotations in write order.
    pub fn current_rotations(&self) -> impl Iterator<Item = (BoneName, Quat)> + '_ {
        ARM_BONES
            .into_iter()
            .filter_map(|b| self.current.get(b).map(|q| (b, *q)))
    }

    pub fn selections(&self) -> u64 {
        self.selections
    }

    pub fn last_gesture(&self) -> Option<&str> {
        self.last_gesture.as_deref()
    }

    pub fn next_threshold(&self) -> f32 {
        self.timer.threshold()
    }
}

/// Small fidget rotation; each bone gets its own phase.
pub fn idle_offset(bone: BoneName, t: f32, cfg: &ArmConfig) -> Quat {
    let p = bone.phase_seed();
    let [ax, ay, az] = cfg.idle_amplitude;
    let [fx, fy, fz] = cfg.idle_frequency;
    quat_from_euler_xyz([
        (t * fx + p).sin() * ax,
        (t * fy + p * 2.0).sin() * ay,
        (t * fz + p * 3.0).sin() * az,
    ])
}
