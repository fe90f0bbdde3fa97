#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use glam::Quat;
use vizij_motion_core::{
    BoneName, Expression, InMemoryRig, MotionConfig, MotionEngine, MotionError, MotionResult,
    RigDescription, RigHandle, RigLoader,
};

pub const DT: f32 = 1.0 / 60.0;

/// Loads rig descriptions from the shared fixtures.
#[derive(Default)]
pub struct FixtureLoader {
    pub attempts: Vec<String>,
}

impl RigLoader for FixtureLoader {
    type Rig = InMemoryRig;

    fn load(&mut self, asset: &str) -> MotionResult<InMemoryRig> {
        self.attempts.push(asset.to_string());
        let desc: RigDescription = vizij_test_fixtures::rigs::load(asset)
            .map_err(|e| MotionError::rig_load(asset, format!("{e:#}")))?;
        Ok(InMemoryRig::from_description(&desc))
    }
}

pub fn fixture_rig(name: &str) -> InMemoryRig {
    FixtureLoader::default().load(name).unwrap()
}

pub fn seeded(seed: u64) -> MotionEngine<InMemoryRig> {
    MotionEngine::new(MotionConfig::default().with_seed(seed))
}

pub fn run(engine: &mut MotionEngine<InMemoryRig>, frames: usize) {
    for _ in 0..frames {
        engine.update(DT);
    }
}

pub fn angle(a: Quat, b: Quat) -> f32 {
    a.angle_between(b)
}

/// Rig wrapper that counts `dispose` calls after it has been moved into an engine.
pub struct TrackedRig {
    pub inner: InMemoryRig,
    pub disposed: Rc<Cell<u32>>,
}

impl TrackedRig {
    pub fn new(inner: InMemoryRig) -> (Self, Rc<Cell<u32>>) {
        let disposed = Rc::new(Cell::new(0));
        (
            Self {
                inner,
                disposed: disposed.clone(),
            },
            disposed,
        )
    }
}

impl RigHandle for TrackedRig {
    fn has_bone(&self, bone: BoneName) -> bool {
        self.inner.has_bone(bone)
    }
    fn normalized_rotation(&self, bone: BoneName) -> Option<Quat> {
        self.inner.normalized_rotation(bone)
    }
    fn set_normalized_rotation(&mut self, bone: BoneName, rotation: Quat) -> bool {
        self.inner.set_normalized_rotation(bone, rotation)
    }
    fn raw_rotation(&self, bone: BoneName) -> Option<Quat> {
        self.inner.raw_rotation(bone)
    }
    fn set_raw_rotation(&mut self, bone: BoneName, rotation: Quat) -> bool {
        self.inner.set_raw_rotation(bone, rotation)
    }
    fn set_expression(&mut self, expression: &Expression, weight: f32) -> bool {
        self.inner.set_expression(expression, weight)
    }
    fn set_root_height(&mut self, height: f32) {
        self.inner.set_root_height(height)
    }
    fn resolve_pose(&mut self, dt: f32) {
        self.inner.resolve_pose(dt)
    }
    fn dispose(&mut self) {
        self.disposed.set(self.disposed.get() + 1);
    }
}
