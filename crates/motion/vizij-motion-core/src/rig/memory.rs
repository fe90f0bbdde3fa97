use std::collections::BTreeMap;

use glam::Quat;
use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::bones::{BoneMap, BoneName};
use crate::expressions::{Expression, RESETTABLE};
use crate::math::{quat_from_euler_xyz, renormalize};
use crate::rig::RigHandle;

/// One observable interaction with an [`InMemoryRig`].
#[derive(Clone, Debug, PartialEq)]
pub enum RigCall {
    SetNormalized(BoneName, Quat),
    Resolve,
    SetRaw(BoneName, Quat),
    SetExpression(Expression, f32),
    SetRootHeight(f32),
    Dispose,
}

/// Serializable rig shape: which bones and expression channels exist, and the per-bone
/// bind rotation (XYZ Euler) that maps normalized space to raw space.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RigDescription {
    #[serde(default)]
    pub name: String,
    pub bones: Vec<BoneName>,
    /// `None` means every preset channel is available.
    #[serde(default)]
    pub expressions: Option<Vec<Expression>>,
    #[serde(default)]
    pub bind: BTreeMap<BoneName, [f32; 3]>,
}

/// Headless rig keeping both bone spaces in memory.
///
/// Pose resolution computes `raw = bind * normalized` for every bone, which is the
/// normalized→raw mapping of a humanoid whose bind pose is `bind`. Every call is recorded
/// so callers can inspect frame ordering.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRig {
    bind: BoneMap<Quat>,
    normalized: BoneMap<Quat>,
    raw: BoneMap<Quat>,
    channels: HashSet<Expression>,
    expressions: HashMap<Expression, f32>,
    root_height: f32,
    resolves: u64,
    disposed: bool,
    log: Vec<RigCall>,
}

fn preset_channels() -> HashSet<Expression> {
    let mut set: HashSet<Expression> = RESETTABLE.iter().cloned().collect();
    set.extend([
        Expression::Neutral,
        Expression::Ih,
        Expression::Ou,
        Expression::Ee,
        Expression::Blink,
        Expression::BlinkLeft,
        Expression::BlinkRight,
    ]);
    set
}

impl InMemoryRig {
    /// Rig with the given bones, identity bind rotations and every preset channel.
    pub fn new(bones: impl IntoIterator<Item = BoneName>) -> Self {
        let mut rig = InMemoryRig {
            channels: preset_channels(),
            ..Default::default()
        };
        for bone in bones {
            rig.bind.insert(bone, Quat::IDENTITY);
            rig.normalized.insert(bone, Quat::IDENTITY);
            rig.raw.insert(bone, Quat::IDENTITY);
        }
        rig
    }

    /// Full humanoid: every [`BoneName`].
    pub fn humanoid() -> Self {
        Self::new(BoneName::ALL)
    }

    pub fn from_description(desc: &RigDescription) -> Self {
        let mut rig = Self::new(desc.bones.iter().copied());
        if let Some(exprs) = &desc.expressions {
            rig.channels = exprs.iter().cloned().collect();
        }
        for (bone, euler) in &desc.bind {
            rig = rig.with_bind(*bone, quat_from_euler_xyz(*euler));
        }
        rig
    }

    /// Set the bind rotation of an existing bone; unknown bones are ignored.
    pub fn with_bind(mut self, bone: BoneName, bind: Quat) -> Self {
        if self.bind.contains(bone) {
            self.bind.insert(bone, renormalize(bind));
            self.raw.insert(bone, renormalize(bind));
        }
        self
    }

    /// Restrict the available expression channels.
    pub fn with_expressions(mut self, exprs: impl IntoIterator<Item = Expression>) -> Self {
        self.channels = exprs.into_iter().collect();
        self
    }

    pub fn bind_rotation(&self, bone: BoneName) -> Option<Quat> {
        self.bind.get(bone).copied()
    }

    pub fn expression(&self, expr: &Expression) -> Option<f32> {
        self.expressions.get(expr).copied()
    }

    pub fn root_height(&self) -> f32 {
        self.root_height
    }

    pub fn resolve_count(&self) -> u64 {
        self.resolves
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn bones(&self) -> impl Iterator<Item = BoneName> + '_ {
        self.bind.keys()
    }

    pub fn log(&self) -> &[RigCall] {
        &self.log
    }

    pub fn take_log(&mut self) -> Vec<RigCall> {
        std::mem::take(&mut self.log)
    }
}

impl RigHandle for InMemoryRig {
    fn has_bone(&self, bone: BoneName) -> bool {
        self.bind.contains(bone)
    }

    fn normalized_rotation(&self, bone: BoneName) -> Option<Quat> {
        self.normalized.get(bone).copied()
    }

    fn set_normalized_rotation(&mut self, bone: BoneName, rotation: Quat) -> bool {
        match self.normalized.get_mut(bone) {
            Some(slot) => {
                *slot = rotation;
                self.log.push(RigCall::SetNormalized(bone, rotation));
                true
            }
            None => false,
        }
    }

    fn raw_rotation(&self, bone: BoneName) -> Option<Quat> {
        self.raw.get(bone).copied()
    }

    fn set_raw_rotation(&mut self, bone: BoneName, rotation: Quat) -> bool {
        match self.raw.get_mut(bone) {
            Some(slot) => {
                *slot = rotation;
                self.log.push(RigCall::SetRaw(bone, rotation));
                true
            }
            None => false,
        }
    }

    fn set_expression(&mut self, expression: &Expression, weight: f32) -> bool {
        if !self.channels.contains(expression) {
            return false;
        }
        self.expressions.insert(expression.clone(), weight);
        self.log
            .push(RigCall::SetExpression(expression.clone(), weight));
        true
    }

    fn set_root_height(&mut self, height: f32) {
        self.root_height = height;
        self.log.push(RigCall::SetRootHeight(height));
    }

    fn resolve_pose(&mut self, _dt: f32) {
        for (bone, bind) in self.bind.iter() {
            let local = self.normalized.get(bone).copied().unwrap_or(Quat::IDENTITY);
            self.raw.insert(bone, renormalize(*bind * local));
        }
        self.resolves += 1;
        self.log.push(RigCall::Resolve);
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.log.push(RigCall::Dispose);
    }
}
