//! Frame compositor.
//!
//! One frame is a fixed pipeline over the rig:
//!
//! 1. expression weights
//! 2. normalized-space bone writes
//! 3. pose resolution (normalized → raw)
//! 4. raw-space additive writes and root height
//!
//! Each step is a stage value that can only be obtained by consuming the previous one, so
//! a normalized write after resolution, or a raw write before it, does not type-check.

use glam::{Quat, Vec3};
use tracing::trace;

use crate::bones::BoneName;
use crate::expressions::ExpressionWeights;
use crate::math::{add_euler_xyz, is_unit};
use crate::outputs::{BoneWrite, ExpressionWrite, FrameReport, FrameStage};
use crate::rig::RigHandle;

struct Frame<'a, R: RigHandle + ?Sized> {
    rig: &'a mut R,
    report: &'a mut FrameReport,
}

/// First stage: expression weights may be flushed.
pub struct ExpressionStage<'a, R: RigHandle + ?Sized> {
    frame: Frame<'a, R>,
}

/// Second stage: arm (and any other normalized) bones may be written.
pub struct NormalizedStage<'a, R: RigHandle + ?Sized> {
    frame: Frame<'a, R>,
}

/// Final stage: the pose is resolved; raw writes are what gets rendered.
pub struct RawStage<'a, R: RigHandle + ?Sized> {
    frame: Frame<'a, R>,
}

impl<'a, R: RigHandle + ?Sized> ExpressionStage<'a, R> {
    pub fn begin(rig: &'a mut R, report: &'a mut FrameReport) -> Self {
        Self {
            frame: Frame { rig, report },
        }
    }

    /// Push every changed weight to the rig. Channels the rig lacks are dropped.
    pub fn write_expressions(self, weights: &mut ExpressionWeights) -> NormalizedStage<'a, R> {
        let Frame { rig, report } = self.frame;
        report.stages.push(FrameStage::Expressions);
        for (expression, weight) in weights.drain_dirty() {
            if rig.set_expression(&expression, weight) {
                report
                    .expression_writes
                    .push(ExpressionWrite { expression, weight });
            } else {
                trace!(%expression, "rig has no expression channel");
            }
        }
        NormalizedStage {
            frame: Frame { rig, report },
        }
    }
}

impl<'a, R: RigHandle + ?Sized> NormalizedStage<'a, R> {
    pub fn set_normalized(&mut self, bone: BoneName, rotation: Quat) -> bool {
        debug_assert!(is_unit(rotation), "non-unit normalized write to {bone}");
        let written = self.frame.rig.set_normalized_rotation(bone, rotation);
        if written {
            self.frame
                .report
                .normalized_writes
                .push(BoneWrite { bone, rotation });
        }
        written
    }

    /// Let the rig carry normalized rotations into raw space.
    pub fn resolve(self, dt: f32) -> RawStage<'a, R> {
        let Frame { rig, report } = self.frame;
        report.stages.push(FrameStage::Normalized);
        rig.resolve_pose(dt);
        report.stages.push(FrameStage::Resolve);
        RawStage {
            frame: Frame { rig, report },
        }
    }
}

impl<'a, R: RigHandle + ?Sized> RawStage<'a, R> {
    pub fn raw_rotation(&self, bone: BoneName) -> Option<Quat> {
        self.frame.rig.raw_rotation(bone)
    }

    /// Add an XYZ Euler offset to the resolved rotation of `bone`.
    pub fn add_euler(&mut self, bone: BoneName, offset: Vec3) -> bool {
        let Some(resolved) = self.frame.rig.raw_rotation(bone) else {
            return false;
        };
        let rotation = add_euler_xyz(resolved, offset);
        debug_assert!(is_unit(rotation), "non-unit raw write to {bone}");
        let written = self.frame.rig.set_raw_rotation(bone, rotation);
        if written {
            self.frame.report.raw_writes.push(BoneWrite { bone, rotation });
        }
        written
    }

    pub fn set_root_height(&mut self, height: f32) {
        self.frame.rig.set_root_height(height);
        self.frame.report.root_height = Some(height);
    }

    pub fn finish(self) {
        self.frame.report.stages.push(FrameStage::Raw);
    }
}
