//! Rig collaborator contract.
//!
//! A rig exposes every bone in two spaces. Rotations written to the *normalized* space are
//! carried into the *raw* space by [`RigHandle::resolve_pose`]; raw writes made after that
//! call are final for the frame. The compositor relies on exactly this and nothing more.

mod memory;

pub use memory::{InMemoryRig, RigCall, RigDescription};

use glam::Quat;

use crate::bones::BoneName;
use crate::error::MotionResult;
use crate::expressions::Expression;

/// Opaque handle to a loaded humanoid rig.
///
/// Lookups of bones or expression channels the rig does not have return `None`/`false`;
/// callers treat that as "capability absent" and skip the write.
pub trait RigHandle {
    fn has_bone(&self, bone: BoneName) -> bool;

    fn normalized_rotation(&self, bone: BoneName) -> Option<Quat>;

    /// Returns `false` when the rig has no such bone.
    fn set_normalized_rotation(&mut self, bone: BoneName, rotation: Quat) -> bool;

    fn raw_rotation(&self, bone: BoneName) -> Option<Quat>;

    /// Returns `false` when the rig has no such bone.
    fn set_raw_rotation(&mut self, bone: BoneName, rotation: Quat) -> bool;

    /// Returns `false` when the rig has no such expression channel.
    fn set_expression(&mut self, expression: &Expression, weight: f32) -> bool;

    /// Vertical offset of the avatar root.
    fn set_root_height(&mut self, height: f32);

    /// Derive raw transforms from normalized ones for every bone.
    fn resolve_pose(&mut self, dt: f32);

    /// Release scene/GPU resources. Called once when the rig is replaced or the engine is
    /// disposed.
    fn dispose(&mut self) {}
}

impl<R: RigHandle + ?Sized> RigHandle for Box<R> {
    fn has_bone(&self, bone: BoneName) -> bool {
        (**self).has_bone(bone)
    }
    fn normalized_rotation(&self, bone: BoneName) -> Option<Quat> {
        (**self).normalized_rotation(bone)
    }
    fn set_normalized_rotation(&mut self, bone: BoneName, rotation: Quat) -> bool {
        (**self).set_normalized_rotation(bone, rotation)
    }
    fn raw_rotation(&self, bone: BoneName) -> Option<Quat> {
        (**self).raw_rotation(bone)
    }
    fn set_raw_rotation(&mut self, bone: BoneName, rotation: Quat) -> bool {
        (**self).set_raw_rotation(bone, rotation)
    }
    fn set_expression(&mut self, expression: &Expression, weight: f32) -> bool {
        (**self).set_expression(expression, weight)
    }
    fn set_root_height(&mut self, height: f32) {
        (**self).set_root_height(height)
    }
    fn resolve_pose(&mut self, dt: f32) {
        (**self).resolve_pose(dt)
    }
    fn dispose(&mut self) {
        (**self).dispose()
    }
}

/// Produces rigs from asset references.
///
/// Hosts with asynchronous transports await the load themselves and hand the outcome to
/// [`crate::MotionEngine::install_rig`]; this trait covers loaders that can answer inline.
pub trait RigLoader {
    type Rig: RigHandle;

    fn load(&mut self, asset: &str) -> MotionResult<Self::Rig>;
}
