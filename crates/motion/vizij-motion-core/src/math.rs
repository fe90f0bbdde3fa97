//! Rotation helpers shared by the layers.
//! - XYZ Euler conversion (intrinsic X, then Y, then Z)
//! - slerp toward a goal with renormalization
//! - exponential approach for scalar offsets

use glam::{EulerRot, Quat, Vec3};

/// Tolerance for the unit-quaternion invariant.
pub const UNIT_EPSILON: f32 = 1e-4;

#[inline]
pub fn quat_from_euler_xyz(e: [f32; 3]) -> Quat {
    renormalize(Quat::from_euler(EulerRot::XYZ, e[0], e[1], e[2]))
}

#[inline]
pub fn euler_xyz(q: Quat) -> Vec3 {
    let (x, y, z) = q.to_euler(EulerRot::XYZ);
    Vec3::new(x, y, z)
}

/// Add `offset` to the XYZ Euler angles of `q`; this is how raw-space additive layers
/// perturb an already-resolved bone.
#[inline]
pub fn add_euler_xyz(q: Quat, offset: Vec3) -> Quat {
    let e = euler_xyz(q) + offset;
    quat_from_euler_xyz(e.to_array())
}

/// Normalize `q`; degenerate input collapses to identity.
#[inline]
pub fn renormalize(q: Quat) -> Quat {
    let len = q.length();
    if len > f32::EPSILON && len.is_finite() {
        let inv = len.recip();
        Quat::from_xyzw(q.x * inv, q.y * inv, q.z * inv, q.w * inv)
    } else {
        Quat::IDENTITY
    }
}

#[inline]
pub fn is_unit(q: Quat) -> bool {
    (q.length() - 1.0).abs() <= UNIT_EPSILON
}

/// Spherical interpolation of `current` toward `goal` by a per-frame fraction.
#[inline]
pub fn slerp_toward(current: Quat, goal: Quat, fraction: f32) -> Quat {
    let out = renormalize(current.slerp(goal, fraction.clamp(0.0, 1.0)));
    debug_assert!(is_unit(out), "slerp produced non-unit rotation {out:?}");
    out
}

/// `current += (target - current) * factor`
#[inline]
pub fn approach(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

#[inline]
pub fn approach_vec3(current: Vec3, target: Vec3, factor: f32) -> Vec3 {
    current + (target - current) * factor
}
