//! Billboard orientation calculations

use crate::foundation::math::{Quat, Vec3, WORLD_FORWARD, WORLD_UP};

/// Rotation whose local +Z axis points along `forward`, keeping `up` as up
///
/// When `forward` is (anti)parallel to `up` the world forward axis is used
/// as the up hint instead. A zero `forward` yields the identity rotation.
pub fn forward_aligned_rotation(forward: Vec3, up: Vec3) -> Quat {
    let Some(forward) = forward.try_normalize(1e-6) else {
        return Quat::identity();
    };

    let up_hint = if forward.cross(&up).magnitude_squared() > 1e-8 {
        up
    } else if forward.cross(&WORLD_FORWARD).magnitude_squared() > 1e-8 {
        WORLD_FORWARD
    } else {
        WORLD_UP
    };

    Quat::face_towards(&forward, &up_hint)
}
