//! Shared billboard orientation for labels

use crate::foundation::math::{Quat, Vec3, WORLD_UP};
use crate::render::forward_aligned_rotation;

/// Rotation giving a label the same facing as the camera
///
/// Every label gets the camera's forward axis rather than looking at the
/// camera position, so all labels on screen stay parallel.
pub fn orient(camera_forward: Vec3) -> Quat {
    forward_aligned_rotation(camera_forward, WORLD_UP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::WORLD_FORWARD;
    use approx::assert_relative_eq;

    #[test]
    fn test_labels_share_camera_facing() {
        let forward = Vec3::new(0.3, -0.2, 1.0).normalize();
        let rotation = orient(forward);
        assert_relative_eq!(rotation * WORLD_FORWARD, forward, epsilon = 1e-5);
    }

    #[test]
    fn test_zero_forward_is_identity() {
        assert_eq!(orient(Vec3::zeros()), Quat::identity());
    }
}
