//! Sideways nudge for labels whose anchor is hidden from the camera

use crate::core::config::AnnotationConfig;
use crate::foundation::math::{Vec3, WORLD_UP};
use crate::physics::Ray;
use crate::scene::OcclusionQuery;

/// Offset to add after the avoidance search
///
/// The direction toward the camera is taken from `chosen`, but the ray is
/// cast from `anchor` and limited to the anchor-to-camera distance. When it
/// hits something on the obstruction mask the label is pushed
/// `label_push_distance` along `direction × up`. Otherwise the delta is zero.
///
/// NOTE: the avoidance score tests the ray from the candidate instead. The
/// two checks are kept separate so each matches its own placement step.
pub fn nudge<O: OcclusionQuery + ?Sized>(
    config: &AnnotationConfig,
    occlusion: &O,
    anchor: Vec3,
    chosen: Vec3,
    camera_position: Vec3,
) -> Vec3 {
    let Some(to_camera) = (camera_position - chosen).try_normalize(1e-6) else {
        return Vec3::zeros();
    };
    let Some(ray) = Ray::new(anchor, to_camera) else {
        return Vec3::zeros();
    };

    let max_distance = (camera_position - anchor).magnitude();
    if !occlusion.raycast_blocked(&ray, max_distance, config.obstruction_mask) {
        return Vec3::zeros();
    }

    let right = to_camera
        .cross(&WORLD_UP)
        .try_normalize(1e-6)
        .unwrap_or_else(Vec3::zeros);
    log::debug!("Anchor at {:?} occluded, pushing label along {:?}", anchor, right);

    right * config.label_push_distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::CollisionLayers;
    use crate::scene::{SimpleScene, AABB};
    use approx::assert_relative_eq;

    fn blocked_scene() -> SimpleScene {
        let mut scene = SimpleScene::new();
        scene.add_obstacle(
            AABB::from_center_extents(Vec3::new(0.0, 0.0, -2.0), Vec3::new(1.0, 1.0, 0.1)),
            CollisionLayers::ENVIRONMENT,
        );
        scene
    }

    #[test]
    fn test_clear_line_of_sight_gives_no_push() {
        let config = AnnotationConfig::new().with_obstruction_mask(CollisionLayers::ENVIRONMENT);
        let scene = SimpleScene::new();
        let delta = nudge(&config, &scene, Vec3::zeros(), Vec3::new(0.0, 0.3, 0.0), Vec3::new(0.0, 0.0, -10.0));
        assert_eq!(delta, Vec3::zeros());
    }

    #[test]
    fn test_occluded_anchor_pushed_sideways() {
        let config = AnnotationConfig::new().with_obstruction_mask(CollisionLayers::ENVIRONMENT);
        let scene = blocked_scene();
        let camera = Vec3::new(0.0, 0.0, -10.0);

        let delta = nudge(&config, &scene, Vec3::zeros(), Vec3::zeros(), camera);

        // (0, 0, -1) × (0, 1, 0) = (1, 0, 0)
        assert_relative_eq!(delta, Vec3::new(0.2, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_obstacle_beyond_camera_gives_no_push() {
        let config = AnnotationConfig::new().with_obstruction_mask(CollisionLayers::ENVIRONMENT);
        let mut scene = SimpleScene::new();
        scene.add_obstacle(
            AABB::from_center_extents(Vec3::new(0.0, 0.0, -12.0), Vec3::new(1.0, 1.0, 0.1)),
            CollisionLayers::ENVIRONMENT,
        );

        let delta = nudge(&config, &scene, Vec3::zeros(), Vec3::zeros(), Vec3::new(0.0, 0.0, -10.0));
        assert_eq!(delta, Vec3::zeros());
    }

    #[test]
    fn test_empty_mask_never_pushes() {
        let config = AnnotationConfig::new();
        let scene = blocked_scene();
        let delta = nudge(&config, &scene, Vec3::zeros(), Vec3::zeros(), Vec3::new(0.0, 0.0, -10.0));
        assert_eq!(delta, Vec3::zeros());
    }

    #[test]
    fn test_camera_straight_above_gives_zero_push() {
        let config = AnnotationConfig::new().with_obstruction_mask(CollisionLayers::ENVIRONMENT);
        let mut scene = SimpleScene::new();
        scene.add_obstacle(
            AABB::from_center_extents(Vec3::new(0.0, 2.0, 0.0), Vec3::new(1.0, 0.1, 1.0)),
            CollisionLayers::ENVIRONMENT,
        );

        let delta = nudge(&config, &scene, Vec3::zeros(), Vec3::zeros(), Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(delta, Vec3::zeros());
    }
}
