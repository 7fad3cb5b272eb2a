//! Distance and size based label scaling

use crate::core::config::AnnotationConfig;
use crate::foundation::math::utils;
use crate::scene::AABB;

/// Lower clamp for the geometry size factor
pub const MIN_MODEL_FACTOR: f32 = 0.1;
/// Upper clamp for the geometry size factor
pub const MAX_MODEL_FACTOR: f32 = 2.0;

/// Label scale for a camera at `distance_to_camera` from the anchor
///
/// Interpolates from `max_scale` at distance 0 to `min_scale` at
/// `scale_distance`. With model bounds enabled the result is multiplied by
/// the clamped largest bounds dimension. The final value always lies in
/// `[min_scale, max_scale]`.
pub fn compute_scale(config: &AnnotationConfig, distance_to_camera: f32, bounds: Option<&AABB>) -> f32 {
    let t = utils::clamp01(distance_to_camera / config.scale_distance);
    let mut scale = utils::lerp_clamped(config.max_scale, config.min_scale, t);

    if config.use_model_bounds {
        if let Some(bounds) = bounds {
            scale *= model_factor(bounds, config.model_size_multiplier);
        }
    }

    utils::clamp(scale, config.min_scale, config.max_scale)
}

fn model_factor(bounds: &AABB, multiplier: f32) -> f32 {
    utils::clamp(
        bounds.largest_dimension() * multiplier,
        MIN_MODEL_FACTOR,
        MAX_MODEL_FACTOR,
    )
}
