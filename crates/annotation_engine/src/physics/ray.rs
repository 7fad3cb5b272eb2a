//! Rays for occlusion casting

use crate::foundation::math::Vec3;

/// Directions shorter than this cannot be normalized reliably
const MIN_DIRECTION_LENGTH: f32 = 1e-6;

/// A ray for occlusion casting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray, or `None` when `direction` is (near) zero
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        direction
            .try_normalize(MIN_DIRECTION_LENGTH)
            .map(|direction| Self { origin, direction })
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
