//! Axis-aligned bounding boxes
//!
//! Used for anchor geometry bounds and for obstacle volumes in the
//! in-memory scene.

use crate::foundation::math::Vec3;

/// Axis-Aligned Bounding Box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents (half-size)
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Create an AABB centered at a point with the given full size
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        Self::from_center_extents(center, size * 0.5)
    }

    /// Unit-size box (1 x 1 x 1) centered at a point
    pub fn unit_at(center: Vec3) -> Self {
        Self::from_center_size(center, Vec3::new(1.0, 1.0, 1.0))
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the full size of the AABB
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Largest of the three side lengths
    pub fn largest_dimension(&self) -> f32 {
        self.size().max()
    }

    /// Grow this box to also contain `other`
    pub fn encapsulate(&mut self, other: &AABB) {
        self.min = self.min.inf(&other.min);
        self.max = self.max.sup(&other.max);
    }

    /// Union of every box in the iterator, `None` when it is empty
    pub fn union_all<'a>(boxes: impl IntoIterator<Item = &'a AABB>) -> Option<AABB> {
        let mut iter = boxes.into_iter();
        let mut merged = *iter.next()?;
        for aabb in iter {
            merged.encapsulate(aabb);
        }
        Some(merged)
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Test ray intersection with this AABB using the slab method
    ///
    /// Returns the distance to the entry point if the ray intersects, or 0
    /// when the origin is already inside the box.
    pub fn intersect_ray(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<f32> {
        let inv_dir = Vec3::new(
            if ray_dir.x != 0.0 { 1.0 / ray_dir.x } else { f32::INFINITY },
            if ray_dir.y != 0.0 { 1.0 / ray_dir.y } else { f32::INFINITY },
            if ray_dir.z != 0.0 { 1.0 / ray_dir.z } else { f32::INFINITY },
        );

        let t1 = (self.min.x - ray_origin.x) * inv_dir.x;
        let t2 = (self.max.x - ray_origin.x) * inv_dir.x;
        let t3 = (self.min.y - ray_origin.y) * inv_dir.y;
        let t4 = (self.max.y - ray_origin.y) * inv_dir.y;
        let t5 = (self.min.z - ray_origin.z) * inv_dir.z;
        let t6 = (self.max.z - ray_origin.z) * inv_dir.z;

        // NaN from 0 * inf (origin on a slab plane with a parallel ray) is
        // dropped by f32::min/max, which prefer the non-NaN operand.
        let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
        let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

        if tmax >= tmin && tmax >= 0.0 {
            Some(tmin.max(0.0))
        } else {
            None
        }
    }
}
