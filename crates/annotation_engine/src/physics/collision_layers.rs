//! Collision layer system for filtering occlusion rays
//!
//! Every obstacle the host reports lives on one or more layers; a ray cast
//! only considers obstacles whose layers intersect the ray's mask.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Collision layer bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct CollisionLayers: u32 {
        /// Default layer for untagged geometry
        const DEFAULT = 1 << 0;

        /// Static environment geometry (floors, stands, walls)
        const ENVIRONMENT = 1 << 1;

        /// Displayed model parts
        const MODEL = 1 << 2;

        /// Annotation labels themselves
        const ANNOTATION = 1 << 3;

        /// World-space UI panels
        const UI = 1 << 4;

        /// Geometry that rays should never see
        const IGNORE_RAYCAST = 1 << 5;

        // Host-defined layers keep their bits
        const _ = !0;
    }
}

impl Default for CollisionLayers {
    /// No layers: a mask that admits nothing
    fn default() -> Self {
        Self::empty()
    }
}

impl CollisionLayers {
    /// Check whether an obstacle on `layers` is visible to a ray filtered by `self`
    pub fn admits(self, layers: Self) -> bool {
        self.intersects(layers)
    }

    /// Helper to create a mask from multiple layers
    pub fn mask(layers: &[Self]) -> Self {
        layers.iter().fold(Self::empty(), |acc, &layer| acc | layer)
    }
}
