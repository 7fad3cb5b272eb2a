//! Host scene interfaces
//!
//! The placement code never owns geometry. Everything it knows about the
//! scene comes through these traits, keyed by opaque handles the host hands
//! out.

use crate::foundation::math::Vec3;
use crate::physics::{CollisionLayers, Ray};
use crate::scene::AABB;

slotmap::new_key_type! {
    /// Opaque handle to an anchor transform in the host scene graph
    pub struct AnchorHandle;

    /// Opaque handle to a loaded model
    pub struct ModelHandle;
}

/// Geometry queries against the host scene
pub trait GeometryQuery {
    /// World position of an anchor, `None` once it no longer exists
    fn anchor_position(&self, anchor: AnchorHandle) -> Option<Vec3>;

    /// World bounds of every renderable leaf under the anchor
    fn renderable_bounds(&self, anchor: AnchorHandle) -> Vec<AABB>;
}

/// Ray occlusion queries against the host scene
pub trait OcclusionQuery {
    /// Whether anything on `layers` blocks `ray` within `max_distance`
    fn raycast_blocked(&self, ray: &Ray, max_distance: f32, layers: CollisionLayers) -> bool;
}

/// Everything a placement tick needs from the host
pub trait SceneQuery: GeometryQuery + OcclusionQuery {}

impl<T: GeometryQuery + OcclusionQuery + ?Sized> SceneQuery for T {}

/// Lookup of named parts inside a model
pub trait PartLookup {
    /// Display name of a model
    fn model_name(&self, model: ModelHandle) -> Option<&str>;

    /// Anchor of the first part called `part_name` in `model`
    fn find_part(&self, model: ModelHandle, part_name: &str) -> Option<AnchorHandle>;
}
