//! Cached world bounds of an anchor's geometry
//!
//! Unioning every renderable under an anchor is too expensive to repeat each
//! frame, so the result is kept until someone asks for a recalculation (for
//! example after the model under the anchor is swapped).

use crate::scene::{AnchorHandle, GeometryQuery, AABB};

/// Union of the renderable bounds under `anchor`
///
/// Falls back to a unit box centred on the anchor when it has no renderable
/// geometry. Returns `None` only if the anchor itself is gone.
pub fn compute_bounds<G: GeometryQuery + ?Sized>(scene: &G, anchor: AnchorHandle) -> Option<AABB> {
    let position = scene.anchor_position(anchor)?;
    let renderables = scene.renderable_bounds(anchor);

    Some(AABB::union_all(&renderables).unwrap_or_else(|| AABB::unit_at(position)))
}

/// Bounds computed on attach and on explicit request
#[derive(Debug, Clone, Default)]
pub struct BoundsCache {
    bounds: Option<AABB>,
}

impl BoundsCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute and store the bounds of `anchor`
    ///
    /// A missing anchor leaves the previous value in place.
    pub fn recalculate<G: GeometryQuery + ?Sized>(
        &mut self,
        scene: &G,
        anchor: AnchorHandle,
    ) -> Option<&AABB> {
        match compute_bounds(scene, anchor) {
            Some(bounds) => {
                log::debug!(
                    "Bounds for {:?}: center {:?}, size {:?}",
                    anchor,
                    bounds.center(),
                    bounds.size()
                );
                self.bounds = Some(bounds);
            }
            None => log::trace!("Bounds not recalculated, anchor {:?} is gone", anchor),
        }
        self.bounds.as_ref()
    }

    /// Cached bounds, if any have been computed
    pub fn get(&self) -> Option<&AABB> {
        self.bounds.as_ref()
    }

    /// Drop the cached value
    pub fn invalidate(&mut self) {
        self.bounds = None;
    }
}
