//! In-memory host scene
//!
//! A flat list-based scene that answers every host query with linear scans.
//! Sufficient for tests and small demo scenes; a real engine implements the
//! traits in [`crate::scene::host`] over its own scene graph instead.

use slotmap::SlotMap;

use crate::foundation::math::Vec3;
use crate::physics::{CollisionLayers, Ray};
use crate::scene::host::{AnchorHandle, GeometryQuery, ModelHandle, OcclusionQuery, PartLookup};
use crate::scene::AABB;

#[derive(Debug, Clone)]
struct AnchorNode {
    position: Vec3,
    renderables: Vec<AABB>,
    part_name: Option<String>,
}

#[derive(Debug, Clone)]
struct Model {
    name: String,
    parts: Vec<AnchorHandle>,
}

/// A box that can block occlusion rays
#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    /// World-space volume
    pub bounds: AABB,
    /// Layers this obstacle lives on
    pub layers: CollisionLayers,
}

/// Simple list-based host scene
#[derive(Debug, Default)]
pub struct SimpleScene {
    anchors: SlotMap<AnchorHandle, AnchorNode>,
    models: SlotMap<ModelHandle, Model>,
    obstacles: Vec<Obstacle>,
}

impl SimpleScene {
    /// Create a new empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a free-standing anchor with no renderable geometry
    pub fn add_anchor(&mut self, position: Vec3) -> AnchorHandle {
        self.anchors.insert(AnchorNode {
            position,
            renderables: Vec::new(),
            part_name: None,
        })
    }

    /// Attach a renderable leaf's world bounds to an anchor
    ///
    /// Returns `false` if the anchor no longer exists.
    pub fn add_renderable(&mut self, anchor: AnchorHandle, bounds: AABB) -> bool {
        match self.anchors.get_mut(anchor) {
            Some(node) => {
                node.renderables.push(bounds);
                true
            }
            None => false,
        }
    }

    /// Move an anchor, returns `false` if it no longer exists
    pub fn set_anchor_position(&mut self, anchor: AnchorHandle, position: Vec3) -> bool {
        match self.anchors.get_mut(anchor) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Destroy an anchor; handles to it stop resolving
    pub fn remove_anchor(&mut self, anchor: AnchorHandle) -> bool {
        for model in self.models.values_mut() {
            model.parts.retain(|&part| part != anchor);
        }
        self.anchors.remove(anchor).is_some()
    }

    /// Register a model with no parts yet
    pub fn add_model(&mut self, name: impl Into<String>) -> ModelHandle {
        self.models.insert(Model {
            name: name.into(),
            parts: Vec::new(),
        })
    }

    /// Add a named part to a model, returning its anchor
    pub fn add_part(
        &mut self,
        model: ModelHandle,
        part_name: impl Into<String>,
        position: Vec3,
    ) -> Option<AnchorHandle> {
        if !self.models.contains_key(model) {
            return None;
        }

        let anchor = self.anchors.insert(AnchorNode {
            position,
            renderables: Vec::new(),
            part_name: Some(part_name.into()),
        });
        self.models[model].parts.push(anchor);
        Some(anchor)
    }

    /// Add a ray-blocking box
    pub fn add_obstacle(&mut self, bounds: AABB, layers: CollisionLayers) {
        self.obstacles.push(Obstacle { bounds, layers });
    }

    /// Number of live anchors
    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    /// Number of obstacles
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }
}

impl GeometryQuery for SimpleScene {
    fn anchor_position(&self, anchor: AnchorHandle) -> Option<Vec3> {
        self.anchors.get(anchor).map(|node| node.position)
    }

    fn renderable_bounds(&self, anchor: AnchorHandle) -> Vec<AABB> {
        self.anchors
            .get(anchor)
            .map(|node| node.renderables.clone())
            .unwrap_or_default()
    }
}

impl OcclusionQuery for SimpleScene {
    /// Obstacles that contain the ray origin are not reported, matching how
    /// engine raycasts ignore colliders they start inside.
    fn raycast_blocked(&self, ray: &Ray, max_distance: f32, layers: CollisionLayers) -> bool {
        self.obstacles
            .iter()
            .filter(|obstacle| layers.admits(obstacle.layers))
            .filter(|obstacle| !obstacle.bounds.contains_point(ray.origin))
            .filter_map(|obstacle| obstacle.bounds.intersect_ray(ray.origin, ray.direction))
            .any(|distance| distance <= max_distance)
    }
}

impl PartLookup for SimpleScene {
    fn model_name(&self, model: ModelHandle) -> Option<&str> {
        self.models.get(model).map(|m| m.name.as_str())
    }

    fn find_part(&self, model: ModelHandle, part_name: &str) -> Option<AnchorHandle> {
        self.models.get(model)?.parts.iter().copied().find(|&part| {
            self.anchors
                .get(part)
                .and_then(|node| node.part_name.as_deref())
                == Some(part_name)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_at_z(z: f32, layers: CollisionLayers) -> (AABB, CollisionLayers) {
        (
            AABB::from_center_extents(Vec3::new(0.0, 0.0, z), Vec3::new(5.0, 5.0, 0.05)),
            layers,
        )
    }

    #[test]
    fn test_raycast_respects_layer_mask() {
        let mut scene = SimpleScene::new();
        let (bounds, layers) = wall_at_z(-2.0, CollisionLayers::ENVIRONMENT);
        scene.add_obstacle(bounds, layers);

        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0)).unwrap();
        assert!(scene.raycast_blocked(&ray, 10.0, CollisionLayers::ENVIRONMENT));
        assert!(!scene.raycast_blocked(&ray, 10.0, CollisionLayers::MODEL));
        assert!(!scene.raycast_blocked(&ray, 10.0, CollisionLayers::empty()));
    }

    #[test]
    fn test_raycast_respects_max_distance() {
        let mut scene = SimpleScene::new();
        let (bounds, layers) = wall_at_z(-2.0, CollisionLayers::ENVIRONMENT);
        scene.add_obstacle(bounds, layers);

        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0)).unwrap();
        assert!(!scene.raycast_blocked(&ray, 1.5, CollisionLayers::ENVIRONMENT));
    }

    #[test]
    fn test_raycast_ignores_obstacle_containing_origin() {
        let mut scene = SimpleScene::new();
        scene.add_obstacle(AABB::unit_at(Vec3::zeros()), CollisionLayers::MODEL);

        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0)).unwrap();
        assert!(!scene.raycast_blocked(&ray, 10.0, CollisionLayers::MODEL));
    }

    #[test]
    fn test_find_part_by_name() {
        let mut scene = SimpleScene::new();
        let model = scene.add_model("Turbofan");
        let fan = scene.add_part(model, "Fan", Vec3::new(0.0, 0.0, 1.0)).unwrap();
        let nozzle = scene.add_part(model, "Nozzle", Vec3::new(0.0, 0.0, -1.0)).unwrap();

        assert_eq!(scene.find_part(model, "Fan"), Some(fan));
        assert_eq!(scene.find_part(model, "Nozzle"), Some(nozzle));
        assert_eq!(scene.find_part(model, "Spinner"), None);
        assert_eq!(scene.model_name(model), Some("Turbofan"));
    }

    #[test]
    fn test_removed_anchor_stops_resolving() {
        let mut scene = SimpleScene::new();
        let model = scene.add_model("Turbofan");
        let fan = scene.add_part(model, "Fan", Vec3::zeros()).unwrap();
        assert!(scene.remove_anchor(fan));

        assert!(scene.anchor_position(fan).is_none());
        assert!(scene.renderable_bounds(fan).is_empty());
        assert_eq!(scene.find_part(model, "Fan"), None);
    }
}
