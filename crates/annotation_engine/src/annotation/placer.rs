//! # Annotation Placer
//!
//! Per-label placement component. Each frame runs in two phases:
//!
//! 1. [`AnnotationPlacer::update`] computes scale, searches for a position
//!    against the frame's peer snapshot, nudges occluded anchors sideways and
//!    records the resulting offset from the anchor.
//! 2. [`AnnotationPlacer::late_update`] re-applies `anchor + offset` and the
//!    camera-aligned rotation after every label has been updated.
//!
//! Between the two phases the owner commits each placer's position to the
//! [`AnnotationRegistry`] so the next frame's snapshot sees it.
//!
//! A missing anchor or camera skips the frame. The label keeps its last pose
//! and picks up again once both are available.

use crate::annotation::avoidance::{AvoidanceSearch, SearchContext};
use crate::annotation::bounds_cache::BoundsCache;
use crate::annotation::registry::{AnnotationId, AnnotationRegistry, PeerSnapshot};
use crate::annotation::{occlusion, orient, scale, AnnotationError};
use crate::core::config::AnnotationConfig;
use crate::debug::{colors, DebugDrawSystem};
use crate::foundation::math::{Transform, Vec3};
use crate::render::Camera;
use crate::scene::{AnchorHandle, GeometryQuery, SceneQuery, AABB};

/// Gizmo size of the anchor marker in world units
const ANCHOR_MARKER_SIZE: f32 = 0.05;

/// Why a frame was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The anchor no longer exists in the host scene
    MissingAnchor,
    /// No camera was supplied for this frame
    MissingCamera,
    /// `late_update` ran before any successful `update`
    NotPlaced,
}

/// Result of one placement phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpdateOutcome {
    /// The label was placed
    Placed(Placement),
    /// Nothing was computed this frame
    Skipped(SkipReason),
}

impl UpdateOutcome {
    /// Whether the label was placed
    pub fn is_placed(&self) -> bool {
        matches!(self, Self::Placed(_))
    }
}

/// Summary of a successful update
///
/// `late_update` reports the score and nudge flag of the update it follows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Final label position
    pub position: Vec3,
    /// Uniform label scale
    pub scale: f32,
    /// Avoidance score of the chosen position
    pub score: f32,
    /// Whether the occlusion nudge moved the label
    pub nudged: bool,
}

/// Line from the anchor to the label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeaderLine {
    /// Anchor end
    pub start: Vec3,
    /// Label end
    pub end: Vec3,
    /// Width in world units, proportional to label scale
    pub width: f32,
}

/// Places one label near its anchor
#[derive(Debug)]
pub struct AnnotationPlacer {
    anchor: AnchorHandle,
    label: String,
    config: AnnotationConfig,
    bounds: BoundsCache,
    registry_id: Option<AnnotationId>,
    transform: Transform,
    final_offset: Vec3,
    anchor_live: bool,
    leader_line: Option<LeaderLine>,
    last_placement: Option<Placement>,
}

impl AnnotationPlacer {
    /// Attach a label to `anchor` and register it
    ///
    /// The label starts at the anchor position; its first update moves it to
    /// the configured offset. Bounds are computed now when model-based
    /// scaling is enabled.
    pub fn new<G: GeometryQuery + ?Sized>(
        anchor: AnchorHandle,
        label: impl Into<String>,
        config: AnnotationConfig,
        scene: &G,
        registry: &mut AnnotationRegistry,
    ) -> Result<Self, AnnotationError> {
        config.validate()?;

        let anchor_position = scene.anchor_position(anchor);
        let mut placer = Self {
            anchor,
            label: label.into(),
            config,
            bounds: BoundsCache::new(),
            registry_id: None,
            transform: Transform::from_position(anchor_position.unwrap_or_else(Vec3::zeros)),
            final_offset: Vec3::zeros(),
            anchor_live: anchor_position.is_some(),
            leader_line: None,
            last_placement: None,
        };

        if placer.config.use_model_bounds {
            placer.bounds.recalculate(scene, anchor);
        }
        placer.attach(registry);

        log::debug!("Created annotation '{}' on {:?}", placer.label, anchor);
        Ok(placer)
    }

    /// Compute this frame's scale, position and rotation
    ///
    /// `peers` must be the snapshot taken at the start of the frame.
    pub fn update<S: SceneQuery>(
        &mut self,
        scene: &S,
        camera: Option<&Camera>,
        peers: &PeerSnapshot,
    ) -> UpdateOutcome {
        let Some(anchor) = scene.anchor_position(self.anchor) else {
            self.anchor_live = false;
            log::trace!("Annotation '{}' skipped: anchor missing", self.label);
            return UpdateOutcome::Skipped(SkipReason::MissingAnchor);
        };
        self.anchor_live = true;

        let Some(camera) = camera else {
            log::trace!("Annotation '{}' skipped: no camera", self.label);
            return UpdateOutcome::Skipped(SkipReason::MissingCamera);
        };

        let label_scale = scale::compute_scale(
            &self.config,
            camera.distance_to(anchor),
            self.bounds.get(),
        );
        self.transform.set_uniform_scale(label_scale);

        let desired = anchor + self.config.offset;
        let context = SearchContext {
            self_id: self.registry_id,
            peers,
            camera_position: camera.position,
            occlusion: scene,
        };
        let best = AvoidanceSearch::new(&self.config).find_position(anchor, desired, &context);
        self.final_offset = best.position - anchor;

        let push = occlusion::nudge(&self.config, scene, anchor, best.position, camera.position);
        self.final_offset += push;

        let position = anchor + self.final_offset;
        self.transform.position = position;
        self.transform.rotation = orient::orient(camera.forward());
        self.leader_line = Some(LeaderLine {
            start: anchor,
            end: position,
            width: self.config.leader_line_width * label_scale,
        });

        let placement = Placement {
            position,
            scale: label_scale,
            score: best.score,
            nudged: push != Vec3::zeros(),
        };
        self.last_placement = Some(placement);
        UpdateOutcome::Placed(placement)
    }

    /// Re-apply `anchor + offset` and face the camera
    ///
    /// Uses the offset from this frame's [`update`](Self::update).
    pub fn late_update<G: GeometryQuery + ?Sized>(
        &mut self,
        scene: &G,
        camera: Option<&Camera>,
    ) -> UpdateOutcome {
        let Some(anchor) = scene.anchor_position(self.anchor) else {
            return UpdateOutcome::Skipped(SkipReason::MissingAnchor);
        };
        let Some(camera) = camera else {
            return UpdateOutcome::Skipped(SkipReason::MissingCamera);
        };
        let Some(last) = self.last_placement else {
            return UpdateOutcome::Skipped(SkipReason::NotPlaced);
        };

        self.transform.position = anchor + self.final_offset;
        self.transform.rotation = orient::orient(camera.forward());

        UpdateOutcome::Placed(Placement {
            position: self.transform.position,
            ..last
        })
    }

    /// Publish the current position to the registry
    pub fn commit(&self, registry: &mut AnnotationRegistry) {
        if let Some(id) = self.registry_id {
            registry.commit(id, self.transform.position, self.anchor_live);
        }
    }

    /// Join the registry if not already registered
    pub fn attach(&mut self, registry: &mut AnnotationRegistry) {
        let registered = self.registry_id.is_some_and(|id| registry.contains(id));
        if !registered {
            self.registry_id = Some(registry.register(self.transform.position, self.anchor_live));
        }
    }

    /// Leave the registry
    pub fn detach(&mut self, registry: &mut AnnotationRegistry) {
        if let Some(id) = self.registry_id.take() {
            registry.unregister(id);
        }
    }

    /// Replace the configuration
    ///
    /// Recomputes bounds when model-based scaling is enabled and drops them
    /// otherwise. The old configuration is kept if the new one is invalid.
    pub fn reconfigure<G: GeometryQuery + ?Sized>(
        &mut self,
        config: AnnotationConfig,
        scene: &G,
    ) -> Result<(), AnnotationError> {
        config.validate()?;
        self.config = config;

        if self.config.use_model_bounds {
            self.bounds.recalculate(scene, self.anchor);
        } else {
            self.bounds.invalidate();
        }
        Ok(())
    }

    /// Recompute the cached bounds, for example after a model swap
    ///
    /// Does nothing when model-based scaling is disabled.
    pub fn recalculate_bounds<G: GeometryQuery + ?Sized>(&mut self, scene: &G) {
        if self.config.use_model_bounds {
            self.bounds.recalculate(scene, self.anchor);
        }
    }

    /// Queue this frame's gizmos: avoidance radius, cached bounds, leader
    /// line and anchor marker
    pub fn draw_gizmos(&self, debug: &mut DebugDrawSystem) {
        if !self.anchor_live {
            return;
        }

        debug.draw_sphere(self.transform.position, self.config.avoidance_radius, colors::YELLOW, 0.0);
        if self.config.use_model_bounds {
            if let Some(bounds) = self.bounds.get() {
                debug.draw_aabb(bounds, colors::GREEN, 0.0);
            }
        }
        if let Some(line) = self.leader_line {
            debug.draw_line(line.start, line.end, colors::WHITE, 0.0);
            debug.draw_point(line.start, ANCHOR_MARKER_SIZE, colors::RED, 0.0);
        }
    }

    /// Anchor this label is attached to
    pub fn anchor(&self) -> AnchorHandle {
        self.anchor
    }

    /// Label text
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Current configuration
    pub fn config(&self) -> &AnnotationConfig {
        &self.config
    }

    /// Registry key while attached
    pub fn registry_id(&self) -> Option<AnnotationId> {
        self.registry_id
    }

    /// Current world position
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Current uniform scale
    pub fn scale(&self) -> f32 {
        self.transform.scale.x
    }

    /// Full pose: position, rotation and scale
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Offset from the anchor chosen by the last update
    pub fn final_offset(&self) -> Vec3 {
        self.final_offset
    }

    /// Cached geometry bounds
    pub fn bounds(&self) -> Option<&AABB> {
        self.bounds.get()
    }

    /// Leader line from the last update
    pub fn leader_line(&self) -> Option<LeaderLine> {
        self.leader_line
    }

    /// Result of the last successful update
    pub fn last_placement(&self) -> Option<Placement> {
        self.last_placement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug::DebugShape;
    use crate::physics::CollisionLayers;
    use crate::scene::SimpleScene;
    use approx::assert_relative_eq;

    fn camera_at(position: Vec3) -> Camera {
        Camera::perspective(position, 60.0, 16.0 / 9.0, 0.1, 100.0).looking_at(Vec3::zeros())
    }

    #[test]
    fn test_new_registers_at_anchor() {
        let mut scene = SimpleScene::new();
        let anchor = scene.add_anchor(Vec3::new(1.0, 2.0, 3.0));
        let mut registry = AnnotationRegistry::new();

        let placer = AnnotationPlacer::new(anchor, "Fan", AnnotationConfig::new(), &scene, &mut registry).unwrap();

        let id = placer.registry_id().unwrap();
        assert_eq!(registry.position(id), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert!(placer.bounds().is_some());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut scene = SimpleScene::new();
        let anchor = scene.add_anchor(Vec3::zeros());
        let mut registry = AnnotationRegistry::new();
        let config = AnnotationConfig::new().with_scale_distance(-1.0);

        let result = AnnotationPlacer::new(anchor, "Bad", config, &scene, &mut registry);
        assert!(matches!(result, Err(AnnotationError::InvalidConfig(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_missing_camera_is_a_no_op() {
        let mut scene = SimpleScene::new();
        let anchor = scene.add_anchor(Vec3::zeros());
        let mut registry = AnnotationRegistry::new();
        let mut placer = AnnotationPlacer::new(anchor, "A", AnnotationConfig::new(), &scene, &mut registry).unwrap();

        let outcome = placer.update(&scene, None, &registry.snapshot());
        assert_eq!(outcome, UpdateOutcome::Skipped(SkipReason::MissingCamera));
        assert_eq!(placer.position(), Vec3::zeros());
    }

    #[test]
    fn test_missing_anchor_keeps_last_pose() {
        let mut scene = SimpleScene::new();
        let anchor = scene.add_anchor(Vec3::zeros());
        let mut registry = AnnotationRegistry::new();
        let mut placer = AnnotationPlacer::new(anchor, "A", AnnotationConfig::new(), &scene, &mut registry).unwrap();
        let camera = camera_at(Vec3::new(0.0, 0.0, -10.0));

        assert!(placer.update(&scene, Some(&camera), &registry.snapshot()).is_placed());
        let before = placer.position();

        scene.remove_anchor(anchor);
        let outcome = placer.update(&scene, Some(&camera), &registry.snapshot());
        assert_eq!(outcome, UpdateOutcome::Skipped(SkipReason::MissingAnchor));
        assert_eq!(placer.late_update(&scene, Some(&camera)), UpdateOutcome::Skipped(SkipReason::MissingAnchor));
        assert_eq!(placer.position(), before);

        placer.commit(&mut registry);
        let snapshot = registry.snapshot();
        assert!(snapshot.iter().all(|peer| !peer.anchor_live));
    }

    #[test]
    fn test_late_update_follows_moving_anchor() {
        let mut scene = SimpleScene::new();
        let anchor = scene.add_anchor(Vec3::zeros());
        let mut registry = AnnotationRegistry::new();
        let config = AnnotationConfig::new().with_model_bounds(false, 1.0);
        let mut placer = AnnotationPlacer::new(anchor, "A", config, &scene, &mut registry).unwrap();
        let camera = camera_at(Vec3::new(0.0, 0.0, -10.0));

        placer.update(&scene, Some(&camera), &registry.snapshot());
        scene.set_anchor_position(anchor, Vec3::new(1.0, 0.0, 0.0));
        placer.late_update(&scene, Some(&camera));

        assert_relative_eq!(placer.position(), Vec3::new(1.0, 0.3, 0.0), epsilon = 1e-6);
        assert_relative_eq!(placer.transform().forward(), camera.forward(), epsilon = 1e-5);
    }

    #[test]
    fn test_leader_line_width_follows_scale() {
        let mut scene = SimpleScene::new();
        let anchor = scene.add_anchor(Vec3::zeros());
        let mut registry = AnnotationRegistry::new();
        let config = AnnotationConfig::new().with_model_bounds(false, 1.0);
        let mut placer = AnnotationPlacer::new(anchor, "A", config, &scene, &mut registry).unwrap();
        let camera = camera_at(Vec3::new(0.0, 0.0, -5.0));

        placer.update(&scene, Some(&camera), &registry.snapshot());

        let line = placer.leader_line().unwrap();
        assert_relative_eq!(line.start, Vec3::zeros());
        assert_relative_eq!(line.end, placer.position());
        assert_relative_eq!(line.width, 0.005 * placer.scale(), epsilon = 1e-7);
        assert_relative_eq!(placer.scale(), 0.65, epsilon = 1e-5);
    }

    #[test]
    fn test_occluded_anchor_is_nudged() {
        let mut scene = SimpleScene::new();
        let anchor = scene.add_anchor(Vec3::zeros());
        // Thin wall in front of the anchor only; candidates above it see past
        scene.add_obstacle(
            AABB::from_center_extents(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.05, 0.05, 0.05)),
            CollisionLayers::ENVIRONMENT,
        );
        let mut registry = AnnotationRegistry::new();
        let config = AnnotationConfig::new().with_obstruction_mask(CollisionLayers::ENVIRONMENT);
        let mut placer = AnnotationPlacer::new(anchor, "A", config, &scene, &mut registry).unwrap();
        let camera = camera_at(Vec3::new(0.0, 0.0, -10.0));

        let UpdateOutcome::Placed(placement) = placer.update(&scene, Some(&camera), &registry.snapshot()) else {
            panic!("expected a placement");
        };

        assert!(placement.nudged);
        assert_relative_eq!(placer.final_offset().y, 0.3, epsilon = 1e-6);
        assert_relative_eq!(placer.final_offset().x.abs(), 0.2, epsilon = 1e-3);
    }

    #[test]
    fn test_detach_and_attach() {
        let mut scene = SimpleScene::new();
        let anchor = scene.add_anchor(Vec3::zeros());
        let mut registry = AnnotationRegistry::new();
        let mut placer = AnnotationPlacer::new(anchor, "A", AnnotationConfig::new(), &scene, &mut registry).unwrap();

        placer.detach(&mut registry);
        assert!(registry.is_empty());
        assert!(placer.registry_id().is_none());

        placer.attach(&mut registry);
        placer.attach(&mut registry);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reconfigure_toggles_bounds() {
        let mut scene = SimpleScene::new();
        let anchor = scene.add_anchor(Vec3::zeros());
        let mut registry = AnnotationRegistry::new();
        let config = AnnotationConfig::new().with_model_bounds(false, 1.0);
        let mut placer = AnnotationPlacer::new(anchor, "A", config.clone(), &scene, &mut registry).unwrap();
        assert!(placer.bounds().is_none());

        placer.reconfigure(config.clone().with_model_bounds(true, 1.0), &scene).unwrap();
        assert!(placer.bounds().is_some());

        assert!(placer.reconfigure(config.with_scale_range(1.0, 0.5), &scene).is_err());
        assert!(placer.config().use_model_bounds);
    }

    #[test]
    fn test_gizmos() {
        let mut scene = SimpleScene::new();
        let anchor = scene.add_anchor(Vec3::zeros());
        let mut registry = AnnotationRegistry::new();
        let mut placer = AnnotationPlacer::new(anchor, "A", AnnotationConfig::new(), &scene, &mut registry).unwrap();
        let camera = camera_at(Vec3::new(0.0, 0.0, -10.0));
        placer.update(&scene, Some(&camera), &registry.snapshot());

        let mut debug = DebugDrawSystem::new();
        placer.draw_gizmos(&mut debug);
        // radius sphere, bounds box, leader line, anchor marker
        assert_eq!(debug.shape_count(), 4);
        assert!(debug.shapes().any(|shape| matches!(
            shape,
            DebugShape::Point { position, color, .. } if *position == Vec3::zeros() && *color == colors::RED
        )));
    }

    #[test]
    fn test_late_update_carries_update_results() {
        let mut scene = SimpleScene::new();
        let anchor = scene.add_anchor(Vec3::zeros());
        scene.add_obstacle(
            AABB::from_center_extents(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.05, 0.05, 0.05)),
            CollisionLayers::ENVIRONMENT,
        );
        let mut registry = AnnotationRegistry::new();
        let config = AnnotationConfig::new().with_obstruction_mask(CollisionLayers::ENVIRONMENT);
        let mut placer = AnnotationPlacer::new(anchor, "A", config, &scene, &mut registry).unwrap();
        let camera = camera_at(Vec3::new(0.0, 0.0, -10.0));

        assert_eq!(
            placer.late_update(&scene, Some(&camera)),
            UpdateOutcome::Skipped(SkipReason::NotPlaced)
        );

        let UpdateOutcome::Placed(placed) = placer.update(&scene, Some(&camera), &registry.snapshot()) else {
            panic!("expected a placement");
        };
        let UpdateOutcome::Placed(late) = placer.late_update(&scene, Some(&camera)) else {
            panic!("expected a placement");
        };

        assert!(late.nudged);
        assert_eq!(late, placed);
        assert_eq!(placer.last_placement(), Some(placed));
    }
}
