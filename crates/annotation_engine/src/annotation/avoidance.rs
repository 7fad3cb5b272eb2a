//! # Avoidance Search
//!
//! Brute-force search for a label position near its anchor that keeps clear
//! of other labels and stays visible to the camera.
//!
//! ## Candidate Enumeration
//!
//! The desired position is scored first. After it, `avoidance_steps` azimuth
//! directions are sampled around the anchor, and along each direction the
//! distances `0.1, 0.3, 0.5, ...` up to `max_avoidance_distance`. Every
//! candidate sits at the configured vertical offset above the anchor.
//!
//! ## Scoring
//!
//! ```text
//! score(P) = -2 * |P - D|
//!            - sum over peers q with |P - q| < r of 10 * (r - |P - q|)
//!            - 5 if the ray from P to the camera is blocked
//! ```
//!
//! The best score wins. Ties keep the earliest candidate, so results are
//! fully determined by the inputs.

use crate::annotation::registry::{AnnotationId, PeerSnapshot};
use crate::core::config::AnnotationConfig;
use crate::foundation::math::{Vec3, WORLD_UP};
use crate::physics::Ray;
use crate::scene::OcclusionQuery;

/// Distance of the first sample along each direction
pub const START_DISTANCE: f32 = 0.1;
/// Spacing between samples along a direction
pub const DISTANCE_STEP: f32 = 0.2;
/// Weight of the distance from the desired position
pub const DESIRED_DISTANCE_WEIGHT: f32 = 2.0;
/// Weight of peer overlap inside the avoidance radius
pub const OVERLAP_WEIGHT: f32 = 10.0;
/// Flat penalty for a candidate hidden from the camera
pub const OBSTRUCTION_PENALTY: f32 = 5.0;

/// Per-frame inputs the search reads but does not own
pub struct SearchContext<'a> {
    /// Registry key of the annotation being placed
    pub self_id: Option<AnnotationId>,
    /// Peers as of the start of the frame
    pub peers: &'a PeerSnapshot,
    /// Camera position in world space
    pub camera_position: Vec3,
    /// Host occlusion test
    pub occlusion: &'a dyn OcclusionQuery,
}

/// Winning candidate of a search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// World position
    pub position: Vec3,
    /// Score the position achieved
    pub score: f32,
}

/// Position search for one annotation's configuration
pub struct AvoidanceSearch<'a> {
    config: &'a AnnotationConfig,
}

impl<'a> AvoidanceSearch<'a> {
    /// Create a search over `config`'s radius, steps and distance
    pub fn new(config: &'a AnnotationConfig) -> Self {
        Self { config }
    }

    /// Direction of sample `index` around the vertical axis
    ///
    /// Index 0 points along world +Z, increasing indices turn toward +X.
    pub fn direction(&self, index: u32) -> Vec3 {
        sample_direction(self.config.avoidance_steps, index)
    }

    /// Sample distances along one direction
    pub fn distances(&self) -> impl Iterator<Item = f32> {
        sample_distances(self.config.max_avoidance_distance)
    }

    /// Every candidate around `anchor`, in enumeration order
    ///
    /// Does not include the desired position itself.
    pub fn candidates(&self, anchor: Vec3) -> impl Iterator<Item = Vec3> {
        let steps = self.config.avoidance_steps;
        let max_distance = self.config.max_avoidance_distance;
        let lift = WORLD_UP * self.config.offset.y;

        (0..steps).flat_map(move |index| {
            let direction = sample_direction(steps, index);
            sample_distances(max_distance).map(move |distance| anchor + direction * distance + lift)
        })
    }

    /// Best position for a label anchored at `anchor` that wants `desired`
    pub fn find_position(&self, anchor: Vec3, desired: Vec3, context: &SearchContext<'_>) -> Candidate {
        let mut best = Candidate {
            position: desired,
            score: self.score_position(desired, desired, context),
        };

        for position in self.candidates(anchor) {
            let score = self.score_position(position, desired, context);
            if score > best.score {
                best = Candidate { position, score };
            }
        }

        log::trace!(
            "Avoidance picked {:?} (score {:.3}) for desired {:?}",
            best.position,
            best.score,
            desired
        );
        best
    }

    /// Score of `candidate` relative to `desired`, higher is better
    pub fn score_position(&self, candidate: Vec3, desired: Vec3, context: &SearchContext<'_>) -> f32 {
        let mut score = -DESIRED_DISTANCE_WEIGHT * (candidate - desired).magnitude();

        let radius = self.config.avoidance_radius;
        for peer in context.peers.competitors(context.self_id) {
            let distance = (candidate - peer.position).magnitude();
            if distance < radius {
                score -= OVERLAP_WEIGHT * (radius - distance);
            }
        }

        if self.is_obstructed(candidate, context) {
            score -= OBSTRUCTION_PENALTY;
        }

        score
    }

    fn is_obstructed(&self, candidate: Vec3, context: &SearchContext<'_>) -> bool {
        let to_camera = context.camera_position - candidate;
        let Some(ray) = Ray::new(candidate, to_camera) else {
            return false;
        };
        context
            .occlusion
            .raycast_blocked(&ray, to_camera.magnitude(), self.config.obstruction_mask)
    }
}

fn sample_direction(steps: u32, index: u32) -> Vec3 {
    let angle = (360.0 / steps as f32 * index as f32).to_radians();
    Vec3::new(angle.sin(), 0.0, angle.cos())
}

fn sample_distances(max_distance: f32) -> impl Iterator<Item = f32> {
    (0u32..)
        .map(|k| START_DISTANCE + DISTANCE_STEP * k as f32)
        .take_while(move |&distance| distance <= max_distance + 1e-5)
}
