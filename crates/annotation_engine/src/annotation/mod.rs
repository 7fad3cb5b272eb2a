//! # Annotation Placement
//!
//! Places text labels next to anchor points in a 3D scene so that they stay
//! readable: scaled by camera distance, kept apart from each other, pushed
//! out from behind occluders and turned to face the viewer.
//!
//! ## Frame Flow
//!
//! ```text
//! registry.snapshot()
//!      ↓
//! for each label: placer.update(scene, camera, &snapshot)
//!      scale::compute_scale → avoidance::find_position → occlusion::nudge
//!      ↓
//! for each label: placer.commit(&mut registry)
//!      ↓
//! for each label: placer.late_update(scene, camera)   (orient)
//! ```
//!
//! [`manager::AnnotationManager`] drives this loop for a set of labels spawned
//! from configuration. Single labels can be driven by hand through
//! [`placer::AnnotationPlacer`].

pub mod avoidance;
pub mod bounds_cache;
pub mod manager;
pub mod occlusion;
pub mod orient;
pub mod placer;
pub mod registry;
pub mod scale;


use thiserror::Error;

use crate::config::ConfigError;

pub use manager::{AnnotationManager, FrameReport, LabelId, SpawnReport};
pub use placer::{AnnotationPlacer, LeaderLine, Placement, SkipReason, UpdateOutcome};
pub use registry::{AnnotationId, AnnotationRegistry, Peer, PeerSnapshot};

/// Annotation errors
#[derive(Error, Debug)]
pub enum AnnotationError {
    /// Spawning was requested before a model was set
    #[error("No model set, cannot spawn annotations")]
    NoModel,

    /// Configuration failed validation
    #[error("Invalid annotation configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// A label handle that is not (or no longer) managed
    #[error("Unknown annotation: {0:?}")]
    UnknownAnnotation(LabelId),
}
