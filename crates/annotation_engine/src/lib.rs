//! # Annotation Engine
//!
//! Real-time placement of text labels attached to points on a 3D model.
//!
//! ## Features
//!
//! - **Distance Scaling**: labels shrink with camera distance and anchor size
//! - **Collision Avoidance**: labels search around their anchor for free space
//! - **Occlusion Handling**: labels hidden behind geometry move into view
//! - **Billboarding**: every label shares the camera's facing
//! - **Engine Agnostic**: the host scene is reached only through small traits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use annotation_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut scene = SimpleScene::new();
//!     let model = scene.add_model("Turbofan");
//!     scene.add_part(model, "Fan", Vec3::new(0.0, 0.0, 2.0));
//!
//!     let mut manager = AnnotationManager::new(
//!         AnnotationConfig::default(),
//!         vec![AnnotationEntry::new("Fan", "Fan Blades")],
//!     );
//!     manager.set_current_model(&scene, model);
//!     manager.spawn_annotations(&scene)?;
//!
//!     let camera = Camera::default();
//!     manager.tick(&scene, Some(&camera));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::cast_precision_loss)]

pub mod core;

pub mod annotation;
pub mod config;
pub mod debug;
pub mod foundation;
pub mod physics;
pub mod render;
pub mod scene;
pub mod ui;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        annotation::{
            AnnotationError, AnnotationManager, AnnotationPlacer, AnnotationRegistry, LabelId,
            SkipReason, SpawnReport, UpdateOutcome,
        },
        config::{Config, ConfigError},
        core::config::{AnnotationConfig, AnnotationEntry, AnnotationSettings, EngineConfig},
        debug::DebugDrawSystem,
        foundation::math::{Quat, Transform, Vec3},
        physics::{CollisionLayers, Ray},
        render::{Camera, Viewport},
        scene::{AnchorHandle, GeometryQuery, ModelHandle, OcclusionQuery, PartLookup, SimpleScene, AABB},
        ui::EdgeIndicator,
    };
}
