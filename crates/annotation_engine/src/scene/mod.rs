//! Scene-facing types
//!
//! Bridges the placement code and whatever engine owns the actual scene:
//!
//! ```text
//! Host engine (scene graph, colliders)
//!      ↓  GeometryQuery / OcclusionQuery / PartLookup
//! Annotation placement
//! ```
//!
//! [`SimpleScene`] is a self-contained implementation used by tests and the
//! demo viewer.

mod bounds;
pub mod host;
mod simple_scene;

pub use bounds::AABB;
pub use host::{AnchorHandle, GeometryQuery, ModelHandle, OcclusionQuery, PartLookup, SceneQuery};
pub use simple_scene::{Obstacle, SimpleScene};
