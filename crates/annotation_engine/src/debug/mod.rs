//! Debug visualization
//!
//! Gizmo collection for annotation placement: avoidance radii, cached
//! bounds, leader lines and anchors.

pub mod draw;

pub use draw::{colors, DebugDrawSystem, DebugShape};
