//! Physics-side primitives used by occlusion queries
//!
//! Only the pieces the placement code needs: rays and layer filtering. The
//! actual ray casting is answered by the host through
//! [`crate::scene::OcclusionQuery`].

pub mod collision_layers;
pub mod ray;

pub use collision_layers::CollisionLayers;
pub use ray::Ray;
