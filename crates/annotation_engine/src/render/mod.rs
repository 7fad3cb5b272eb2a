//! Camera and billboard math
//!
//! No drawing happens here; these are the view-dependent calculations the
//! placement code shares with whatever renders the labels.

pub mod camera;
pub mod orientation;

pub use camera::{Camera, ScreenPoint, Viewport};
pub use orientation::forward_aligned_rotation;
