//! Debug drawing primitives and system
//!
//! Based on Game Engine Architecture 3rd Edition, Section 10.2:
//! "Debug drawing facilities allow programmers to render simple shapes like
//! lines, points, spheres and boxes for debugging and visualization purposes."
//!
//! Nothing here renders. Shapes are collected each frame and handed to the
//! host, which draws them however it likes.

use std::collections::HashMap;

use crate::foundation::math::{Vec3, Vec4};
use crate::scene::AABB;

/// Stock gizmo colors (RGBA)
pub mod colors {
    use crate::foundation::math::Vec4;

    /// Avoidance radius
    pub const YELLOW: Vec4 = Vec4::new(1.0, 0.92, 0.016, 1.0);
    /// Cached geometry bounds
    pub const GREEN: Vec4 = Vec4::new(0.0, 1.0, 0.0, 1.0);
    /// Leader lines
    pub const WHITE: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);
    /// Anchors
    pub const RED: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);
    /// Static scene obstacles
    pub const GRAY: Vec4 = Vec4::new(0.5, 0.5, 0.5, 1.0);
}

/// Wireframe primitives the host knows how to draw
#[derive(Clone, Debug, PartialEq)]
pub enum DebugShape {
    /// Line segment from start to end
    Line {
        /// First endpoint
        start: Vec3,
        /// Second endpoint
        end: Vec3,
        /// RGBA color
        color: Vec4,
    },

    /// Wire sphere
    Sphere {
        /// Sphere center
        center: Vec3,
        /// Sphere radius
        radius: f32,
        /// RGBA color
        color: Vec4,
    },

    /// Axis-aligned wire box
    Box {
        /// Box center
        center: Vec3,
        /// Full size along each axis
        size: Vec3,
        /// RGBA color
        color: Vec4,
    },

    /// Point marker
    Point {
        /// Position
        position: Vec3,
        /// Marker size in world units
        size: f32,
        /// RGBA color
        color: Vec4,
    },
}

impl DebugShape {
    /// Wire box around an AABB
    pub fn aabb(bounds: &AABB, color: Vec4) -> Self {
        Self::Box {
            center: bounds.center(),
            size: bounds.size(),
            color,
        }
    }
}

#[derive(Clone, Debug)]
struct TimedShape {
    shape: DebugShape,
    remaining: f32,
}

/// Debug drawing system for collecting debug shapes
///
/// GEA 10.2: "Debug rendering systems typically support both temporary shapes
/// (which expire after a certain time) and persistent shapes (which remain
/// until explicitly removed)."
///
/// A duration of zero keeps a temporary shape for exactly one frame.
#[derive(Debug)]
pub struct DebugDrawSystem {
    temporary: Vec<TimedShape>,
    persistent: HashMap<String, DebugShape>,

    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugDrawSystem {
    /// Create an enabled system with no shapes
    pub fn new() -> Self {
        Self {
            temporary: Vec::new(),
            persistent: HashMap::new(),
            enabled: true,
        }
    }

    /// Queue a temporary shape
    pub fn draw(&mut self, shape: DebugShape, duration: f32) {
        if self.enabled {
            self.temporary.push(TimedShape {
                shape,
                remaining: duration,
            });
        }
    }

    /// Queue a temporary line
    pub fn draw_line(&mut self, start: Vec3, end: Vec3, color: Vec4, duration: f32) {
        self.draw(DebugShape::Line { start, end, color }, duration);
    }

    /// Queue a temporary wire sphere
    pub fn draw_sphere(&mut self, center: Vec3, radius: f32, color: Vec4, duration: f32) {
        self.draw(DebugShape::Sphere { center, radius, color }, duration);
    }

    /// Queue a temporary wire box
    pub fn draw_aabb(&mut self, bounds: &AABB, color: Vec4, duration: f32) {
        self.draw(DebugShape::aabb(bounds, color), duration);
    }

    /// Queue a temporary point marker
    pub fn draw_point(&mut self, position: Vec3, size: f32, color: Vec4, duration: f32) {
        self.draw(DebugShape::Point { position, size, color }, duration);
    }

    /// Keep a shape until it is cleared by `id`
    pub fn draw_persistent(&mut self, id: impl Into<String>, shape: DebugShape) {
        if self.enabled {
            self.persistent.insert(id.into(), shape);
        }
    }

    /// Remove a persistent shape
    pub fn clear_persistent(&mut self, id: &str) {
        self.persistent.remove(id);
    }

    /// Age temporary shapes and drop the expired ones
    pub fn update(&mut self, delta_time: f32) {
        self.temporary.retain_mut(|timed| {
            timed.remaining -= delta_time;
            timed.remaining > 0.0
        });
    }

    /// Every shape to draw this frame
    pub fn shapes(&self) -> impl Iterator<Item = &DebugShape> {
        let visible = self.enabled;
        self.temporary
            .iter()
            .map(|timed| &timed.shape)
            .chain(self.persistent.values())
            .filter(move |_| visible)
    }

    /// Number of shapes held
    pub fn shape_count(&self) -> usize {
        self.temporary.len() + self.persistent.len()
    }

    /// Drop every shape
    pub fn clear(&mut self) {
        self.temporary.clear();
        self.persistent.clear();
    }
}

impl Default for DebugDrawSystem {
    fn default() -> Self {
        Self::new()
    }
}
