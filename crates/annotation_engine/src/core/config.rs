//! # Unified Configuration
//!
//! All configuration structures in one place: per-label placement tuning,
//! the list of labels to spawn, and process-level settings.
//!
//! ## Configuration Categories
//!
//! - **Annotation Config**: scaling, avoidance and occlusion tuning shared by
//!   every label the manager spawns
//! - **Annotation Entries**: which model parts get a label and its text
//! - **Engine Config**: logging and debug features
//!
//! Every field has a default, so a settings file only needs to name what
//! it changes.

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::foundation::math::Vec3;
use crate::physics::CollisionLayers;

/// # Annotation Configuration
///
/// Per-label placement parameters. Supplied at construction and immutable
/// afterwards unless a placer is explicitly reconfigured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Natural label offset from its anchor
    pub offset: Vec3,
    /// Smallest scale, reached at `scale_distance` and beyond
    pub min_scale: f32,
    /// Largest scale, used when the camera is at the anchor
    pub max_scale: f32,
    /// Camera distance at which the label reaches `min_scale`
    pub scale_distance: f32,
    /// Scale by the anchor's geometry size as well as camera distance
    pub use_model_bounds: bool,
    /// Factor applied to the largest bounds dimension before clamping
    pub model_size_multiplier: f32,
    /// Sideways push applied when the anchor is occluded from the camera
    pub label_push_distance: f32,
    /// Layers that count as obstructions for occlusion rays
    pub obstruction_mask: CollisionLayers,
    /// Peers closer than this to a candidate position are penalised
    pub avoidance_radius: f32,
    /// Farthest candidate distance from the anchor
    pub max_avoidance_distance: f32,
    /// Number of directions sampled around the anchor
    pub avoidance_steps: u32,
    /// Leader line width at scale 1.0
    pub leader_line_width: f32,
}

impl AnnotationConfig {
    /// Create a configuration with the stock tuning
    pub fn new() -> Self {
        Self {
            offset: Vec3::new(0.0, 0.3, 0.0),
            min_scale: 0.3,
            max_scale: 1.0,
            scale_distance: 10.0,
            use_model_bounds: true,
            model_size_multiplier: 1.0,
            label_push_distance: 0.2,
            obstruction_mask: CollisionLayers::empty(),
            avoidance_radius: 0.5,
            max_avoidance_distance: 2.0,
            avoidance_steps: 8,
            leader_line_width: 0.005,
        }
    }

    /// Set the natural offset from the anchor
    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Set the scale range
    pub fn with_scale_range(mut self, min_scale: f32, max_scale: f32) -> Self {
        self.min_scale = min_scale;
        self.max_scale = max_scale;
        self
    }

    /// Set the distance at which the label reaches its minimum scale
    pub fn with_scale_distance(mut self, distance: f32) -> Self {
        self.scale_distance = distance;
        self
    }

    /// Enable or disable geometry-size scaling
    pub fn with_model_bounds(mut self, enabled: bool, multiplier: f32) -> Self {
        self.use_model_bounds = enabled;
        self.model_size_multiplier = multiplier;
        self
    }

    /// Set the occlusion push distance
    pub fn with_push_distance(mut self, distance: f32) -> Self {
        self.label_push_distance = distance;
        self
    }

    /// Set the layers that block occlusion rays
    pub fn with_obstruction_mask(mut self, mask: CollisionLayers) -> Self {
        self.obstruction_mask = mask;
        self
    }

    /// Configure the avoidance search
    pub fn with_avoidance(mut self, radius: f32, max_distance: f32, steps: u32) -> Self {
        self.avoidance_radius = radius;
        self.max_avoidance_distance = max_distance;
        self.avoidance_steps = steps;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("offset.x", self.offset.x),
            ("offset.y", self.offset.y),
            ("offset.z", self.offset.z),
            ("min_scale", self.min_scale),
            ("max_scale", self.max_scale),
            ("scale_distance", self.scale_distance),
            ("model_size_multiplier", self.model_size_multiplier),
            ("label_push_distance", self.label_push_distance),
            ("avoidance_radius", self.avoidance_radius),
            ("max_avoidance_distance", self.max_avoidance_distance),
            ("leader_line_width", self.leader_line_width),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::Invalid(format!("{name} must be finite")));
        }

        if self.min_scale < 0.0 {
            return Err(ConfigError::Invalid("min_scale cannot be negative".to_string()));
        }
        if self.min_scale > self.max_scale {
            return Err(ConfigError::Invalid(format!(
                "min_scale ({}) exceeds max_scale ({})",
                self.min_scale, self.max_scale
            )));
        }
        if self.scale_distance <= 0.0 {
            return Err(ConfigError::Invalid("scale_distance must be positive".to_string()));
        }
        if self.avoidance_steps == 0 {
            return Err(ConfigError::Invalid("avoidance_steps must be at least 1".to_string()));
        }
        if self.avoidance_radius < 0.0 || self.max_avoidance_distance < 0.0 {
            return Err(ConfigError::Invalid("avoidance distances cannot be negative".to_string()));
        }

        Ok(())
    }
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A label to spawn on a named model part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationEntry {
    /// Part name to look up in the current model
    pub part_name: String,
    /// Text shown on the label
    pub label: String,
}

impl AnnotationEntry {
    /// Create an entry
    pub fn new(part_name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            part_name: part_name.into(),
            label: label.into(),
        }
    }
}

/// # Engine Configuration
///
/// Process-level behavior: logging and debug features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log level filter (overridden by `RUST_LOG`)
    pub log_level: String,
    /// Emit avoidance/bounds gizmos each frame
    pub debug_gizmos: bool,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            debug_gizmos: cfg!(debug_assertions),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable debug gizmos
    pub fn with_debug_gizmos(mut self, enabled: bool) -> Self {
        self.debug_gizmos = enabled;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Annotation Settings
///
/// Top-level configuration an application loads from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnnotationSettings {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Placement tuning shared by every spawned label
    pub annotation: AnnotationConfig,
    /// Labels to spawn, in order
    pub entries: Vec<AnnotationEntry>,
}

impl AnnotationSettings {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.annotation.validate()?;

        if let Some(entry) = self.entries.iter().find(|entry| entry.part_name.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "entry with label '{}' has an empty part name",
                entry.label
            )));
        }

        Ok(())
    }
}

impl Config for AnnotationSettings {}
