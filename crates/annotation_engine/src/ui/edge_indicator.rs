//! Screen-edge arrow pointing at an off-screen target

use crate::foundation::math::{utils, Vec2, Vec3};
use crate::render::{Camera, Viewport};

/// Where to draw the arrow this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorPlacement {
    /// Pixel position, origin at the top-left
    pub screen_position: Vec2,
    /// Arrow rotation in degrees around the screen normal
    pub rotation_degrees: f32,
    /// Whether the target is behind the camera
    pub behind_camera: bool,
}

/// Arrow that tracks a world-space target from the screen edge
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeIndicator {
    /// Keep the arrow inside the screen
    pub clamp_to_screen_edge: bool,
    /// Distance in pixels from each screen edge when clamping
    pub edge_buffer: f32,
}

impl EdgeIndicator {
    /// Create an indicator that clamps to the screen with a 50 pixel buffer
    pub fn new() -> Self {
        Self {
            clamp_to_screen_edge: true,
            edge_buffer: 50.0,
        }
    }

    /// Builder: set the edge buffer in pixels
    pub fn with_edge_buffer(mut self, pixels: f32) -> Self {
        self.edge_buffer = pixels;
        self
    }

    /// Builder: enable or disable clamping
    pub fn with_clamping(mut self, enabled: bool) -> Self {
        self.clamp_to_screen_edge = enabled;
        self
    }

    /// Arrow placement for `target`
    ///
    /// Targets behind the camera are mirrored so the arrow stays on the side
    /// the viewer has to turn to. The rotation is the target's heading from
    /// the camera around the vertical axis.
    pub fn place(&self, target: Vec3, camera: &Camera, viewport: Viewport) -> IndicatorPlacement {
        let projected = camera.world_to_screen(target, viewport);
        let behind_camera = projected.depth < 0.0;

        let mut screen_position = Vec2::new(projected.x, projected.y);
        if behind_camera {
            screen_position = -screen_position;
        }

        if self.clamp_to_screen_edge {
            screen_position.x = clamp_to_span(screen_position.x, self.edge_buffer, viewport.width);
            screen_position.y = clamp_to_span(screen_position.y, self.edge_buffer, viewport.height);
        }

        let heading = (target - camera.position)
            .try_normalize(1e-6)
            .map_or(0.0, |dir| dir.x.atan2(dir.z));

        IndicatorPlacement {
            screen_position,
            rotation_degrees: -utils::rad_to_deg(heading),
            behind_camera,
        }
    }
}

impl Default for EdgeIndicator {
    fn default() -> Self {
        Self::new()
    }
}

/// Clamp into `[buffer, extent - buffer]`, centring if the span is inverted
fn clamp_to_span(value: f32, buffer: f32, extent: f32) -> f32 {
    let (low, high) = (buffer, extent - buffer);
    if low > high {
        return extent * 0.5;
    }
    utils::clamp(value, low, high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> Camera {
        Camera::perspective(Vec3::zeros(), 60.0, 16.0 / 9.0, 0.1, 100.0).looking_at(Vec3::new(0.0, 0.0, 1.0))
    }

    #[test]
    fn test_target_ahead_is_centred_and_unrotated() {
        let viewport = Viewport::new(1920.0, 1080.0);
        let placement = EdgeIndicator::new().place(Vec3::new(0.0, 0.0, 5.0), &camera(), viewport);

        assert!(!placement.behind_camera);
        assert_relative_eq!(placement.screen_position, Vec2::new(960.0, 540.0), epsilon = 1e-2);
        assert_relative_eq!(placement.rotation_degrees, 0.0);
    }

    #[test]
    fn test_far_right_target_clamps_to_edge() {
        let viewport = Viewport::new(1920.0, 1080.0);
        // Looking down +Z in a right-handed frame, screen right is world -X
        let placement = EdgeIndicator::new().place(Vec3::new(-50.0, 0.0, 1.0), &camera(), viewport);

        assert_relative_eq!(placement.screen_position.x, 1870.0);
        assert!(placement.rotation_degrees > 80.0);
    }

    #[test]
    fn test_behind_camera_is_flagged_and_clamped() {
        let viewport = Viewport::new(800.0, 600.0);
        let placement = EdgeIndicator::new()
            .with_edge_buffer(20.0)
            .place(Vec3::new(1.0, 0.0, -5.0), &camera(), viewport);

        assert!(placement.behind_camera);
        assert!((20.0..=780.0).contains(&placement.screen_position.x));
        assert!((20.0..=580.0).contains(&placement.screen_position.y));
    }

    #[test]
    fn test_unclamped_position_is_raw_projection() {
        let viewport = Viewport::new(1920.0, 1080.0);
        let placement = EdgeIndicator::new()
            .with_clamping(false)
            .place(Vec3::new(-50.0, 0.0, 1.0), &camera(), viewport);
        assert!(placement.screen_position.x > 1920.0);
    }

    #[test]
    fn test_oversized_buffer_centres() {
        assert_relative_eq!(clamp_to_span(10.0, 600.0, 1000.0), 500.0);
    }
}
