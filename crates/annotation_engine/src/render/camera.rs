//! # Camera
//!
//! Read-only view of the host camera: where it is, where it looks, and how
//! it projects world points onto the screen.
//!
//! ## Conventions
//! - World space is Y-up right-handed.
//! - Screen space is in pixels with the origin at the top-left corner,
//!   X to the right and Y down.
//! - Projected depth is the distance along the view direction; negative
//!   depth means the point is behind the camera.

use crate::foundation::math::{Mat4, Mat4Ext, Vec3, Vec4, WORLD_UP, utils};

/// Viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl Viewport {
    /// Create a viewport from pixel dimensions
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width divided by height
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1920.0, 1080.0)
    }
}

/// A world point projected onto the screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// Pixel X (left to right)
    pub x: f32,
    /// Pixel Y (top to bottom)
    pub y: f32,
    /// Distance along the view direction, negative behind the camera
    pub depth: f32,
}

/// 3D perspective camera
///
/// Position, orientation, and projection parameters. The placement code
/// only reads it; the host updates it every frame.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Field of view angle in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a new perspective camera with standard Y-up orientation
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    ///
    /// The camera looks at the origin until told otherwise.
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: WORLD_UP,
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Builder: look at a point with the world up vector
    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Update camera target (look-at point)
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        log::trace!("Camera target updated to: {:?}", target);
    }

    /// Unit view direction
    ///
    /// Falls back to world +Z when position and target coincide.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position)
            .try_normalize(1e-6)
            .unwrap_or_else(|| Vec3::new(0.0, 0.0, 1.0))
    }

    /// Distance from the camera to a world point
    pub fn distance_to(&self, point: Vec3) -> f32 {
        (point - self.position).magnitude()
    }

    /// Generate view matrix for world-to-camera space transformation
    pub fn get_view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// Generate perspective projection matrix
    pub fn get_projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// Generate combined view-projection matrix: P × F × V
    ///
    /// F flips Y and Z so that clip-space W carries the view depth and
    /// NDC Y grows down the screen.
    pub fn get_view_projection_matrix(&self) -> Mat4 {
        self.get_projection_matrix() * Mat4::clip_space_flip() * self.get_view_matrix()
    }

    /// Project a world point to pixel coordinates
    ///
    /// Points behind the camera come back mirrored through the screen
    /// centre with a negative depth; callers decide how to treat them.
    /// A point exactly on the camera plane projects to the screen centre.
    pub fn world_to_screen(&self, point: Vec3, viewport: Viewport) -> ScreenPoint {
        let clip = self.get_view_projection_matrix() * Vec4::new(point.x, point.y, point.z, 1.0);
        let depth = clip.w;

        let (ndc_x, ndc_y) = if depth.abs() > f32::EPSILON {
            (clip.x / depth, clip.y / depth)
        } else {
            (0.0, 0.0)
        };

        ScreenPoint {
            x: (ndc_x + 1.0) * 0.5 * viewport.width,
            y: (ndc_y + 1.0) * 0.5 * viewport.height,
            depth,
        }
    }
}

impl Default for Camera {
    /// Default perspective camera
    ///
    /// - Position: (0, 3, 3), looking at the origin
    /// - FOV: 45 degrees, aspect 16:9
    /// - Near: 0.1, Far: 1000.0
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 3.0, 3.0),
            target: Vec3::zeros(),
            up: WORLD_UP,
            fov: std::f32::consts::FRAC_PI_4,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera_facing_positive_z() -> Camera {
        Camera::perspective(Vec3::new(0.0, 0.0, -10.0), 60.0, 16.0 / 9.0, 0.1, 100.0)
            .looking_at(Vec3::zeros())
    }

    #[test]
    fn test_forward_points_at_target() {
        let camera = camera_facing_positive_z();
        assert_relative_eq!(camera.forward(), Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_target_projects_to_screen_centre() {
        let camera = camera_facing_positive_z();
        let viewport = Viewport::new(1920.0, 1080.0);
        let screen = camera.world_to_screen(Vec3::zeros(), viewport);

        assert_relative_eq!(screen.x, 960.0, epsilon = 1e-2);
        assert_relative_eq!(screen.y, 540.0, epsilon = 1e-2);
        assert_relative_eq!(screen.depth, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_up_projects_toward_top_of_screen() {
        let camera = camera_facing_positive_z();
        let viewport = Viewport::default();
        let screen = camera.world_to_screen(Vec3::new(0.0, 1.0, 0.0), viewport);
        assert!(screen.y < viewport.height * 0.5);
    }

    #[test]
    fn test_point_behind_camera_has_negative_depth() {
        let camera = camera_facing_positive_z();
        let screen = camera.world_to_screen(Vec3::new(0.0, 0.0, -20.0), Viewport::default());
        assert!(screen.depth < 0.0);
    }
}
