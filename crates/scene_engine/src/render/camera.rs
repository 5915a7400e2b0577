//! # 3D Camera System
//!
//! Perspective camera with the projection helpers the scene kernel needs:
//! world-to-view, world-to-raster with frustum rejection, and raster-to-ray
//! for picking.
//!
//! ## Coordinate System
//! The cached view matrix has the camera right/up/front axes as rows, so in
//! view space:
//! - X+ = Right
//! - Y+ = Up
//! - Z+ = Forward (depth grows away from the camera)
//!
//! Raster coordinates are pixels with the origin at the top-left corner.

use crate::foundation::math::{Mat4, Mat4Ext, Point3, Vec2, Vec3, utils};
use crate::scene::raycast::Ray;

use super::viewport::Viewport;

/// Perspective camera
///
/// Matrices are cached: call [`Camera::update_matrices`] after moving the
/// camera or changing its projection parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// World up vector used to build the camera basis
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,

    view_matrix: Mat4,
    projection_matrix: Mat4,
}

impl Camera {
    /// Create a new perspective camera looking at the origin
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::y(),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
            view_matrix: Mat4::identity(),
            projection_matrix: Mat4::identity(),
        };
        camera.update_matrices();
        camera
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

    /// Update camera aspect ratio for viewport changes
    ///
    /// Only logs when the difference is significant (> 0.01) to keep resize
    /// storms out of the log.
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// Recompute the cached projection and view matrices
    ///
    /// A target that coincides with the position has no direction; the
    /// previous view matrix is kept in that case.
    pub fn update_matrices(&mut self) {
        self.projection_matrix = Mat4::perspective(self.fov, self.aspect, self.near, self.far);

        match (self.target - self.position).try_normalize(f32::EPSILON) {
            Some(front) => self.view_matrix = Mat4::view_basis(self.position, front, self.up),
            None => log::warn!("Camera target equals position {:?}; view matrix unchanged", self.position),
        }
    }

    /// Cached world-to-view matrix
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    /// Cached projection matrix
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }

    /// Unit right axis of the camera basis
    pub fn right(&self) -> Vec3 {
        Vec3::new(self.view_matrix.m11, self.view_matrix.m12, self.view_matrix.m13)
    }

    /// Unit up axis of the camera basis
    pub fn camera_up(&self) -> Vec3 {
        Vec3::new(self.view_matrix.m21, self.view_matrix.m22, self.view_matrix.m23)
    }

    /// Unit viewing direction
    pub fn front(&self) -> Vec3 {
        Vec3::new(self.view_matrix.m31, self.view_matrix.m32, self.view_matrix.m33)
    }

    /// Transform a world-space point into view space
    pub fn world_to_view(&self, world: &Vec3) -> Vec3 {
        self.view_matrix.transform_point(&Point3::from(*world)).coords
    }

    /// Half extents of the image plane at the near distance
    fn near_plane_bounds(&self) -> (f32, f32) {
        let top = self.near * (self.fov * 0.5).tan();
        (top * self.aspect, top)
    }

    /// Project a world-space point to raster coordinates
    ///
    /// Returns `None` when the point lies outside the view frustum (before
    /// the near plane, past the far plane, or beyond any side).
    pub fn world_to_raster(&self, world: &Vec3, viewport: &Viewport) -> Option<Vec2> {
        let view = self.world_to_view(world);
        if view.z < self.near || view.z > self.far {
            return None;
        }

        let projected_x = self.near * view.x / view.z;
        let projected_y = self.near * view.y / view.z;
        let (right, top) = self.near_plane_bounds();
        let (left, bottom) = (-right, -top);

        if projected_x < left || projected_x > right || projected_y < bottom || projected_y > top {
            return None;
        }

        let raster_x = viewport.width as f32 * (projected_x - left) / (right - left);
        let raster_y = viewport.height as f32 * (top - projected_y) / (top - bottom);
        Some(Vec2::new(raster_x, raster_y))
    }

    /// Build the world-space ray from the camera through a raster point
    pub fn raster_to_ray(&self, raster: &Vec2, viewport: &Viewport) -> Ray {
        let (right, top) = self.near_plane_bounds();
        let width = viewport.width.max(1) as f32;
        let height = viewport.height.max(1) as f32;

        let projected_x = -right + raster.x / width * (2.0 * right);
        let projected_y = top - raster.y / height * (2.0 * top);

        let direction = self.right() * projected_x + self.camera_up() * projected_y + self.front() * self.near;
        Ray::new(self.position, direction)
    }
}

impl Default for Camera {
    /// 45 degree camera at (0, 3, 3) looking at the origin
    fn default() -> Self {
        Self::perspective(Vec3::new(0.0, 3.0, 3.0), 45.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn front_camera() -> Camera {
        // 90 degree fov, square aspect, looking down -Z from z = 5
        Camera::perspective(Vec3::new(0.0, 0.0, 5.0), 90.0, 1.0, 0.1, 100.0)
    }

    #[test]
    fn test_world_to_raster_center_and_offset() {
        let camera = front_camera();
        let viewport = Viewport::new(100, 100);

        let center = camera.world_to_raster(&Vec3::zeros(), &viewport).unwrap();
        assert_relative_eq!(center, Vec2::new(50.0, 50.0), epsilon = 1e-3);

        let right = camera.world_to_raster(&Vec3::new(1.0, 0.0, 0.0), &viewport).unwrap();
        assert_relative_eq!(right.x, 60.0, epsilon = 1e-3);

        // Up in world space is towards the top of the raster
        let up = camera.world_to_raster(&Vec3::new(0.0, 1.0, 0.0), &viewport).unwrap();
        assert_relative_eq!(up.y, 40.0, epsilon = 1e-3);
    }

    #[test]
    fn test_world_to_raster_rejects_outside_frustum() {
        let camera = front_camera();
        let viewport = Viewport::new(100, 100);

        // Behind the camera
        assert!(camera.world_to_raster(&Vec3::new(0.0, 0.0, 10.0), &viewport).is_none());
        // Past the far plane
        assert!(camera.world_to_raster(&Vec3::new(0.0, 0.0, -200.0), &viewport).is_none());
        // Off to the side and below
        assert!(camera.world_to_raster(&Vec3::new(20.0, 0.0, 0.0), &viewport).is_none());
        assert!(camera.world_to_raster(&Vec3::new(0.0, -20.0, 0.0), &viewport).is_none());
    }

    #[test]
    fn test_raster_to_ray_passes_through_projected_point() {
        let mut camera = front_camera();
        let viewport = Viewport::new(200, 100);
        camera.set_aspect_ratio(viewport.aspect_ratio());
        camera.update_matrices();

        let world = Vec3::new(1.5, -0.75, -2.0);
        let raster = camera.world_to_raster(&world, &viewport).unwrap();
        let ray = camera.raster_to_ray(&raster, &viewport);

        let expected = (world - camera.position).normalize();
        assert_relative_eq!(ray.direction, expected, epsilon = 1e-4);
    }

    #[test]
    fn test_world_to_view_depth_is_forward_distance() {
        let camera = front_camera();
        let view = camera.world_to_view(&Vec3::new(0.0, 0.0, -3.0));
        assert_relative_eq!(view.z, 8.0, epsilon = 1e-5);
    }
}
