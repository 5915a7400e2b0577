//! Math utilities and types
//!
//! Provides fundamental math types for 3D scene composition.

pub use nalgebra::{
    Vector2, Vector3, Vector4,
    Matrix4,
    Unit,
    UnitQuaternion,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::*;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Cosine of the angle between two vectors, 0 when either is degenerate
    pub fn cosine_between(a: &Vec3, b: &Vec3) -> f32 {
        let denom = a.magnitude() * b.magnitude();
        if denom <= f32::EPSILON {
            return 0.0;
        }
        a.dot(b) / denom
    }

    /// Rotate `vector` about `axis` by `angle` radians
    ///
    /// A zero-length axis leaves the vector unchanged.
    pub fn rotate_about_axis(vector: &Vec3, axis: &Vec3, angle: f32) -> Vec3 {
        match Unit::try_new(*axis, f32::EPSILON) {
            Some(axis) => Quat::from_axis_angle(&axis, angle) * vector,
            None => *vector,
        }
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a perspective projection matrix for a forward-positive view space
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a view matrix whose rows are the camera right/up/front axes
    ///
    /// View-space `z` is the distance along `front`, so points in front of
    /// the camera have positive depth.
    fn view_basis(eye: Vec3, front: Vec3, world_up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let tan_half_fovy = (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = far / (far - near);
        result[(2, 3)] = -(near * far) / (far - near);
        result[(3, 2)] = 1.0;
        result
    }

    fn view_basis(eye: Vec3, front: Vec3, world_up: Vec3) -> Mat4 {
        let front = front.normalize();
        let right = front.cross(&world_up).normalize();
        let up = right.cross(&front);

        Mat4::new(
            right.x, right.y, right.z, -eye.dot(&right),
            up.x, up.y, up.z, -eye.dot(&up),
            front.x, front.y, front.z, -eye.dot(&front),
            0.0, 0.0, 0.0, 1.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_view_basis_puts_forward_points_at_positive_depth() {
        let view = Mat4::view_basis(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::y(),
        );
        let p = view.transform_point(&Point3::origin());
        assert_relative_eq!(p.z, 5.0, epsilon = 1e-5);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_rotate_about_axis() {
        let rotated = utils::rotate_about_axis(&Vec3::x(), &Vec3::y(), constants::PI * 0.5);
        assert_relative_eq!(rotated, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-5);

        let unchanged = utils::rotate_about_axis(&Vec3::x(), &Vec3::zeros(), 1.0);
        assert_eq!(unchanged, Vec3::x());
    }

    #[test]
    fn test_cosine_between() {
        assert_relative_eq!(utils::cosine_between(&Vec3::y(), &Vec3::y()), 1.0);
        assert_relative_eq!(utils::cosine_between(&Vec3::y(), &Vec3::x()), 0.0);
        assert_eq!(utils::cosine_between(&Vec3::zeros(), &Vec3::x()), 0.0);
    }
}
