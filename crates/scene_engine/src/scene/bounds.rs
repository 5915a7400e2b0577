//! Axis-aligned bounding boxes

use crate::foundation::math::{Mat4, Point3, Vec3};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Box of the given full size centered on the origin
    pub fn from_size(width: f32, height: f32, depth: f32) -> Self {
        Self::from_center_extents(Vec3::zeros(), Vec3::new(width, height, depth) * 0.5)
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Smallest box enclosing both boxes
    pub fn union(&self, other: &AABB) -> AABB {
        AABB {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Bounds of this box after an affine transform
    ///
    /// All eight corners are transformed, so rotated boxes grow to stay
    /// enclosing.
    pub fn transformed(&self, matrix: &Mat4) -> AABB {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];

        let first = matrix.transform_point(&Point3::from(corners[0])).coords;
        corners[1..].iter().fold(AABB::new(first, first), |bounds, corner| {
            let p = matrix.transform_point(&Point3::from(*corner)).coords;
            AABB::new(bounds.min.inf(&p), bounds.max.sup(&p))
        })
    }

    /// Test ray intersection with this AABB using slab method
    /// Returns the distance to the entry point if the ray intersects, None otherwise
    pub fn intersect_ray(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<f32> {
        let inv_dir = Vec3::new(
            if ray_dir.x != 0.0 { 1.0 / ray_dir.x } else { f32::INFINITY },
            if ray_dir.y != 0.0 { 1.0 / ray_dir.y } else { f32::INFINITY },
            if ray_dir.z != 0.0 { 1.0 / ray_dir.z } else { f32::INFINITY },
        );

        let t1 = (self.min.x - ray_origin.x) * inv_dir.x;
        let t2 = (self.max.x - ray_origin.x) * inv_dir.x;
        let t3 = (self.min.y - ray_origin.y) * inv_dir.y;
        let t4 = (self.max.y - ray_origin.y) * inv_dir.y;
        let t5 = (self.min.z - ray_origin.z) * inv_dir.z;
        let t6 = (self.max.z - ray_origin.z) * inv_dir.z;

        let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
        let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

        // Entry distance, or 0 when the origin is inside the box
        if tmax >= tmin && tmax >= 0.0 {
            Some(tmin.max(0.0))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;
    use approx::assert_relative_eq;

    #[test]
    fn test_intersect_ray_entry_distance() {
        let bounds = AABB::from_size(2.0, 2.0, 2.0);
        let hit = bounds.intersect_ray(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(hit.unwrap(), 4.0);

        let miss = bounds.intersect_ray(Vec3::new(0.0, 3.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(miss.is_none());

        let behind = bounds.intersect_ray(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(behind.is_none());
    }

    #[test]
    fn test_transformed_translates_and_scales() {
        let bounds = AABB::from_size(2.0, 2.0, 2.0);
        let transform = Transform {
            position: Vec3::new(10.0, 0.0, 0.0),
            scale: Vec3::new(2.0, 1.0, 1.0),
            ..Transform::default()
        };

        let moved = bounds.transformed(&transform.to_matrix());
        assert_relative_eq!(moved.min, Vec3::new(8.0, -1.0, -1.0));
        assert_relative_eq!(moved.max, Vec3::new(12.0, 1.0, 1.0));
    }

    #[test]
    fn test_union_and_contains() {
        let a = AABB::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let b = AABB::new(Vec3::new(-1.0, 0.5, 0.0), Vec3::new(0.5, 2.0, 0.5));
        let both = a.union(&b);

        assert!(both.contains_point(Vec3::new(-0.5, 1.5, 0.2)));
        assert_eq!(both.min, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(both.max, Vec3::new(1.0, 2.0, 1.0));
    }
}
