//! Ray casting against ray-castable scene objects

use crate::foundation::math::{Vec2, Vec3};
use crate::render::{Camera, Viewport};

use super::object::{ObjectArena, ObjectId};

/// A ray for ray casting and picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray, normalized
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a ray intersection test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// The object that was hit
    pub object: ObjectId,
    /// The distance from the ray origin to the hit point
    pub distance: f32,
    /// The point of intersection in world space
    pub point: Vec3,
}

/// Finds the nearest ray-castable object under a raster point
pub trait RayIntersector {
    /// Start testing against an object (and its subtree)
    fn add(&mut self, object: ObjectId);

    /// Stop testing against an object
    fn remove(&mut self, object: ObjectId);

    /// Nearest hit along the camera ray through `raster`
    fn raycast(
        &self,
        raster: &Vec2,
        camera: &Camera,
        viewport: &Viewport,
        objects: &ObjectArena,
    ) -> Option<RayHit>;
}

/// Ray intersector over the world-space bounds of each target's subtree
#[derive(Debug, Default)]
pub struct BoundsRayCaster {
    targets: Vec<ObjectId>,
}

impl BoundsRayCaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn targets(&self) -> &[ObjectId] {
        &self.targets
    }

    /// Nearest hit for an explicit world-space ray
    pub fn cast_ray(&self, ray: &Ray, objects: &ObjectArena) -> Option<RayHit> {
        self.targets
            .iter()
            .filter_map(|id| {
                let bounds = objects.world_bounds(*id)?;
                let distance = bounds.intersect_ray(ray.origin, ray.direction)?;
                Some(RayHit {
                    object: *id,
                    distance,
                    point: ray.point_at(distance),
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

impl RayIntersector for BoundsRayCaster {
    fn add(&mut self, object: ObjectId) {
        if !self.targets.contains(&object) {
            self.targets.push(object);
        }
    }

    fn remove(&mut self, object: ObjectId) {
        self.targets.retain(|id| *id != object);
    }

    fn raycast(
        &self,
        raster: &Vec2,
        camera: &Camera,
        viewport: &Viewport,
        objects: &ObjectArena,
    ) -> Option<RayHit> {
        let ray = camera.raster_to_ray(raster, viewport);
        self.cast_ray(&ray, objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Material;
    use crate::scene::bounds::AABB;
    use crate::scene::object::SceneNode;
    use approx::assert_relative_eq;

    fn boxed(arena: &mut ObjectArena, z: f32) -> ObjectId {
        arena.insert(
            SceneNode::mesh("box", Material::new())
                .with_bounds(AABB::from_size(2.0, 2.0, 2.0))
                .with_position(Vec3::new(0.0, 0.0, z)),
        )
    }

    #[test]
    fn test_nearest_target_wins() {
        let mut arena = ObjectArena::new();
        let far = boxed(&mut arena, -10.0);
        let near = boxed(&mut arena, -4.0);

        let mut caster = BoundsRayCaster::new();
        caster.add(far);
        caster.add(near);
        caster.add(near);
        assert_eq!(caster.targets().len(), 2);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -3.0));
        let hit = caster.cast_ray(&ray, &arena).unwrap();
        assert_eq!(hit.object, near);
        assert_relative_eq!(hit.distance, 8.0);
        assert_relative_eq!(hit.point, Vec3::new(0.0, 0.0, -3.0));

        caster.remove(near);
        assert_eq!(caster.cast_ray(&ray, &arena).unwrap().object, far);
    }

    #[test]
    fn test_raycast_through_screen_center() {
        let mut arena = ObjectArena::new();
        let target = boxed(&mut arena, 0.0);
        let mut caster = BoundsRayCaster::new();
        caster.add(target);

        let camera = Camera::perspective(Vec3::new(0.0, 0.0, 5.0), 90.0, 1.0, 0.1, 100.0);
        let viewport = Viewport::new(100, 100);

        let hit = caster.raycast(&Vec2::new(50.0, 50.0), &camera, &viewport, &arena).unwrap();
        assert_relative_eq!(hit.point.z, 1.0, epsilon = 1e-4);

        assert!(caster.raycast(&Vec2::new(0.0, 0.0), &camera, &viewport, &arena).is_none());
    }
}
