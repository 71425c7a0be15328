//! Raycast queries: altitude above terrain for the flight loop and HUD.

use crate::PhysicsWorld;
use glam::Vec2;
use rapier2d::prelude::*;

/// Result of a raycast query.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// The collider that was hit.
    pub collider: ColliderHandle,
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec2,
    /// Surface normal at the hit point.
    pub normal: Vec2,
}

impl PhysicsWorld {
    /// Cast a ray and return the first hit, ignoring the excluded body's own
    /// colliders.
    pub fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        exclude: Option<RigidBodyHandle>,
    ) -> Option<RaycastHit> {
        let ray = Ray::new(point![origin.x, origin.y], vector![direction.x, direction.y]);

        let mut filter = QueryFilter::default();
        if let Some(body) = exclude {
            filter = filter.exclude_rigid_body(body);
        }

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                filter,
            )
            .map(|(collider, intersection)| {
                let point = ray.point_at(intersection.time_of_impact);
                RaycastHit {
                    collider,
                    distance: intersection.time_of_impact,
                    point: Vec2::new(point.x, point.y),
                    normal: Vec2::new(intersection.normal.x, intersection.normal.y),
                }
            })
    }

    /// Distance straight down from `origin` to the first surface below it.
    pub fn altitude_above_terrain(
        &self,
        origin: Vec2,
        max_distance: f32,
        exclude: Option<RigidBodyHandle>,
    ) -> Option<f32> {
        self.raycast(origin, Vec2::new(0.0, -1.0), max_distance, exclude)
            .map(|hit| hit.distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn altitude_measures_distance_to_terrain_below() {
        let mut world = PhysicsWorld::new(1.62);
        world.add_terrain_segment(Vec2::new(-100.0, 0.0), Vec2::new(100.0, 0.0), false);
        let body = world.add_lander_body(Vec2::new(0.0, 40.0), 10.0, 10.0);
        world.add_footpad(body, Vec2::new(0.0, -2.0), 0.5);
        world.update_query_pipeline();

        let altitude = world
            .altitude_above_terrain(Vec2::new(0.0, 40.0), 1000.0, Some(body))
            .unwrap();
        assert!((altitude - 40.0).abs() < 1e-3);
    }

    #[test]
    fn raycast_misses_outside_range() {
        let mut world = PhysicsWorld::new(1.62);
        world.add_terrain_segment(Vec2::new(-100.0, 0.0), Vec2::new(100.0, 0.0), false);
        world.update_query_pipeline();

        assert!(world
            .altitude_above_terrain(Vec2::new(0.0, 40.0), 10.0, None)
            .is_none());
    }
}
