//! Physics world management with Rapier2D.

use glam::Vec2;
use rapier2d::crossbeam::channel::{unbounded, Receiver};
use rapier2d::prelude::*;

use crate::collision::{is_pad_tag, pad_tag, CollisionGroup, TerrainContact};

fn terrain_collision_groups() -> InteractionGroups {
    let (membership, filter) = CollisionGroup::terrain();
    InteractionGroups::new(membership, filter)
}

fn lander_collision_groups() -> InteractionGroups {
    let (membership, filter) = CollisionGroup::lander();
    InteractionGroups::new(membership, filter)
}

fn debris_collision_groups() -> InteractionGroups {
    let (membership, filter) = CollisionGroup::debris();
    InteractionGroups::new(membership, filter)
}

/// A begin-of-contact event between two colliders, drained once per step.
/// The engine may report several of these per touchdown; deduplication is the
/// caller's responsibility.
#[derive(Debug, Clone, Copy)]
pub struct ContactBegan {
    pub first: ColliderHandle,
    pub second: ColliderHandle,
}

/// Main physics world containing all simulation state.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,
    event_collector: ChannelEventCollector,
    collision_events: Receiver<CollisionEvent>,
    contact_force_events: Receiver<ContactForceEvent>,
}

impl PhysicsWorld {
    /// Create a new physics world with the given downward gravity magnitude.
    pub fn new(gravity: f32) -> Self {
        let (collision_send, collision_recv) = unbounded();
        let (force_send, force_recv) = unbounded();
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![0.0, -gravity],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: ChannelEventCollector::new(collision_send, force_send),
            collision_events: collision_recv,
            contact_force_events: force_recv,
        }
    }

    /// Step the simulation by one fixed timestep and return the begin-contact
    /// events reported during the step.
    pub fn step(&mut self, dt: f32) -> Vec<ContactBegan> {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );

        let mut began = Vec::new();
        while let Ok(event) = self.collision_events.try_recv() {
            if let CollisionEvent::Started(first, second, _) = event {
                began.push(ContactBegan { first, second });
            }
        }
        // Contact force events are not used; keep the channel drained.
        while self.contact_force_events.try_recv().is_ok() {}
        began
    }

    /// Update query pipeline for raycasting before the first step.
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Insert one static terrain segment with world-space endpoints and its
    /// pad tag. Colliders are owned by the world and discarded wholesale on
    /// terrain regeneration.
    pub fn add_terrain_segment(&mut self, a: Vec2, b: Vec2, is_pad: bool) -> ColliderHandle {
        let collider = ColliderBuilder::segment(point![a.x, a.y], point![b.x, b.y])
            .friction(1.0)
            .restitution(0.5)
            .collision_groups(terrain_collision_groups())
            .user_data(pad_tag(is_pad))
            .build();
        self.collider_set.insert(collider)
    }

    /// Pad flag and x-extent of a terrain collider, or `None` if the handle
    /// does not refer to a terrain segment.
    pub fn terrain_contact(&self, handle: ColliderHandle) -> Option<TerrainContact> {
        let collider = self.collider_set.get(handle)?;
        let segment = collider.shape().as_segment()?;
        Some(TerrainContact {
            min_x: segment.a.x.min(segment.b.x),
            max_x: segment.a.x.max(segment.b.x),
            is_pad: is_pad_tag(collider.user_data),
        })
    }

    /// Add the lander rigid body with explicit mass properties. Collider
    /// shapes contribute no mass; the fuel model owns the total.
    pub fn add_lander_body(
        &mut self,
        position: Vec2,
        mass: f32,
        angular_inertia: f32,
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y])
            .additional_mass_properties(MassProperties::new(point![0.0, 0.0], mass, angular_inertia))
            .can_sleep(false)
            .build();
        self.rigid_body_set.insert(body)
    }

    /// Attach a footpad contact shape at a local offset on the lander body.
    /// Footpads are the only lander shapes that emit collision events.
    pub fn add_footpad(&mut self, body: RigidBodyHandle, offset: Vec2, radius: f32) -> ColliderHandle {
        let collider = ColliderBuilder::ball(radius)
            .translation(vector![offset.x, offset.y])
            .friction(1.0)
            .restitution(0.0)
            .density(0.0)
            .collision_groups(lander_collision_groups())
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        self.collider_set
            .insert_with_parent(collider, body, &mut self.rigid_body_set)
    }

    /// Spawn one debris chunk with an initial velocity and spin.
    pub fn add_debris_body(
        &mut self,
        position: Vec2,
        velocity: Vec2,
        angular_velocity: f32,
        half_extents: Vec2,
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y])
            .linvel(vector![velocity.x, velocity.y])
            .angvel(angular_velocity)
            .build();
        let handle = self.rigid_body_set.insert(body);
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y)
            .friction(0.8)
            .restitution(0.8)
            .collision_groups(debris_collision_groups())
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        handle
    }

    /// Get the world position of a rigid body.
    pub fn body_position(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.rigid_body_set
            .get(handle)
            .map(|body| Vec2::new(body.translation().x, body.translation().y))
    }

    /// Get the linear velocity of a rigid body.
    pub fn body_velocity(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.rigid_body_set
            .get(handle)
            .map(|body| Vec2::new(body.linvel().x, body.linvel().y))
    }

    /// Get the rotation angle of a rigid body in radians (0 is upright).
    pub fn body_angle(&self, handle: RigidBodyHandle) -> Option<f32> {
        self.rigid_body_set.get(handle).map(|body| body.rotation().angle())
    }

    /// Get the angular velocity of a rigid body in rad/s.
    pub fn body_angular_velocity(&self, handle: RigidBodyHandle) -> Option<f32> {
        self.rigid_body_set.get(handle).map(|body| body.angvel())
    }

    /// Get the current total mass of a rigid body.
    pub fn body_mass(&self, handle: RigidBodyHandle) -> Option<f32> {
        self.rigid_body_set.get(handle).map(|body| body.mass())
    }

    /// Transform a body-local point into world space.
    pub fn point_on_body(&self, handle: RigidBodyHandle, local: Vec2) -> Option<Vec2> {
        self.rigid_body_set.get(handle).map(|body| {
            let world = body.position() * point![local.x, local.y];
            Vec2::new(world.x, world.y)
        })
    }

    /// Replace a body's mass, keeping its angular inertia (fuel burn).
    pub fn set_body_mass(&mut self, handle: RigidBodyHandle, mass: f32, angular_inertia: f32) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_additional_mass_properties(
                MassProperties::new(point![0.0, 0.0], mass, angular_inertia),
                true,
            );
        }
    }

    /// Apply a body-frame impulse at the center of mass (thrust).
    pub fn apply_local_impulse(&mut self, handle: RigidBodyHandle, local_impulse: Vec2) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            let world = body.rotation() * vector![local_impulse.x, local_impulse.y];
            body.apply_impulse(world, true);
        }
    }

    /// Apply a torque impulse (attitude control).
    pub fn apply_torque_impulse(&mut self, handle: RigidBodyHandle, torque_impulse: f32) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.apply_torque_impulse(torque_impulse, true);
        }
    }

    /// Scale a body's angular velocity (rotation damping on stick release).
    pub fn damp_angular_velocity(&mut self, handle: RigidBodyHandle, factor: f32) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            let angvel = body.angvel();
            body.set_angvel(angvel * factor, true);
        }
    }

    /// Remove a rigid body and its colliders.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }
}
