//! Lander flight model: mass and fuel, the descent engine, and rate-command
//! attitude control. Figures follow the Apollo LM descent stage.

use glam::Vec2;
use physics::{ColliderHandle, PhysicsWorld, RigidBodyHandle};
use rand::Rng;

use crate::landing::LanderKinematics;

/// Standard gravity, m/s^2. Specific impulse is defined against Earth
/// gravity regardless of where the lander flies.
pub const EARTH_G0: f32 = 9.80665;

/// Structure mass with tanks empty, kg.
pub const DRY_MASS: f32 = 6853.0;
/// Full fuel load, kg.
pub const FUEL_CAPACITY: f32 = 8212.0;
/// Descent engine thrust at full throttle, N.
pub const MAX_THRUST: f32 = 45_050.0;
/// Descent engine specific impulse, s.
pub const SPECIFIC_IMPULSE: f32 = 305.0;
/// Angular inertia about the pitch axis, kg*m^2.
pub const ANGULAR_INERTIA: f32 = 40_000.0;

/// Commanded pitch rate at full stick deflection, deg/s.
pub const MAX_PITCH_RATE_DEG: f32 = 20.0;
/// Proportional gain from rate error to torque.
pub const ATTITUDE_GAIN: f32 = 8.0;
/// Per-step angular velocity retention with the stick centered.
pub const ROTATION_DAMPING: f32 = 0.75;

/// Half the distance between the footpads, m.
pub const HALF_WIDTH: f32 = 25.0;
/// Footpad vertical offset below the center of mass, m.
pub const FOOT_OFFSET_Y: f32 = -25.0;
/// Footpad contact radius, m.
pub const FOOT_RADIUS: f32 = 2.0;

const DEBRIS_COUNT: usize = 40;

/// The lander: a rigid body, two footpads, and the fuel state that drives
/// its mass.
pub struct Lander {
    body: RigidBodyHandle,
    left_foot: ColliderHandle,
    right_foot: ColliderHandle,
    fuel_remaining: f32,
    throttle: f32,
}

impl Lander {
    /// Spawn the lander at a position with a fraction of a full fuel load.
    pub fn spawn(world: &mut PhysicsWorld, position: Vec2, fuel_fraction: f32) -> Self {
        let fuel_remaining = FUEL_CAPACITY * fuel_fraction.clamp(0.0, 1.0);
        let body = world.add_lander_body(position, DRY_MASS + fuel_remaining, ANGULAR_INERTIA);
        let left_foot = world.add_footpad(body, Vec2::new(-HALF_WIDTH, FOOT_OFFSET_Y), FOOT_RADIUS);
        let right_foot = world.add_footpad(body, Vec2::new(HALF_WIDTH, FOOT_OFFSET_Y), FOOT_RADIUS);
        Self {
            body,
            left_foot,
            right_foot,
            fuel_remaining,
            throttle: 0.0,
        }
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    /// The two footpad colliders, left then right.
    pub fn footpads(&self) -> [ColliderHandle; 2] {
        [self.left_foot, self.right_foot]
    }

    pub fn fuel_remaining(&self) -> f32 {
        self.fuel_remaining
    }

    /// Whether the engine was producing thrust on the last `thrust` call.
    pub fn is_thrusting(&self) -> bool {
        self.throttle > 0.0 && self.fuel_remaining > 0.0
    }

    /// Fire the descent engine for one step at the given throttle setting.
    /// Burns fuel at thrust / (Isp * g0) and updates the body mass; a dry
    /// tank produces no thrust.
    pub fn thrust(&mut self, world: &mut PhysicsWorld, throttle: f32, dt: f32) {
        self.throttle = throttle.clamp(0.0, 1.0);
        if self.throttle <= 0.0 || self.fuel_remaining <= 0.0 {
            return;
        }

        let thrust = MAX_THRUST * self.throttle;
        world.apply_local_impulse(self.body, Vec2::new(0.0, thrust * dt));

        let burned = thrust / (SPECIFIC_IMPULSE * EARTH_G0) * dt;
        self.fuel_remaining = (self.fuel_remaining - burned).max(0.0);
        world.set_body_mass(self.body, DRY_MASS + self.fuel_remaining, ANGULAR_INERTIA);
    }

    /// Rate-command attitude control. `pitch` in [-1, 1] commands a pitch
    /// rate; zero damps any residual rotation.
    pub fn command_attitude(&mut self, world: &mut PhysicsWorld, pitch: f32, dt: f32) {
        let pitch = pitch.clamp(-1.0, 1.0);
        if pitch == 0.0 {
            world.damp_angular_velocity(self.body, ROTATION_DAMPING);
            return;
        }

        let Some(angvel) = world.body_angular_velocity(self.body) else {
            return;
        };
        let target_rate = pitch * MAX_PITCH_RATE_DEG.to_radians();
        let torque = (target_rate - angvel) * ATTITUDE_GAIN * ANGULAR_INERTIA;
        world.apply_torque_impulse(self.body, torque * dt);
    }

    /// World x-extent of the footpads, left then right.
    pub fn footprint_extent(&self, world: &PhysicsWorld) -> Option<(f32, f32)> {
        let left = world.point_on_body(self.body, Vec2::new(-HALF_WIDTH, FOOT_OFFSET_Y))?;
        let right = world.point_on_body(self.body, Vec2::new(HALF_WIDTH, FOOT_OFFSET_Y))?;
        Some((left.x.min(right.x), left.x.max(right.x)))
    }

    /// Snapshot the kinematics the landing evaluation needs.
    pub fn kinematics(&self, world: &PhysicsWorld) -> Option<LanderKinematics> {
        let velocity = world.body_velocity(self.body)?;
        let angle = world.body_angle(self.body)?;
        let (footprint_left_x, footprint_right_x) = self.footprint_extent(world)?;
        Some(LanderKinematics {
            velocity,
            angle,
            footprint_left_x,
            footprint_right_x,
        })
    }

    /// Replace the lander with a scatter of debris. Consumes the lander; the
    /// episode keeps simulating the wreckage.
    pub fn explode(self, world: &mut PhysicsWorld, rng: &mut impl Rng) {
        let origin = world.body_position(self.body).unwrap_or(Vec2::ZERO);
        let velocity = world.body_velocity(self.body).unwrap_or(Vec2::ZERO);
        world.remove_body(self.body);

        for _ in 0..DEBRIS_COUNT {
            let offset = Vec2::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0));
            let kick = Vec2::new(rng.gen_range(-30.0..30.0), rng.gen_range(10.0..60.0));
            let spin = rng.gen_range(-10.0..10.0);
            let half_extents = Vec2::new(rng.gen_range(0.5..2.5), rng.gen_range(0.5..2.5));
            world.add_debris_body(origin + offset, velocity + kick, spin, half_extents);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn thrust_burns_fuel_and_accelerates_upward() {
        let mut world = PhysicsWorld::new(0.0);
        let mut lander = Lander::spawn(&mut world, Vec2::new(0.0, 100.0), 0.5);
        let fuel_before = lander.fuel_remaining();
        let mass_before = world.body_mass(lander.body()).unwrap();

        for _ in 0..60 {
            lander.thrust(&mut world, 1.0, DT);
            world.step(DT);
        }

        assert!(lander.fuel_remaining() < fuel_before);
        assert!(world.body_mass(lander.body()).unwrap() < mass_before);
        assert!(world.body_velocity(lander.body()).unwrap().y > 0.0);
        assert!(lander.is_thrusting());
    }

    #[test]
    fn dry_tank_produces_no_thrust() {
        let mut world = PhysicsWorld::new(0.0);
        let mut lander = Lander::spawn(&mut world, Vec2::new(0.0, 100.0), 0.0);

        lander.thrust(&mut world, 1.0, DT);
        world.step(DT);

        assert!(!lander.is_thrusting());
        assert_eq!(lander.fuel_remaining(), 0.0);
        assert!(world.body_velocity(lander.body()).unwrap().y.abs() < 1e-4);
    }

    #[test]
    fn burn_rate_matches_the_rocket_equation() {
        let mut world = PhysicsWorld::new(0.0);
        let mut lander = Lander::spawn(&mut world, Vec2::new(0.0, 100.0), 1.0);
        let fuel_before = lander.fuel_remaining();

        lander.thrust(&mut world, 1.0, 1.0);

        let expected = MAX_THRUST / (SPECIFIC_IMPULSE * EARTH_G0);
        let burned = fuel_before - lander.fuel_remaining();
        assert!((burned - expected).abs() < 1e-3);
    }

    #[test]
    fn attitude_command_pitches_the_lander() {
        let mut world = PhysicsWorld::new(0.0);
        let mut lander = Lander::spawn(&mut world, Vec2::new(0.0, 100.0), 0.5);

        for _ in 0..120 {
            lander.command_attitude(&mut world, 1.0, DT);
            world.step(DT);
        }
        let angle = world.body_angle(lander.body()).unwrap();
        assert!(angle > 5.0_f32.to_radians());

        // Centered stick damps the rotation back out.
        for _ in 0..120 {
            lander.command_attitude(&mut world, 0.0, DT);
            world.step(DT);
        }
        assert!(world.body_angular_velocity(lander.body()).unwrap().abs() < 0.01);
    }

    #[test]
    fn footprint_extent_spans_the_footpads_when_upright() {
        let mut world = PhysicsWorld::new(0.0);
        let lander = Lander::spawn(&mut world, Vec2::new(500.0, 100.0), 0.5);

        let (left, right) = lander.footprint_extent(&world).unwrap();
        assert!((left - (500.0 - HALF_WIDTH)).abs() < 1e-3);
        assert!((right - (500.0 + HALF_WIDTH)).abs() < 1e-3);
    }

    #[test]
    fn explode_replaces_the_lander_with_debris() {
        let mut world = PhysicsWorld::new(1.62);
        let lander = Lander::spawn(&mut world, Vec2::new(0.0, 100.0), 0.5);
        let body = lander.body();
        let mut rng = rand::thread_rng();

        lander.explode(&mut world, &mut rng);

        assert!(world.body_position(body).is_none());
        assert_eq!(world.rigid_body_set.len(), DEBRIS_COUNT);
    }
}
