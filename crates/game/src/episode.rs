//! Episode state machine: one attempt from spawn to touchdown or crash.

use glam::Vec2;
use physics::{ContactBegan, PhysicsWorld};
use rand::Rng;
use terrain::Terrain;

use crate::config::GameConfig;
use crate::lander::Lander;
use crate::landing::{self, LandingLimits, LandingOutcome};

/// Pilot inputs for one step.
#[derive(Debug, Clone, Copy, Default)]
pub struct Controls {
    /// Throttle setting in [0, 1].
    pub throttle: f32,
    /// Pitch-rate command in [-1, 1].
    pub pitch: f32,
}

/// Where the episode stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodePhase {
    Flying,
    Landed,
    Crashed,
}

/// One landing attempt: the physics world, the terrain it was built from,
/// and the lander. The outcome is write-once; later contacts cannot change
/// a resolved episode.
pub struct Episode {
    world: PhysicsWorld,
    terrain: Terrain,
    lander: Option<Lander>,
    limits: LandingLimits,
    landed: bool,
    crashed: bool,
}

impl Episode {
    /// Build an episode from generated terrain and the game config. Spawns
    /// the lander near the upper left of the field.
    pub fn new(terrain: Terrain, config: &GameConfig) -> Self {
        let mut world = PhysicsWorld::new(config.gravity);
        for segment in terrain.segments() {
            world.add_terrain_segment(
                Vec2::new(segment.a.0, segment.a.1),
                Vec2::new(segment.b.0, segment.b.1),
                segment.is_pad,
            );
        }

        let spawn = Vec2::new(config.field_width / 5.0, config.field_height - 100.0);
        let lander = Lander::spawn(&mut world, spawn, config.starting_fuel);
        world.update_query_pipeline();

        Self {
            world,
            terrain,
            lander: Some(lander),
            limits: LandingLimits::default(),
            landed: false,
            crashed: false,
        }
    }

    pub fn phase(&self) -> EpisodePhase {
        if self.crashed {
            EpisodePhase::Crashed
        } else if self.landed {
            EpisodePhase::Landed
        } else {
            EpisodePhase::Flying
        }
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn lander(&self) -> Option<&Lander> {
        self.lander.as_ref()
    }

    /// Lander world velocity, if it still exists.
    pub fn lander_velocity(&self) -> Option<Vec2> {
        let lander = self.lander.as_ref()?;
        self.world.body_velocity(lander.body())
    }

    /// Lander world position, if it still exists.
    pub fn lander_position(&self) -> Option<Vec2> {
        let lander = self.lander.as_ref()?;
        self.world.body_position(lander.body())
    }

    /// Raycast altitude from the lander straight down to the terrain.
    pub fn altitude(&self) -> Option<f32> {
        let lander = self.lander.as_ref()?;
        let origin = self.world.body_position(lander.body())?;
        self.world
            .altitude_above_terrain(origin, 10_000.0, Some(lander.body()))
    }

    /// Advance one fixed step: apply controls, step physics, and resolve any
    /// footpad touchdowns reported during the step.
    pub fn step(&mut self, controls: Controls, dt: f32) {
        if let Some(lander) = self.lander.as_mut() {
            if !self.crashed && !self.landed {
                lander.thrust(&mut self.world, controls.throttle, dt);
                lander.command_attitude(&mut self.world, controls.pitch, dt);
            }
        }

        let contacts = self.world.step(dt);
        self.resolve_contacts(&contacts);
    }

    /// Classify the first footpad/terrain contact of the episode. The
    /// outcome latches; repeated contact events after touchdown are ignored.
    fn resolve_contacts(&mut self, contacts: &[ContactBegan]) {
        if self.landed || self.crashed {
            return;
        }
        let Some(lander) = self.lander.as_ref() else {
            return;
        };
        let footpads = lander.footpads();

        for contact in contacts {
            let terrain_handle = if footpads.contains(&contact.first) {
                contact.second
            } else if footpads.contains(&contact.second) {
                contact.first
            } else {
                continue;
            };
            let Some(terrain_contact) = self.world.terrain_contact(terrain_handle) else {
                continue;
            };
            let Some(kinematics) = lander.kinematics(&self.world) else {
                continue;
            };

            match landing::evaluate(&self.limits, &kinematics, &terrain_contact) {
                LandingOutcome::Safe => {
                    log::info!(
                        "touchdown: safe landing at {:.2} m/s vertical",
                        kinematics.velocity.y.abs()
                    );
                    self.landed = true;
                }
                LandingOutcome::Crash => {
                    log::info!(
                        "touchdown: crash at {:.2} m/s vertical, {:.2} m/s drift",
                        kinematics.velocity.y.abs(),
                        kinematics.velocity.x.abs()
                    );
                    self.crashed = true;
                }
            }
            return;
        }
    }

    /// Blow up the lander into debris. Typically follows a crash; the world
    /// keeps simulating the wreckage.
    pub fn explode(&mut self, rng: &mut impl Rng) {
        if let Some(lander) = self.lander.take() {
            lander.explode(&mut self.world, rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terrain::{Terrain, TerrainPoint};

    fn flat_pad_terrain(width: f32, pad_y: f32) -> Terrain {
        // One pad spanning the spawn point's x, rough shoulders either side.
        let spawn_x = width / 5.0;
        Terrain::new(vec![
            TerrainPoint { x: 0.0, y: pad_y + 20.0, is_pad: false },
            TerrainPoint { x: spawn_x - 60.0, y: pad_y, is_pad: true },
            TerrainPoint { x: spawn_x + 60.0, y: pad_y, is_pad: false },
            TerrainPoint { x: width, y: pad_y + 30.0, is_pad: false },
        ])
    }

    fn config(gravity: f32) -> GameConfig {
        let mut config = GameConfig::default();
        config.gravity = gravity;
        config
    }

    #[test]
    fn soft_drop_onto_a_pad_lands() {
        // Gentle gravity and a short drop keep the impact speed inside the
        // envelope: ~35 m at 0.1 m/s^2 arrives near 2.6 m/s.
        let config = config(0.1);
        let pad_y = config.field_height - 100.0 - 60.0;
        let mut episode = Episode::new(flat_pad_terrain(config.field_width, pad_y), &config);
        let dt = config.fixed_dt();

        for _ in 0..60 * 120 {
            episode.step(Controls::default(), dt);
            if episode.phase() != EpisodePhase::Flying {
                break;
            }
        }
        assert_eq!(episode.phase(), EpisodePhase::Landed);

        // The outcome latches across further contact chatter.
        for _ in 0..120 {
            episode.step(Controls::default(), dt);
        }
        assert_eq!(episode.phase(), EpisodePhase::Landed);
    }

    #[test]
    fn hard_drop_crashes() {
        let config = config(100.0);
        let mut episode = Episode::new(flat_pad_terrain(config.field_width, 100.0), &config);
        let dt = config.fixed_dt();

        for _ in 0..60 * 120 {
            episode.step(Controls::default(), dt);
            if episode.phase() != EpisodePhase::Flying {
                break;
            }
        }
        assert_eq!(episode.phase(), EpisodePhase::Crashed);
    }

    #[test]
    fn altitude_is_available_while_flying() {
        let config = config(1.62);
        let mut episode = Episode::new(flat_pad_terrain(config.field_width, 100.0), &config);
        episode.step(Controls::default(), config.fixed_dt());

        let altitude = episode.altitude().unwrap();
        assert!(altitude > 0.0);
        assert!(altitude < config.field_height);
    }

    #[test]
    fn explode_removes_the_lander() {
        let config = config(1.62);
        let mut episode = Episode::new(flat_pad_terrain(config.field_width, 100.0), &config);
        let mut rng = rand::thread_rng();

        episode.explode(&mut rng);

        assert!(episode.lander().is_none());
        assert!(episode.lander_velocity().is_none());
    }
}
