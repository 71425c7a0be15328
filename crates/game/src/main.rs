//! Headless demo: fly one automated descent onto the generated terrain and
//! log the outcome.

use anyhow::Result;
use game::{Controls, Episode, EpisodePhase, GameConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Wall-clock cap on one attempt, seconds.
const MAX_FLIGHT_TIME: f32 = 600.0;

fn main() -> Result<()> {
    env_logger::init();

    let config = GameConfig::load();
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let terrain = terrain::load_or_generate(&config.terrain_path(), &config.terrain_params(), &mut rng);
    log::info!(
        "terrain ready: {} points, {} pads",
        terrain.points().len(),
        terrain.pad_count()
    );

    let mut episode = Episode::new(terrain, &config);
    let dt = config.fixed_dt();
    let max_steps = (MAX_FLIGHT_TIME * config.tick_rate) as usize;

    for _ in 0..max_steps {
        let controls = descent_program(&episode);
        episode.step(controls, dt);
        if episode.phase() != EpisodePhase::Flying {
            break;
        }
    }

    match episode.phase() {
        EpisodePhase::Landed => log::info!("the eagle has landed"),
        EpisodePhase::Crashed => {
            log::info!("crashed; scattering debris");
            episode.explode(&mut rng);
            // Let the wreckage settle before exiting.
            for _ in 0..(3.0 * config.tick_rate) as usize {
                episode.step(Controls::default(), dt);
            }
        }
        EpisodePhase::Flying => log::warn!("flight time limit reached without touchdown"),
    }

    Ok(())
}

/// A simple proportional descent: aim for a sink rate that shrinks with
/// altitude, throttle up when falling faster than that, and keep upright.
fn descent_program(episode: &Episode) -> Controls {
    let (Some(velocity), Some(altitude)) = (episode.lander_velocity(), episode.altitude()) else {
        return Controls::default();
    };

    let target_sink_rate = (altitude / 20.0).clamp(0.5, 10.0);
    let throttle = if -velocity.y > target_sink_rate { 1.0 } else { 0.0 };

    Controls {
        throttle,
        pitch: 0.0,
    }
}
