//! Typed configuration loaded from `config.ron`, with per-field defaults so
//! partial files work and a missing or malformed file degrades to defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use terrain::TerrainParams;

const CONFIG_PATH: &str = "config.ron";
const DEFAULT_TERRAIN_PATH: &str = "terrain_data.json";

fn default_gravity() -> f32 {
    1.62
}

fn default_difficulty() -> u8 {
    3
}

fn default_field_width() -> f32 {
    1800.0
}

fn default_field_height() -> f32 {
    900.0
}

fn default_starting_fuel() -> f32 {
    0.1
}

fn default_tick_rate() -> f32 {
    60.0
}

/// Game configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Downward gravity, m/s^2. Defaults to lunar surface gravity.
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    /// Terrain roughness, 1 (gentle) through 5 (jagged).
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    /// Playfield width in world units.
    #[serde(default = "default_field_width")]
    pub field_width: f32,
    /// Playfield height in world units.
    #[serde(default = "default_field_height")]
    pub field_height: f32,
    /// Fuel load at spawn as a fraction of a full tank.
    #[serde(default = "default_starting_fuel")]
    pub starting_fuel: f32,
    /// Fixed simulation rate in steps per second.
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f32,
    /// Override for the terrain cache file location.
    #[serde(default)]
    pub terrain_file: Option<PathBuf>,
    /// Terrain seed; omit for a fresh landscape each regeneration.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
            difficulty: default_difficulty(),
            field_width: default_field_width(),
            field_height: default_field_height(),
            starting_fuel: default_starting_fuel(),
            tick_rate: default_tick_rate(),
            terrain_file: None,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Load from `config.ron` in the working directory, falling back to
    /// defaults when the file is missing or malformed.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_PATH))
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match ron::from_str(&contents) {
                Ok(config) => {
                    log::info!("loaded config from {}", path.display());
                    config
                }
                Err(err) => {
                    log::warn!("failed to parse {}: {err}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write the config back out in RON form.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let pretty = ron::ser::PrettyConfig::default();
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Terrain generation parameters derived from this config.
    pub fn terrain_params(&self) -> TerrainParams {
        TerrainParams {
            field_width: self.field_width,
            field_height: self.field_height,
            difficulty: self.difficulty,
        }
    }

    /// Where the terrain cache lives.
    pub fn terrain_path(&self) -> PathBuf {
        self.terrain_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TERRAIN_PATH))
    }

    /// Fixed timestep in seconds.
    pub fn fixed_dt(&self) -> f32 {
        1.0 / self.tick_rate
    }
}
