//! Terrain persistence: the generated point sequence saved as a JSON array.
//!
//! A file that cannot be read or parsed, or that predates the `isPad` schema,
//! counts as "no cached terrain". Loading never aborts the game; the caller
//! regenerates and the fresh terrain overwrites the stale file.

use std::fs;
use std::path::Path;

use rand::Rng;
use thiserror::Error;

use crate::generator::{self, TerrainParams};
use crate::Terrain;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not read terrain file: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON, or a stale schema (points missing the `isPad` field).
    #[error("terrain file is malformed or stale: {0}")]
    Format(#[from] serde_json::Error),
    #[error("terrain file contains no points")]
    Empty,
}

/// Load cached terrain from `path`, validating the schema.
pub fn load(path: &Path) -> Result<Terrain, StoreError> {
    let data = fs::read_to_string(path)?;
    let terrain: Terrain = serde_json::from_str(&data)?;
    if terrain.points().is_empty() {
        return Err(StoreError::Empty);
    }
    Ok(terrain)
}

/// Persist `terrain` to `path`, replacing any previous file.
pub fn save(path: &Path, terrain: &Terrain) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(terrain)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load the cached terrain, or generate a fresh one when the cache is missing
/// or stale. Regeneration overwrites the cache; a failed write is logged and
/// the in-memory terrain is still returned.
pub fn load_or_generate(path: &Path, params: &TerrainParams, rng: &mut impl Rng) -> Terrain {
    match load(path) {
        Ok(terrain) => {
            log::info!("loaded terrain from {:?} ({} points)", path, terrain.points().len());
            terrain
        }
        Err(err) => {
            log::warn!("no cached terrain at {:?} ({}), regenerating", path, err);
            let terrain = generator::generate(params, rng);
            if let Err(err) = save(path, &terrain) {
                log::warn!("could not persist terrain to {:?}: {}", path, err);
            }
            terrain
        }
    }
}
