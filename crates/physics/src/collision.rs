//! Collision groups and the pad tag carried on terrain colliders.

use rapier2d::prelude::*;

/// Collision groups for the lander world.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Static terrain segments.
    Terrain = 1 << 0,
    /// Lander footpads; their contacts decide the episode outcome.
    Lander = 1 << 1,
    /// Post-crash debris.
    Debris = 1 << 2,
}

impl CollisionGroup {
    /// Create a collision group for terrain.
    pub fn terrain() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Terrain as u32);
        let filter = Group::ALL;
        (membership, filter)
    }

    /// Create a collision group for the lander footpads.
    pub fn lander() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Lander as u32);
        let filter = Group::from_bits_retain(Self::Terrain as u32);
        (membership, filter)
    }

    /// Create a collision group for debris.
    pub fn debris() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Debris as u32);
        let filter = Group::from_bits_retain(Self::Terrain as u32 | Self::Debris as u32);
        (membership, filter)
    }
}

/// Collider `user_data` tag marking a terrain segment as a landing pad.
const PAD_TAG: u128 = 1;

/// Encode the pad flag into collider user data.
pub(crate) fn pad_tag(is_pad: bool) -> u128 {
    if is_pad {
        PAD_TAG
    } else {
        0
    }
}

/// Decode the pad flag from collider user data.
pub(crate) fn is_pad_tag(user_data: u128) -> bool {
    user_data == PAD_TAG
}

/// Pad flag and x-extent of a contacted terrain segment, as needed by the
/// landing evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainContact {
    pub min_x: f32,
    pub max_x: f32,
    pub is_pad: bool,
}
