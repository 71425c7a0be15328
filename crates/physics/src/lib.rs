//! Physics system using Rapier2D for the lunar lander.
//!
//! The game treats the rigid-body engine as an external collaborator: this
//! crate wraps stepping, static terrain insertion, the lander body and its
//! footpads, and begin-of-contact event collection behind a small API.

pub mod collision;
pub mod physics_world;
pub mod raycast;

pub use collision::*;
pub use physics_world::*;
pub use raycast::*;

// Re-export Rapier for downstream crates
pub use rapier2d;

// Re-export common Rapier types
pub use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};
