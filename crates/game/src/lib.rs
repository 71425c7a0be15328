//! Lunar lander game logic: landing classification, the lander flight model,
//! episode state, and typed configuration. Rendering and input live outside
//! this crate; the physics engine is wrapped by the `physics` crate.

pub mod config;
pub mod episode;
pub mod lander;
pub mod landing;

pub use config::*;
pub use episode::*;
pub use lander::*;
pub use landing::*;
