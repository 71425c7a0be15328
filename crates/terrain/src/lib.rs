//! Procedural terrain for the lunar lander: a left-to-right polyline with
//! three flat landing pads, plus JSON persistence so a level is reproducible.

pub mod generator;
pub mod point;
pub mod store;

pub use generator::*;
pub use point::*;
pub use store::*;
