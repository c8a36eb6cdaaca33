//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in systems.

mod common;
mod player;
mod ship;
mod station;
mod structures;

pub use common::*;
pub use player::*;
pub use ship::*;
pub use station::*;
pub use structures::*;
