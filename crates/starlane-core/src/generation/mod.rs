//! Generation - procedural creation of the universe and its ships.

mod agents;
mod universe;

pub use agents::*;
pub use universe::*;
