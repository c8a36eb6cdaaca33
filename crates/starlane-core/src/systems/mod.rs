//! Systems - logic that operates on components

mod analytics;
mod autopilot;
mod combat;
mod docking;
mod market;
mod movement;
mod navigation;
mod population;
mod production;
mod trade;

pub use analytics::*;
pub use autopilot::*;
pub use combat::*;
pub use docking::*;
pub use market::*;
pub use movement::*;
pub use navigation::*;
pub use population::*;
pub use production::*;
pub use trade::*;
