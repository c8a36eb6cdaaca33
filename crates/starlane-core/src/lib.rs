//! Starlane Core - Sector Trade Simulation Engine
//!
//! An ECS-based simulation of a small galaxy: stations produce and consume
//! goods, AI traders haul them along the most profitable routes, pirates
//! prey on rich sectors and bounty hunters chase the pirates.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Stations, gates, ships, combat encounters
//! - **Components**: Pure data attached to entities (Transform, Inventory, Pilot, etc.)
//! - **Systems**: Logic that queries and updates components
//!
//! Game rules that need no entity store live in `starlane_logic`.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`components`] | Component structs |
//! | [`systems`] | Production, market, trade, combat, population, autopilot, docking, analytics |
//! | [`generation`] | Stations, gates, and agent spawning |
//! | [`intents`] | Player commands |
//! | [`queries`] | Read-only views for UIs |
//! | [`engine`] | `SimulationEngine` tick driver |
//!
//! # Example
//!
//! ```rust,no_run
//! use starlane_core::prelude::*;
//!
//! let mut engine = SimulationEngine::new();
//! engine.generate();
//! engine.spawn_player(SectorId(1));
//! engine.apply_intent(Intent::SetDestination { sector: SectorId(5) }).unwrap();
//!
//! loop {
//!     engine.update(1.0 / 60.0); // 60 FPS
//! }
//! ```

pub mod components;
pub mod engine;
pub mod generation;
pub mod intents;
pub mod queries;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::{SimulationEngine, TickReport};
    pub use crate::intents::{Intent, IntentError};
    pub use crate::queries::{EntityKind, EntitySnapshot, SectorOverview};
    pub use crate::systems::{DockError, TradeError, TradeListing, TradeReceipt};
    pub use starlane_logic::items::ItemId;
    pub use starlane_logic::universe::SectorId;
}
