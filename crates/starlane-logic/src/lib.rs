//! Pure simulation logic for Starlane.
//!
//! This crate contains all game rules that are independent of the entity
//! store or any runtime. Functions take plain data and return results, which
//! keeps them unit-testable and lets the engine crate stay a thin layer of
//! queries over a `hecs::World`.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`catalog`] | Item + archetype catalog, JSON loading and validation |
//! | [`combat`] | Factions, shield/hull damage, shield recharge, target scoring |
//! | [`config`] | `SimConfig` tunables with JSON overrides |
//! | [`constants`] | Default tuning values |
//! | [`economy`] | Production cycles and purchase quotes |
//! | [`geometry`] | `Vec2` math |
//! | [`items`] | Item ids, base prices, stock maps |
//! | [`layout`] | Station ring placement and gate slot assignment |
//! | [`market`] | Trade route profit, distance, and score |
//! | [`movement`] | Steering, thrust, braking, integration |
//! | [`pathfinding`] | All-pairs BFS path table over the sector graph |
//! | [`population`] | Wealth-driven spawn arithmetic |
//! | [`pricing`] | Stock-relative price curve |
//! | [`stations`] | Station kinds and production rules |
//! | [`universe`] | Sectors, connections, the built-in map |

pub mod catalog;
pub mod combat;
pub mod config;
pub mod constants;
pub mod economy;
pub mod geometry;
pub mod items;
pub mod layout;
pub mod market;
pub mod movement;
pub mod pathfinding;
pub mod population;
pub mod pricing;
pub mod stations;
pub mod universe;
