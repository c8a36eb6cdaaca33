//! Ship components - traders, pirates, and bounty hunters.

use hecs::Entity;
use serde::{Deserialize, Serialize};
use starlane_logic::items::{Credits, ItemId, Stock};

pub use starlane_logic::combat::{CombatStats, Faction};

/// Lifetime earnings of an agent.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ledger {
    /// Sum of (sell revenue - purchase cost) over completed trades.
    pub realized_profit: Credits,
    /// Credits looted from destroyed ships.
    pub piracy_revenue: Credits,
}

/// Items carried by a ship.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cargo(pub Stock);

impl Cargo {
    /// Total units aboard, across all items.
    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CargoCapacity(pub u32);

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpeedStats {
    pub max_speed: f32,
}

/// A buy-here-sell-there opportunity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeRoute {
    pub buy_station: Entity,
    pub sell_station: Entity,
    pub item: ItemId,
    pub expected_profit: Credits,
    pub score: f64,
    pub distance: f32,
}

/// Which end of the route an agent is heading for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeLeg {
    MovingToBuy,
    MovingToSell,
}

/// The single authoritative activity of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityMode {
    Planning,
    Trading(TradeLeg),
    Combat,
}

/// Decision state of an autonomous ship.
#[derive(Debug, Clone)]
pub struct Pilot {
    pub mode: ActivityMode,
    pub route: Option<TradeRoute>,
    /// What was paid for the cargo currently aboard.
    pub cost_basis: Credits,
}

impl Pilot {
    pub fn new() -> Self {
        Self {
            mode: ActivityMode::Planning,
            route: None,
            cost_basis: 0,
        }
    }

    /// Drop any route and go back to planning. The cost basis stays with
    /// whatever cargo is still aboard.
    pub fn reset(&mut self) {
        self.mode = ActivityMode::Planning;
        self.route = None;
    }

    /// Leave combat. A ship still carrying its route cargo resumes the sell
    /// leg; anything else goes back to planning.
    pub fn release(&mut self, holding_cargo: bool) {
        match self.route {
            Some(_) if holding_cargo => self.mode = ActivityMode::Trading(TradeLeg::MovingToSell),
            _ => self.reset(),
        }
    }

    pub fn is_in_combat(&self) -> bool {
        self.mode == ActivityMode::Combat
    }
}

impl Default for Pilot {
    fn default() -> Self {
        Self::new()
    }
}

/// Entity an aggressor is hunting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatTarget(pub Entity);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterRole {
    Attacker,
    Defender,
}

/// Membership in an encounter zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatEncounter {
    pub encounter: Entity,
    pub role: EncounterRole,
}
