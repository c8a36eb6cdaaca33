//! Station components - production sites and trading posts.

use serde::{Deserialize, Serialize};
use starlane_logic::items::Stock;
use starlane_logic::stations::{ProductionRule, StationKind};

/// Marks an entity as a station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub kind: StationKind,
    pub name: String,
}

/// Items held by a station.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Inventory(pub Stock);

/// Resource conversion attached to a station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Production {
    pub rule: ProductionRule,
    /// Sim time (ms) of the last production attempt, successful or not.
    pub last_tick_ms: f64,
}

impl Production {
    pub fn new(rule: ProductionRule) -> Self {
        Self {
            rule,
            last_tick_ms: 0.0,
        }
    }
}
