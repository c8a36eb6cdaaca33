//! Tradeable items and their base prices.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Currency amount. Station wallets may dip below zero, so this is signed.
pub type Credits = i64;

/// Item → quantity map used for station inventories and ship cargo.
///
/// Quantities are unsigned; a stock can never go negative.
pub type Stock = BTreeMap<ItemId, u32>;

/// Every item that can be produced, consumed, or traded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemId {
    Ore,
    Gas,
    Crystal,
    Steel,
    Fuel,
    Electronics,
    Engine,
    Sensors,
    Spaceship,
    Food,
    Energy,
}

impl ItemId {
    pub const ALL: [ItemId; 11] = [
        ItemId::Ore,
        ItemId::Gas,
        ItemId::Crystal,
        ItemId::Steel,
        ItemId::Fuel,
        ItemId::Electronics,
        ItemId::Engine,
        ItemId::Sensors,
        ItemId::Spaceship,
        ItemId::Food,
        ItemId::Energy,
    ];

    /// Stable lowercase key, matching the JSON representation.
    pub fn key(self) -> &'static str {
        match self {
            ItemId::Ore => "ore",
            ItemId::Gas => "gas",
            ItemId::Crystal => "crystal",
            ItemId::Steel => "steel",
            ItemId::Fuel => "fuel",
            ItemId::Electronics => "electronics",
            ItemId::Engine => "engine",
            ItemId::Sensors => "sensors",
            ItemId::Spaceship => "spaceship",
            ItemId::Food => "food",
            ItemId::Energy => "energy",
        }
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Static definition of an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: ItemId,
    pub name: String,
    pub base_price: f64,
    #[serde(default)]
    pub description: String,
}

impl ItemDef {
    pub fn new(id: ItemId, name: &str, base_price: f64, description: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            base_price,
            description: description.to_string(),
        }
    }
}

/// Built-in item table.
pub fn builtin_items() -> Vec<ItemDef> {
    vec![
        ItemDef::new(ItemId::Ore, "Iron Ore", 10.0, "Raw iron mined from asteroids."),
        ItemDef::new(ItemId::Gas, "Tibanna Gas", 15.0, "Volatile gas cloud harvest."),
        ItemDef::new(ItemId::Crystal, "Kyber Crystal", 20.0, "Rare resonant crystals."),
        ItemDef::new(ItemId::Steel, "Reinforced Steel", 40.0, "Refined alloy for construction."),
        ItemDef::new(ItemId::Fuel, "Hyper Fuel", 50.0, "Refined fuel for engines."),
        ItemDef::new(ItemId::Electronics, "Microchips", 60.0, "Advanced computing logic."),
        ItemDef::new(ItemId::Engine, "Ion Engine", 200.0, "Starship propulsion system."),
        ItemDef::new(ItemId::Sensors, "Sensor Array", 200.0, "Long-range scanner suite."),
        ItemDef::new(ItemId::Spaceship, "Starship Hull", 2000.0, "A spaceworthy vessel."),
        ItemDef::new(ItemId::Food, "Rations", 5.0, "Crew sustenance."),
        ItemDef::new(ItemId::Energy, "Energy Cells", 10.0, "Universal power units."),
    ]
}

/// Read a quantity from a stock map, treating missing entries as zero.
pub fn quantity(stock: &Stock, item: ItemId) -> u32 {
    stock.get(&item).copied().unwrap_or(0)
}
