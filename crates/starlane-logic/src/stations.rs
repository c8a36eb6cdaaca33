//! Station archetypes: what each kind of station consumes, produces, and
//! starts with.

use serde::{Deserialize, Serialize};

use crate::items::{ItemId, Stock};

/// Station archetype identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationKind {
    Trading,
    MiningOre,
    MiningGas,
    MiningCrystal,
    FactorySteel,
    FactoryFuel,
    FactoryElectronics,
    FactoryEngine,
    FactorySensors,
    Shipyard,
}

impl StationKind {
    pub const ALL: [StationKind; 10] = [
        StationKind::Trading,
        StationKind::MiningOre,
        StationKind::MiningGas,
        StationKind::MiningCrystal,
        StationKind::FactorySteel,
        StationKind::FactoryFuel,
        StationKind::FactoryElectronics,
        StationKind::FactoryEngine,
        StationKind::FactorySensors,
        StationKind::Shipyard,
    ];

    /// Display suffix used when naming generated stations.
    pub fn display_suffix(self) -> &'static str {
        match self {
            StationKind::Trading => "Outpost",
            StationKind::MiningOre => "Iron Mine",
            StationKind::MiningGas => "Gas Collector",
            StationKind::MiningCrystal => "Crystal Siphon",
            StationKind::FactorySteel => "Steelworks",
            StationKind::FactoryFuel => "Refinery",
            StationKind::FactoryElectronics => "Chip Plant",
            StationKind::FactoryEngine => "Engine Fact.",
            StationKind::FactorySensors => "Sensor Lab",
            StationKind::Shipyard => "Shipyard",
        }
    }
}

/// One input or output of a production rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRate {
    pub item: ItemId,
    pub rate: u32,
}

impl ItemRate {
    pub const fn new(item: ItemId, rate: u32) -> Self {
        Self { item, rate }
    }
}

/// Resource conversion performed once per interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRule {
    #[serde(default)]
    pub consumes: Vec<ItemRate>,
    #[serde(default)]
    pub produces: Vec<ItemRate>,
    /// Milliseconds between production attempts.
    pub interval_ms: u64,
}

impl ProductionRule {
    pub fn consumes_item(&self, item: ItemId) -> bool {
        self.consumes.iter().any(|c| c.item == item)
    }

    pub fn produces_item(&self, item: ItemId) -> bool {
        self.produces.iter().any(|p| p.item == item)
    }
}

/// Static configuration of a station kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Archetype {
    pub kind: StationKind,
    #[serde(default)]
    pub production: Option<ProductionRule>,
    #[serde(default)]
    pub init_inventory: Stock,
}

impl Archetype {
    /// Initial (target) stock for an item, if the archetype defines one.
    pub fn target_stock(&self, item: ItemId) -> Option<u32> {
        self.init_inventory.get(&item).copied()
    }

    pub fn consumes(&self, item: ItemId) -> bool {
        self.production
            .as_ref()
            .map(|p| p.consumes_item(item))
            .unwrap_or(false)
    }
}

const COMMON_CONSUMPTION: [ItemRate; 2] = [
    ItemRate::new(ItemId::Food, 1),
    ItemRate::new(ItemId::Energy, 1),
];

fn with_common(extra: &[ItemRate]) -> Vec<ItemRate> {
    let mut v = COMMON_CONSUMPTION.to_vec();
    v.extend_from_slice(extra);
    v
}

fn stock(entries: &[(ItemId, u32)]) -> Stock {
    entries.iter().copied().collect()
}

/// Built-in archetype table.
pub fn builtin_archetypes() -> Vec<Archetype> {
    use ItemId::*;

    let rule = |consumes: Vec<ItemRate>, produces: Vec<ItemRate>, interval_ms: u64| {
        Some(ProductionRule {
            consumes,
            produces,
            interval_ms,
        })
    };

    vec![
        Archetype {
            kind: StationKind::Trading,
            production: rule(
                vec![],
                vec![ItemRate::new(Food, 50), ItemRate::new(Energy, 50)],
                5000,
            ),
            init_inventory: stock(&[(Food, 1000), (Energy, 1000)]),
        },
        Archetype {
            kind: StationKind::MiningOre,
            production: rule(with_common(&[]), vec![ItemRate::new(Ore, 5)], 2000),
            init_inventory: stock(&[(Food, 100), (Energy, 100), (Ore, 0)]),
        },
        Archetype {
            kind: StationKind::MiningGas,
            production: rule(with_common(&[]), vec![ItemRate::new(Gas, 5)], 2000),
            init_inventory: stock(&[(Food, 100), (Energy, 100), (Gas, 0)]),
        },
        Archetype {
            kind: StationKind::MiningCrystal,
            production: rule(with_common(&[]), vec![ItemRate::new(Crystal, 3)], 3000),
            init_inventory: stock(&[(Food, 100), (Energy, 100), (Crystal, 0)]),
        },
        Archetype {
            kind: StationKind::FactorySteel,
            production: rule(
                with_common(&[ItemRate::new(Ore, 5)]),
                vec![ItemRate::new(Steel, 2)],
                3000,
            ),
            init_inventory: stock(&[(Food, 100), (Energy, 100), (Ore, 0), (Steel, 0)]),
        },
        Archetype {
            kind: StationKind::FactoryFuel,
            production: rule(
                with_common(&[ItemRate::new(Gas, 5)]),
                vec![ItemRate::new(Fuel, 2)],
                3000,
            ),
            init_inventory: stock(&[(Food, 100), (Energy, 100), (Gas, 0), (Fuel, 0)]),
        },
        Archetype {
            kind: StationKind::FactoryElectronics,
            production: rule(
                with_common(&[ItemRate::new(Crystal, 5)]),
                vec![ItemRate::new(Electronics, 2)],
                4000,
            ),
            init_inventory: stock(&[(Food, 100), (Energy, 100), (Crystal, 0), (Electronics, 0)]),
        },
        Archetype {
            kind: StationKind::FactoryEngine,
            production: rule(
                with_common(&[ItemRate::new(Steel, 2), ItemRate::new(Fuel, 2)]),
                vec![ItemRate::new(Engine, 1)],
                5000,
            ),
            init_inventory: stock(&[
                (Food, 100),
                (Energy, 100),
                (Steel, 0),
                (Fuel, 0),
                (Engine, 0),
            ]),
        },
        Archetype {
            kind: StationKind::FactorySensors,
            production: rule(
                with_common(&[ItemRate::new(Electronics, 2), ItemRate::new(Crystal, 1)]),
                vec![ItemRate::new(Sensors, 1)],
                5000,
            ),
            init_inventory: stock(&[
                (Food, 100),
                (Energy, 100),
                (Electronics, 0),
                (Crystal, 0),
                (Sensors, 0),
            ]),
        },
        Archetype {
            kind: StationKind::Shipyard,
            production: rule(
                with_common(&[
                    ItemRate::new(Engine, 1),
                    ItemRate::new(Sensors, 1),
                    ItemRate::new(Steel, 5),
                ]),
                vec![ItemRate::new(Spaceship, 1)],
                10000,
            ),
            init_inventory: stock(&[
                (Food, 500),
                (Energy, 500),
                (Engine, 10),
                (Sensors, 10),
                (Steel, 50),
                (Spaceship, 0),
            ]),
        },
    ]
}
