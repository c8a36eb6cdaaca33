//! Agent and player ship spawning

use hecs::{Entity, World};
use rand::Rng;

use crate::components::*;
use starlane_logic::config::{LoadoutConfig, ShipLoadout};
use starlane_logic::geometry::Vec2;
use starlane_logic::universe::{SectorGraph, SectorId};

/// Half-width of the square around a sector centre that agents spawn in.
pub const SPAWN_SPREAD: f32 = 2000.0;

/// Spawn one AI ship.
pub fn spawn_agent(
    world: &mut World,
    faction: Faction,
    sector: SectorId,
    pos: Vec2,
    loadout: &ShipLoadout,
) -> Entity {
    world.spawn((
        faction,
        Pilot::new(),
        InSector(sector),
        Transform::at(pos),
        Velocity::default(),
        SpeedStats {
            max_speed: loadout.max_speed,
        },
        loadout.combat_stats(),
        Cargo::default(),
        CargoCapacity(loadout.cargo_capacity),
        Wallet(loadout.wallet),
        Ledger::default(),
    ))
}

/// Random point near the centre of `sector`, or the origin if it is unknown.
pub fn spawn_point(graph: &SectorGraph, sector: SectorId, rng: &mut impl Rng) -> Vec2 {
    let center = graph
        .sector(sector)
        .map(|s| s.world_center())
        .unwrap_or_default();
    center
        + Vec2::new(
            rng.gen_range(-SPAWN_SPREAD..SPAWN_SPREAD),
            rng.gen_range(-SPAWN_SPREAD..SPAWN_SPREAD),
        )
}

/// Scatter the opening trader population over random sectors.
pub fn generate_traders(
    world: &mut World,
    graph: &SectorGraph,
    loadouts: &LoadoutConfig,
    count: usize,
    rng: &mut impl Rng,
) -> Vec<Entity> {
    let sectors = graph.sectors();
    if sectors.is_empty() {
        return Vec::new();
    }
    (0..count)
        .map(|_| {
            let sector = sectors[rng.gen_range(0..sectors.len())].id;
            let pos = spawn_point(graph, sector, rng);
            spawn_agent(world, Faction::Trader, sector, pos, &loadouts.trader)
        })
        .collect()
}

/// Spawn the player's ship at the centre of `sector`.
///
/// The player carries a trader hull and cargo hold but no `Pilot`; it is
/// steered by intents through its `Autopilot`.
pub fn spawn_player(
    world: &mut World,
    graph: &SectorGraph,
    sector: SectorId,
    loadout: &ShipLoadout,
) -> Entity {
    let pos = graph
        .sector(sector)
        .map(|s| s.world_center())
        .unwrap_or_default();
    world.spawn((
        PlayerControl,
        Faction::Trader,
        Autopilot::default(),
        InSector(sector),
        Transform::at(pos),
        Velocity::default(),
        SpeedStats {
            max_speed: loadout.max_speed,
        },
        loadout.combat_stats(),
        Cargo::default(),
        CargoCapacity(loadout.cargo_capacity),
        Wallet(loadout.wallet),
        Ledger::default(),
    ))
}
