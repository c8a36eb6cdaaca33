//! Read-only views of the simulation for renderers and UIs.

use hecs::{Entity, World};
use serde::Serialize;

use crate::components::{
    CombatStats, EncounterZone, Faction, Gate, InSector, PlayerControl, Station, Transform,
};
use crate::systems::{sector_wealth, Analytics};
use starlane_logic::catalog::Catalog;
use starlane_logic::items::Credits;
use starlane_logic::universe::{SectorGraph, SectorId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Station,
    Gate,
    Ship,
    Encounter,
}

/// One drawable entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySnapshot {
    #[serde(skip)]
    pub entity: Entity,
    pub id: u64,
    pub kind: EntityKind,
    pub sector: SectorId,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub faction: Option<Faction>,
    pub hull: Option<f32>,
    pub shields: Option<f32>,
    pub player: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectorOverview {
    pub sector: SectorId,
    pub name: String,
    pub wealth: Credits,
    pub recent_kills: u32,
    pub total_kills: u32,
}

fn kind_of(world: &World, entity: Entity) -> Option<EntityKind> {
    if world.get::<&Station>(entity).is_ok() {
        Some(EntityKind::Station)
    } else if world.get::<&Gate>(entity).is_ok() {
        Some(EntityKind::Gate)
    } else if world.get::<&EncounterZone>(entity).is_ok() {
        Some(EntityKind::Encounter)
    } else if world.get::<&Faction>(entity).is_ok() {
        Some(EntityKind::Ship)
    } else {
        None
    }
}

/// Every positioned entity, optionally limited to one sector.
pub fn snapshot(world: &World, sector: Option<SectorId>) -> Vec<EntitySnapshot> {
    let mut query = world.query::<(
        &InSector,
        &Transform,
        Option<&Faction>,
        Option<&CombatStats>,
        Option<&PlayerControl>,
    )>();
    query
        .iter()
        .filter(|(_, (s, ..))| sector.map_or(true, |id| s.0 == id))
        .filter_map(|(entity, (s, transform, faction, stats, player))| {
            Some(EntitySnapshot {
                entity,
                id: entity.to_bits().get(),
                kind: kind_of(world, entity)?,
                sector: s.0,
                x: transform.pos.x,
                y: transform.pos.y,
                rotation: transform.rotation,
                faction: faction.copied(),
                hull: stats.map(|c| c.hull),
                shields: stats.map(|c| c.shields),
                player: player.is_some(),
            })
        })
        .collect()
}

/// Wealth and kill tallies for every sector, in graph order.
pub fn sector_overview(
    world: &World,
    graph: &SectorGraph,
    catalog: &Catalog,
    analytics: &Analytics,
    now_ms: f64,
) -> Vec<SectorOverview> {
    graph
        .sectors()
        .iter()
        .map(|sector| SectorOverview {
            sector: sector.id,
            name: sector.name.clone(),
            wealth: sector_wealth(world, catalog, sector.id),
            recent_kills: analytics.recent_kills(sector.id, now_ms),
            total_kills: analytics.total_kills(sector.id),
        })
        .collect()
}
