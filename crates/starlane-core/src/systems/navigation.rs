//! Navigation - path table plus cached gate and station lookups.

use hecs::{Entity, World};
use std::collections::HashMap;

use super::movement::stop;
use crate::components::{Gate, InSector, Station, Transform};
use starlane_logic::geometry::Vec2;
use starlane_logic::pathfinding::PathTable;
use starlane_logic::universe::{SectorGraph, SectorId};

/// A gate as seen by navigation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateInfo {
    pub entity: Entity,
    pub sector: SectorId,
    pub pos: Vec2,
    pub destination_sector: SectorId,
    pub destination_gate: Entity,
}

/// Sector-level routing for agents and the autopilot.
///
/// The path table never changes after construction. Gate and station caches
/// are rebuilt by [`Navigator::refresh`] whenever the number of live gates or
/// stations differs from the cached count.
pub struct Navigator {
    paths: PathTable,
    /// (sector, neighbour) → gate in `sector` leading to `neighbour`.
    gates_by_link: HashMap<(SectorId, SectorId), GateInfo>,
    gates: HashMap<Entity, GateInfo>,
    stations_by_sector: HashMap<SectorId, Vec<Entity>>,
    gate_count: usize,
    station_count: usize,
}

impl Navigator {
    pub fn new(graph: &SectorGraph) -> Self {
        Self {
            paths: PathTable::build(graph),
            gates_by_link: HashMap::new(),
            gates: HashMap::new(),
            stations_by_sector: HashMap::new(),
            gate_count: 0,
            station_count: 0,
        }
    }

    pub fn paths(&self) -> &PathTable {
        &self.paths
    }

    /// Rebuild stale caches. Returns true if anything was rebuilt.
    pub fn refresh(&mut self, world: &World) -> bool {
        let gate_count = world.query::<&Gate>().iter().count();
        let station_count = world.query::<&Station>().iter().count();
        let mut rebuilt = false;

        if gate_count != self.gate_count {
            self.rebuild_gates(world);
            self.gate_count = gate_count;
            rebuilt = true;
        }
        if station_count != self.station_count {
            self.rebuild_stations(world);
            self.station_count = station_count;
            rebuilt = true;
        }
        rebuilt
    }

    fn rebuild_gates(&mut self, world: &World) {
        self.gates.clear();
        self.gates_by_link.clear();
        for (entity, (gate, transform, sector)) in
            world.query::<(&Gate, &Transform, &InSector)>().iter()
        {
            let info = GateInfo {
                entity,
                sector: sector.0,
                pos: transform.pos,
                destination_sector: gate.destination_sector,
                destination_gate: gate.destination_gate,
            };
            self.gates.insert(entity, info);
            self.gates_by_link
                .insert((sector.0, gate.destination_sector), info);
        }
        log::trace!("Navigator: cached {} gates", self.gates.len());
    }

    fn rebuild_stations(&mut self, world: &World) {
        self.stations_by_sector.clear();
        for (entity, (_, sector)) in world.query::<(&Station, &InSector)>().iter() {
            self.stations_by_sector
                .entry(sector.0)
                .or_default()
                .push(entity);
        }
    }

    /// Gate in `current` that leads directly to `next`.
    pub fn gate_towards(&self, current: SectorId, next: SectorId) -> Option<&GateInfo> {
        self.gates_by_link.get(&(current, next))
    }

    pub fn gate(&self, entity: Entity) -> Option<&GateInfo> {
        self.gates.get(&entity)
    }

    /// First gate to fly to when travelling from `current` towards `destination`.
    pub fn next_gate(&self, current: SectorId, destination: SectorId) -> Option<&GateInfo> {
        let next = self.paths.next_hop(current, destination)?;
        self.gate_towards(current, next)
    }

    pub fn stations_in(&self, sector: SectorId) -> &[Entity] {
        self.stations_by_sector
            .get(&sector)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Cached gates located in `sector`.
    pub fn gates_in(&self, sector: SectorId) -> impl Iterator<Item = &GateInfo> {
        self.gates.values().filter(move |g| g.sector == sector)
    }

    pub fn gate_count(&self) -> usize {
        self.gate_count
    }
}

/// Move a ship through a gate: new sector, new position, zero velocity.
pub fn jump(world: &mut World, entity: Entity, sector: SectorId, pos: Vec2) {
    if let Ok(mut in_sector) = world.get::<&mut InSector>(entity) {
        in_sector.0 = sector;
    }
    if let Ok(mut transform) = world.get::<&mut Transform>(entity) {
        transform.pos = pos;
    }
    stop(world, entity);
    log::debug!("{:?} jumped to {}", entity, sector);
}
