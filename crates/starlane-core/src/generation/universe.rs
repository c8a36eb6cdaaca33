//! Universe generation - stations on a ring per sector, gates on the
//! cardinal edges, paired across every connection.

use hecs::{Entity, World};
use rand::Rng;
use std::collections::HashMap;

use crate::components::*;
use starlane_logic::catalog::Catalog;
use starlane_logic::config::WorldConfig;
use starlane_logic::geometry::Vec2;
use starlane_logic::layout::{
    assign_gate_slots, gate_position, station_ring_position, STATION_JITTER,
};
use starlane_logic::stations::StationKind;
use starlane_logic::universe::{SectorGraph, SectorId, SectorKind};

/// Stations built in a sector of each kind, in ring order.
pub fn station_mix(kind: SectorKind) -> &'static [StationKind] {
    use StationKind::*;
    match kind {
        SectorKind::Core => &[Shipyard, Trading, FactoryElectronics, FactoryEngine],
        SectorKind::Industrial => &[FactorySteel, FactoryFuel, FactorySensors, MiningOre],
        SectorKind::Mining => &[MiningOre, MiningGas, MiningCrystal],
        SectorKind::Frontier => &[Trading, MiningGas],
        SectorKind::Pirate => &[Trading],
    }
}

/// Spawn every sector's stations. Returns them in generation order.
pub fn generate_stations(
    world: &mut World,
    graph: &SectorGraph,
    catalog: &Catalog,
    config: &WorldConfig,
    rng: &mut impl Rng,
) -> Vec<Entity> {
    let mut stations = Vec::new();

    for sector in graph.sectors() {
        let center = sector.world_center();
        let mix = station_mix(sector.kind);

        for (index, &kind) in mix.iter().enumerate() {
            let Some(archetype) = catalog.archetype(kind) else {
                log::warn!("No archetype for {:?}; skipping station in {}", kind, sector.name);
                continue;
            };
            let jitter = Vec2::new(
                rng.gen_range(-STATION_JITTER..STATION_JITTER),
                rng.gen_range(-STATION_JITTER..STATION_JITTER),
            );
            let pos = station_ring_position(center, index, mix.len(), jitter);
            let name = format!("{} {} {}", sector.name, kind.display_suffix(), index + 1);

            let entity = world.spawn((
                Station { kind, name },
                InSector(sector.id),
                Transform::at(pos),
                Inventory(archetype.init_inventory.clone()),
                Wallet(config.station_wallet),
                InteractionRadius(config.dock_radius),
            ));
            if let Some(rule) = &archetype.production {
                let _ = world.insert_one(entity, Production::new(rule.clone()));
            }
            stations.push(entity);
        }
    }

    log::debug!("Generated {} stations", stations.len());
    stations
}

/// Spawn both ends of every connection and link them.
///
/// A gate whose sector has no free cardinal slot is dropped with a warning,
/// and so is the end it would have paired with.
pub fn generate_gates(world: &mut World, graph: &SectorGraph, config: &WorldConfig) -> Vec<Entity> {
    // Requests per sector in connection order, as (neighbour, dx, dy).
    let mut requests: Vec<(SectorId, Vec<(SectorId, f32, f32)>)> = Vec::new();
    let mut push = |sector: SectorId, neighbour: SectorId, dx: f32, dy: f32| {
        match requests.iter_mut().find(|(id, _)| *id == sector) {
            Some((_, list)) => list.push((neighbour, dx, dy)),
            None => requests.push((sector, vec![(neighbour, dx, dy)])),
        }
    };
    for conn in graph.connections() {
        let (Some(a), Some(b)) = (graph.sector(conn.from), graph.sector(conn.to)) else {
            continue;
        };
        push(a.id, b.id, b.x - a.x, b.y - a.y);
        push(b.id, a.id, a.x - b.x, a.y - b.y);
    }

    // (sector, neighbour) → gate entity
    let mut spawned: HashMap<(SectorId, SectorId), Entity> = HashMap::new();
    let mut order = Vec::new();
    for (sector_id, list) in requests {
        let Some(sector) = graph.sector(sector_id) else {
            continue;
        };
        let slots = assign_gate_slots(list);
        for neighbour in &slots.overflow {
            log::warn!(
                "Sector {} has no free gate slot for the link to {}",
                sector.name,
                neighbour
            );
        }
        for (dir, neighbour) in slots.placed {
            let pos = gate_position(sector.world_center(), dir);
            let entity = world.spawn((
                InSector(sector_id),
                Transform::at(pos),
                InteractionRadius(config.gate_radius),
            ));
            spawned.insert((sector_id, neighbour), entity);
            order.push((sector_id, neighbour, entity));
        }
    }

    let mut gates = Vec::new();
    for (sector, neighbour, entity) in order {
        match spawned.get(&(neighbour, sector)) {
            Some(&other) => {
                let _ = world.insert_one(
                    entity,
                    Gate {
                        destination_sector: neighbour,
                        destination_gate: other,
                    },
                );
                gates.push(entity);
            }
            None => {
                log::warn!("Gate {} → {} has no paired gate; removing it", sector, neighbour);
                let _ = world.despawn(entity);
            }
        }
    }

    log::debug!("Generated {} gates", gates.len());
    gates
}

/// Stations then gates for the whole graph.
pub fn generate_universe(
    world: &mut World,
    graph: &SectorGraph,
    catalog: &Catalog,
    config: &WorldConfig,
    rng: &mut impl Rng,
) -> (Vec<Entity>, Vec<Entity>) {
    let stations = generate_stations(world, graph, catalog, config, rng);
    let gates = generate_gates(world, graph, config);
    (stations, gates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use starlane_logic::layout::STATION_RING_RADIUS;
    use starlane_logic::universe::{Connection, Sector};

    #[test]
    fn test_builtin_station_mix() {
        let mut world = World::new();
        let graph = SectorGraph::builtin();
        let catalog = Catalog::builtin();
        let mut rng = StdRng::seed_from_u64(1);
        let stations =
            generate_stations(&mut world, &graph, &catalog, &WorldConfig::default(), &mut rng);
        // 2 core × 4 + 2 industrial × 4 + 2 mining × 3 + 2 frontier × 2 + 5 pirate × 1
        assert_eq!(stations.len(), 31);

        for e in stations {
            let station = world.get::<&Station>(e).unwrap();
            let sector = graph.sector(world.get::<&InSector>(e).unwrap().0).unwrap();
            assert!(station.name.starts_with(&sector.name));
            let pos = world.get::<&Transform>(e).unwrap().pos;
            let d = pos.distance(&sector.world_center());
            assert!((d - STATION_RING_RADIUS).abs() <= STATION_JITTER * 1.5);
            assert_eq!(world.get::<&Wallet>(e).unwrap().0, 10_000);
            let archetype = catalog.archetype(station.kind).unwrap();
            assert_eq!(world.get::<&Inventory>(e).unwrap().0, archetype.init_inventory);
        }
    }

    #[test]
    fn test_gates_are_reciprocal() {
        let mut world = World::new();
        let graph = SectorGraph::builtin();
        let gates = generate_gates(&mut world, &graph, &WorldConfig::default());
        assert_eq!(gates.len(), graph.connections().len() * 2);

        for e in gates {
            let gate = *world.get::<&Gate>(e).unwrap();
            let here = world.get::<&InSector>(e).unwrap().0;
            let back = *world.get::<&Gate>(gate.destination_gate).unwrap();
            assert_eq!(back.destination_gate, e);
            assert_eq!(back.destination_sector, here);
            assert_eq!(
                world.get::<&InSector>(gate.destination_gate).unwrap().0,
                gate.destination_sector
            );

            let center = graph.sector(here).unwrap().world_center();
            let pos = world.get::<&Transform>(e).unwrap().pos;
            assert!((pos.distance(&center) - 5000.0).abs() < 1e-2);
        }
    }

    #[test]
    fn test_gate_faces_neighbour() {
        let mut world = World::new();
        let graph = SectorGraph::builtin();
        generate_gates(&mut world, &graph, &WorldConfig::default());
        // Prime Core (400, 300) → Shadow Belt (200, 300) lies due west.
        let (pos, _) = world
            .query::<(&Transform, &Gate, &InSector)>()
            .iter()
            .map(|(_, (t, g, s))| (t.pos, (g.destination_sector, s.0)))
            .find(|(_, link)| *link == (SectorId(8), SectorId(1)))
            .unwrap();
        assert_eq!(pos, Vec2::new(400_000.0 - 5000.0, 300_000.0));
    }

    #[test]
    fn test_overflowing_hub_drops_both_ends() {
        let sectors = vec![
            Sector::new(1, "Hub", SectorKind::Core, 0.0, 0.0),
            Sector::new(2, "A", SectorKind::Frontier, 10.0, 0.0),
            Sector::new(3, "B", SectorKind::Frontier, -10.0, 0.0),
            Sector::new(4, "C", SectorKind::Frontier, 0.0, 10.0),
            Sector::new(5, "D", SectorKind::Frontier, 0.0, -10.0),
            Sector::new(6, "E", SectorKind::Frontier, 10.0, 10.0),
        ];
        let connections = (2..=6)
            .map(|n| Connection {
                from: SectorId(1),
                to: SectorId(n),
            })
            .collect();
        let graph = SectorGraph::new(sectors, connections).unwrap();
        let mut world = World::new();
        let gates = generate_gates(&mut world, &graph, &WorldConfig::default());
        // Hub keeps four links; the fifth is dropped at both ends.
        assert_eq!(gates.len(), 8);
        let to_e = world
            .query::<(&Gate, &InSector)>()
            .iter()
            .filter(|(_, (g, s))| g.destination_sector == SectorId(6) || s.0 == SectorId(6))
            .count();
        assert_eq!(to_e, 0);
        assert_eq!(world.query::<&InteractionRadius>().iter().count(), 8);
    }
}
