//! Population controller - keeps traders topped up and lets sector wealth
//! attract pirates, and pirates attract bounty hunters.

use hecs::World;
use rand::Rng;
use std::collections::HashMap;

use crate::components::{Faction, InSector, Inventory, Ledger, PlayerControl, Station, Wallet};
use crate::generation::{spawn_agent, spawn_point};
use starlane_logic::catalog::Catalog;
use starlane_logic::config::{LoadoutConfig, PopulationConfig};
use starlane_logic::items::Credits;
use starlane_logic::population::{jittered_interval, pirates_for_wealth_delta, spawn_allowance};
use starlane_logic::universe::{SectorGraph, SectorId};

#[derive(Debug, Clone, Copy)]
struct SectorTimer {
    next_check_ms: f64,
    /// Wealth at the previous check; `None` until the first check.
    last_wealth: Option<Credits>,
}

/// Per-sector spawn timers.
#[derive(Debug, Clone)]
pub struct Spawner {
    config: PopulationConfig,
    timers: HashMap<SectorId, SectorTimer>,
}

/// What one population pass spawned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnReport {
    pub traders: u32,
    pub pirates: u32,
    pub hunters: u32,
}

#[derive(Debug, Clone, Copy, Default)]
struct Headcount {
    traders: usize,
    hunters: usize,
    total: usize,
}

fn headcount(world: &World) -> Headcount {
    let mut count = Headcount::default();
    for (_, faction) in world.query::<&Faction>().without::<&PlayerControl>().iter() {
        count.total += 1;
        match faction {
            Faction::Trader => count.traders += 1,
            Faction::BountyHunter => count.hunters += 1,
            Faction::Pirate => {}
        }
    }
    count
}

/// Station wallets plus stock at base price plus the realized profit of
/// traders currently in `sector`.
pub fn sector_wealth(world: &World, catalog: &Catalog, sector: SectorId) -> Credits {
    let stations: Credits = world
        .query::<(&Station, &InSector, &Wallet, &Inventory)>()
        .iter()
        .filter(|(_, (_, s, _, _))| s.0 == sector)
        .map(|(_, (_, _, wallet, inventory))| wallet.0 + catalog.stock_value(&inventory.0))
        .sum();
    let traders: Credits = world
        .query::<(&Faction, &InSector, &Ledger)>()
        .iter()
        .filter(|(_, (f, s, _))| **f == Faction::Trader && s.0 == sector)
        .map(|(_, (_, _, ledger))| ledger.realized_profit)
        .sum();
    stations + traders
}

impl Spawner {
    pub fn new(config: PopulationConfig) -> Self {
        Self {
            config,
            timers: HashMap::new(),
        }
    }

    fn schedule(&self, now_ms: f64, rng: &mut impl Rng) -> f64 {
        let interval = jittered_interval(
            self.config.check_interval_ms,
            self.config.check_jitter_ms,
            rng.gen(),
        );
        now_ms + interval
    }

    /// Run every sector whose check is due.
    pub fn update(
        &mut self,
        world: &mut World,
        graph: &SectorGraph,
        catalog: &Catalog,
        loadouts: &LoadoutConfig,
        rng: &mut impl Rng,
        now_ms: f64,
    ) -> SpawnReport {
        let mut report = SpawnReport::default();

        for sector in graph.sectors() {
            let id = sector.id;
            let timer = match self.timers.get(&id).copied() {
                Some(timer) => timer,
                None => {
                    let timer = SectorTimer {
                        next_check_ms: self.schedule(now_ms, rng),
                        last_wealth: None,
                    };
                    self.timers.insert(id, timer);
                    timer
                }
            };
            if now_ms < timer.next_check_ms {
                continue;
            }

            let wealth = self.check_sector(
                world,
                graph,
                catalog,
                loadouts,
                rng,
                now_ms,
                id,
                timer.last_wealth,
                &mut report,
            );
            let next_check_ms = self.schedule(now_ms, rng);
            self.timers.insert(
                id,
                SectorTimer {
                    next_check_ms,
                    last_wealth: Some(wealth),
                },
            );
        }

        if report != SpawnReport::default() {
            log::info!(
                "Spawn wave: {} traders, {} pirates, {} bounty hunters",
                report.traders,
                report.pirates,
                report.hunters
            );
        }
        report
    }

    #[allow(clippy::too_many_arguments)]
    fn check_sector(
        &self,
        world: &mut World,
        graph: &SectorGraph,
        catalog: &Catalog,
        loadouts: &LoadoutConfig,
        rng: &mut impl Rng,
        now_ms: f64,
        sector: SectorId,
        last_wealth: Option<Credits>,
        report: &mut SpawnReport,
    ) -> Credits {
        let config = &self.config;

        let count = headcount(world);
        if count.traders < config.min_traders
            && count.total < config.max_agents
            && rng.gen_bool(config.trader_spawn_chance)
        {
            let pos = spawn_point(graph, sector, rng);
            spawn_agent(world, Faction::Trader, sector, pos, &loadouts.trader);
            report.traders += 1;
        }

        let wealth = sector_wealth(world, catalog, sector);
        if let Some(last) = last_wealth {
            if now_ms >= config.pirate_grace_ms {
                let wanted = pirates_for_wealth_delta(
                    wealth - last,
                    config.wealth_threshold,
                    config.max_pirates_per_wave,
                );
                let allowed = spawn_allowance(wanted, headcount(world).total, config.max_agents);
                for _ in 0..allowed {
                    let pos = spawn_point(graph, sector, rng);
                    spawn_agent(world, Faction::Pirate, sector, pos, &loadouts.pirate);
                }
                if allowed > 0 {
                    log::info!(
                        "{} pirates drawn to {} by {} new wealth",
                        allowed,
                        sector,
                        wealth - last
                    );
                }
                report.pirates += allowed;
            }
        }

        let pirates = world
            .query::<(&Faction, &InSector)>()
            .iter()
            .filter(|(_, (f, s))| **f == Faction::Pirate && s.0 == sector)
            .count();
        for _ in 0..pirates {
            let count = headcount(world);
            if count.hunters >= config.max_hunters || count.total >= config.max_agents {
                break;
            }
            if rng.gen_bool(config.hunter_spawn_chance) {
                let pos = spawn_point(graph, sector, rng);
                spawn_agent(world, Faction::BountyHunter, sector, pos, &loadouts.bounty_hunter);
                report.hunters += 1;
            }
        }

        wealth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{CombatStats, Transform};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use starlane_logic::geometry::Vec2;
    use starlane_logic::stations::StationKind;

    fn count(world: &World, faction: Faction, sector: Option<SectorId>) -> usize {
        world
            .query::<(&Faction, &InSector)>()
            .iter()
            .filter(|(_, (f, s))| **f == faction && sector.map_or(true, |id| s.0 == id))
            .count()
    }

    fn quiet_config() -> PopulationConfig {
        PopulationConfig {
            min_traders: 0,
            hunter_spawn_chance: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_wealth_counts_stations_and_traders() {
        let catalog = Catalog::builtin();
        let mut world = World::new();
        world.spawn((
            Station {
                kind: StationKind::Trading,
                name: "Post".into(),
            },
            InSector(SectorId(2)),
            Wallet(1000),
            Inventory([(starlane_logic::items::ItemId::Food, 10)].into_iter().collect()),
        ));
        world.spawn((
            Faction::Trader,
            InSector(SectorId(2)),
            Ledger {
                realized_profit: 300,
                piracy_revenue: 0,
            },
        ));
        world.spawn((
            Faction::Trader,
            InSector(SectorId(3)),
            Ledger {
                realized_profit: 999,
                piracy_revenue: 0,
            },
        ));
        assert_eq!(sector_wealth(&world, &catalog, SectorId(2)), 1000 + 50 + 300);
    }

    #[test]
    fn test_first_check_only_records_baseline() {
        let catalog = Catalog::builtin();
        let graph = SectorGraph::builtin();
        let loadouts = LoadoutConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mut world = World::new();
        let post = world.spawn((
            Station {
                kind: StationKind::Trading,
                name: "Post".into(),
            },
            InSector(SectorId(1)),
            Wallet(0),
            Inventory::default(),
        ));
        let mut spawner = Spawner::new(quiet_config());

        // Registers timers; nothing is due yet.
        spawner.update(&mut world, &graph, &catalog, &loadouts, &mut rng, 60_000.0);
        // Sector 1 gets rich before its first check: still only a baseline.
        world.get::<&mut Wallet>(post).unwrap().0 = 100_000;
        let report = spawner.update(&mut world, &graph, &catalog, &loadouts, &mut rng, 80_000.0);
        assert_eq!(report.pirates, 0);

        // Next check sees the jump: 40k over a 5k threshold, capped at 3.
        world.get::<&mut Wallet>(post).unwrap().0 = 140_000;
        let report = spawner.update(&mut world, &graph, &catalog, &loadouts, &mut rng, 100_000.0);
        assert_eq!(report.pirates, 3);
        assert_eq!(count(&world, Faction::Pirate, Some(SectorId(1))), 3);
    }

    #[test]
    fn test_pirates_suppressed_during_grace() {
        let catalog = Catalog::builtin();
        let graph = SectorGraph::builtin();
        let loadouts = LoadoutConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut world = World::new();
        let post = world.spawn((
            Station {
                kind: StationKind::Trading,
                name: "Post".into(),
            },
            InSector(SectorId(1)),
            Wallet(0),
            Inventory::default(),
        ));
        let mut spawner = Spawner::new(quiet_config());
        spawner.update(&mut world, &graph, &catalog, &loadouts, &mut rng, 0.0);
        spawner.update(&mut world, &graph, &catalog, &loadouts, &mut rng, 15_000.0);
        world.get::<&mut Wallet>(post).unwrap().0 = 100_000;
        let report = spawner.update(&mut world, &graph, &catalog, &loadouts, &mut rng, 30_000.0);
        assert_eq!(report.pirates, 0);
    }

    #[test]
    fn test_trader_floor_and_agent_cap() {
        let catalog = Catalog::builtin();
        let graph = SectorGraph::builtin();
        let loadouts = LoadoutConfig::default();
        let mut rng = StdRng::seed_from_u64(9);
        let mut world = World::new();
        let mut spawner = Spawner::new(PopulationConfig {
            min_traders: 5,
            trader_spawn_chance: 1.0,
            max_agents: 3,
            hunter_spawn_chance: 0.0,
            ..Default::default()
        });
        spawner.update(&mut world, &graph, &catalog, &loadouts, &mut rng, 0.0);
        let report = spawner.update(&mut world, &graph, &catalog, &loadouts, &mut rng, 20_000.0);
        // Every sector is due, but the agent cap stops the floor at three.
        assert_eq!(report.traders, 3);
        assert_eq!(count(&world, Faction::Trader, None), 3);
    }

    #[test]
    fn test_hunters_follow_pirates() {
        let catalog = Catalog::builtin();
        let graph = SectorGraph::builtin();
        let loadouts = LoadoutConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        let mut world = World::new();
        for _ in 0..4 {
            world.spawn((
                Faction::Pirate,
                InSector(SectorId(8)),
                Transform::at(Vec2::ZERO),
                CombatStats::new(100.0, 50.0, 5.0),
            ));
        }
        let mut spawner = Spawner::new(PopulationConfig {
            min_traders: 0,
            hunter_spawn_chance: 1.0,
            max_hunters: 2,
            ..Default::default()
        });
        spawner.update(&mut world, &graph, &catalog, &loadouts, &mut rng, 0.0);
        let report = spawner.update(&mut world, &graph, &catalog, &loadouts, &mut rng, 20_000.0);
        assert_eq!(report.hunters, 2);
        assert_eq!(count(&world, Faction::BountyHunter, Some(SectorId(8))), 2);
    }
}
