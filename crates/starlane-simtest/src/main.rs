//! Starlane Headless Simulation Harness
//!
//! Runs the full engine over the built-in universe for one simulated hour
//! and checks economy, combat and pathing invariants along the way.
//! No rendering, no input; everything runs in-process.
//!
//! Usage:
//!   cargo run -p starlane-simtest
//!   cargo run -p starlane-simtest -- --verbose
//!   cargo run -p starlane-simtest -- --json
//!   RUST_LOG=debug cargo run -p starlane-simtest

use std::collections::HashSet;

use serde::Serialize;

use starlane_core::components::*;
use starlane_core::prelude::{Intent, SimulationEngine};
use starlane_logic::catalog::Catalog;
use starlane_logic::items::ItemId;
use starlane_logic::pathfinding::PathTable;
use starlane_logic::pricing::{ceiling_price, floor_price};
use starlane_logic::stations::StationKind;
use starlane_logic::universe::{SectorGraph, SectorId};

const SEED: u64 = 2024;
const TICK_SECONDS: f32 = 0.1;
const SIM_SECONDS: u32 = 3600;
/// Invariants are checked once per simulated minute.
const CHECK_EVERY: u32 = 600;

// ── Test harness ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let verbose = std::env::args().any(|a| a == "--verbose");
    let json = std::env::args().any(|a| a == "--json");
    println!("=== Starlane Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Static data
    results.extend(validate_catalog(verbose));

    // 2. Pathing over the built-in map
    results.extend(validate_paths(verbose));

    // 3. Price curve sweep
    results.extend(validate_pricing(verbose));

    // 4. Generated universe
    results.extend(validate_generation(verbose));

    // 5. One hour of full simulation
    results.extend(run_simulation(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!("\n=== RESULT: {}/{} passed, {} failed ===", passed, results.len(), failed);

    if json {
        match serde_json::to_string_pretty(&results) {
            Ok(text) => println!("{}", text),
            Err(e) => log::error!("Could not encode results: {}", e),
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Catalog ──────────────────────────────────────────────────────────

fn validate_catalog(verbose: bool) -> Vec<TestResult> {
    println!("--- Catalog ---");
    let catalog = Catalog::builtin();
    let mut results = Vec::new();

    let missing: Vec<_> = ItemId::ALL.iter().filter(|id| catalog.item(**id).is_none()).collect();
    results.push(TestResult::new(
        "catalog_items_complete",
        missing.is_empty(),
        format!("{} items defined, missing {:?}", ItemId::ALL.len() - missing.len(), missing),
    ));

    let no_archetype: Vec<_> = StationKind::ALL
        .iter()
        .filter(|k| catalog.archetype(**k).is_none())
        .collect();
    results.push(TestResult::new(
        "catalog_archetypes_complete",
        no_archetype.is_empty(),
        format!("missing archetypes: {:?}", no_archetype),
    ));

    // Every consumed item must be produced somewhere, or nobody can haul it.
    let produced: HashSet<ItemId> = catalog
        .archetypes()
        .filter_map(|a| a.production.as_ref())
        .flat_map(|r| r.produces.iter().map(|o| o.item))
        .collect();
    let orphans: Vec<ItemId> = catalog
        .archetypes()
        .filter_map(|a| a.production.as_ref())
        .flat_map(|r| r.consumes.iter().map(|i| i.item))
        .filter(|item| !produced.contains(item))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    results.push(TestResult::new(
        "catalog_inputs_have_producers",
        orphans.is_empty(),
        format!("unproduced inputs: {:?}", orphans),
    ));

    if verbose {
        println!("  {} items, {} archetypes", ItemId::ALL.len(), StationKind::ALL.len());
    }
    results
}

// ── 2. Paths ────────────────────────────────────────────────────────────

fn validate_paths(verbose: bool) -> Vec<TestResult> {
    println!("--- Pathing ---");
    let graph = SectorGraph::builtin();
    let paths = PathTable::build(&graph);
    let mut results = Vec::new();

    let ids: Vec<SectorId> = graph.sectors().iter().map(|s| s.id).collect();
    let mut unreachable = 0;
    let mut broken = 0;
    let mut longest = 0;
    for &a in &ids {
        for &b in &ids {
            match paths.find_path(a, b) {
                None => unreachable += 1,
                Some(path) => {
                    longest = longest.max(path.len());
                    // Each step must follow a real connection.
                    let mut here = a;
                    for &next in path {
                        if !graph.neighbors(here).contains(&next) {
                            broken += 1;
                        }
                        here = next;
                    }
                    if here != b {
                        broken += 1;
                    }
                }
            }
        }
    }
    results.push(TestResult::new(
        "paths_all_pairs_reachable",
        unreachable == 0,
        format!("{} unreachable pairs of {}", unreachable, ids.len() * ids.len()),
    ));
    results.push(TestResult::new(
        "paths_follow_connections",
        broken == 0,
        format!("{} broken steps, longest path {} jumps", broken, longest),
    ));
    results.push(TestResult::new(
        "paths_self_is_empty",
        ids.iter().all(|&id| paths.find_path(id, id) == Some(&[][..])),
        "find_path(a, a) is empty for every sector",
    ));

    if verbose {
        println!("  {} sectors, longest route {} jumps", ids.len(), longest);
    }
    results
}

// ── 3. Pricing ──────────────────────────────────────────────────────────

fn validate_pricing(verbose: bool) -> Vec<TestResult> {
    println!("--- Pricing ---");
    let catalog = Catalog::builtin();
    let mut out_of_bounds = 0;
    let mut rising = 0;
    let mut samples = 0;

    for kind in StationKind::ALL {
        for item in ItemId::ALL {
            let base = catalog.base_price(item);
            let mut last = i64::MAX;
            for stock in (0..=3000).step_by(25) {
                let price = catalog.price(kind, item, stock);
                samples += 1;
                if price < floor_price(base) || price > ceiling_price(base) {
                    out_of_bounds += 1;
                }
                if price > last {
                    rising += 1;
                }
                last = price;
            }
        }
    }

    if verbose {
        println!("  {} price samples", samples);
    }
    vec![
        TestResult::new(
            "pricing_within_bounds",
            out_of_bounds == 0,
            format!("{} of {} samples out of bounds", out_of_bounds, samples),
        ),
        TestResult::new(
            "pricing_non_increasing",
            rising == 0,
            format!("{} price rises with growing stock", rising),
        ),
    ]
}

// ── 4. Generation ───────────────────────────────────────────────────────

fn validate_generation(verbose: bool) -> Vec<TestResult> {
    println!("--- Generation ---");
    let mut engine = SimulationEngine::with_seed(SEED);
    engine.generate();
    let mut results = Vec::new();

    let stations = engine.station_count();
    results.push(TestResult::new(
        "generation_stations",
        stations == 31,
        format!("{} stations", stations),
    ));

    let gates = engine.navigator.gate_count();
    let expected = engine.graph.connections().len() * 2;
    results.push(TestResult::new(
        "generation_gates",
        gates == expected,
        format!("{} gates for {} connections", gates, expected / 2),
    ));
    results.push(TestResult::new(
        "generation_gates_reciprocal",
        gate_errors(&engine.world) == 0,
        "every gate leads to a gate that leads back",
    ));

    let traders = engine.agent_count(Faction::Trader);
    let wanted = engine.config.world.initial_traders;
    results.push(TestResult::new(
        "generation_traders",
        traders == wanted,
        format!("{} of {} traders", traders, wanted),
    ));

    if verbose {
        println!("  {} stations, {} gates, {} traders", stations, gates, traders);
    }
    results
}

fn gate_errors(world: &hecs::World) -> usize {
    world
        .query::<(&Gate, &InSector)>()
        .iter()
        .filter(|(entity, (gate, sector))| {
            let back = world.get::<&Gate>(gate.destination_gate).ok().map(|g| *g);
            let there = world.get::<&InSector>(gate.destination_gate).ok().map(|s| s.0);
            back.map_or(true, |b| b.destination_gate != *entity || b.destination_sector != sector.0)
                || there != Some(gate.destination_sector)
        })
        .count()
}

// ── 5. Full simulation ─────────────────────────────────────────────────

#[derive(Default)]
struct Violations {
    overloaded: usize,
    dangling_participants: usize,
    gate_errors: usize,
    stale_targets: usize,
}

fn check_world(world: &hecs::World, v: &mut Violations) {
    for (_, (cargo, capacity)) in world.query::<(&Cargo, &CargoCapacity)>().iter() {
        if cargo.total() > capacity.0 {
            v.overloaded += 1;
        }
    }
    for (_, zone) in world.query::<&EncounterZone>().iter() {
        v.dangling_participants +=
            zone.participants.iter().filter(|p| !world.contains(**p)).count();
    }
    for (_, encounter) in world.query::<&CombatEncounter>().iter() {
        if !world.contains(encounter.encounter) {
            v.dangling_participants += 1;
        }
    }
    for (_, target) in world.query::<&CombatTarget>().iter() {
        if !world.contains(target.0) {
            v.stale_targets += 1;
        }
    }
    v.gate_errors += gate_errors(world);
}

fn run_simulation(verbose: bool) -> Vec<TestResult> {
    println!("--- Simulation ({} simulated seconds) ---", SIM_SECONDS);
    let mut engine = SimulationEngine::with_seed(SEED);
    engine.generate();
    let player = engine.spawn_player(SectorId(2));
    let destination = SectorId(5);
    let plotted = engine.apply_intent(Intent::SetDestination { sector: destination });

    let ticks = (SIM_SECONDS as f32 / TICK_SECONDS).round() as u32;
    let mut violations = Violations::default();
    let mut productions = 0;
    let mut spawned = (0, 0, 0);
    let mut player_arrival: Option<f64> = None;

    for tick in 1..=ticks {
        let report = engine.update(TICK_SECONDS);
        productions += report.productions;
        spawned.0 += report.spawns.traders;
        spawned.1 += report.spawns.pirates;
        spawned.2 += report.spawns.hunters;

        if player_arrival.is_none() {
            let sector = engine.world.get::<&InSector>(player).map(|s| s.0).ok();
            if sector == Some(destination) {
                player_arrival = Some(engine.sim_time_ms() / 1000.0);
            }
        }

        if tick % CHECK_EVERY == 0 {
            check_world(&engine.world, &mut violations);
            if verbose {
                println!(
                    "  t={:>5.0}s traders={:<3} pirates={:<3} hunters={:<3} encounters={}",
                    engine.sim_time_ms() / 1000.0,
                    engine.agent_count(Faction::Trader),
                    engine.agent_count(Faction::Pirate),
                    engine.agent_count(Faction::BountyHunter),
                    engine.world.query::<&EncounterZone>().iter().count(),
                );
            }
        }
    }

    let analytics = engine.analytics();
    let trade_successes: u32 = analytics
        .buckets()
        .iter()
        .flat_map(|b| b.trade_successes.values())
        .sum();
    let total_kills: u32 = engine
        .sector_overview()
        .iter()
        .map(|s| s.total_kills)
        .sum();
    let max_agents = engine.config.population.max_agents;
    let agents = engine.agent_count(Faction::Trader)
        + engine.agent_count(Faction::Pirate)
        + engine.agent_count(Faction::BountyHunter);

    let mut results = vec![
        TestResult::new(
            "sim_production_runs",
            productions > 0,
            format!("{} production cycles", productions),
        ),
        TestResult::new(
            "sim_trades_complete",
            trade_successes > 0,
            format!(
                "{} purchases in the last {} buckets",
                trade_successes,
                analytics.buckets().len()
            ),
        ),
        TestResult::new(
            "sim_history_sampled",
            !analytics.history().is_empty(),
            format!("{} economy samples", analytics.history().len()),
        ),
        TestResult::new(
            "sim_agent_cap",
            agents <= max_agents,
            format!("{} agents alive (cap {})", agents, max_agents),
        ),
        TestResult::new(
            "sim_cargo_within_capacity",
            violations.overloaded == 0,
            format!("{} overloaded holds", violations.overloaded),
        ),
        TestResult::new(
            "sim_encounters_consistent",
            violations.dangling_participants == 0,
            format!("{} dangling encounter references", violations.dangling_participants),
        ),
        TestResult::new(
            "sim_targets_alive",
            violations.stale_targets == 0,
            format!("{} targets pointing at dead ships", violations.stale_targets),
        ),
        TestResult::new(
            "sim_gates_reciprocal",
            violations.gate_errors == 0,
            format!("{} gate pairing errors", violations.gate_errors),
        ),
        TestResult::new(
            "sim_player_autopilot",
            plotted.is_ok() && player_arrival.is_some(),
            match player_arrival {
                Some(t) => format!("reached {} after {:.0}s", destination, t),
                None => format!("never reached {} ({:?})", destination, plotted),
            },
        ),
    ];

    if verbose {
        println!(
            "  spawned {} traders, {} pirates, {} hunters; {} kills",
            spawned.0, spawned.1, spawned.2, total_kills
        );
    }
    results.push(TestResult::new(
        "sim_clock",
        (engine.sim_time_ms() / 1000.0 - f64::from(SIM_SECONDS)).abs() < 1.0,
        format!("{:.1}s simulated", engine.sim_time_ms() / 1000.0),
    ));
    results
}
