//! Full engine tick over the built-in universe with a large trader fleet.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use starlane_core::engine::SimulationEngine;
use starlane_logic::catalog::Catalog;
use starlane_logic::config::SimConfig;
use starlane_logic::universe::SectorGraph;

const AGENTS: usize = 200;

fn busy_engine() -> SimulationEngine {
    let mut config = SimConfig::default();
    config.world.initial_traders = AGENTS;
    config.population.max_agents = AGENTS + 50;
    let mut engine =
        SimulationEngine::with_setup(Catalog::builtin(), SectorGraph::builtin(), config, 7)
            .expect("bench config is valid");
    engine.generate();
    // Let routes get committed and a few fights start.
    for _ in 0..300 {
        engine.update(0.1);
    }
    engine
}

fn bench_tick(c: &mut Criterion) {
    c.bench_function("engine_tick_200_agents", |b| {
        b.iter_batched_ref(
            busy_engine,
            |engine| {
                for _ in 0..10 {
                    black_box(engine.update(1.0 / 60.0));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
