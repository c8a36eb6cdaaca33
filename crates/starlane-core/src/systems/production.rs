//! Production system - station resource conversion on a timer.

use hecs::World;

use super::analytics::Analytics;
use crate::components::{Inventory, Production, Station};
use starlane_logic::economy::{production_due, run_production, ProductionOutcome};

/// Run every station whose production interval has elapsed.
///
/// The timer restarts on every attempt, so a starved station waits a full
/// interval before trying again. Returns the number of successful cycles.
pub fn production_system(world: &mut World, analytics: &mut Analytics, now_ms: f64) -> usize {
    let mut produced = 0;

    for (_, (station, production, inventory)) in
        world.query_mut::<(&Station, &mut Production, &mut Inventory)>()
    {
        if !production_due(now_ms, production.last_tick_ms, production.rule.interval_ms) {
            continue;
        }
        production.last_tick_ms = now_ms;

        match run_production(&production.rule, &mut inventory.0) {
            ProductionOutcome::Produced => {
                produced += 1;
                for output in &production.rule.produces {
                    analytics.record_production(output.item, now_ms);
                }
            }
            ProductionOutcome::Starved(item) => {
                log::trace!("{} starved of {}", station.name, item);
            }
        }
    }

    produced
}
