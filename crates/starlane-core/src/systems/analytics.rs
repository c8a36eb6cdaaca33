//! Analytics system - economy history, activity counters, kill tallies.

use hecs::World;
use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::components::{Faction, Inventory, Ledger, Station, Wallet};
use starlane_logic::catalog::Catalog;
use starlane_logic::config::AnalyticsConfig;
use starlane_logic::items::{Credits, ItemId};
use starlane_logic::universe::SectorId;

/// Counter buckets kept before the oldest is dropped.
const MAX_BUCKETS: usize = 60;

/// One point of the economy history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EconomySample {
    pub time_ms: f64,
    /// Station wallets plus inventory at base price.
    pub station_value: Credits,
    pub trader_profit: Credits,
    pub pirate_revenue: Credits,
}

/// Activity counters for one fixed-width window of sim time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CounterBucket {
    pub start_ms: f64,
    pub productions: BTreeMap<ItemId, u32>,
    pub trade_attempts: BTreeMap<ItemId, u32>,
    pub trade_successes: BTreeMap<ItemId, u32>,
}

#[derive(Debug, Clone)]
pub struct Analytics {
    config: AnalyticsConfig,
    history: VecDeque<EconomySample>,
    buckets: VecDeque<CounterBucket>,
    kills: VecDeque<(f64, SectorId)>,
    total_kills: HashMap<SectorId, u32>,
    last_sample_ms: f64,
}

impl Analytics {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self {
            config,
            history: VecDeque::new(),
            buckets: VecDeque::new(),
            kills: VecDeque::new(),
            total_kills: HashMap::new(),
            last_sample_ms: 0.0,
        }
    }

    fn bucket_mut(&mut self, now_ms: f64) -> &mut CounterBucket {
        let start = (now_ms / self.config.bucket_ms).floor() * self.config.bucket_ms;
        let stale = self.buckets.back().map_or(true, |b| b.start_ms < start);
        if stale {
            self.buckets.push_back(CounterBucket {
                start_ms: start,
                ..Default::default()
            });
            while self.buckets.len() > MAX_BUCKETS {
                self.buckets.pop_front();
            }
        }
        // Just pushed if it was missing.
        let last = self.buckets.len() - 1;
        &mut self.buckets[last]
    }

    pub fn record_production(&mut self, item: ItemId, now_ms: f64) {
        *self.bucket_mut(now_ms).productions.entry(item).or_insert(0) += 1;
    }

    pub fn record_trade(&mut self, item: ItemId, success: bool, now_ms: f64) {
        let bucket = self.bucket_mut(now_ms);
        *bucket.trade_attempts.entry(item).or_insert(0) += 1;
        if success {
            *bucket.trade_successes.entry(item).or_insert(0) += 1;
        }
    }

    pub fn record_kill(&mut self, sector: SectorId, now_ms: f64) {
        self.kills.push_back((now_ms, sector));
        *self.total_kills.entry(sector).or_insert(0) += 1;
    }

    /// Kills in `sector` within the configured window before `now_ms`.
    pub fn recent_kills(&self, sector: SectorId, now_ms: f64) -> u32 {
        let since = now_ms - self.config.kill_window_ms;
        self.kills
            .iter()
            .filter(|(t, s)| *s == sector && *t >= since)
            .count() as u32
    }

    pub fn total_kills(&self, sector: SectorId) -> u32 {
        self.total_kills.get(&sector).copied().unwrap_or(0)
    }

    pub fn history(&self) -> &VecDeque<EconomySample> {
        &self.history
    }

    pub fn buckets(&self) -> &VecDeque<CounterBucket> {
        &self.buckets
    }

    /// Totals of every retained bucket.
    pub fn production_totals(&self) -> BTreeMap<ItemId, u32> {
        let mut totals = BTreeMap::new();
        for bucket in &self.buckets {
            for (item, n) in &bucket.productions {
                *totals.entry(*item).or_insert(0) += n;
            }
        }
        totals
    }

    fn push_sample(&mut self, sample: EconomySample) {
        self.history.push_back(sample);
        while self.history.len() > self.config.history_len {
            self.history.pop_front();
        }
    }

    fn prune_kills(&mut self, now_ms: f64) {
        let since = now_ms - self.config.kill_window_ms;
        while self.kills.front().is_some_and(|(t, _)| *t < since) {
            self.kills.pop_front();
        }
    }
}

/// Take an economy sample if the sample interval has elapsed.
pub fn analytics_system(world: &World, catalog: &Catalog, analytics: &mut Analytics, now_ms: f64) {
    if now_ms - analytics.last_sample_ms <= analytics.config.sample_interval_ms {
        return;
    }
    analytics.last_sample_ms = now_ms;

    let mut station_value = 0;
    for (_, (_, wallet, inventory)) in world.query::<(&Station, &Wallet, &Inventory)>().iter() {
        station_value += wallet.0 + catalog.stock_value(&inventory.0);
    }

    let mut trader_profit = 0;
    let mut pirate_revenue = 0;
    for (_, (faction, ledger)) in world.query::<(&Faction, &Ledger)>().iter() {
        match faction {
            Faction::Trader => trader_profit += ledger.realized_profit,
            Faction::Pirate => pirate_revenue += ledger.piracy_revenue,
            Faction::BountyHunter => {}
        }
    }

    analytics.push_sample(EconomySample {
        time_ms: now_ms,
        station_value,
        trader_profit,
        pirate_revenue,
    });
    analytics.prune_kills(now_ms);
}

#[cfg(test)]
mod tests {
    use super::*;
    use starlane_logic::stations::StationKind;
    use starlane_logic::items::Stock;

    fn analytics() -> Analytics {
        Analytics::new(AnalyticsConfig::default())
    }

    #[test]
    fn test_counters_bucket_by_time() {
        let mut a = analytics();
        a.record_production(ItemId::Ore, 1000.0);
        a.record_production(ItemId::Ore, 9000.0);
        a.record_production(ItemId::Steel, 12_000.0);
        a.record_trade(ItemId::Ore, true, 12_500.0);
        a.record_trade(ItemId::Ore, false, 13_000.0);

        assert_eq!(a.buckets().len(), 2);
        assert_eq!(a.buckets()[0].productions[&ItemId::Ore], 2);
        assert_eq!(a.buckets()[1].start_ms, 10_000.0);
        assert_eq!(a.buckets()[1].trade_attempts[&ItemId::Ore], 2);
        assert_eq!(a.buckets()[1].trade_successes[&ItemId::Ore], 1);
        assert_eq!(a.production_totals()[&ItemId::Ore], 2);
    }

    #[test]
    fn test_recent_kills_window() {
        let mut a = analytics();
        a.record_kill(SectorId(8), 1000.0);
        a.record_kill(SectorId(8), 50_000.0);
        a.record_kill(SectorId(1), 50_000.0);
        assert_eq!(a.recent_kills(SectorId(8), 55_000.0), 2);
        assert_eq!(a.recent_kills(SectorId(8), 70_000.0), 1);
        assert_eq!(a.total_kills(SectorId(8)), 2);
    }

    #[test]
    fn test_sampling_is_throttled_and_capped() {
        let catalog = Catalog::builtin();
        let mut world = World::new();
        let stock: Stock = [(ItemId::Ore, 10)].into_iter().collect();
        world.spawn((
            Station {
                kind: StationKind::MiningOre,
                name: "Test Mine".into(),
            },
            Wallet(1000),
            Inventory(stock),
        ));
        world.spawn((Faction::Trader, Ledger {
            realized_profit: 250,
            piracy_revenue: 0,
        }));

        let mut a = Analytics::new(AnalyticsConfig {
            history_len: 3,
            ..Default::default()
        });
        analytics_system(&world, &catalog, &mut a, 400.0);
        assert!(a.history().is_empty());
        analytics_system(&world, &catalog, &mut a, 600.0);
        assert_eq!(a.history().len(), 1);
        assert_eq!(a.history()[0].station_value, 1000 + 100);
        assert_eq!(a.history()[0].trader_profit, 250);

        for i in 2..10 {
            analytics_system(&world, &catalog, &mut a, 600.0 * i as f64);
        }
        assert_eq!(a.history().len(), 3);
    }
}
