//! Simulation engine - main entry point for running the simulation

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::components::{Faction, PlayerControl, Station};
use crate::generation::{generate_traders, generate_universe, spawn_player};
use crate::intents::{apply_intent, Intent, IntentError};
use crate::queries::{sector_overview, snapshot, EntitySnapshot, SectorOverview};
use crate::systems::*;
use starlane_logic::catalog::Catalog;
use starlane_logic::config::{ConfigError, SimConfig};
use starlane_logic::items::ItemId;
use starlane_logic::universe::{SectorGraph, SectorId};

/// Main simulation engine
pub struct SimulationEngine {
    /// ECS world containing all entities
    pub world: World,
    pub catalog: Catalog,
    pub graph: SectorGraph,
    pub config: SimConfig,
    pub navigator: Navigator,
    pub market: RouteMarket,
    pub combat: CombatState,
    pub spawner: Spawner,
    pub analytics: Analytics,
    rng: StdRng,
    /// Simulation time in milliseconds since start
    sim_time_ms: f64,
    player: Option<Entity>,
    time_scale: f32,
}

/// Counts of what one `update` did, for harnesses and logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub productions: usize,
    pub spawns: SpawnReport,
    pub market_rebuilt: bool,
}

impl SimulationEngine {
    /// Create an empty simulation over the built-in catalog and map.
    pub fn new() -> Self {
        Self::build(
            Catalog::builtin(),
            SectorGraph::builtin(),
            SimConfig::default(),
            StdRng::from_entropy(),
        )
    }

    /// Like [`SimulationEngine::new`], with a fixed random seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::build(
            Catalog::builtin(),
            SectorGraph::builtin(),
            SimConfig::default(),
            StdRng::seed_from_u64(seed),
        )
    }

    /// Create an empty simulation from custom static data. Fails if `config`
    /// does not validate.
    pub fn with_setup(
        catalog: Catalog,
        graph: SectorGraph,
        config: SimConfig,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(catalog, graph, config, StdRng::seed_from_u64(seed)))
    }

    fn build(catalog: Catalog, graph: SectorGraph, config: SimConfig, rng: StdRng) -> Self {
        Self {
            world: World::new(),
            navigator: Navigator::new(&graph),
            market: RouteMarket::new(config.market.clone()),
            combat: CombatState::new(),
            spawner: Spawner::new(config.population.clone()),
            analytics: Analytics::new(config.analytics.clone()),
            catalog,
            graph,
            config,
            rng,
            sim_time_ms: 0.0,
            player: None,
            time_scale: 1.0,
        }
    }

    /// Generate stations, gates and the opening trader population.
    pub fn generate(&mut self) {
        let (stations, gates) = generate_universe(
            &mut self.world,
            &self.graph,
            &self.catalog,
            &self.config.world,
            &mut self.rng,
        );
        let traders = generate_traders(
            &mut self.world,
            &self.graph,
            &self.config.loadouts,
            self.config.world.initial_traders,
            &mut self.rng,
        );
        self.navigator.refresh(&self.world);
        self.market.rebuild(&self.world, &self.catalog, self.navigator.paths());
        log::info!(
            "Generated {} sectors, {} stations, {} gates, {} traders",
            self.graph.sector_count(),
            stations.len(),
            gates.len(),
            traders.len()
        );
    }

    /// Spawn the player ship at the centre of `sector`, replacing any previous one.
    pub fn spawn_player(&mut self, sector: SectorId) -> Entity {
        if let Some(old) = self.player.take() {
            let _ = self.world.despawn(old);
        }
        let player =
            spawn_player(&mut self.world, &self.graph, sector, &self.config.loadouts.trader);
        self.player = Some(player);
        player
    }

    pub fn player(&self) -> Option<Entity> {
        self.player.filter(|p| self.world.contains(*p))
    }

    /// Advance the simulation by `delta_seconds` of wall time.
    pub fn update(&mut self, delta_seconds: f32) -> TickReport {
        let dt = delta_seconds * self.time_scale;
        self.sim_time_ms += f64::from(dt) * 1000.0;
        let now = self.sim_time_ms;
        let mut report = TickReport::default();

        report.productions = production_system(&mut self.world, &mut self.analytics, now);
        report.market_rebuilt = self
            .market
            .update(&self.world, &self.catalog, self.navigator.paths(), now);
        report.spawns = self.spawner.update(
            &mut self.world,
            &self.graph,
            &self.catalog,
            &self.config.loadouts,
            &mut self.rng,
            now,
        );
        self.navigator.refresh(&self.world);

        let ctx = TradeContext {
            catalog: &self.catalog,
            navigator: &self.navigator,
            market: &self.market,
            config: &self.config.trade,
        };
        trade_system(&mut self.world, &ctx, &mut self.analytics, &mut self.rng, now);
        combat_system(
            &mut self.world,
            &mut self.combat,
            &self.config.combat,
            &mut self.analytics,
            now,
            dt,
        );

        autopilot_system(&mut self.world, &self.navigator, &self.config.autopilot, dt);
        movement_system(&mut self.world, dt);
        player_gate_system(&mut self.world, &self.navigator, &self.config.autopilot);

        analytics_system(&self.world, &self.catalog, &mut self.analytics, now);
        report
    }

    /// Apply a player intent. Fails if there is no player ship.
    pub fn apply_intent(&mut self, intent: Intent) -> Result<(), IntentError> {
        let player = self.player().ok_or(IntentError::NoPlayer)?;
        apply_intent(&mut self.world, self.navigator.paths(), player, intent)
    }

    /// Nearest station the player could dock at.
    pub fn dockable_station(&self) -> Option<Entity> {
        dockable_station(&self.world, &self.navigator, self.player()?)
    }

    pub fn player_buy(&mut self, item: ItemId, amount: u32) -> Result<TradeReceipt, TradeError> {
        let player = self.player().ok_or(TradeError::NotDocked)?;
        player_buy(&mut self.world, &self.catalog, player, item, amount)
    }

    pub fn player_sell(&mut self, item: ItemId, amount: u32) -> Result<TradeReceipt, TradeError> {
        let player = self.player().ok_or(TradeError::NotDocked)?;
        player_sell(&mut self.world, &self.catalog, player, item, amount)
    }

    pub fn snapshot(&self, sector: Option<SectorId>) -> Vec<EntitySnapshot> {
        snapshot(&self.world, sector)
    }

    pub fn trade_listing(&self, station: Entity) -> Option<Vec<TradeListing>> {
        trade_listing(&self.world, &self.catalog, station)
    }

    pub fn sector_overview(&self) -> Vec<SectorOverview> {
        sector_overview(&self.world, &self.graph, &self.catalog, &self.analytics, self.sim_time_ms)
    }

    pub fn analytics(&self) -> &Analytics {
        &self.analytics
    }

    /// Set time scale (1.0 = real-time, 2.0 = 2x speed, etc.)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Simulation time in milliseconds
    pub fn sim_time_ms(&self) -> f64 {
        self.sim_time_ms
    }

    pub fn agent_count(&self, faction: Faction) -> usize {
        self.world
            .query::<&Faction>()
            .without::<&PlayerControl>()
            .iter()
            .filter(|(_, f)| **f == faction)
            .count()
    }

    pub fn station_count(&self) -> usize {
        self.world.query::<&Station>().iter().count()
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Docked, InSector, Transform};

    #[test]
    fn test_engine_creation() {
        let engine = SimulationEngine::with_seed(1);
        assert_eq!(engine.station_count(), 0);
        assert_eq!(engine.sim_time_ms(), 0.0);
        assert!(engine.player().is_none());
    }

    #[test]
    fn test_engine_generation() {
        let mut engine = SimulationEngine::with_seed(7);
        engine.generate();
        assert_eq!(engine.station_count(), 31);
        assert_eq!(engine.agent_count(Faction::Trader), 20);
        assert_eq!(engine.navigator.gate_count(), 26);
        assert!(!engine.market.is_empty());
    }

    #[test]
    fn test_engine_update() {
        let mut engine = SimulationEngine::with_seed(3);
        engine.generate();
        for _ in 0..600 {
            engine.update(0.1);
        }
        assert!((engine.sim_time_ms() - 60_000.0).abs() < 1.0);
        assert!(!engine.analytics().history().is_empty());
    }

    #[test]
    fn test_time_scale() {
        let mut engine = SimulationEngine::with_seed(1);
        engine.set_time_scale(2.0);
        engine.update(1.0);
        assert!((engine.sim_time_ms() - 2000.0).abs() < 1e-6);
        engine.set_time_scale(-3.0);
        assert_eq!(engine.time_scale(), 0.0);
    }

    #[test]
    fn test_setup_rejects_invalid_config() {
        let mut config = SimConfig::default();
        config.market.top_k = 0;
        let result =
            SimulationEngine::with_setup(Catalog::builtin(), SectorGraph::builtin(), config, 1);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "market.top_k",
                ..
            })
        ));
        let ok = SimulationEngine::with_setup(
            Catalog::builtin(),
            SectorGraph::builtin(),
            SimConfig::default(),
            1,
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn test_intents_need_a_player() {
        let mut engine = SimulationEngine::with_seed(1);
        assert_eq!(engine.apply_intent(Intent::Undock), Err(IntentError::NoPlayer));
    }

    #[test]
    fn test_player_docks_and_trades() {
        let mut engine = SimulationEngine::with_seed(4);
        engine.generate();
        let player = engine.spawn_player(SectorId(1));
        let station = engine
            .snapshot(Some(SectorId(1)))
            .into_iter()
            .find(|s| s.kind == crate::queries::EntityKind::Station)
            .unwrap()
            .entity;
        let pos = engine.world.get::<&Transform>(station).unwrap().pos;
        engine.world.get::<&mut Transform>(player).unwrap().pos = pos;
        assert_eq!(engine.dockable_station(), Some(station));

        engine.apply_intent(Intent::Dock { station }).unwrap();
        assert!(engine.world.get::<&Docked>(player).is_ok());
        let listing = engine.trade_listing(station).unwrap();
        let item = listing.iter().find(|l| l.count > 0).unwrap().item;
        let receipt = engine.player_buy(item, 1).unwrap();
        assert_eq!(receipt.amount, 1);
        engine.apply_intent(Intent::Undock).unwrap();
        assert_eq!(engine.world.get::<&InSector>(player).unwrap().0, SectorId(1));
    }
}
