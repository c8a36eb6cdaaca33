//! Simulation tunables.
//!
//! `SimConfig` groups every knob the engine reads. All fields default to the
//! values in [`crate::constants`], so a JSON override only needs the keys it
//! changes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::{CombatStats, Faction};
use crate::constants;
use crate::items::Credits;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub refresh_interval_ms: f64,
    pub cargo_unit: u32,
    pub max_routes: usize,
    pub top_k: usize,
}

impl Default for MarketConfig {
    fn default() -> Self {
        use constants::market::*;
        Self {
            refresh_interval_ms: REFRESH_INTERVAL_MS,
            cargo_unit: CARGO_UNIT,
            max_routes: MAX_ROUTES,
            top_k: TOP_K,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeConfig {
    pub arrival_radius: f32,
    pub gate_exit_offset: f32,
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            arrival_radius: constants::trade::ARRIVAL_RADIUS,
            gate_exit_offset: constants::trade::GATE_EXIT_OFFSET,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub weapon_range: f32,
    pub weapon_damage: f32,
    pub fire_cooldown_ms: f64,
    pub shield_regen_delay_ms: f64,
    pub targeting_interval_ms: f64,
    pub encounter_radius: f32,
    pub hunter_engaged_bonus: f64,
    pub hunter_swarm_penalty: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        use constants::combat::*;
        Self {
            weapon_range: WEAPON_RANGE,
            weapon_damage: WEAPON_DAMAGE,
            fire_cooldown_ms: FIRE_COOLDOWN_MS,
            shield_regen_delay_ms: SHIELD_REGEN_DELAY_MS,
            targeting_interval_ms: TARGETING_INTERVAL_MS,
            encounter_radius: ENCOUNTER_RADIUS,
            hunter_engaged_bonus: HUNTER_ENGAGED_BONUS,
            hunter_swarm_penalty: HUNTER_SWARM_PENALTY,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub check_interval_ms: f64,
    pub check_jitter_ms: f64,
    pub min_traders: usize,
    pub trader_spawn_chance: f64,
    pub wealth_threshold: Credits,
    pub max_pirates_per_wave: u32,
    pub hunter_spawn_chance: f64,
    pub max_hunters: usize,
    pub pirate_grace_ms: f64,
    pub max_agents: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        use constants::population::*;
        Self {
            check_interval_ms: CHECK_INTERVAL_MS,
            check_jitter_ms: CHECK_JITTER_MS,
            min_traders: MIN_TRADERS,
            trader_spawn_chance: TRADER_SPAWN_CHANCE,
            wealth_threshold: WEALTH_THRESHOLD,
            max_pirates_per_wave: MAX_PIRATES_PER_WAVE,
            hunter_spawn_chance: HUNTER_SPAWN_CHANCE,
            max_hunters: MAX_HUNTERS,
            pirate_grace_ms: PIRATE_GRACE_MS,
            max_agents: MAX_AGENTS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotConfig {
    pub arrival_tolerance: f32,
    pub rotation_speed: f32,
    pub thrust: f32,
    pub max_speed: f32,
    pub align_tolerance: f32,
    pub brake_factor: f32,
    pub gate_clearance: f32,
    pub clearance_distance: f32,
    pub gate_jump_radius: f32,
    pub reentry_radius: f32,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        use constants::autopilot::*;
        Self {
            arrival_tolerance: ARRIVAL_TOLERANCE,
            rotation_speed: ROTATION_SPEED,
            thrust: THRUST,
            max_speed: MAX_SPEED,
            align_tolerance: ALIGN_TOLERANCE,
            brake_factor: BRAKE_FACTOR,
            gate_clearance: GATE_CLEARANCE,
            clearance_distance: CLEARANCE_DISTANCE,
            gate_jump_radius: GATE_JUMP_RADIUS,
            reentry_radius: REENTRY_RADIUS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub sample_interval_ms: f64,
    pub history_len: usize,
    pub bucket_ms: f64,
    pub kill_window_ms: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        use constants::analytics::*;
        Self {
            sample_interval_ms: SAMPLE_INTERVAL_MS,
            history_len: HISTORY_LEN,
            bucket_ms: BUCKET_MS,
            kill_window_ms: KILL_WINDOW_MS,
        }
    }
}

/// Starting stats of a spawned agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipLoadout {
    pub max_speed: f32,
    pub max_hull: f32,
    pub max_shields: f32,
    pub shield_recharge: f32,
    pub cargo_capacity: u32,
    pub wallet: Credits,
}

impl ShipLoadout {
    pub fn combat_stats(&self) -> CombatStats {
        CombatStats::new(self.max_hull, self.max_shields, self.shield_recharge)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadoutConfig {
    pub trader: ShipLoadout,
    pub pirate: ShipLoadout,
    pub bounty_hunter: ShipLoadout,
}

impl LoadoutConfig {
    pub fn for_faction(&self, faction: Faction) -> &ShipLoadout {
        match faction {
            Faction::Trader => &self.trader,
            Faction::Pirate => &self.pirate,
            Faction::BountyHunter => &self.bounty_hunter,
        }
    }
}

impl Default for LoadoutConfig {
    fn default() -> Self {
        Self {
            trader: ShipLoadout {
                max_speed: 150.0,
                max_hull: 100.0,
                max_shields: 50.0,
                shield_recharge: 5.0,
                cargo_capacity: 100,
                wallet: 10_000,
            },
            pirate: ShipLoadout {
                max_speed: 180.0,
                max_hull: 100.0,
                max_shields: 50.0,
                shield_recharge: 5.0,
                cargo_capacity: 0,
                wallet: 0,
            },
            bounty_hunter: ShipLoadout {
                max_speed: 200.0,
                max_hull: 150.0,
                max_shields: 100.0,
                shield_recharge: 10.0,
                cargo_capacity: 0,
                wallet: 0,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub station_wallet: Credits,
    pub dock_radius: f32,
    pub gate_radius: f32,
    pub initial_traders: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        use constants::world::*;
        Self {
            station_wallet: STATION_WALLET,
            dock_radius: DOCK_RADIUS,
            gate_radius: GATE_RADIUS,
            initial_traders: INITIAL_TRADERS,
        }
    }
}

/// Every tunable the engine reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub market: MarketConfig,
    pub trade: TradeConfig,
    pub combat: CombatConfig,
    pub population: PopulationConfig,
    pub autopilot: AutopilotConfig,
    pub analytics: AnalyticsConfig,
    pub loadouts: LoadoutConfig,
    pub world: WorldConfig,
}

impl SimConfig {
    /// Parse and validate a (possibly partial) JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(ok: bool, field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::Invalid { field, reason })
            }
        }
        let chance = |p: f64| (0.0..=1.0).contains(&p);

        check(self.market.top_k > 0, "market.top_k", "must be positive")?;
        check(
            self.market.max_routes >= self.market.top_k,
            "market.max_routes",
            "must be at least top_k",
        )?;
        check(self.market.cargo_unit > 0, "market.cargo_unit", "must be positive")?;
        check(self.trade.arrival_radius > 0.0, "trade.arrival_radius", "must be positive")?;
        check(self.combat.weapon_range > 0.0, "combat.weapon_range", "must be positive")?;
        check(self.combat.weapon_damage > 0.0, "combat.weapon_damage", "must be positive")?;
        check(
            chance(self.population.trader_spawn_chance),
            "population.trader_spawn_chance",
            "must be within [0, 1]",
        )?;
        check(
            chance(self.population.hunter_spawn_chance),
            "population.hunter_spawn_chance",
            "must be within [0, 1]",
        )?;
        check(
            self.population.wealth_threshold > 0,
            "population.wealth_threshold",
            "must be positive",
        )?;
        check(
            self.population.check_jitter_ms < self.population.check_interval_ms,
            "population.check_jitter_ms",
            "must be smaller than check_interval_ms",
        )?;
        check(self.analytics.history_len > 0, "analytics.history_len", "must be positive")?;
        check(self.analytics.bucket_ms > 0.0, "analytics.bucket_ms", "must be positive")?;
        check(
            self.autopilot.brake_factor > 0.0 && self.autopilot.brake_factor < 1.0,
            "autopilot.brake_factor",
            "must be within (0, 1)",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SimConfig::from_json(r#"{"combat": {"weapon_damage": 25.0}}"#).unwrap();
        assert_eq!(config.combat.weapon_damage, 25.0);
        assert_eq!(config.combat.weapon_range, constants::combat::WEAPON_RANGE);
        assert_eq!(config.market.top_k, 10);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = SimConfig::from_json(r#"{"market": {"top_k": 0}}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "market.top_k",
                ..
            }
        ));
        let err =
            SimConfig::from_json(r#"{"population": {"hunter_spawn_chance": 1.5}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            SimConfig::from_json("{"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_loadout_lookup() {
        let loadouts = LoadoutConfig::default();
        assert_eq!(loadouts.for_faction(Faction::Trader).cargo_capacity, 100);
        let stats = loadouts.for_faction(Faction::BountyHunter).combat_stats();
        assert_eq!(stats.hull, 150.0);
        assert_eq!(stats.shields, stats.max_shields);
    }
}
