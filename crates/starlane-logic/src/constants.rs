//! Tuning constants - the default values behind [`crate::config::SimConfig`].
//!
//! Times are simulation milliseconds, distances are world units.

pub mod market {
    pub const REFRESH_INTERVAL_MS: f64 = 5000.0;
    /// Units assumed per haul when estimating route profit.
    pub const CARGO_UNIT: u32 = 10;
    pub const MAX_ROUTES: usize = 50;
    /// Routes handed out are drawn from this many of the best.
    pub const TOP_K: usize = 10;
}

pub mod trade {
    pub const ARRIVAL_RADIUS: f32 = 50.0;
    /// Agents leaving a gate appear this far (on each axis) from the exit gate.
    pub const GATE_EXIT_OFFSET: f32 = 100.0;
}

pub mod combat {
    pub const WEAPON_RANGE: f32 = 150.0;
    pub const WEAPON_DAMAGE: f32 = 10.0;
    pub const FIRE_COOLDOWN_MS: f64 = 1000.0;
    pub const SHIELD_REGEN_DELAY_MS: f64 = 3000.0;
    pub const TARGETING_INTERVAL_MS: f64 = 3000.0;
    pub const ENCOUNTER_RADIUS: f32 = 200.0;
    pub const HUNTER_ENGAGED_BONUS: f64 = 5000.0;
    pub const HUNTER_SWARM_PENALTY: f64 = 2000.0;
}

pub mod population {
    pub const CHECK_INTERVAL_MS: f64 = 10_000.0;
    pub const CHECK_JITTER_MS: f64 = 3000.0;
    pub const MIN_TRADERS: usize = 20;
    pub const TRADER_SPAWN_CHANCE: f64 = 0.5;
    pub const WEALTH_THRESHOLD: i64 = 5000;
    pub const MAX_PIRATES_PER_WAVE: u32 = 3;
    pub const HUNTER_SPAWN_CHANCE: f64 = 0.1;
    pub const MAX_HUNTERS: usize = 15;
    pub const PIRATE_GRACE_MS: f64 = 60_000.0;
    pub const MAX_AGENTS: usize = 120;
}

pub mod autopilot {
    pub const ARRIVAL_TOLERANCE: f32 = 100.0;
    /// Radians per second.
    pub const ROTATION_SPEED: f32 = 3.0;
    /// Velocity added per tick while thrusting.
    pub const THRUST: f32 = 8.0;
    pub const MAX_SPEED: f32 = 500.0;
    pub const ALIGN_TOLERANCE: f32 = 0.1;
    pub const BRAKE_FACTOR: f32 = 0.95;
    /// A gate closer than this right after exiting it must be cleared first.
    pub const GATE_CLEARANCE: f32 = 350.0;
    pub const CLEARANCE_DISTANCE: f32 = 400.0;
    pub const GATE_JUMP_RADIUS: f32 = 50.0;
    /// Exit gate is ignored until the ship is this far away from it.
    pub const REENTRY_RADIUS: f32 = 300.0;
}

pub mod world {
    pub const STATION_WALLET: i64 = 10_000;
    pub const DOCK_RADIUS: f32 = 200.0;
    pub const GATE_RADIUS: f32 = 100.0;
    pub const INITIAL_TRADERS: usize = 20;
}

pub mod analytics {
    pub const SAMPLE_INTERVAL_MS: f64 = 500.0;
    pub const HISTORY_LEN: usize = 300;
    pub const BUCKET_MS: f64 = 10_000.0;
    pub const KILL_WINDOW_MS: f64 = 60_000.0;
}
