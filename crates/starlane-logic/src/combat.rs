//! Pure combat math: factions, damage resolution, shield recharge, and
//! target scoring.

use serde::{Deserialize, Serialize};

use crate::items::Credits;

/// Agent allegiance. Decides who hunts whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Trader,
    Pirate,
    BountyHunter,
}

impl Faction {
    /// Factions that actively pick targets.
    pub fn is_aggressor(self) -> bool {
        !matches!(self, Faction::Trader)
    }

    /// Whether an attacker of this faction may pick `target` as prey.
    pub fn can_target(self, target: Faction) -> bool {
        match self {
            Faction::Trader => false,
            Faction::Pirate => matches!(target, Faction::Trader | Faction::BountyHunter),
            Faction::BountyHunter => target == Faction::Pirate,
        }
    }

    /// Whether the target being locked in another fight rules it out.
    ///
    /// Pirates leave engaged ships alone; bounty hunters will pile onto a
    /// pirate that is already fighting.
    pub fn respects_engagement(self) -> bool {
        !matches!(self, Faction::BountyHunter)
    }
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Faction::Trader => "trader",
            Faction::Pirate => "pirate",
            Faction::BountyHunter => "bounty hunter",
        };
        f.write_str(s)
    }
}

/// Hull and shield state of a ship.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    pub hull: f32,
    pub max_hull: f32,
    pub shields: f32,
    pub max_shields: f32,
    /// Shield points regained per second once the regen delay has passed.
    pub shield_recharge: f32,
    /// Sim time (ms) of the last hit taken.
    pub last_damage_ms: f64,
}

/// Effect of a single weapon hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    ShieldsAbsorbed,
    HullDamaged,
    Destroyed,
}

impl CombatStats {
    pub fn new(max_hull: f32, max_shields: f32, shield_recharge: f32) -> Self {
        Self {
            hull: max_hull,
            max_hull,
            shields: max_shields,
            max_shields,
            shield_recharge,
            last_damage_ms: 0.0,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.hull <= 0.0
    }

    /// Apply one weapon hit at time `now_ms`.
    ///
    /// Shields soak the whole hit while they are up; damage beyond the
    /// remaining shield is lost, and the hull only takes damage once the
    /// shields are already at zero.
    pub fn apply_hit(&mut self, damage: f32, now_ms: f64) -> HitOutcome {
        self.last_damage_ms = now_ms;
        if self.shields > 0.0 {
            self.shields = (self.shields - damage).max(0.0);
            return HitOutcome::ShieldsAbsorbed;
        }
        self.hull -= damage;
        if self.is_destroyed() {
            HitOutcome::Destroyed
        } else {
            HitOutcome::HullDamaged
        }
    }

    /// Recharge shields for `dt` seconds if no hit landed in the last
    /// `regen_delay_ms`.
    pub fn regenerate(&mut self, now_ms: f64, dt: f32, regen_delay_ms: f64) {
        if now_ms - self.last_damage_ms <= regen_delay_ms {
            return;
        }
        if self.shields < self.max_shields {
            self.shields = (self.shields + self.shield_recharge * dt).min(self.max_shields);
        }
    }
}

/// Pirate preference: rich, nearby prey.
pub fn pirate_target_score(target_profit: Credits, distance: f32) -> f64 {
    let profit = target_profit.max(0) as f64 + 100.0;
    profit / (f64::from(distance) + 100.0)
}

/// Bounty hunter preference: proximity first, engaged pirates are a bonus,
/// and each hunter already closing in makes a pirate less attractive.
pub fn hunter_target_score(
    distance: f32,
    target_engaged: bool,
    converging_hunters: usize,
    engaged_bonus: f64,
    swarm_penalty: f64,
) -> f64 {
    let mut score = 10_000.0 / (f64::from(distance) + 10.0);
    if target_engaged {
        score += engaged_bonus;
    }
    score - swarm_penalty * converging_hunters as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shields_absorb_then_hull() {
        let mut stats = CombatStats::new(100.0, 15.0, 5.0);
        assert_eq!(stats.apply_hit(10.0, 1.0), HitOutcome::ShieldsAbsorbed);
        assert_eq!(stats.shields, 5.0);
        // Overflow past the shield is discarded.
        assert_eq!(stats.apply_hit(10.0, 2.0), HitOutcome::ShieldsAbsorbed);
        assert_eq!(stats.shields, 0.0);
        assert_eq!(stats.hull, 100.0);
        assert_eq!(stats.apply_hit(10.0, 3.0), HitOutcome::HullDamaged);
        assert_eq!(stats.hull, 90.0);
        assert_eq!(stats.last_damage_ms, 3.0);
    }

    #[test]
    fn test_destroyed_at_zero() {
        let mut stats = CombatStats::new(10.0, 0.0, 0.0);
        assert_eq!(stats.apply_hit(10.0, 0.0), HitOutcome::Destroyed);
        assert!(stats.is_destroyed());
    }

    #[test]
    fn test_regen_waits_for_delay() {
        let mut stats = CombatStats::new(100.0, 100.0, 10.0);
        stats.shields = 50.0;
        stats.last_damage_ms = 1000.0;
        stats.regenerate(3000.0, 1.0, 3000.0);
        assert_eq!(stats.shields, 50.0);
        stats.regenerate(4001.0, 1.0, 3000.0);
        assert_eq!(stats.shields, 60.0);
        stats.regenerate(10_000.0, 100.0, 3000.0);
        assert_eq!(stats.shields, 100.0);
    }

    #[test]
    fn test_faction_matrix() {
        assert!(Faction::Pirate.can_target(Faction::Trader));
        assert!(Faction::Pirate.can_target(Faction::BountyHunter));
        assert!(!Faction::Pirate.can_target(Faction::Pirate));
        assert!(Faction::BountyHunter.can_target(Faction::Pirate));
        assert!(!Faction::BountyHunter.can_target(Faction::Trader));
        assert!(!Faction::Trader.can_target(Faction::Pirate));
        assert!(!Faction::Trader.is_aggressor());
    }

    #[test]
    fn test_pirates_prefer_rich_targets() {
        let poor = pirate_target_score(10, 100.0);
        let rich = pirate_target_score(1000, 100.0);
        assert!(rich > poor);
        // Debt does not make a target less attractive than a broke one.
        assert_eq!(pirate_target_score(-500, 0.0), pirate_target_score(0, 0.0));
    }

    #[test]
    fn test_hunter_score_adjustments() {
        let base = hunter_target_score(90.0, false, 0, 5000.0, 2000.0);
        assert!((base - 100.0).abs() < 1e-9);
        let engaged = hunter_target_score(90.0, true, 0, 5000.0, 2000.0);
        assert!((engaged - 5100.0).abs() < 1e-9);
        let swarmed = hunter_target_score(90.0, true, 2, 5000.0, 2000.0);
        assert!((swarmed - 1100.0).abs() < 1e-9);
    }
}
