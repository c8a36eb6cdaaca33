//! Combat FSM - shield recharge, targeting, chase, engagement lock, fights.
//!
//! Pirates hunt traders and bounty hunters; bounty hunters hunt pirates.
//! An attacker that closes to weapon range spawns an [`EncounterZone`]
//! entity and both ships hold still until one dies or the fight breaks
//! down. Only the attacking side fires.

use hecs::{Entity, World};
use std::collections::HashMap;

use super::analytics::Analytics;
use super::movement::{steer, stop};
use crate::components::{
    ActivityMode, Cargo, CombatEncounter, CombatStats, CombatTarget, EncounterRole,
    EncounterZone, Faction, InSector, Ledger, Pilot, PlayerControl, Transform,
};
use starlane_logic::combat::{hunter_target_score, pirate_target_score, HitOutcome};
use starlane_logic::config::CombatConfig;
use starlane_logic::geometry::Vec2;
use starlane_logic::universe::SectorId;

/// Cooldowns and the targeting throttle.
#[derive(Debug, Clone, Default)]
pub struct CombatState {
    /// Sim time of each attacker's last shot.
    cooldowns: HashMap<Entity, f64>,
    last_targeting_ms: f64,
}

impl CombatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cooldown_count(&self) -> usize {
        self.cooldowns.len()
    }
}

/// Run one combat tick.
pub fn combat_system(
    world: &mut World,
    state: &mut CombatState,
    config: &CombatConfig,
    analytics: &mut Analytics,
    now_ms: f64,
    delta_seconds: f32,
) {
    for (_, stats) in world.query_mut::<&mut CombatStats>() {
        stats.regenerate(now_ms, delta_seconds, config.shield_regen_delay_ms);
    }

    if now_ms - state.last_targeting_ms >= config.targeting_interval_ms {
        state.last_targeting_ms = now_ms;
        acquire_targets(world, config);
    }

    let hunting: Vec<(Entity, Entity)> = world
        .query::<&CombatTarget>()
        .iter()
        .map(|(e, t)| (e, t.0))
        .collect();

    for (attacker, target) in hunting {
        // Earlier fights this tick may have killed or released either side.
        let still_hunting = world
            .get::<&CombatTarget>(attacker)
            .is_ok_and(|t| t.0 == target);
        if !still_hunting {
            continue;
        }

        let encounter = world.get::<&CombatEncounter>(attacker).ok().map(|c| *c);
        match encounter {
            Some(CombatEncounter {
                encounter,
                role: EncounterRole::Attacker,
            }) => fight(world, state, config, analytics, attacker, target, encounter, now_ms),
            Some(_) => {}
            None => {
                if let Some(encounter) = chase(world, config, attacker, target) {
                    fight(world, state, config, analytics, attacker, target, encounter, now_ms);
                }
            }
        }
    }
}

/// A ship as seen by targeting.
struct Contact {
    entity: Entity,
    faction: Faction,
    sector: SectorId,
    pos: Vec2,
    profit: i64,
    engaged: bool,
}

fn acquire_targets(world: &mut World, config: &CombatConfig) {
    let contacts: Vec<Contact> = world
        .query::<(
            &Faction,
            &InSector,
            &Transform,
            &CombatStats,
            Option<&Ledger>,
            Option<&CombatEncounter>,
        )>()
        .without::<&PlayerControl>()
        .iter()
        .map(|(entity, (faction, sector, transform, _, ledger, encounter))| Contact {
            entity,
            faction: *faction,
            sector: sector.0,
            pos: transform.pos,
            profit: ledger.map_or(0, |l| l.realized_profit),
            engaged: encounter.is_some(),
        })
        .collect();

    // Hunters already closing in on each pirate.
    let mut converging: HashMap<Entity, usize> = HashMap::new();
    for (_, (faction, target)) in world.query::<(&Faction, &CombatTarget)>().iter() {
        if *faction == Faction::BountyHunter {
            *converging.entry(target.0).or_insert(0) += 1;
        }
    }

    let mut assignments = Vec::new();
    for hunter in contacts.iter().filter(|c| c.faction.is_aggressor() && !c.engaged) {
        let has_live_target = world
            .get::<&CombatTarget>(hunter.entity)
            .is_ok_and(|t| world.contains(t.0));
        if has_live_target {
            continue;
        }

        // Scores only rank candidates; any valid prey beats none.
        let mut best: Option<(Entity, f64)> = None;
        for prey in &contacts {
            if prey.entity == hunter.entity
                || prey.sector != hunter.sector
                || !hunter.faction.can_target(prey.faction)
                || (prey.engaged && hunter.faction.respects_engagement())
            {
                continue;
            }
            let distance = hunter.pos.distance(&prey.pos);
            let score = match hunter.faction {
                Faction::BountyHunter => hunter_target_score(
                    distance,
                    prey.engaged,
                    converging.get(&prey.entity).copied().unwrap_or(0),
                    config.hunter_engaged_bonus,
                    config.hunter_swarm_penalty,
                ),
                _ => pirate_target_score(prey.profit, distance),
            };
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((prey.entity, score));
            }
        }

        if let Some((prey, _)) = best {
            if hunter.faction == Faction::BountyHunter {
                *converging.entry(prey).or_insert(0) += 1;
            }
            log::debug!("{} {:?} targets {:?}", hunter.faction, hunter.entity, prey);
            assignments.push((hunter.entity, prey));
        }
    }

    for (hunter, prey) in assignments {
        let _ = world.insert_one(hunter, CombatTarget(prey));
    }
}

fn sector_and_pos(world: &World, entity: Entity) -> Option<(SectorId, Vec2)> {
    let sector = world.get::<&InSector>(entity).ok()?.0;
    let pos = world.get::<&Transform>(entity).ok()?.pos;
    Some((sector, pos))
}

fn set_mode(world: &World, entity: Entity, mode: ActivityMode) {
    if let Ok(mut pilot) = world.get::<&mut Pilot>(entity) {
        pilot.mode = mode;
    }
}

/// Hand a ship back to its trade FSM. Traders keep a loaded route.
fn release_pilot(world: &World, entity: Entity) {
    let holding = world.get::<&Cargo>(entity).is_ok_and(|c| c.total() > 0);
    if let Ok(mut pilot) = world.get::<&mut Pilot>(entity) {
        pilot.release(holding);
    }
}

/// Close on the target. Returns the new encounter if the attacker locked on
/// this tick.
fn chase(
    world: &mut World,
    config: &CombatConfig,
    attacker: Entity,
    target: Entity,
) -> Option<Entity> {
    let faction = world.get::<&Faction>(attacker).map(|f| *f).ok()?;
    let here = sector_and_pos(world, attacker)?;
    let there = sector_and_pos(world, target);
    let target_engaged = world.get::<&CombatEncounter>(target).is_ok();

    let valid = matches!(there, Some((sector, _)) if sector == here.0)
        && !(target_engaged && faction.respects_engagement());
    let Some((sector, target_pos)) = there.filter(|_| valid) else {
        let _ = world.remove_one::<CombatTarget>(attacker);
        stop(world, attacker);
        return None;
    };

    if here.1.distance(&target_pos) > config.weapon_range {
        steer(world, attacker, target_pos);
        return None;
    }

    stop(world, attacker);
    stop(world, target);
    let zone = world.spawn((
        EncounterZone {
            center: here.1.midpoint(&target_pos),
            radius: config.encounter_radius,
            participants: vec![attacker, target],
        },
        InSector(sector),
    ));
    let _ = world.insert_one(
        attacker,
        CombatEncounter {
            encounter: zone,
            role: EncounterRole::Attacker,
        },
    );
    if !target_engaged {
        let _ = world.insert_one(
            target,
            CombatEncounter {
                encounter: zone,
                role: EncounterRole::Defender,
            },
        );
    }
    set_mode(world, attacker, ActivityMode::Combat);
    set_mode(world, target, ActivityMode::Combat);
    log::debug!("{} {:?} engaged {:?} in {}", faction, attacker, target, sector);
    Some(zone)
}

#[allow(clippy::too_many_arguments)]
fn fight(
    world: &mut World,
    state: &mut CombatState,
    config: &CombatConfig,
    analytics: &mut Analytics,
    attacker: Entity,
    target: Entity,
    encounter: Entity,
    now_ms: f64,
) {
    let attacker_sector = world.get::<&InSector>(attacker).map(|s| s.0).ok();
    let target_sector = world.get::<&InSector>(target).map(|s| s.0).ok();
    let valid = world.contains(target)
        && target_sector.is_some()
        && target_sector == attacker_sector
        && world.get::<&CombatEncounter>(target).is_ok()
        && world.contains(encounter);
    if !valid {
        log::debug!("Encounter {:?} broke down", encounter);
        tear_down(world, encounter);
        let _ = world.remove_one::<CombatTarget>(attacker);
        release_pilot(world, attacker);
        return;
    }

    stop(world, attacker);
    stop(world, target);

    let ready = state
        .cooldowns
        .get(&attacker)
        .map_or(true, |last| now_ms - last >= config.fire_cooldown_ms);
    if !ready {
        return;
    }
    state.cooldowns.insert(attacker, now_ms);

    let outcome = match world.get::<&mut CombatStats>(target) {
        Ok(mut stats) => stats.apply_hit(config.weapon_damage, now_ms),
        Err(_) => return,
    };
    if outcome == HitOutcome::Destroyed {
        destroy(world, state, analytics, attacker, target, encounter, now_ms);
    }
}

/// Despawn an encounter zone and release everyone still pointing at it.
fn tear_down(world: &mut World, encounter: Entity) {
    let participants = world
        .get::<&EncounterZone>(encounter)
        .map(|z| z.participants.clone())
        .unwrap_or_default();
    let _ = world.despawn(encounter);
    for entity in participants {
        let in_zone = world
            .get::<&CombatEncounter>(entity)
            .is_ok_and(|c| c.encounter == encounter);
        if in_zone {
            let _ = world.remove_one::<CombatEncounter>(entity);
            release_pilot(world, entity);
        }
    }
}

fn destroy(
    world: &mut World,
    state: &mut CombatState,
    analytics: &mut Analytics,
    attacker: Entity,
    victim: Entity,
    encounter: Entity,
    now_ms: f64,
) {
    let sector = world.get::<&InSector>(victim).map(|s| s.0).ok();
    let victim_faction = world.get::<&Faction>(victim).map(|f| *f).ok();
    let attacker_faction = world.get::<&Faction>(attacker).map(|f| *f).ok();

    if attacker_faction == Some(Faction::Pirate) {
        let loot = world
            .get::<&Ledger>(victim)
            .map_or(0, |l| l.realized_profit.max(0));
        if let Ok(mut ledger) = world.get::<&mut Ledger>(attacker) {
            ledger.piracy_revenue += loot;
        }
        if loot > 0 {
            log::info!("Pirate {:?} looted {} credits", attacker, loot);
        }
    }

    tear_down(world, encounter);

    // The victim may itself have been attacking someone.
    let victim_encounter = world.get::<&CombatEncounter>(victim).ok().map(|c| *c);
    if let Some(CombatEncounter {
        encounter: own,
        role: EncounterRole::Attacker,
    }) = victim_encounter
    {
        tear_down(world, own);
    }

    // Anyone else still hunting the victim lets go.
    let pursuers: Vec<Entity> = world
        .query::<&CombatTarget>()
        .iter()
        .filter(|(e, t)| t.0 == victim && *e != attacker)
        .map(|(e, _)| e)
        .collect();
    for pursuer in pursuers {
        let _ = world.remove_one::<CombatTarget>(pursuer);
        let attacking = world.get::<&CombatEncounter>(pursuer).ok().map(|c| *c);
        if let Some(CombatEncounter {
            encounter: theirs,
            role: EncounterRole::Attacker,
        }) = attacking
        {
            tear_down(world, theirs);
        }
        release_pilot(world, pursuer);
    }

    if world.despawn(victim).is_ok() {
        state.cooldowns.remove(&victim);
    }

    let _ = world.remove_one::<CombatTarget>(attacker);
    let _ = world.remove_one::<CombatEncounter>(attacker);
    release_pilot(world, attacker);

    log::info!(
        "{} {:?} destroyed {} {:?}",
        attacker_faction.map_or_else(|| "unknown".to_string(), |f| f.to_string()),
        attacker,
        victim_faction.map_or_else(|| "unknown".to_string(), |f| f.to_string()),
        victim
    );
    if let Some(sector) = sector {
        analytics.record_kill(sector, now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Velocity;
    use starlane_logic::config::AnalyticsConfig;

    struct Arena {
        world: World,
        state: CombatState,
        config: CombatConfig,
        analytics: Analytics,
    }

    impl Arena {
        fn new() -> Self {
            Self {
                world: World::new(),
                state: CombatState::new(),
                config: CombatConfig::default(),
                analytics: Analytics::new(AnalyticsConfig::default()),
            }
        }

        fn ship(&mut self, faction: Faction, pos: Vec2, profit: i64) -> Entity {
            self.world.spawn((
                faction,
                Pilot::new(),
                InSector(SectorId(8)),
                Transform::at(pos),
                Velocity::default(),
                crate::components::SpeedStats { max_speed: 180.0 },
                CombatStats::new(100.0, 50.0, 5.0),
                Ledger {
                    realized_profit: profit,
                    piracy_revenue: 0,
                },
            ))
        }

        fn tick(&mut self, now_ms: f64) {
            combat_system(
                &mut self.world,
                &mut self.state,
                &self.config,
                &mut self.analytics,
                now_ms,
                0.016,
            );
        }

        fn target(&self, e: Entity) -> Option<Entity> {
            self.world.get::<&CombatTarget>(e).ok().map(|t| t.0)
        }

        fn encounter(&self, e: Entity) -> Option<CombatEncounter> {
            self.world.get::<&CombatEncounter>(e).ok().map(|c| *c)
        }

        fn mode(&self, e: Entity) -> ActivityMode {
            self.world.get::<&Pilot>(e).unwrap().mode
        }

        fn zones(&self) -> usize {
            self.world.query::<&EncounterZone>().iter().count()
        }
    }

    #[test]
    fn test_pirate_prefers_rich_nearby_trader() {
        let mut a = Arena::new();
        let pirate = a.ship(Faction::Pirate, Vec2::ZERO, 0);
        let _poor = a.ship(Faction::Trader, Vec2::new(1000.0, 0.0), 0);
        let rich = a.ship(Faction::Trader, Vec2::new(1000.0, 0.0), 5000);
        a.tick(3000.0);
        assert_eq!(a.target(pirate), Some(rich));
    }

    #[test]
    fn test_targeting_is_throttled_and_same_sector() {
        let mut a = Arena::new();
        let pirate = a.ship(Faction::Pirate, Vec2::ZERO, 0);
        let trader = a.ship(Faction::Trader, Vec2::new(1000.0, 0.0), 0);
        a.world.get::<&mut InSector>(trader).unwrap().0 = SectorId(1);
        a.tick(1000.0);
        assert_eq!(a.target(pirate), None);
        a.tick(3000.0);
        assert_eq!(a.target(pirate), None);

        a.world.get::<&mut InSector>(trader).unwrap().0 = SectorId(8);
        a.tick(4000.0);
        assert_eq!(a.target(pirate), None);
        a.tick(6000.0);
        assert_eq!(a.target(pirate), Some(trader));
    }

    #[test]
    fn test_hunters_spread_across_pirates() {
        let mut a = Arena::new();
        let p1 = a.ship(Faction::Pirate, Vec2::new(100.0, 0.0), 0);
        let p2 = a.ship(Faction::Pirate, Vec2::new(0.0, 400.0), 0);
        let h1 = a.ship(Faction::BountyHunter, Vec2::ZERO, 0);
        let h2 = a.ship(Faction::BountyHunter, Vec2::ZERO, 0);
        a.tick(3000.0);
        // First hunter takes the closer pirate; the swarm penalty pushes the
        // second onto the other one.
        assert_eq!(a.target(h1), Some(p1));
        assert_eq!(a.target(h2), Some(p2));
    }

    #[test]
    fn test_lone_pirate_draws_every_hunter() {
        let mut a = Arena::new();
        let pirate = a.ship(Faction::Pirate, Vec2::ZERO, 0);
        let h1 = a.ship(Faction::BountyHunter, Vec2::new(1000.0, 0.0), 0);
        let h2 = a.ship(Faction::BountyHunter, Vec2::new(-1000.0, 0.0), 0);
        a.tick(3000.0);
        // The swarm penalty only ranks candidates.
        assert_eq!(a.target(h1), Some(pirate));
        assert_eq!(a.target(h2), Some(pirate));
    }

    #[test]
    fn test_chase_then_lock_spawns_encounter() {
        let mut a = Arena::new();
        let pirate = a.ship(Faction::Pirate, Vec2::ZERO, 0);
        let trader = a.ship(Faction::Trader, Vec2::new(1000.0, 0.0), 0);
        a.tick(3000.0);
        let v = a.world.get::<&Velocity>(pirate).unwrap().0;
        assert!((v.x - 180.0).abs() < 1e-3);
        assert_eq!(a.zones(), 0);

        a.world.get::<&mut Transform>(pirate).unwrap().pos = Vec2::new(900.0, 0.0);
        a.tick(3016.0);
        assert_eq!(a.zones(), 1);
        let enc = a.encounter(pirate).unwrap();
        assert_eq!(enc.role, EncounterRole::Attacker);
        assert_eq!(a.encounter(trader).unwrap().role, EncounterRole::Defender);
        assert_eq!(a.encounter(trader).unwrap().encounter, enc.encounter);
        assert_eq!(a.mode(pirate), ActivityMode::Combat);
        assert_eq!(a.mode(trader), ActivityMode::Combat);
        let zone = a.world.get::<&EncounterZone>(enc.encounter).unwrap();
        assert_eq!(zone.center, Vec2::new(950.0, 0.0));
        drop(zone);
        assert_eq!(a.world.get::<&Velocity>(pirate).unwrap().0, Vec2::ZERO);

        // Fired on the lock tick: shields take the first hit.
        let stats = *a.world.get::<&CombatStats>(trader).unwrap();
        assert_eq!(stats.shields, 40.0);
        assert_eq!(stats.hull, 100.0);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut a = Arena::new();
        let _pirate = a.ship(Faction::Pirate, Vec2::ZERO, 0);
        let trader = a.ship(Faction::Trader, Vec2::new(100.0, 0.0), 0);
        a.tick(3000.0);
        a.tick(3500.0);
        assert_eq!(a.world.get::<&CombatStats>(trader).unwrap().shields, 40.0);
        a.tick(4000.0);
        assert_eq!(a.world.get::<&CombatStats>(trader).unwrap().shields, 30.0);
    }

    #[test]
    fn test_kill_loots_and_cleans_up() {
        let mut a = Arena::new();
        let pirate = a.ship(Faction::Pirate, Vec2::ZERO, 0);
        let trader = a.ship(Faction::Trader, Vec2::new(100.0, 0.0), 750);
        a.world.get::<&mut CombatStats>(trader).unwrap().shields = 0.0;
        a.world.get::<&mut CombatStats>(trader).unwrap().hull = 10.0;
        a.tick(3000.0);

        assert!(!a.world.contains(trader));
        assert_eq!(a.zones(), 0);
        assert_eq!(a.world.get::<&Ledger>(pirate).unwrap().piracy_revenue, 750);
        assert_eq!(a.target(pirate), None);
        assert!(a.encounter(pirate).is_none());
        assert_eq!(a.mode(pirate), ActivityMode::Planning);
        assert_eq!(a.analytics.total_kills(SectorId(8)), 1);
        assert_eq!(a.state.cooldown_count(), 1);
    }

    #[test]
    fn test_negative_profit_yields_no_loot() {
        let mut a = Arena::new();
        let pirate = a.ship(Faction::Pirate, Vec2::ZERO, 0);
        let trader = a.ship(Faction::Trader, Vec2::new(100.0, 0.0), -300);
        a.world.get::<&mut CombatStats>(trader).unwrap().shields = 0.0;
        a.world.get::<&mut CombatStats>(trader).unwrap().hull = 5.0;
        a.tick(3000.0);
        assert!(!a.world.contains(trader));
        assert_eq!(a.world.get::<&Ledger>(pirate).unwrap().piracy_revenue, 0);
    }

    #[test]
    fn test_breakdown_when_target_leaves_sector() {
        let mut a = Arena::new();
        let pirate = a.ship(Faction::Pirate, Vec2::ZERO, 0);
        let trader = a.ship(Faction::Trader, Vec2::new(100.0, 0.0), 0);
        a.tick(3000.0);
        assert_eq!(a.zones(), 1);

        a.world.get::<&mut InSector>(trader).unwrap().0 = SectorId(1);
        a.tick(3016.0);
        assert_eq!(a.zones(), 0);
        assert!(a.encounter(pirate).is_none());
        assert!(a.encounter(trader).is_none());
        assert_eq!(a.target(pirate), None);
        assert_eq!(a.mode(pirate), ActivityMode::Planning);
        assert_eq!(a.mode(trader), ActivityMode::Planning);
    }

    #[test]
    fn test_hunter_kill_releases_pirates_victim() {
        let mut a = Arena::new();
        let pirate = a.ship(Faction::Pirate, Vec2::ZERO, 0);
        let trader = a.ship(Faction::Trader, Vec2::new(100.0, 0.0), 0);
        a.tick(3000.0);
        let e1 = a.encounter(pirate).unwrap().encounter;

        // Hunter arrives in range of the engaged pirate.
        let hunter = a.ship(Faction::BountyHunter, Vec2::new(-100.0, 0.0), 0);
        {
            let mut stats = a.world.get::<&mut CombatStats>(pirate).unwrap();
            stats.shields = 0.0;
            stats.hull = 10.0;
            stats.last_damage_ms = 5000.0;
        }
        a.tick(6000.0);

        assert!(!a.world.contains(pirate));
        assert!(!a.world.contains(e1));
        assert_eq!(a.zones(), 0);
        assert!(a.encounter(trader).is_none());
        assert_eq!(a.mode(trader), ActivityMode::Planning);
        assert!(a.encounter(hunter).is_none());
        assert_eq!(a.target(hunter), None);
        assert_eq!(a.mode(hunter), ActivityMode::Planning);
    }

    #[test]
    fn test_released_trader_resumes_sell_leg() {
        use crate::components::{Cargo, TradeLeg, TradeRoute};
        use starlane_logic::items::ItemId;

        let mut a = Arena::new();
        let pirate = a.ship(Faction::Pirate, Vec2::ZERO, 0);
        let trader = a.ship(Faction::Trader, Vec2::new(100.0, 0.0), 0);
        let market = a.world.spawn(());
        a.world
            .insert_one(trader, Cargo([(ItemId::Ore, 100)].into_iter().collect()))
            .unwrap();
        {
            let mut pilot = a.world.get::<&mut Pilot>(trader).unwrap();
            pilot.route = Some(TradeRoute {
                buy_station: market,
                sell_station: market,
                item: ItemId::Ore,
                expected_profit: 190,
                score: 1.0,
                distance: 400.0,
            });
            pilot.cost_basis = 100;
            pilot.mode = ActivityMode::Trading(TradeLeg::MovingToSell);
        }
        a.tick(3000.0);
        assert_eq!(a.mode(trader), ActivityMode::Combat);

        let _hunter = a.ship(Faction::BountyHunter, Vec2::new(-100.0, 0.0), 0);
        {
            let mut stats = a.world.get::<&mut CombatStats>(pirate).unwrap();
            stats.shields = 0.0;
            stats.hull = 10.0;
            stats.last_damage_ms = 5000.0;
        }
        a.tick(6000.0);

        assert!(!a.world.contains(pirate));
        assert!(a.encounter(trader).is_none());
        assert_eq!(a.mode(trader), ActivityMode::Trading(TradeLeg::MovingToSell));
        let pilot = a.world.get::<&Pilot>(trader).unwrap();
        assert_eq!(pilot.route.map(|r| r.sell_station), Some(market));
        assert_eq!(pilot.cost_basis, 100);
    }

    #[test]
    fn test_shields_regenerate_after_delay() {
        let mut a = Arena::new();
        let trader = a.ship(Faction::Trader, Vec2::ZERO, 0);
        {
            let mut stats = a.world.get::<&mut CombatStats>(trader).unwrap();
            stats.shields = 10.0;
            stats.last_damage_ms = 1000.0;
        }
        a.tick(3500.0);
        assert_eq!(a.world.get::<&CombatStats>(trader).unwrap().shields, 10.0);
        a.tick(4500.0);
        let shields = a.world.get::<&CombatStats>(trader).unwrap().shields;
        assert!((shields - 10.08).abs() < 1e-4);
    }
}
