//! Autopilot - multi-hop flight for the player ship, plus touch-to-jump
//! gate handling.
//!
//! Unlike AI agents, the player turns at a limited rate and builds speed
//! with thrust, so the autopilot runs a small state machine:
//!
//! ```text
//! Idle ──target──▶ Aligning ◀──▶ Thrusting ──arrived──▶ Braking ──stopped──▶ Idle
//!                      ▲
//!        ClearingGate ─┘ (when the next gate is the one just exited)
//! ```

use hecs::{Entity, World};

use super::navigation::{jump, GateInfo, Navigator};
use crate::components::{
    Autopilot, AutopilotState, Docked, InSector, LastGate, PlayerControl, Transform, Velocity,
};
use starlane_logic::config::AutopilotConfig;
use starlane_logic::geometry::Vec2;
use starlane_logic::movement::{arrived, brake, thrust, turn_towards};
use starlane_logic::universe::SectorId;

/// Steer every autopiloted, undocked ship.
pub fn autopilot_system(
    world: &mut World,
    navigator: &Navigator,
    config: &AutopilotConfig,
    delta_seconds: f32,
) {
    for (_, (autopilot, transform, velocity, sector, last_gate)) in world
        .query_mut::<(
            &mut Autopilot,
            &mut Transform,
            &mut Velocity,
            &InSector,
            Option<&LastGate>,
        )>()
        .without::<&Docked>()
    {
        let last_gate = last_gate.map(|g| g.0);
        follow_route(autopilot, transform, sector.0, last_gate, navigator, config);
        fly(autopilot, transform, velocity, config, delta_seconds);
    }
}

/// Pop sectors off the queue as they are reached and aim at the next gate.
fn follow_route(
    autopilot: &mut Autopilot,
    transform: &Transform,
    current: SectorId,
    last_gate: Option<Entity>,
    navigator: &Navigator,
    config: &AutopilotConfig,
) {
    let Some(&next) = autopilot.path_queue.front() else {
        return;
    };

    if next == current {
        autopilot.path_queue.pop_front();
        match autopilot.path_queue.front() {
            Some(&following) => aim_at_gate(
                autopilot, transform, current, following, last_gate, navigator, config,
            ),
            None => {
                log::debug!("Autopilot reached {}", current);
                autopilot.target = None;
                autopilot.state = AutopilotState::Braking;
            }
        }
    } else if autopilot.target.is_none() {
        aim_at_gate(autopilot, transform, current, next, last_gate, navigator, config);
    }
}

fn aim_at_gate(
    autopilot: &mut Autopilot,
    transform: &Transform,
    current: SectorId,
    next: SectorId,
    last_gate: Option<Entity>,
    navigator: &Navigator,
    config: &AutopilotConfig,
) {
    let Some(gate) = navigator.gate_towards(current, next) else {
        log::warn!("Autopilot found no gate from {} to {}", current, next);
        autopilot.disengage();
        return;
    };

    let too_close = last_gate == Some(gate.entity)
        && transform.pos.distance(&gate.pos) < config.gate_clearance;
    if too_close {
        let ahead = Vec2::from_angle(transform.rotation) * config.clearance_distance;
        autopilot.target = Some(transform.pos + ahead);
        autopilot.state = AutopilotState::ClearingGate;
    } else {
        autopilot.target = Some(gate.pos);
        autopilot.state = AutopilotState::Aligning;
    }
}

fn fly(
    autopilot: &mut Autopilot,
    transform: &mut Transform,
    velocity: &mut Velocity,
    config: &AutopilotConfig,
    dt: f32,
) {
    let max_step = config.rotation_speed * dt;

    match autopilot.state {
        AutopilotState::Idle => {}
        AutopilotState::ClearingGate => {
            let Some(target) = autopilot.target else {
                autopilot.state = AutopilotState::Idle;
                return;
            };
            if arrived(transform.pos, target, config.arrival_tolerance) {
                // Route pickup re-targets the real gate next tick.
                autopilot.target = None;
                autopilot.state = AutopilotState::Idle;
            } else {
                let angle = transform.pos.angle_to(&target);
                let (rotation, _) =
                    turn_towards(transform.rotation, angle, max_step, config.align_tolerance);
                transform.rotation = rotation;
                velocity.0 = thrust(velocity.0, rotation, config.thrust, config.max_speed);
            }
        }
        AutopilotState::Aligning | AutopilotState::Thrusting => {
            let Some(target) = autopilot.target else {
                return;
            };
            if arrived(transform.pos, target, config.arrival_tolerance) {
                autopilot.target = None;
                autopilot.state = AutopilotState::Braking;
                return;
            }
            let angle = transform.pos.angle_to(&target);
            let (rotation, aligned) =
                turn_towards(transform.rotation, angle, max_step, config.align_tolerance);
            transform.rotation = rotation;
            if aligned {
                autopilot.state = AutopilotState::Thrusting;
                velocity.0 = thrust(velocity.0, rotation, config.thrust, config.max_speed);
            } else {
                autopilot.state = AutopilotState::Aligning;
            }
        }
        AutopilotState::Braking => match brake(velocity.0, config.brake_factor) {
            Some(v) => velocity.0 = v,
            None => {
                velocity.stop();
                autopilot.state = AutopilotState::Idle;
            }
        },
    }
}

/// Jump player ships that touch a gate.
///
/// The ship lands exactly on the paired gate and remembers it; that gate is
/// ignored until the ship has moved out of re-entry range.
pub fn player_gate_system(world: &mut World, navigator: &Navigator, config: &AutopilotConfig) {
    let mut jumps: Vec<(Entity, GateInfo)> = Vec::new();
    let mut cleared: Vec<Entity> = Vec::new();

    for (entity, (transform, sector, last_gate)) in world
        .query::<(&Transform, &InSector, Option<&LastGate>)>()
        .with::<&PlayerControl>()
        .without::<&Docked>()
        .iter()
    {
        let mut last = last_gate.map(|g| g.0);
        for gate in navigator.gates_in(sector.0) {
            let distance = transform.pos.distance(&gate.pos);
            if last == Some(gate.entity) {
                if distance < config.reentry_radius {
                    continue;
                }
                cleared.push(entity);
                last = None;
            }
            if distance < config.gate_jump_radius {
                if let Some(exit) = navigator.gate(gate.destination_gate) {
                    jumps.push((entity, *exit));
                    break;
                }
                log::warn!(
                    "Gate {:?} leads to a missing gate {:?}",
                    gate.entity,
                    gate.destination_gate
                );
            }
        }
    }

    for entity in cleared {
        let _ = world.remove_one::<LastGate>(entity);
    }
    for (entity, exit) in jumps {
        jump(world, entity, exit.sector, exit.pos);
        let _ = world.insert_one(entity, LastGate(exit.entity));
    }
}
