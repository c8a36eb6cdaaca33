//! Pure movement logic - steering, thrust, braking, integration.
//!
//! Two flight models share these helpers:
//! - agents fly "on rails": heading snaps to the target and speed is
//!   always the ship's max speed ([`steer_towards`]);
//! - the player's autopilot turns at a limited rate and accelerates by a
//!   fixed thrust per tick ([`turn_towards`], [`thrust`], [`brake`]).

use crate::geometry::{wrap_angle, Vec2};

/// Heading and velocity produced by a steering decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    pub rotation: f32,
    pub velocity: Vec2,
}

/// Face `target` and fly at `speed` straight at it.
pub fn steer_towards(pos: Vec2, target: Vec2, speed: f32) -> Steering {
    let rotation = pos.angle_to(&target);
    Steering {
        rotation,
        velocity: Vec2::from_angle(rotation) * speed,
    }
}

/// Whether `pos` is strictly within `radius` of `target`.
pub fn arrived(pos: Vec2, target: Vec2, radius: f32) -> bool {
    pos.distance_squared(&target) < radius * radius
}

/// Rotate `rotation` towards `target_angle` by at most `max_step` radians.
///
/// Returns the new rotation and whether it was already within `tolerance`
/// (in which case it is left unchanged).
pub fn turn_towards(
    rotation: f32,
    target_angle: f32,
    max_step: f32,
    tolerance: f32,
) -> (f32, bool) {
    let diff = wrap_angle(target_angle - rotation);
    if diff.abs() <= tolerance {
        return (rotation, true);
    }
    (rotation + max_step * diff.signum(), false)
}

/// Add `amount` of velocity along `rotation`, unless already at `max_speed`.
pub fn thrust(velocity: Vec2, rotation: f32, amount: f32, max_speed: f32) -> Vec2 {
    if velocity.length() >= max_speed {
        return velocity;
    }
    velocity + Vec2::from_angle(rotation) * amount
}

/// Decay velocity by `factor`. Returns `None` once both axes are below 1,
/// signalling a full stop.
pub fn brake(velocity: Vec2, factor: f32) -> Option<Vec2> {
    let v = velocity * factor;
    if v.x.abs() < 1.0 && v.y.abs() < 1.0 {
        None
    } else {
        Some(v)
    }
}

/// Explicit Euler step: `pos + velocity × dt`.
pub fn integrate(pos: Vec2, velocity: Vec2, dt: f32) -> Vec2 {
    pos + velocity * dt
}
