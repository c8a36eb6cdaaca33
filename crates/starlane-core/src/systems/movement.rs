//! Movement system - integrates positions from velocities

use hecs::{Entity, World};
use starlane_logic::geometry::Vec2;
use starlane_logic::movement::{integrate, steer_towards};

use crate::components::{Docked, SpeedStats, Transform, Velocity};

/// Advance every moving entity by `delta_seconds`. Docked ships stay put.
pub fn movement_system(world: &mut World, delta_seconds: f32) {
    for (_, (transform, velocity)) in world
        .query_mut::<(&mut Transform, &Velocity)>()
        .without::<&Docked>()
    {
        if velocity.0 != Vec2::ZERO {
            transform.pos = integrate(transform.pos, velocity.0, delta_seconds);
        }
    }
}

/// Point an agent at `target` and set its velocity to full speed.
pub(crate) fn steer(world: &mut World, entity: Entity, target: Vec2) {
    let speed = world.get::<&SpeedStats>(entity).map_or(0.0, |s| s.max_speed);
    let Ok(mut transform) = world.get::<&mut Transform>(entity) else {
        return;
    };
    let steering = steer_towards(transform.pos, target, speed);
    transform.rotation = steering.rotation;
    drop(transform);
    if let Ok(mut velocity) = world.get::<&mut Velocity>(entity) {
        velocity.0 = steering.velocity;
    }
}

pub(crate) fn stop(world: &World, entity: Entity) {
    if let Ok(mut velocity) = world.get::<&mut Velocity>(entity) {
        velocity.stop();
    }
}
